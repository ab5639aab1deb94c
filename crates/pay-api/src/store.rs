//! # Payment Data Store
//!
//! Keeps the continuation token (`action.paymentData`) of a redirect-based
//! payment until the shopper comes back with the matching `orderRef`.
//! In-process only: entries are lost on restart and are not shared between
//! instances.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// How long a token is kept for a shopper who never returns
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

struct Entry {
    payment_data: String,
    stored_at: Instant,
}

/// Tokens by order reference.
///
/// Entries live at most `ttl`; expired entries are purged on every insert,
/// so abandoned redirects do not accumulate.
#[derive(Clone)]
pub struct PaymentDataStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    ttl: Duration,
}

impl Default for PaymentDataStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }
}

impl PaymentDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Remember the token for an order reference
    pub async fn insert(&self, order_ref: impl Into<String>, payment_data: impl Into<String>) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| now.duration_since(entry.stored_at) < self.ttl);
        entries.insert(
            order_ref.into(),
            Entry {
                payment_data: payment_data.into(),
                stored_at: now,
            },
        );
    }

    /// Remove and return the token; a redirect can only be resolved once
    pub async fn take(&self, order_ref: &str) -> Option<String> {
        let entry = self.entries.write().await.remove(order_ref)?;
        if entry.stored_at.elapsed() >= self.ttl {
            return None;
        }
        Some(entry.payment_data)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
