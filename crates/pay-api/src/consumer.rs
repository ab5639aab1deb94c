//! # Event Consumer
//!
//! Hands accepted notification items to a background task so the webhook
//! can answer immediately.

use pay_adyen::{dispatch_notification, NotificationHandler};
use pay_core::NotificationItem;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct EventConsumer {
    tx: UnboundedSender<NotificationItem>,
}

impl EventConsumer {
    /// Spawn a worker that dispatches every item to `handler`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(handler: Arc<dyn NotificationHandler>) -> Self {
        let (consumer, mut rx) = Self::channel();

        tokio::spawn(async move {
            while let Some(item) = rx.recv().await {
                if let Err(e) = dispatch_notification(handler.as_ref(), &item) {
                    error!(
                        "Notification handler error: psp={}, error={}",
                        item.psp_reference, e
                    );
                }
            }
            info!("Event consumer stopped");
        });

        consumer
    }

    /// Consumer plus the receiving end, for callers that drain items themselves
    pub fn channel() -> (Self, UnboundedReceiver<NotificationItem>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue an item for processing
    pub fn consume(&self, item: NotificationItem) {
        match item.event_time() {
            Some(at) => info!("Processing eventCode {} from {}", item.event_code, at),
            None => info!("Processing eventCode {}", item.event_code),
        }

        if let Err(e) = self.tx.send(item) {
            warn!(
                "Event consumer is gone, dropping notification psp={}",
                e.0.psp_reference
            );
        }
    }
}
