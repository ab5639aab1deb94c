//! # Notification HMAC
//!
//! HMAC-SHA256 signatures over notification items. The shared key is
//! configured in the Customer Area as hex; the signature travels base64
//! encoded in `additionalData.hmacSignature`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use pay_core::{NotificationItem, PaymentError, PaymentResult};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies notification items with a shared key
#[derive(Clone)]
pub struct HmacValidator {
    key: Vec<u8>,
}

impl HmacValidator {
    /// Create from the hex-encoded key
    pub fn new(hex_key: &str) -> PaymentResult<Self> {
        let key = hex::decode(hex_key.trim()).map_err(|e| {
            PaymentError::Configuration(format!("HMAC key is not valid hex: {}", e))
        })?;

        if key.is_empty() {
            return Err(PaymentError::Configuration("HMAC key is empty".to_string()));
        }

        Ok(Self { key })
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.key).expect("HMAC can take key of any size")
    }

    /// Base64 signature of arbitrary data
    pub fn calculate(&self, data: &str) -> String {
        let mut mac = self.mac();
        mac.update(data.as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }

    /// Signature the processor is expected to send for this item
    pub fn sign(&self, item: &NotificationItem) -> String {
        self.calculate(&item.signing_payload())
    }

    /// Check the item's `hmacSignature` in constant time.
    ///
    /// Missing or undecodable signatures are invalid.
    pub fn is_valid(&self, item: &NotificationItem) -> bool {
        let Some(signature) = item.hmac_signature() else {
            return false;
        };
        let Ok(expected) = STANDARD.decode(signature) else {
            return false;
        };

        let mut mac = self.mac();
        mac.update(item.signing_payload().as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}
