//! # Adyen Webhook Handling
//!
//! Parsing and verification of standard notifications, and dispatch of
//! accepted items to a handler by event code.

use crate::signature::HmacValidator;
use pay_core::{
    EventCode, NotificationItem, NotificationRequest, PaymentError, PaymentResult,
};
use tracing::{debug, info, warn};

/// Parse a raw notification payload
pub fn parse_notification(payload: &[u8]) -> PaymentResult<NotificationRequest> {
    let request: NotificationRequest = serde_json::from_slice(payload).map_err(|e| {
        PaymentError::WebhookParseError(format!("Failed to parse notification: {}", e))
    })?;

    if request.notification_items.is_empty() {
        return Err(PaymentError::WebhookParseError(
            "Notification contains no items".to_string(),
        ));
    }

    Ok(request)
}

/// Parse a payload and verify the signature of every item.
///
/// The request is rejected as a whole if any single item fails, so callers
/// never see a partially trusted batch.
pub fn verify_notification(
    validator: &HmacValidator,
    payload: &[u8],
) -> PaymentResult<NotificationRequest> {
    let request = parse_notification(payload)?;

    if let Some(item) = request.items().find(|item| !validator.is_valid(item)) {
        warn!(
            "HMAC signature is invalid: psp={}, event={}",
            item.psp_reference, item.event_code
        );
        return Err(PaymentError::WebhookVerificationFailed(
            "Invalid hmac signature".to_string(),
        ));
    }

    Ok(request)
}

/// Notification handler trait
///
/// Implement this trait to act on accepted notification items.
#[allow(unused_variables)]
pub trait NotificationHandler: Send + Sync {
    /// Called when a payment is authorised (or the authorisation failed)
    fn on_authorisation(&self, item: &NotificationItem) -> PaymentResult<()> {
        if item.is_success() {
            info!(
                "Payment authorised: psp={}, reference={}, amount={} {}",
                item.psp_reference, item.merchant_reference, item.amount.value, item.amount.currency
            );
        } else {
            warn!(
                "Authorisation failed: psp={}, reason={:?}",
                item.psp_reference, item.reason
            );
        }
        Ok(())
    }

    /// Called when a payment is cancelled
    fn on_cancellation(&self, item: &NotificationItem) -> PaymentResult<()> {
        info!("Payment cancelled: psp={}", item.psp_reference);
        Ok(())
    }

    /// Called for REFUND and CANCEL_OR_REFUND
    fn on_refund(&self, item: &NotificationItem) -> PaymentResult<()> {
        info!(
            "Refund processed: psp={}, original={:?}",
            item.psp_reference, item.original_reference
        );
        Ok(())
    }

    /// Called when a capture completes
    fn on_capture(&self, item: &NotificationItem) -> PaymentResult<()> {
        info!("Capture processed: psp={}", item.psp_reference);
        Ok(())
    }

    /// Called for CAPTURE_FAILED and REFUND_FAILED
    fn on_operation_failed(&self, item: &NotificationItem) -> PaymentResult<()> {
        warn!(
            "Operation failed: event={}, psp={}, reason={:?}",
            item.event_code, item.psp_reference, item.reason
        );
        Ok(())
    }

    /// Called when a chargeback is raised
    fn on_chargeback(&self, item: &NotificationItem) -> PaymentResult<()> {
        warn!("Chargeback: psp={}", item.psp_reference);
        Ok(())
    }

    /// Called when a payment is pending
    fn on_pending(&self, item: &NotificationItem) -> PaymentResult<()> {
        info!("Payment pending: psp={}", item.psp_reference);
        Ok(())
    }

    /// Called for unknown/unhandled events
    fn on_unknown_event(&self, item: &NotificationItem) -> PaymentResult<()> {
        debug!("Unhandled notification event: {}", item.event_code);
        Ok(())
    }
}

/// Default handler (just logs events)
pub struct LoggingNotificationHandler;

impl NotificationHandler for LoggingNotificationHandler {}

/// Dispatch a notification item to the appropriate handler method
pub fn dispatch_notification(
    handler: &dyn NotificationHandler,
    item: &NotificationItem,
) -> PaymentResult<()> {
    match &item.event_code {
        EventCode::Authorisation => handler.on_authorisation(item),
        EventCode::Cancellation => handler.on_cancellation(item),
        EventCode::Refund | EventCode::CancelOrRefund => handler.on_refund(item),
        EventCode::Capture => handler.on_capture(item),
        EventCode::CaptureFailed | EventCode::RefundFailed => handler.on_operation_failed(item),
        EventCode::Chargeback => handler.on_chargeback(item),
        EventCode::Pending => handler.on_pending(item),
        EventCode::Other(_) => handler.on_unknown_event(item),
    }
}
