//! # Request Handlers
//!
//! Axum request handlers for the checkout API.
//! Every gateway call is made with the merchant account from the app config;
//! the browser never chooses it.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{
        rejection::{FormRejection, JsonRejection},
        Path, Query, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use pay_adyen::verify_notification;
use pay_core::{
    currency_for_payment_method, is_klarna, Amount, CheckoutSessionResponse,
    CreateCheckoutSessionRequest, OrderReference, Outcome, PaymentCompletionDetails,
    PaymentDetailsRequest, PaymentError, PaymentInstrument, PaymentInstrumentInfo,
    PaymentMethodsRequest, PaymentMethodsResponse, PaymentRequest, PaymentResponse,
    TransferInstrument, TransferInstrumentInfo, CHANNEL_WEB,
};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{error, info, instrument, warn};

/// Value of every `/payments` call, in minor units
pub const PAYMENT_VALUE: i64 = 1000;

/// Error body is the bare error string
pub type ApiError = (StatusCode, Json<String>);

fn payment_error_to_response(method: &str, err: PaymentError) -> ApiError {
    error!("Error in {}: {}", method, err);
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
    (status, Json(err.to_string()))
}

fn rejection_to_response(method: &str, rejection: JsonRejection) -> ApiError {
    warn!("Bad request body in {}: {}", method, rejection.body_text());
    (StatusCode::BAD_REQUEST, Json(rejection.body_text()))
}

/// `<scheme>://<host>/api/handleShopperRedirect?orderRef=<ref>`
fn return_url(headers: &HeaderMap, state: &AppState, order_ref: &OrderReference) -> String {
    let scheme = header_str(headers, "x-forwarded-proto").unwrap_or("http");
    let host = header_str(headers, header::HOST.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| state.config.authority());

    format!(
        "{}://{}/api/handleShopperRedirect?orderRef={}",
        scheme, host, order_ref
    )
}

/// First address of `X-Forwarded-For`, else `X-Real-IP`
fn shopper_ip(headers: &HeaderMap) -> Option<String> {
    header_str(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .or_else(|| header_str(headers, "x-real-ip"))
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "adyen-checkout",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a checkout session for the drop-in
#[instrument(skip(state, headers))]
pub async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CheckoutSessionResponse>, ApiError> {
    let order_ref = OrderReference::new();

    let request = CreateCheckoutSessionRequest {
        merchant_account: state.config.merchant_account.clone(),
        reference: order_ref.to_string(),
        amount: state.order.amount.clone(),
        return_url: return_url(&headers, &state, &order_ref),
        country_code: Some(state.order.country_code.clone()),
        channel: Some(CHANNEL_WEB.to_string()),
        shopper_ip: shopper_ip(&headers),
        line_items: state.order.line_items.clone(),
    };

    let session = state
        .checkout
        .create_session(&request)
        .await
        .map_err(|e| payment_error_to_response("sessions", e))?;

    info!("Session created: id={}, reference={}", session.id, order_ref);
    Ok(Json(session))
}

/// List payment methods available on the Web channel
#[instrument(skip(state))]
pub async fn get_payment_methods(
    State(state): State<AppState>,
) -> Result<Json<PaymentMethodsResponse>, ApiError> {
    let request = PaymentMethodsRequest {
        merchant_account: state.config.merchant_account.clone(),
        channel: Some(CHANNEL_WEB.to_string()),
        ..Default::default()
    };

    let methods = state
        .checkout
        .payment_methods(&request)
        .await
        .map_err(|e| payment_error_to_response("getPaymentMethods", e))?;

    info!(
        "Payment methods: {:?}",
        methods.method_types().collect::<Vec<_>>()
    );
    Ok(Json(methods))
}

/// Submit a payment from the component state
#[instrument(skip(state, headers, payload))]
pub async fn initiate_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let Json(mut request) = payload.map_err(|e| rejection_to_response("initiatePayment", e))?;

    let method_type = request
        .payment_method_type()
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            payment_error_to_response(
                "initiatePayment",
                PaymentError::InvalidRequest("paymentMethod.type is required".to_string()),
            )
        })?;

    let order_ref = OrderReference::new();

    request.merchant_account = state.config.merchant_account.clone();
    request.amount = Some(Amount::new(
        PAYMENT_VALUE,
        currency_for_payment_method(&method_type),
    ));
    request.reference = order_ref.to_string();
    request.channel = Some(CHANNEL_WEB.to_string());
    request.return_url = Some(return_url(&headers, &state, &order_ref));
    request
        .additional_data
        .insert("allow3DS2".to_string(), "true".to_string());
    if let Some(ip) = shopper_ip(&headers) {
        request.shopper_ip = Some(ip);
    }

    if is_klarna(&method_type) {
        request.shopper_locale = Some("en_US".to_string());
        request.country_code = Some("SE".to_string());
        request.shopper_reference = Some(format!("shopper-{}", order_ref));
        request.line_items = state.order.line_items.clone();
    }

    let response = state
        .checkout
        .payments(&request)
        .await
        .map_err(|e| payment_error_to_response("initiatePayment", e))?;

    if let Some(payment_data) = response.payment_data() {
        state
            .payment_data
            .insert(order_ref.to_string(), payment_data)
            .await;
    }

    info!(
        "Payment initiated: method={}, reference={}, result={:?}",
        method_type, order_ref, response.result_code
    );
    Ok(Json(response))
}

/// Forward details gathered by an additional action
#[instrument(skip(state, payload))]
pub async fn submit_additional_details(
    State(state): State<AppState>,
    payload: Result<Json<PaymentDetailsRequest>, JsonRejection>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|e| rejection_to_response("submitAdditionalDetails", e))?;

    let response = state
        .checkout
        .payment_details(&request)
        .await
        .map_err(|e| payment_error_to_response("submitAdditionalDetails", e))?;

    Ok(Json(response))
}

/// Query parameters of the shopper redirect
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectQuery {
    pub order_ref: Option<String>,
    pub redirect_result: Option<String>,
    pub payload: Option<String>,
}

/// Form body of a POST redirect (3DS1 issuers post MD and PaRes)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectForm {
    pub redirect_result: Option<String>,
    pub payload: Option<String>,
    #[serde(rename = "MD")]
    pub md: Option<String>,
    #[serde(rename = "PaRes")]
    pub pa_res: Option<String>,
}

/// Shopper returns with the details in the query string
#[instrument(skip(state, query), fields(order_ref = ?query.order_ref))]
pub async fn shopper_redirect_get(
    State(state): State<AppState>,
    Query(query): Query<RedirectQuery>,
) -> Result<Response, ApiError> {
    let details = PaymentCompletionDetails {
        redirect_result: query.redirect_result,
        payload: query.payload,
        ..Default::default()
    };

    resolve_redirect(&state, query.order_ref.as_deref(), details).await
}

/// Shopper returns with a form post, or a bodyless POST carrying the
/// details in the query string
#[instrument(skip(state, query, form), fields(order_ref = ?query.order_ref))]
pub async fn shopper_redirect_post(
    State(state): State<AppState>,
    Query(query): Query<RedirectQuery>,
    form: Result<Form<RedirectForm>, FormRejection>,
) -> Result<Response, ApiError> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(FormRejection::InvalidFormContentType(_)) => RedirectForm::default(),
        Err(e) => {
            warn!("Bad request body in handleShopperRedirect: {}", e.body_text());
            return Err((StatusCode::BAD_REQUEST, Json(e.body_text())));
        }
    };

    let details = PaymentCompletionDetails {
        redirect_result: form.redirect_result.or(query.redirect_result),
        payload: form.payload.or(query.payload),
        md: form.md,
        pa_res: form.pa_res,
        ..Default::default()
    };

    resolve_redirect(&state, query.order_ref.as_deref(), details).await
}

async fn resolve_redirect(
    state: &AppState,
    order_ref: Option<&str>,
    details: PaymentCompletionDetails,
) -> Result<Response, ApiError> {
    if details.is_empty() {
        return Err(payment_error_to_response(
            "handleShopperRedirect",
            PaymentError::InvalidRequest("No redirect details in request".to_string()),
        ));
    }

    let payment_data = match order_ref {
        Some(order_ref) => state.payment_data.take(order_ref).await,
        None => None,
    };

    let request = PaymentDetailsRequest {
        details,
        payment_data,
    };

    let response = state
        .checkout
        .payment_details(&request)
        .await
        .map_err(|e| payment_error_to_response("handleShopperRedirect", e))?;

    if response.psp_reference.is_none() {
        return Ok((StatusCode::OK, Json(response)).into_response());
    }

    let outcome = response.outcome();
    if let Outcome::Error { reason } = &outcome {
        warn!("Payment ended in error: order_ref={:?}, reason={}", order_ref, reason);
    }

    Ok((StatusCode::FOUND, [(header::LOCATION, outcome.route())]).into_response())
}

/// Webhook endpoint for standard notifications
#[instrument(skip(state, body), fields(body_len = body.len()))]
pub async fn webhook_notifications(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, Response> {
    info!("Webhook received");

    let request = verify_notification(&state.hmac, &body).map_err(|e| match e {
        PaymentError::WebhookVerificationFailed(_) => {
            (StatusCode::UNAUTHORIZED, "Invalid hmac signature").into_response()
        }
        other => payment_error_to_response("webhooks", other).into_response(),
    })?;

    info!(
        "Notification verified: live={}, items={}",
        request.is_live(),
        request.notification_items.len()
    );

    for item in request.into_items() {
        info!(
            "Received webhook PspReference: {} EventCode: {}",
            item.psp_reference, item.event_code
        );
        state.events.consume(item);
    }

    Ok(StatusCode::ACCEPTED)
}

/// Issue a card on the balance platform
#[instrument(skip(state, payload))]
pub async fn create_card(
    State(state): State<AppState>,
    payload: Result<Json<PaymentInstrumentInfo>, JsonRejection>,
) -> Result<Json<PaymentInstrument>, ApiError> {
    let Json(info) = payload.map_err(|e| rejection_to_response("createCard", e))?;

    let instrument = state
        .platform
        .create_payment_instrument(&info)
        .await
        .map_err(|e| payment_error_to_response("createCard", e))?;

    Ok(Json(instrument))
}

/// Register a bank account for a legal entity
#[instrument(skip(state, payload))]
pub async fn create_transfer_instrument(
    State(state): State<AppState>,
    payload: Result<Json<TransferInstrumentInfo>, JsonRejection>,
) -> Result<Json<TransferInstrument>, ApiError> {
    let Json(info) = payload.map_err(|e| rejection_to_response("createTransferInstrument", e))?;

    let instrument = state
        .platform
        .create_transfer_instrument(&info)
        .await
        .map_err(|e| payment_error_to_response("createTransferInstrument", e))?;

    Ok(Json(instrument))
}

/// Landing page after a payment
pub async fn result_page(
    Path(status): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let (icon, title, message) = match status.as_str() {
        "pending" => (
            "⏳",
            "Order Received",
            "Your order has been received! Payment completion pending.".to_string(),
        ),
        "failed" => (
            "❌",
            "Payment Refused",
            "The payment was refused. Please try a different payment method or card.".to_string(),
        ),
        "error" => {
            let reason = params.get("reason").map(String::as_str).unwrap_or("");
            ("⚠️", "Payment Error", format!("Error! Reason: {}", escape_html(reason)))
        }
        _ => (
            "✅",
            "Order Placed",
            "Your order has been successfully placed.".to_string(),
        ),
    };

    Html(format!(r#"
<!DOCTYPE html>
<html>
<head><title>{title}</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: #f7f8f9;">
    <div style="background: white; padding: 60px; border-radius: 16px; text-align: center;">
        <div style="font-size: 60px;">{icon}</div>
        <h1>{title}</h1>
        <p style="color: #666;">{message}</p>
        <a href="/">Return Home</a>
    </div>
</body>
</html>
"#))
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_payment_error_conversion() {
        let err = PaymentError::ProviderError {
            provider: "adyen".to_string(),
            status: 422,
            error_code: Some("14_030".to_string()),
            message: "Return URL is missing".to_string(),
        };
        let (status, Json(body)) = payment_error_to_response("test", err);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("Return URL is missing"));

        let (status, _) =
            payment_error_to_response("test", PaymentError::NetworkError("timeout".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_shopper_ip() {
        let mut headers = HeaderMap::new();
        assert_eq!(shopper_ip(&headers), None);

        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(shopper_ip(&headers).as_deref(), Some("10.0.0.2"));

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(shopper_ip(&headers).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("Not enough balance"), "Not enough balance");
    }
}
