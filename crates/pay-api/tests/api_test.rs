//! Router-level tests against in-memory gateways.

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use pay_adyen::HmacValidator;
use pay_api::{create_router, AppConfig, AppState, EventConsumer};
use pay_core::{
    CheckoutGateway, CheckoutSessionResponse, CreateCheckoutSessionRequest, NotificationItem,
    PaymentDetailsRequest, PaymentError, PaymentInstrument, PaymentInstrumentInfo,
    PaymentMethodsRequest, PaymentMethodsResponse, PaymentRequest, PaymentResponse,
    PaymentResult, PlatformGateway, TransferInstrument, TransferInstrumentInfo,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedReceiver;

const HMAC_KEY: &str = "44782DEF547AAA06C910C43932B1EB0C71FC68D9D0C057550C48EC2ACF6BA056";

#[derive(Clone, Copy)]
enum Failure {
    Provider(u16),
    Network,
}

#[derive(Default)]
struct FakeCheckout {
    payment_response: Mutex<Value>,
    details_response: Mutex<Value>,
    failure: Mutex<Option<Failure>>,
    sessions: Mutex<Vec<CreateCheckoutSessionRequest>>,
    method_requests: Mutex<Vec<PaymentMethodsRequest>>,
    payments: Mutex<Vec<PaymentRequest>>,
    details: Mutex<Vec<PaymentDetailsRequest>>,
}

impl FakeCheckout {
    fn respond_to_payments(&self, response: Value) {
        *self.payment_response.lock().unwrap() = response;
    }

    fn respond_to_details(&self, response: Value) {
        *self.details_response.lock().unwrap() = response;
    }

    fn fail_with(&self, failure: Failure) {
        *self.failure.lock().unwrap() = Some(failure);
    }

    fn check_failure(&self) -> PaymentResult<()> {
        match *self.failure.lock().unwrap() {
            Some(Failure::Provider(status)) => Err(PaymentError::ProviderError {
                provider: "fake".to_string(),
                status,
                error_code: Some("14_030".to_string()),
                message: "Return URL is missing".to_string(),
            }),
            Some(Failure::Network) => Err(PaymentError::NetworkError(
                "connection refused".to_string(),
            )),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CheckoutGateway for FakeCheckout {
    async fn create_session(
        &self,
        request: &CreateCheckoutSessionRequest,
    ) -> PaymentResult<CheckoutSessionResponse> {
        self.check_failure()?;
        self.sessions.lock().unwrap().push(request.clone());
        Ok(serde_json::from_value(json!({
            "id": "CS0001",
            "sessionData": "Ab02b4c0!",
            "reference": request.reference
        }))
        .unwrap())
    }

    async fn payment_methods(
        &self,
        request: &PaymentMethodsRequest,
    ) -> PaymentResult<PaymentMethodsResponse> {
        self.check_failure()?;
        self.method_requests.lock().unwrap().push(request.clone());
        Ok(serde_json::from_value(json!({
            "paymentMethods": [
                { "type": "scheme", "name": "Cards", "brands": ["visa", "mc"] },
                { "type": "ideal", "name": "iDEAL" }
            ]
        }))
        .unwrap())
    }

    async fn payments(&self, request: &PaymentRequest) -> PaymentResult<PaymentResponse> {
        self.check_failure()?;
        self.payments.lock().unwrap().push(request.clone());
        let response = self.payment_response.lock().unwrap().clone();
        Ok(serde_json::from_value(response).unwrap_or_default())
    }

    async fn payment_details(
        &self,
        request: &PaymentDetailsRequest,
    ) -> PaymentResult<PaymentResponse> {
        self.check_failure()?;
        self.details.lock().unwrap().push(request.clone());
        let response = self.details_response.lock().unwrap().clone();
        Ok(serde_json::from_value(response).unwrap_or_default())
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

struct FakePlatform;

#[async_trait]
impl PlatformGateway for FakePlatform {
    async fn create_payment_instrument(
        &self,
        info: &PaymentInstrumentInfo,
    ) -> PaymentResult<PaymentInstrument> {
        info.validate()?;
        Ok(serde_json::from_value(json!({
            "id": "PI3227C223222B5BPCMFXD2XG",
            "balanceAccountId": info.balance_account_id,
            "type": info.instrument_type,
            "status": "active"
        }))
        .unwrap())
    }

    async fn create_transfer_instrument(
        &self,
        info: &TransferInstrumentInfo,
    ) -> PaymentResult<TransferInstrument> {
        info.validate()?;
        Ok(serde_json::from_value(json!({
            "id": "SE322KH223222F5GXZFNM3BGP",
            "legalEntityId": info.legal_entity_id,
            "type": info.instrument_type
        }))
        .unwrap())
    }
}

struct Harness {
    server: TestServer,
    state: AppState,
    checkout: Arc<FakeCheckout>,
    events: UnboundedReceiver<NotificationItem>,
    validator: HmacValidator,
}

fn harness() -> Harness {
    let checkout = Arc::new(FakeCheckout::default());
    let (consumer, events) = EventConsumer::channel();
    let config = AppConfig {
        host: "127.0.0.1".to_string(),
        port: 8080,
        merchant_account: "TestMerchant".to_string(),
    };

    let state = AppState::with_gateways(
        config,
        checkout.clone(),
        Arc::new(FakePlatform),
        HmacValidator::new(HMAC_KEY).unwrap(),
        consumer,
    );

    let server = TestServer::new(create_router(state.clone())).unwrap();

    Harness {
        server,
        state,
        checkout,
        events,
        validator: HmacValidator::new(HMAC_KEY).unwrap(),
    }
}

fn drain(events: &mut UnboundedReceiver<NotificationItem>) -> Vec<NotificationItem> {
    let mut items = Vec::new();
    while let Ok(item) = events.try_recv() {
        items.push(item);
    }
    items
}

fn notification_item(psp: &str, event: &str) -> Value {
    json!({
        "amount": { "currency": "EUR", "value": 1000 },
        "eventCode": event,
        "eventDate": "2024-03-01T10:00:00+01:00",
        "merchantAccountCode": "TestMerchant",
        "merchantReference": "8313842560770001",
        "paymentMethod": "visa",
        "pspReference": psp,
        "success": "true"
    })
}

fn sign(validator: &HmacValidator, mut raw: Value) -> Value {
    let item: NotificationItem = serde_json::from_value(raw.clone()).unwrap();
    raw["additionalData"] = json!({ "hmacSignature": validator.sign(&item) });
    raw
}

fn notification(items: Vec<Value>) -> Value {
    let items: Vec<Value> = items
        .into_iter()
        .map(|item| json!({ "NotificationRequestItem": item }))
        .collect();
    json!({ "live": "false", "notificationItems": items })
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_health() {
    let h = harness();
    let response = h.server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn test_session_uses_order_template_and_host() {
    let h = harness();

    let response = h
        .server
        .post("/api/sessions")
        .add_header(
            HeaderName::from_static("host"),
            HeaderValue::from_static("shop.example"),
        )
        .add_header(
            HeaderName::from_static("x-forwarded-for"),
            HeaderValue::from_static("203.0.113.7"),
        )
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], "CS0001");

    let sessions = h.checkout.sessions.lock().unwrap();
    let request = &sessions[0];
    assert_eq!(request.merchant_account, "TestMerchant");
    assert_eq!(request.amount.value, 10000);
    assert_eq!(request.line_items.len(), 2);
    assert_eq!(request.channel.as_deref(), Some("Web"));
    assert_eq!(request.shopper_ip.as_deref(), Some("203.0.113.7"));
    assert_eq!(
        request.return_url,
        format!(
            "http://shop.example/api/handleShopperRedirect?orderRef={}",
            request.reference
        )
    );
    assert_eq!(body["reference"], request.reference.as_str());
}

#[tokio::test]
async fn test_payment_methods_pass_through() {
    let h = harness();

    let response = h.server.post("/api/getPaymentMethods").json(&json!({})).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["paymentMethods"][0]["brands"][1], "mc");

    let requests = h.checkout.method_requests.lock().unwrap();
    assert_eq!(requests[0].merchant_account, "TestMerchant");
    assert_eq!(requests[0].channel.as_deref(), Some("Web"));
}

#[tokio::test]
async fn test_initiate_payment_fills_server_side_fields() {
    let h = harness();
    h.checkout.respond_to_payments(json!({
        "resultCode": "Authorised",
        "pspReference": "V4HZ4RBFJGXXGN82"
    }));

    let response = h
        .server
        .post("/api/initiatePayment")
        .json(&json!({
            "paymentMethod": { "type": "ach", "bankAccountNumber": "1234567890" },
            "merchantAccount": "SomeoneElse",
            "browserInfo": { "userAgent": "test" }
        }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["resultCode"], "Authorised");

    let payments = h.checkout.payments.lock().unwrap();
    let request = &payments[0];
    assert_eq!(request.merchant_account, "TestMerchant");
    let amount = request.amount.as_ref().unwrap();
    assert_eq!((amount.value, amount.currency.as_str()), (1000, "USD"));
    assert_eq!(request.additional_data["allow3DS2"], "true");
    assert_eq!(request.channel.as_deref(), Some("Web"));
    assert!(request
        .return_url
        .as_deref()
        .unwrap()
        .ends_with(&format!("/api/handleShopperRedirect?orderRef={}", request.reference)));
    assert_eq!(request.browser_info, Some(json!({ "userAgent": "test" })));
    assert!(request.line_items.is_empty());
}

#[tokio::test]
async fn test_initiate_klarna_payment() {
    let h = harness();

    h.server
        .post("/api/initiatePayment")
        .json(&json!({ "paymentMethod": { "type": "klarna_paynow" } }))
        .await
        .assert_status_ok();

    let payments = h.checkout.payments.lock().unwrap();
    let request = &payments[0];
    assert_eq!(request.shopper_locale.as_deref(), Some("en_US"));
    assert_eq!(request.country_code.as_deref(), Some("SE"));
    assert!(request.shopper_reference.is_some());
    assert_eq!(request.line_items.len(), 2);
    assert_eq!(request.amount.as_ref().unwrap().currency, "EUR");
}

#[tokio::test]
async fn test_initiate_payment_requires_method_type() {
    let h = harness();

    let response = h
        .server
        .post("/api/initiatePayment")
        .json(&json!({ "paymentMethod": {} }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = h
        .server
        .post("/api/initiatePayment")
        .json(&json!({ "amount": "not an object" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    assert!(h.checkout.payments.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_gateway_error_keeps_upstream_status() {
    let h = harness();
    h.checkout.fail_with(Failure::Provider(422));

    let response = h
        .server
        .post("/api/initiatePayment")
        .json(&json!({ "paymentMethod": { "type": "scheme" } }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: String = response.json();
    assert!(body.contains("Return URL is missing"));
}

#[tokio::test]
async fn test_network_error_is_bad_request() {
    let h = harness();
    h.checkout.fail_with(Failure::Network);

    let response = h.server.post("/api/sessions").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<String>().contains("connection refused"));
}

#[tokio::test]
async fn test_submit_additional_details() {
    let h = harness();
    h.checkout.respond_to_details(json!({
        "resultCode": "Authorised",
        "pspReference": "V4HZ4RBFJGXXGN82"
    }));

    let response = h
        .server
        .post("/api/submitAdditionalDetails")
        .json(&json!({
            "details": { "threeDSResult": "eyJ0cmFuc1N0YXR1cyI6IlkifQ==" },
            "paymentData": "Ab02b4c0!"
        }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["pspReference"], "V4HZ4RBFJGXXGN82");

    let details = h.checkout.details.lock().unwrap();
    assert_eq!(details[0].payment_data.as_deref(), Some("Ab02b4c0!"));
    assert_eq!(
        details[0].details.extra["threeDSResult"],
        "eyJ0cmFuc1N0YXR1cyI6IlkifQ=="
    );
}

// =============================================================================
// Shopper redirect
// =============================================================================

#[tokio::test]
async fn test_redirect_routes_by_result_code() {
    let cases = [
        (json!({ "resultCode": "Authorised" }), "/result/success"),
        (json!({ "resultCode": "Pending" }), "/result/pending"),
        (json!({ "resultCode": "Received" }), "/result/pending"),
        (json!({ "resultCode": "Refused", "refusalReason": "Refused" }), "/result/failed"),
        (
            json!({ "resultCode": "Error", "refusalReason": "3D Not Authenticated" }),
            "/result/error?reason=3D+Not+Authenticated",
        ),
        (json!({ "resultCode": "Cancelled" }), "/result/error?reason=Cancelled"),
    ];

    for (mut details, expected) in cases {
        let h = harness();
        details["pspReference"] = json!("V4HZ4RBFJGXXGN82");
        h.checkout.respond_to_details(details);

        let response = h
            .server
            .get("/api/handleShopperRedirect")
            .add_query_param("orderRef", "unknown-order")
            .add_query_param("redirectResult", "X6XtfGC3")
            .await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header("location"), expected);
    }
}

#[tokio::test]
async fn test_redirect_uses_stored_payment_data_once() {
    let h = harness();
    h.checkout.respond_to_payments(json!({
        "resultCode": "RedirectShopper",
        "action": {
            "type": "redirect",
            "paymentData": "Ab02b4c0!BQABAgA",
            "url": "https://test.adyen.com/hpp/redirect"
        }
    }));
    h.checkout.respond_to_details(json!({
        "resultCode": "Authorised",
        "pspReference": "V4HZ4RBFJGXXGN82"
    }));

    h.server
        .post("/api/initiatePayment")
        .json(&json!({ "paymentMethod": { "type": "ideal", "issuer": "1121" } }))
        .await
        .assert_status_ok();

    let order_ref = h.checkout.payments.lock().unwrap()[0].reference.clone();
    assert_eq!(h.state.payment_data.len().await, 1);

    for _ in 0..2 {
        h.server
            .get("/api/handleShopperRedirect")
            .add_query_param("orderRef", &order_ref)
            .add_query_param("redirectResult", "X6XtfGC3")
            .await
            .assert_status(StatusCode::FOUND);
    }

    assert!(h.state.payment_data.is_empty().await);

    let details = h.checkout.details.lock().unwrap();
    assert_eq!(details[0].payment_data.as_deref(), Some("Ab02b4c0!BQABAgA"));
    assert_eq!(details[0].details.redirect_result.as_deref(), Some("X6XtfGC3"));
    assert_eq!(details[1].payment_data, None);
}

#[tokio::test]
async fn test_redirect_form_post() {
    let h = harness();
    h.checkout.respond_to_details(json!({
        "resultCode": "Authorised",
        "pspReference": "V4HZ4RBFJGXXGN82"
    }));

    let response = h
        .server
        .post("/api/handleShopperRedirect")
        .add_query_param("orderRef", "order-1")
        .form(&[("MD", "md-value"), ("PaRes", "pares-value")])
        .await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "/result/success");

    let details = h.checkout.details.lock().unwrap();
    assert_eq!(details[0].details.md.as_deref(), Some("md-value"));
    assert_eq!(details[0].details.pa_res.as_deref(), Some("pares-value"));
}

#[tokio::test]
async fn test_redirect_post_with_details_in_query() {
    let h = harness();
    h.checkout.respond_to_details(json!({
        "resultCode": "Authorised",
        "pspReference": "V4HZ4RBFJGXXGN82"
    }));

    let response = h
        .server
        .post("/api/handleShopperRedirect")
        .add_query_param("orderRef", "order-1")
        .add_query_param("redirectResult", "X6XtfGC3")
        .await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "/result/success");

    let details = h.checkout.details.lock().unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].details.redirect_result.as_deref(), Some("X6XtfGC3"));
}

#[tokio::test]
async fn test_redirect_post_without_details_is_json_bad_request() {
    let h = harness();

    let response = h
        .server
        .post("/api/handleShopperRedirect")
        .add_query_param("orderRef", "order-1")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<String>().contains("No redirect details"));
    assert!(h.checkout.details.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_redirect_without_psp_reference_returns_json() {
    let h = harness();
    h.checkout.respond_to_details(json!({
        "resultCode": "IdentifyShopper",
        "action": { "type": "threeDS2", "paymentData": "Ab02b4c0!" }
    }));

    let response = h
        .server
        .get("/api/handleShopperRedirect")
        .add_query_param("redirectResult", "X6XtfGC3")
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["resultCode"], "IdentifyShopper");
}

#[tokio::test]
async fn test_redirect_without_details_is_rejected() {
    let h = harness();

    let response = h
        .server
        .get("/api/handleShopperRedirect")
        .add_query_param("orderRef", "order-1")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(h.checkout.details.lock().unwrap().is_empty());
}

// =============================================================================
// Webhooks
// =============================================================================

#[tokio::test]
async fn test_webhook_accepts_signed_items() {
    let mut h = harness();
    let body = notification(vec![
        sign(&h.validator, notification_item("PSP1", "AUTHORISATION")),
        sign(&h.validator, notification_item("PSP2", "CAPTURE")),
    ]);

    let response = h.server.post("/api/webhooks/notifications").json(&body).await;

    response.assert_status(StatusCode::ACCEPTED);
    let consumed = drain(&mut h.events);
    let refs: Vec<&str> = consumed.iter().map(|i| i.psp_reference.as_str()).collect();
    assert_eq!(refs, ["PSP1", "PSP2"]);
}

#[tokio::test]
async fn test_webhook_rejects_tampered_item() {
    let mut h = harness();
    let mut tampered = sign(&h.validator, notification_item("PSP2", "REFUND"));
    tampered["amount"]["value"] = json!(100_000);

    let body = notification(vec![
        sign(&h.validator, notification_item("PSP1", "AUTHORISATION")),
        tampered,
    ]);

    let response = h.server.post("/api/webhooks/notifications").json(&body).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.text(), "Invalid hmac signature");
    assert!(drain(&mut h.events).is_empty());
}

#[tokio::test]
async fn test_webhook_rejects_missing_signature() {
    let mut h = harness();
    let body = notification(vec![notification_item("PSP1", "AUTHORISATION")]);

    let response = h.server.post("/api/webhooks/notifications").json(&body).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(drain(&mut h.events).is_empty());
}

#[tokio::test]
async fn test_webhook_malformed_payload() {
    let mut h = harness();

    let response = h
        .server
        .post("/api/webhooks/notifications")
        .text("{ not json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(drain(&mut h.events).is_empty());
}

// =============================================================================
// Platform
// =============================================================================

#[tokio::test]
async fn test_create_card() {
    let h = harness();

    let response = h
        .server
        .post("/api/issuing/createCard")
        .json(&json!({
            "balanceAccountId": "BA3227C223222B5CTBLR8BWJB",
            "type": "card",
            "issuingCountryCode": "NL",
            "card": {
                "formFactor": "virtual",
                "cardholderName": "Sam Hopper",
                "brand": "mc",
                "brandVariant": "mcdebit",
                "configuration": { "configurationProfileId": "CP123AB45678C91ABCD2ABCDE" }
            }
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], "PI3227C223222B5BPCMFXD2XG");
    assert_eq!(body["balanceAccountId"], "BA3227C223222B5CTBLR8BWJB");
}

#[tokio::test]
async fn test_create_card_without_card_details() {
    let h = harness();

    let response = h
        .server
        .post("/api/issuing/createCard")
        .json(&json!({ "balanceAccountId": "BA1", "type": "card" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_transfer_instrument() {
    let h = harness();

    let response = h
        .server
        .post("/api/lem/createTransferInstrument")
        .json(&json!({
            "type": "bankAccount",
            "legalEntityId": "LE322JV223222D5GG42KN6869",
            "bankAccount": {
                "accountIdentification": {
                    "type": "iban",
                    "iban": "NL20INGB0001234567"
                },
                "countryCode": "NL"
            }
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["legalEntityId"], "LE322JV223222D5GG42KN6869");
}

// =============================================================================
// Result pages
// =============================================================================

#[tokio::test]
async fn test_result_pages() {
    let h = harness();

    let text = h.server.get("/result/pending").await.text();
    assert!(text.contains("Payment completion pending."));

    let text = h.server.get("/result/failed").await.text();
    assert!(text.contains("The payment was refused."));

    let text = h.server.get("/result/success").await.text();
    assert!(text.contains("successfully placed"));

    let text = h
        .server
        .get("/result/error")
        .add_query_param("reason", "<b>Not enough balance</b>")
        .await
        .text();
    assert!(text.contains("Error! Reason: &lt;b&gt;Not enough balance&lt;/b&gt;"));

    let text = h.server.get("/result/error").await.text();
    assert!(text.contains("Error! Reason: </p>"));
    assert!(!text.contains("unknown"));
}
