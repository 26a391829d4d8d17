use httpmock::prelude::*;
use rentease_config::{MailConfig, PaymentGatewayConfig};
use rentease_payments::{
    mailer_from_config, HttpRelayMailer, MailMessage, Mailer, PaymentError, PaymentGateway,
};

fn gateway_for(server: &MockServer) -> PaymentGateway {
    PaymentGateway::from_config(&PaymentGatewayConfig {
        key_id: Some("rzp_test_key".to_string()),
        key_secret: Some("rzp_test_secret".to_string()),
        base_url: server.base_url(),
        currency: "INR".to_string(),
        request_timeout_seconds: 2,
    })
}

#[tokio::test]
async fn create_order_posts_amount_with_basic_auth() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/orders")
                .header_exists("authorization")
                .json_body(serde_json::json!({
                    "amount": 150000,
                    "currency": "INR",
                    "receipt": "bill_7",
                    "payment_capture": 1
                }));
            then.status(200)
                .header("Content-Type", "application/json")
                .body(
                    serde_json::json!({
                        "id": "order_Nx1",
                        "entity": "order",
                        "amount": 150000,
                        "currency": "INR",
                        "receipt": "bill_7",
                        "status": "created"
                    })
                    .to_string(),
                );
        })
        .await;

    let gateway = gateway_for(&server);
    let order = gateway
        .create_order(150_000, "bill_7")
        .await
        .expect("order should be created");

    mock.assert_async().await;
    assert_eq!(order.id, "order_Nx1");
    assert_eq!(order.amount, 150_000);
    assert_eq!(gateway.key_id(), Some("rzp_test_key"));
}

#[tokio::test]
async fn create_order_surfaces_gateway_errors() {
    let server = MockServer::start_async().await;

    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/orders");
            then.status(401);
        })
        .await;

    let err = gateway_for(&server)
        .create_order(100, "bill_1")
        .await
        .expect_err("http error expected");

    assert!(matches!(err, PaymentError::Http(_)));
}

#[tokio::test]
async fn mock_mode_mints_orders_without_network() {
    let gateway = PaymentGateway::from_config(&PaymentGatewayConfig::default());

    let order = gateway
        .create_order(2_500, "bill_3")
        .await
        .expect("mock order");

    assert!(order.id.starts_with("order_mock_"));
    assert_eq!(order.amount, 2_500);
    assert_eq!(order.currency, "INR");
}

#[tokio::test]
async fn zero_amount_is_rejected() {
    let gateway = PaymentGateway::from_config(&PaymentGatewayConfig::default());

    let err = gateway.create_order(0, "bill_0").await.expect_err("zero amount");
    assert!(matches!(err, PaymentError::InvalidAmount));
}

#[tokio::test]
async fn relay_mailer_posts_message_with_token() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/send")
                .header("authorization", "Bearer relay-token")
                .json_body(serde_json::json!({
                    "from": "RentEase <no-reply@rentease.local>",
                    "to": "tenant@example.com",
                    "subject": "Payment received",
                    "text": "Thanks"
                }));
            then.status(202);
        })
        .await;

    let mailer = HttpRelayMailer::new(
        server.url("/send"),
        Some("relay-token".to_string()),
        "RentEase <no-reply@rentease.local>",
    )
    .expect("mailer");

    mailer
        .send(&MailMessage {
            to: "tenant@example.com".to_string(),
            subject: "Payment received".to_string(),
            body: "Thanks".to_string(),
        })
        .await
        .expect("relay should accept");

    mock.assert_async().await;
}

#[tokio::test]
async fn log_mailer_is_used_without_relay() {
    let mailer = mailer_from_config(&MailConfig::default()).expect("mailer");

    mailer
        .send(&MailMessage {
            to: "admin@rental.com".to_string(),
            subject: "Bill paid".to_string(),
            body: String::new(),
        })
        .await
        .expect("log mailer never fails");
}
