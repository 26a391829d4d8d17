//! Razorpay-compatible payment gateway client and outgoing mail notifier.

use std::time::Duration;

use hmac::{Hmac, Mac};
use rentease_config::PaymentGatewayConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use tracing::{debug, info};

pub mod mail;

pub use mail::{mailer_from_config, HttpRelayMailer, LogMailer, MailError, MailMessage, Mailer};

const MOCK_ORDER_PREFIX: &str = "order_mock_";
const MOCK_PAYMENT_PREFIX: &str = "pay_mock_";

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("amount must be greater than zero")]
    InvalidAmount,
    #[error("payment signature verification failed")]
    InvalidSignature,
    #[error("gateway request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("gateway returned an unexpected response: {0}")]
    Response(String),
}

/// An order as returned to the client for the checkout widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    payment_capture: u8,
}

#[derive(Debug, Clone)]
struct Credentials {
    key_id: String,
    key_secret: String,
}

#[derive(Debug, Clone)]
pub struct PaymentGateway {
    credentials: Option<Credentials>,
    base_url: String,
    currency: String,
    request_timeout: Duration,
}

impl PaymentGateway {
    /// Builds the client. A missing `key_id` (or secret) selects mock mode,
    /// where orders are minted locally and `pay_mock_` payments verify.
    pub fn from_config(config: &PaymentGatewayConfig) -> Self {
        let credentials = match (&config.key_id, &config.key_secret) {
            (Some(key_id), Some(key_secret)) if !key_id.is_empty() => Some(Credentials {
                key_id: key_id.clone(),
                key_secret: key_secret.clone(),
            }),
            _ => None,
        };

        if credentials.is_none() {
            info!("payment gateway key not configured, running in mock mode");
        }

        Self {
            credentials,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            currency: config.currency.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_seconds),
        }
    }

    pub fn is_mock(&self) -> bool {
        self.credentials.is_none()
    }

    /// Public key handed to the checkout widget; `None` in mock mode.
    pub fn key_id(&self) -> Option<&str> {
        self.credentials
            .as_ref()
            .map(|credentials| credentials.key_id.as_str())
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub async fn create_order(&self, amount_minor: i64, receipt: &str) -> Result<Order, PaymentError> {
        if amount_minor <= 0 {
            return Err(PaymentError::InvalidAmount);
        }

        let Some(credentials) = &self.credentials else {
            let order = Order {
                id: format!("{MOCK_ORDER_PREFIX}{}", hex::encode(rand::random::<[u8; 5]>())),
                amount: amount_minor,
                currency: self.currency.clone(),
                receipt: Some(receipt.to_string()),
            };
            debug!(order_id = %order.id, "minted mock order");
            return Ok(order);
        };

        let client = Client::builder().timeout(self.request_timeout).build()?;
        let url = format!("{}/orders", self.base_url);

        let response = client
            .post(url)
            .basic_auth(&credentials.key_id, Some(&credentials.key_secret))
            .json(&CreateOrderRequest {
                amount: amount_minor,
                currency: &self.currency,
                receipt,
                payment_capture: 1,
            })
            .send()
            .await?
            .error_for_status()?;

        let order: Order = response
            .json()
            .await
            .map_err(|error| PaymentError::Response(error.to_string()))?;

        if order.id.is_empty() {
            return Err(PaymentError::Response("order id missing".to_string()));
        }

        info!(order_id = %order.id, amount = order.amount, "gateway order created");
        Ok(order)
    }

    /// Checks `hex(HMAC-SHA256(secret, "{order_id}|{payment_id}"))` against
    /// the signature sent back by the checkout widget.
    pub fn verify_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), PaymentError> {
        let Some(credentials) = &self.credentials else {
            return if payment_id.starts_with(MOCK_PAYMENT_PREFIX) {
                Ok(())
            } else {
                Err(PaymentError::InvalidSignature)
            };
        };

        verify_hmac(&credentials.key_secret, order_id, payment_id, signature)
    }
}

fn verify_hmac(
    secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> Result<(), PaymentError> {
    let expected = hex::decode(signature.trim()).map_err(|_| PaymentError::InvalidSignature)?;

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|_| PaymentError::InvalidSignature)?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());

    mac.verify_slice(&expected)
        .map_err(|_| PaymentError::InvalidSignature)
}

/// Signs an order/payment pair the way the gateway does.
pub fn sign_payment(secret: &str, order_id: &str, payment_id: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("hmac accepts keys of any length"));
    mac.update(format!("{order_id}|{payment_id}").as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Converts a major-unit amount to the gateway's minor units.
///
/// ```
/// assert_eq!(rentease_payments::to_minor_units(1500.0), 150_000);
/// assert_eq!(rentease_payments::to_minor_units(99.99), 9_999);
/// ```
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_config() -> PaymentGatewayConfig {
        PaymentGatewayConfig {
            key_id: Some("rzp_test_key".to_string()),
            key_secret: Some("secret".to_string()),
            ..PaymentGatewayConfig::default()
        }
    }

    #[test]
    fn accepts_signature_computed_with_secret() {
        let gateway = PaymentGateway::from_config(&live_config());
        let signature = sign_payment("secret", "order_1", "pay_1");

        assert!(gateway.verify_signature("order_1", "pay_1", &signature).is_ok());
    }

    #[test]
    fn rejects_tampered_or_malformed_signatures() {
        let gateway = PaymentGateway::from_config(&live_config());
        let signature = sign_payment("secret", "order_1", "pay_1");

        assert!(gateway.verify_signature("order_1", "pay_2", &signature).is_err());
        assert!(gateway.verify_signature("order_1", "pay_1", "not-hex").is_err());
        assert!(gateway
            .verify_signature("order_1", "pay_1", &sign_payment("other", "order_1", "pay_1"))
            .is_err());
    }

    #[test]
    fn mock_payments_only_verify_in_mock_mode() {
        let mock = PaymentGateway::from_config(&PaymentGatewayConfig::default());
        assert!(mock.is_mock());
        assert!(mock.verify_signature("order_mock_1", "pay_mock_1", "").is_ok());
        assert!(mock.verify_signature("order_mock_1", "pay_real", "").is_err());

        let live = PaymentGateway::from_config(&live_config());
        assert!(!live.is_mock());
        assert!(live.verify_signature("order_1", "pay_mock_1", "").is_err());
    }

    #[test]
    fn key_without_secret_stays_in_mock_mode() {
        let gateway = PaymentGateway::from_config(&PaymentGatewayConfig {
            key_id: Some("rzp_test_key".to_string()),
            ..PaymentGatewayConfig::default()
        });
        assert!(gateway.is_mock());
        assert_eq!(gateway.key_id(), None);
    }
}
