use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rentease_config::MailConfig;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

const RELAY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail relay request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// Writes notifications to the log instead of delivering them.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        info!(to = %message.to, subject = %message.subject, "mail relay not configured, notification logged");
        Ok(())
    }
}

/// Posts notifications as JSON to an HTTP mail relay.
#[derive(Debug, Clone)]
pub struct HttpRelayMailer {
    client: Client,
    url: String,
    token: Option<String>,
    sender: String,
}

#[derive(Serialize)]
struct RelayPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl HttpRelayMailer {
    pub fn new(url: impl Into<String>, token: Option<String>, sender: impl Into<String>) -> Result<Self, MailError> {
        Ok(Self {
            client: Client::builder().timeout(RELAY_TIMEOUT).build()?,
            url: url.into(),
            token,
            sender: sender.into(),
        })
    }
}

#[async_trait]
impl Mailer for HttpRelayMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let mut request = self.client.post(&self.url).json(&RelayPayload {
            from: &self.sender,
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
        });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        request.send().await?.error_for_status()?;
        info!(to = %message.to, subject = %message.subject, "notification sent");
        Ok(())
    }
}

/// Picks the relay mailer when `relay_url` is set, the log mailer otherwise.
pub fn mailer_from_config(config: &MailConfig) -> Result<Arc<dyn Mailer>, MailError> {
    match &config.relay_url {
        Some(url) if !url.trim().is_empty() => Ok(Arc::new(HttpRelayMailer::new(
            url.trim(),
            config.relay_token.clone(),
            config.sender.clone(),
        )?)),
        _ => Ok(Arc::new(LogMailer)),
    }
}
