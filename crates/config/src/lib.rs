use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "rentease.toml",
    "config/rentease.toml",
    "crates/config/rentease.toml",
    "../rentease.toml",
    "../config/rentease.toml",
    "backend/rentease.toml",
    "backend/config/rentease.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub payments: PaymentGatewayConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub billing: BillingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://rental_management.db".to_string(),
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret. When absent a random secret is generated at
    /// startup, which invalidates every token on restart.
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "AuthConfig::default_token_ttl")]
    pub token_ttl_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_seconds: Self::default_token_ttl(),
        }
    }
}

impl AuthConfig {
    const fn default_token_ttl() -> u64 {
        7 * 86_400
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "UploadConfig::default_root")]
    pub root: String,
    #[serde(default = "UploadConfig::default_max_body")]
    pub max_body_bytes: usize,
}

impl UploadConfig {
    fn default_root() -> String {
        "uploads".to_string()
    }

    const fn default_max_body() -> usize {
        16 * 1024 * 1024
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            root: Self::default_root(),
            max_body_bytes: Self::default_max_body(),
        }
    }
}

/// Razorpay-compatible gateway credentials.
///
/// Without a `key_id` the gateway runs in mock mode.
///
/// ```
/// use rentease_config::PaymentGatewayConfig;
///
/// let gateway = PaymentGatewayConfig::default();
/// assert_eq!(gateway.base_url, "https://api.razorpay.com/v1");
/// assert_eq!(gateway.currency, "INR");
/// assert!(gateway.key_id.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentGatewayConfig {
    #[serde(default)]
    pub key_id: Option<String>,
    #[serde(default)]
    pub key_secret: Option<String>,
    #[serde(default = "PaymentGatewayConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "PaymentGatewayConfig::default_currency")]
    pub currency: String,
    #[serde(default = "PaymentGatewayConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl PaymentGatewayConfig {
    fn default_base_url() -> String {
        "https://api.razorpay.com/v1".to_string()
    }

    fn default_currency() -> String {
        "INR".to_string()
    }

    const fn default_request_timeout() -> u64 {
        30
    }
}

impl Default for PaymentGatewayConfig {
    fn default() -> Self {
        Self {
            key_id: None,
            key_secret: None,
            base_url: Self::default_base_url(),
            currency: Self::default_currency(),
            request_timeout_seconds: Self::default_request_timeout(),
        }
    }
}

/// Outgoing notification settings. Mail is handed to an HTTP relay when
/// `relay_url` is set and only logged otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub relay_url: Option<String>,
    #[serde(default)]
    pub relay_token: Option<String>,
    #[serde(default = "MailConfig::default_sender")]
    pub sender: String,
}

impl MailConfig {
    fn default_sender() -> String {
        "RentEase <no-reply@rentease.local>".to_string()
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            relay_url: None,
            relay_token: None,
            sender: Self::default_sender(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    #[serde(default = "BillingConfig::default_due_day")]
    pub rent_due_day: u32,
}

impl BillingConfig {
    const fn default_due_day() -> u32 {
        6
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            rent_due_day: Self::default_due_day(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use rentease_config::load;
///
/// std::env::remove_var("RENTEASE_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let token_ttl = i64::try_from(defaults.auth.token_ttl_seconds).unwrap_or(i64::MAX);

    let mut builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?
        .set_default("auth.token_ttl_seconds", token_ttl)?
        .set_default("uploads.root", defaults.uploads.root.clone())?
        .set_default(
            "uploads.max_body_bytes",
            i64::try_from(defaults.uploads.max_body_bytes).unwrap_or(i64::MAX),
        )?
        .set_default("payments.base_url", defaults.payments.base_url.clone())?
        .set_default("payments.currency", defaults.payments.currency.clone())?
        .set_default(
            "payments.request_timeout_seconds",
            i64::try_from(defaults.payments.request_timeout_seconds).unwrap_or(i64::MAX),
        )?
        .set_default("mail.sender", defaults.mail.sender.clone())?
        .set_default(
            "billing.rent_due_day",
            i64::from(defaults.billing.rent_due_day),
        )?;

    let environment_overrides = config::Environment::with_prefix("RENTEASE").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("RENTEASE_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via RENTEASE_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    config.validate()?;

    debug!(
        http = ?config.http,
        database = %config.database.url,
        uploads = %config.uploads.root,
        gateway_configured = config.payments.key_id.is_some(),
        "loaded backend configuration"
    );
    Ok(config)
}

impl AppConfig {
    /// Reject settings that would only fail later at request time.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=28).contains(&self.billing.rent_due_day) {
            anyhow::bail!(
                "billing.rent_due_day must be between 1 and 28, got {}",
                self.billing.rent_due_day
            );
        }
        if self.payments.key_id.is_some() && self.payments.key_secret.is_none() {
            anyhow::bail!("payments.key_secret is required when payments.key_id is set");
        }
        if self.database.max_connections == 0 {
            anyhow::bail!("database.max_connections must be at least 1");
        }
        Ok(())
    }
}
