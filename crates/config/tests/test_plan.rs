//! Loader behaviour for `rentease-config`: defaults, file discovery,
//! environment overrides and validation.

use std::fs;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

use rentease_config::{load, AppConfig, BillingConfig, HttpConfig, PaymentGatewayConfig};

const ENV_VARS_TO_RESET: &[&str] = &[
    "RENTEASE_CONFIG",
    "RENTEASE__AUTH__JWT_SECRET",
    "RENTEASE__AUTH__TOKEN_TTL_SECONDS",
    "RENTEASE__BILLING__RENT_DUE_DAY",
    "RENTEASE__DATABASE__MAX_CONNECTIONS",
    "RENTEASE__DATABASE__URL",
    "RENTEASE__HTTP__ADDRESS",
    "RENTEASE__HTTP__PORT",
    "RENTEASE__MAIL__RELAY_URL",
    "RENTEASE__PAYMENTS__KEY_ID",
    "RENTEASE__PAYMENTS__KEY_SECRET",
    "RENTEASE__UPLOADS__ROOT",
];

struct TestContext {
    vars: Vec<(String, Option<String>)>,
    original_dir: Option<PathBuf>,
}

impl TestContext {
    fn new() -> Self {
        let mut ctx = Self {
            vars: Vec::new(),
            original_dir: None,
        };
        for key in ENV_VARS_TO_RESET {
            ctx.remove_var(key);
        }
        ctx
    }

    fn set_var(&mut self, key: &str, value: impl AsRef<str>) {
        let previous = std::env::var(key).ok();
        std::env::set_var(key, value.as_ref());
        self.vars.push((key.to_string(), previous));
    }

    fn remove_var(&mut self, key: &str) {
        let previous = std::env::var(key).ok();
        std::env::remove_var(key);
        self.vars.push((key.to_string(), previous));
    }

    fn set_current_dir(&mut self, dir: &Path) {
        if self.original_dir.is_none() {
            self.original_dir =
                Some(std::env::current_dir().expect("failed to capture current directory"));
        }
        std::env::set_current_dir(dir).expect("failed to set current directory");
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if let Some(original) = self.original_dir.take() {
            let _ = std::env::set_current_dir(original);
        }

        while let Some((key, value)) = self.vars.pop() {
            match value {
                Some(val) => std::env::set_var(&key, val),
                None => std::env::remove_var(&key),
            }
        }
    }
}

fn write_config_file(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create config directories");
    }
    fs::write(&path, contents).expect("failed to write config file");
    path
}

fn isolated() -> (TempDir, TestContext) {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let mut ctx = TestContext::new();
    ctx.set_current_dir(temp_dir.path());
    (temp_dir, ctx)
}

#[test]
#[serial]
fn defaults_apply_when_no_file_is_present() {
    let (_dir, _ctx) = isolated();

    let config = load().expect("configuration load should succeed without files");
    let defaults = AppConfig::default();

    assert_eq!(config.http.address, defaults.http.address);
    assert_eq!(config.http.port, defaults.http.port);
    assert_eq!(config.database.url, defaults.database.url);
    assert_eq!(config.auth.token_ttl_seconds, 7 * 86_400);
    assert!(config.auth.jwt_secret.is_none());
    assert_eq!(config.uploads.root, "uploads");
    assert_eq!(config.uploads.max_body_bytes, 16 * 1024 * 1024);
    assert_eq!(config.billing.rent_due_day, 6);
    assert!(config.payments.key_id.is_none());
    assert!(config.mail.relay_url.is_none());
}

#[test]
#[serial]
fn first_file_in_search_order_wins() {
    let (dir, _ctx) = isolated();

    write_config_file(dir.path(), "rentease.toml", "[http]\nport = 4242\n");
    write_config_file(dir.path(), "config/rentease.toml", "[http]\nport = 5151\n");

    let config = load().expect("configuration load should pick the first file");
    assert_eq!(config.http.port, 4242);
}

#[test]
#[serial]
fn partial_file_is_merged_with_defaults() {
    let (dir, _ctx) = isolated();

    write_config_file(
        dir.path(),
        "rentease.toml",
        r#"
        [billing]
        rent_due_day = 10

        [payments]
        key_id = "rzp_test_abc"
        key_secret = "shh"
        "#,
    );

    let config = load().expect("configuration load should succeed");
    assert_eq!(config.billing.rent_due_day, 10);
    assert_eq!(config.payments.key_id.as_deref(), Some("rzp_test_abc"));
    assert_eq!(config.payments.currency, "INR");
    assert_eq!(config.http.port, HttpConfig::default().port);
}

#[test]
#[serial]
fn explicit_config_path_is_honoured() {
    let (dir, mut ctx) = isolated();

    write_config_file(dir.path(), "rentease.toml", "[http]\nport = 1111\n");
    let explicit = write_config_file(dir.path(), "elsewhere/custom.toml", "[http]\nport = 2222\n");
    ctx.set_var("RENTEASE_CONFIG", explicit.to_string_lossy());

    let config = load().expect("configuration load should read the explicit file");
    assert_eq!(config.http.port, 2222);
}

#[test]
#[serial]
fn environment_overrides_file_values() {
    let (dir, mut ctx) = isolated();

    write_config_file(dir.path(), "rentease.toml", "[http]\nport = 3030\n");
    ctx.set_var("RENTEASE__HTTP__PORT", "8080");
    ctx.set_var("RENTEASE__AUTH__JWT_SECRET", "from-env");
    ctx.set_var("RENTEASE__UPLOADS__ROOT", "/var/lib/rentease/uploads");

    let config = load().expect("configuration load should honour env overrides");
    assert_eq!(config.http.port, 8080);
    assert_eq!(config.auth.jwt_secret.as_deref(), Some("from-env"));
    assert_eq!(config.uploads.root, "/var/lib/rentease/uploads");
}

#[test]
#[serial]
fn due_day_outside_month_range_is_rejected() {
    let (_dir, mut ctx) = isolated();
    ctx.set_var("RENTEASE__BILLING__RENT_DUE_DAY", "31");

    let error = load().expect_err("a due day of 31 should be rejected");
    assert!(error.to_string().contains("rent_due_day"), "{error}");
}

#[test]
#[serial]
fn gateway_key_without_secret_is_rejected() {
    let (_dir, mut ctx) = isolated();
    ctx.set_var("RENTEASE__PAYMENTS__KEY_ID", "rzp_live_123");

    let error = load().expect_err("a key id without a secret should be rejected");
    assert!(error.to_string().contains("key_secret"), "{error}");
}

#[test]
#[serial]
fn invalid_toml_is_reported() {
    let (dir, _ctx) = isolated();

    write_config_file(dir.path(), "rentease.toml", "[http]\nport = \"not-a-number\n");

    let error = load().expect_err("invalid TOML should cause load to fail");
    let message = error.to_string();
    assert!(
        message.contains("invalid configuration")
            || message.contains("unable to build configuration"),
        "unexpected error message: {message}"
    );
}

#[test]
fn section_defaults() {
    assert_eq!(BillingConfig::default().rent_due_day, 6);
    let gateway = PaymentGatewayConfig::default();
    assert_eq!(gateway.request_timeout_seconds, 30);
    assert!(gateway.key_secret.is_none());
    assert_eq!(HttpConfig::default().port, 5000);
}
