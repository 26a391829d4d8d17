use std::path::Path;

use anyhow::{Context, Result};
use rentease_auth::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};
use rentease_backend_runtime::{BackendServices, BootstrapReport};
use rentease_config::AppConfig;
use tempfile::TempDir;

fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}", path.to_string_lossy())
}

fn build_config(database_url: String, max_connections: u32) -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = database_url;
    config.database.max_connections = max_connections;
    config.auth.jwt_secret = Some("runtime-test-secret".into());
    config
}

async fn initialise(config: &AppConfig) -> Result<BackendServices> {
    BackendServices::initialise(config)
        .await
        .context("failed to initialise backend services")
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_creates_nested_database_and_runs_migrations() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("runtime/nested/init.db");
    let config = build_config(sqlite_url(&db_path), 4);

    let services = initialise(&config).await?;
    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'bills', 'payment_settings') ORDER BY name",
    )
    .fetch_all(&services.db_pool)
    .await?;

    assert_eq!(tables, vec!["bills", "payment_settings", "users"]);
    assert!(db_path.exists());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn bootstrap_data_runs_once() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = build_config(sqlite_url(&temp_dir.path().join("bootstrap.db")), 2);
    let services = initialise(&config).await?;

    let first = services.bootstrap_data(None).await?;
    assert_eq!(
        first,
        BootstrapReport {
            admin_created: true,
            contacts_seeded: 5
        }
    );

    let second = services.bootstrap_data(Some("ignored-now")).await?;
    assert_eq!(
        second,
        BootstrapReport {
            admin_created: false,
            contacts_seeded: 0
        }
    );

    let session = services
        .authenticator
        .login(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
        .await?;
    assert_eq!(session.user.username, DEFAULT_ADMIN_USERNAME);

    let services: Vec<String> =
        sqlx::query_scalar("SELECT service_type FROM emergency_contacts ORDER BY id")
            .fetch_all(&services.db_pool)
            .await?;
    assert_eq!(
        services,
        vec!["Police", "Fire", "Ambulance", "Electrician", "Plumber"]
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn bootstrap_data_uses_supplied_admin_password() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = build_config(sqlite_url(&temp_dir.path().join("password.db")), 2);
    let services = initialise(&config).await?;

    services.bootstrap_data(Some("s3cret-admin")).await?;

    assert!(services
        .authenticator
        .login(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
        .await
        .is_err());
    services
        .authenticator
        .login(DEFAULT_ADMIN_USERNAME, "s3cret-admin")
        .await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_reports_unusable_database_paths() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let blocker = temp_dir.path().join("not-a-directory");
    std::fs::write(&blocker, b"occupied")?;
    let config = build_config(sqlite_url(&blocker.join("rentease.db")), 1);

    let error = match BackendServices::initialise(&config).await {
        Ok(_) => panic!("expected database setup to fail under a regular file"),
        Err(error) => error,
    };
    let message = format!("{error:?}");
    assert!(
        message.contains("failed to initialise database"),
        "expected database context, got {message}"
    );
    Ok(())
}
