use anyhow::{Context, Result};
use rentease_auth::{Authenticator, DEFAULT_ADMIN_USERNAME};
use rentease_config::AppConfig;
use rentease_database::{initialize_database, EmergencyContactRepository};
use sqlx::SqlitePool;
use tracing::info;

pub mod telemetry {
    use anyhow::Result;
    use tracing::Level;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_max_level(Level::TRACE)
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

/// Outcome of [`BackendServices::bootstrap_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapReport {
    pub admin_created: bool,
    pub contacts_seeded: u64,
}

#[derive(Clone)]
pub struct BackendServices {
    pub db_pool: SqlitePool,
    pub authenticator: Authenticator,
}

impl BackendServices {
    /// Opens the database, applies migrations and builds the authenticator.
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let db_pool = initialize_database(&config.database)
            .await
            .context("failed to initialise database")?;

        let authenticator = Authenticator::new(db_pool.clone(), &config.auth);
        info!(url = %config.database.url, "database ready");

        Ok(Self {
            db_pool,
            authenticator,
        })
    }

    /// Creates the default admin when missing and seeds the default
    /// emergency contacts into an empty table. Safe to run on every start.
    pub async fn bootstrap_data(&self, admin_password: Option<&str>) -> Result<BootstrapReport> {
        let admin_created = self
            .authenticator
            .ensure_default_admin(admin_password)
            .await
            .context("failed to create default admin")?;
        if admin_created {
            info!(username = DEFAULT_ADMIN_USERNAME, "default admin account created");
        }

        let contacts_seeded = EmergencyContactRepository::new(self.db_pool.clone())
            .seed_defaults()
            .await
            .context("failed to seed emergency contacts")?;
        if contacts_seeded > 0 {
            info!(count = contacts_seeded, "default emergency contacts seeded");
        }

        Ok(BootstrapReport {
            admin_created,
            contacts_seeded,
        })
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
