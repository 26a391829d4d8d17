//! RentEase Database Crate
//!
//! Connection management, embedded migrations, row types and the
//! repositories the API services build on.

use rentease_config::DatabaseConfig;
use sqlx::SqlitePool;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::run_migrations;

pub use repos::{
    AnnouncementRepository, BillRepository, BuildingRepository, ComplaintRepository,
    EmergencyContactRepository, PaymentSettingsRepository, RoomRepository, TenantRepository,
    UserRepository,
};

pub use entities::*;

pub use types::{DatabaseError, DatabaseResult};

/// Open the pool and bring the schema up to date.
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("{e:#}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(format!("{e:#}")))?;

    Ok(pool)
}
