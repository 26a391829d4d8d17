use sqlx::SqlitePool;

use super::timestamp;
use crate::entities::PaymentSettings;
use crate::types::DatabaseResult;

#[derive(Clone)]
pub struct PaymentSettingsRepository {
    pool: SqlitePool,
}

impl PaymentSettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Current settings, or all-empty when an admin has not set any yet.
    pub async fn get(&self) -> DatabaseResult<PaymentSettings> {
        let settings = sqlx::query_as::<_, PaymentSettings>(
            "SELECT upi_id, upi_qr_code, updated_at FROM payment_settings WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(settings.unwrap_or_default())
    }

    pub async fn set_upi_id(&self, upi_id: Option<&str>) -> DatabaseResult<PaymentSettings> {
        sqlx::query(
            r#"
            INSERT INTO payment_settings (id, upi_id, updated_at) VALUES (1, ?1, ?2)
            ON CONFLICT(id) DO UPDATE SET upi_id = ?1, updated_at = ?2
            "#,
        )
        .bind(upi_id)
        .bind(timestamp())
        .execute(&self.pool)
        .await?;
        self.get().await
    }

    /// Records a new QR code path and returns the one it replaced.
    pub async fn set_qr_code(&self, path: &str) -> DatabaseResult<Option<String>> {
        let previous = self.get().await?.upi_qr_code;
        sqlx::query(
            r#"
            INSERT INTO payment_settings (id, upi_qr_code, updated_at) VALUES (1, ?1, ?2)
            ON CONFLICT(id) DO UPDATE SET upi_qr_code = ?1, updated_at = ?2
            "#,
        )
        .bind(path)
        .bind(timestamp())
        .execute(&self.pool)
        .await?;
        Ok(previous)
    }
}
