use rentease_database::{PaymentSettings, PaymentSettingsRepository};
use sqlx::SqlitePool;
use tracing::info;

use super::error::ServiceError;
use crate::storage::{UploadDir, UploadStore, UploadedFile};
use crate::util::non_blank;

pub async fn get_settings(pool: &SqlitePool) -> Result<PaymentSettings, ServiceError> {
    Ok(PaymentSettingsRepository::new(pool.clone()).get().await?)
}

/// Sets the UPI id; a blank value clears it.
pub async fn set_upi_id(
    pool: &SqlitePool,
    upi_id: Option<String>,
) -> Result<PaymentSettings, ServiceError> {
    let upi_id = non_blank(upi_id);
    Ok(PaymentSettingsRepository::new(pool.clone())
        .set_upi_id(upi_id.as_deref())
        .await?)
}

/// Stores a new QR code image and deletes the one it replaces.
pub async fn set_qr_code(
    pool: &SqlitePool,
    uploads: &UploadStore,
    file: UploadedFile,
) -> Result<String, ServiceError> {
    let path = uploads
        .save(UploadDir::Root, "qr_", &file)
        .await
        .map_err(|e| ServiceError::internal(format!("failed to store QR code: {e}")))?;

    let previous = match PaymentSettingsRepository::new(pool.clone())
        .set_qr_code(&path)
        .await
    {
        Ok(previous) => previous,
        Err(error) => {
            uploads.remove(&path).await;
            return Err(error.into());
        }
    };

    if let Some(previous) = previous.filter(|previous| *previous != path) {
        uploads.remove(&previous).await;
    }
    info!(path = %path, "payment QR code updated");
    Ok(path)
}
