use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Bank-transfer instructions shown to tenants. Stored as a single row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow, ToSchema)]
pub struct PaymentSettings {
    pub upi_id: Option<String>,
    pub upi_qr_code: Option<String>,
    pub updated_at: Option<String>,
}
