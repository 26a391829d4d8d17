use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    Json,
};
use rentease_database::PaymentSettings;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::read_file;
use crate::{services::payment_settings as settings_service, ApiError, AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePaymentSettingsRequest {
    /// Blank or `null` clears the UPI id.
    #[serde(default)]
    pub upi_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentSettingsResponse {
    pub message: String,
    pub settings: PaymentSettings,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QrCodeResponse {
    pub message: String,
    pub upi_qr_code: String,
}

#[utoipa::path(
    get,
    path = "/api/payment-settings",
    tag = "Payment Settings",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Bank-transfer instructions", body = PaymentSettings),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PaymentSettings>, ApiError> {
    state.caller(&headers).await?;
    Ok(Json(settings_service::get_settings(state.db_pool()).await?))
}

#[utoipa::path(
    post,
    path = "/api/payment-settings",
    tag = "Payment Settings",
    security(("bearerAuth" = [])),
    request_body = UpdatePaymentSettingsRequest,
    responses(
        (status = 200, description = "UPI id saved", body = PaymentSettingsResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<UpdatePaymentSettingsRequest>,
) -> Result<Json<PaymentSettingsResponse>, ApiError> {
    state.caller(&headers).await?.require_admin()?;
    let settings = settings_service::set_upi_id(state.db_pool(), req.upi_id).await?;

    Ok(Json(PaymentSettingsResponse {
        message: "Payment settings updated".to_string(),
        settings,
    }))
}

#[derive(Debug, ToSchema)]
pub struct QrCodeUpload {
    #[schema(value_type = String, format = Binary)]
    pub qr_code: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/api/payment-settings/qr-code",
    tag = "Payment Settings",
    security(("bearerAuth" = [])),
    request_body(content = QrCodeUpload, content_type = "multipart/form-data", description = "A single `qr_code` part"),
    responses(
        (status = 200, description = "QR code stored", body = QrCodeResponse),
        (status = 400, description = "No QR code provided", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse)
    )
)]
pub async fn upload_qr_code(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<QrCodeResponse>, ApiError> {
    state.caller(&headers).await?.require_admin()?;

    let file = read_file(multipart, "qr_code", "No QR code provided").await?;
    let upi_qr_code = settings_service::set_qr_code(state.db_pool(), state.uploads(), file).await?;

    Ok(Json(QrCodeResponse {
        message: "QR code uploaded".to_string(),
        upi_qr_code,
    }))
}
