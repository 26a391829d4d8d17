use axum::{extract::State, http::HeaderMap, Json};
use rentease_database::Bill;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::today;
use crate::{
    services::payment::{self as payment_service, Verification},
    ApiError, AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub bill_id: i64,
}

/// Everything the checkout widget needs to open the order.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    #[serde(rename = "order_id")]
    pub id: String,
    /// Minor currency units.
    pub amount: i64,
    pub currency: String,
    pub bill_id: i64,
    pub key_id: Option<String>,
    pub mock: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyPaymentRequest {
    pub bill_id: i64,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyPaymentResponse {
    pub message: String,
    pub bill: Bill,
}

#[utoipa::path(
    post,
    path = "/api/payment/create-order",
    tag = "Payments",
    security(("bearerAuth" = [])),
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Gateway order opened", body = CreateOrderResponse),
        (status = 403, description = "Bill belongs to another tenant", body = crate::error::ErrorResponse),
        (status = 404, description = "Bill not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Bill is already paid", body = crate::error::ErrorResponse),
        (status = 502, description = "Gateway unavailable", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, ApiError> {
    let caller = state.caller(&headers).await?;
    let order =
        payment_service::create_order(state.db_pool(), state.gateway(), &caller, req.bill_id)
            .await?;
    Ok(Json(order))
}

#[utoipa::path(
    post,
    path = "/api/payment/verify",
    tag = "Payments",
    security(("bearerAuth" = [])),
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Payment verified, bill paid", body = VerifyPaymentResponse),
        (status = 400, description = "Signature or order mismatch", body = crate::error::ErrorResponse),
        (status = 403, description = "Bill belongs to another tenant", body = crate::error::ErrorResponse),
        (status = 409, description = "Bill was settled by another payment", body = crate::error::ErrorResponse)
    )
)]
pub async fn verify_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<VerifyPaymentRequest>,
) -> Result<Json<VerifyPaymentResponse>, ApiError> {
    let caller = state.caller(&headers).await?;
    let mailer = state.mailer();

    let outcome = payment_service::verify_payment(
        state.db_pool(),
        state.gateway(),
        mailer.as_ref(),
        &caller,
        req,
        today(),
    )
    .await?;

    let (message, bill) = match outcome {
        Verification::Settled(bill) => ("Payment verified successfully", bill),
        Verification::AlreadyRecorded(bill) => ("Payment already recorded", bill),
    };
    Ok(Json(VerifyPaymentResponse {
        message: message.to_string(),
        bill,
    }))
}
