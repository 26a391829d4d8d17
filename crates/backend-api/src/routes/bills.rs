use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::NaiveDate;
use rentease_database::{Bill, BillListing, BillStatus, BillType, PaymentMethod};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use super::{read_file, today, MessageResponse};
use crate::{services::bill as bill_service, ApiError, AppState};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListBillsQuery {
    /// Ignored for tenant callers, who only ever see their own bills.
    pub tenant_id: Option<i64>,
    pub status: Option<BillStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBillRequest {
    pub tenant_id: i64,
    pub bill_type: BillType,
    pub amount: f64,
    /// `YYYY-MM`
    #[serde(default)]
    pub billing_month: Option<String>,
    pub due_date: NaiveDate,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GenerateRentRequest {
    /// `YYYY-MM`; defaults to the current month.
    #[serde(default)]
    pub billing_month: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BillResponse {
    pub message: String,
    pub bill: Bill,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateRentResponse {
    pub message: String,
    pub billing_month: String,
    pub created: u64,
    pub skipped: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarkOverdueResponse {
    pub message: String,
    pub updated: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReceiptResponse {
    pub bill_id: i64,
    pub receipt_number: String,
    pub date: NaiveDate,
    pub tenant_name: String,
    pub room_number: String,
    pub building_name: String,
    pub bill_type: BillType,
    pub amount: f64,
    pub billing_month: Option<String>,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub status: BillStatus,
    pub payment_method: Option<PaymentMethod>,
}

#[utoipa::path(
    get,
    path = "/api/bills",
    tag = "Bills",
    security(("bearerAuth" = [])),
    params(ListBillsQuery),
    responses(
        (status = 200, description = "Bills visible to the caller", body = [BillListing]),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_bills(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListBillsQuery>,
) -> Result<Json<Vec<BillListing>>, ApiError> {
    let caller = state.caller(&headers).await?;
    let bills = bill_service::list_bills(state.db_pool(), &caller, query).await?;
    Ok(Json(bills))
}

#[utoipa::path(
    post,
    path = "/api/bills",
    tag = "Bills",
    security(("bearerAuth" = [])),
    request_body = CreateBillRequest,
    responses(
        (status = 201, description = "Bill issued", body = BillResponse),
        (status = 400, description = "Invalid bill payload", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse),
        (status = 409, description = "Rent already billed for the month", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_bill(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateBillRequest>,
) -> Result<(StatusCode, Json<BillResponse>), ApiError> {
    state.caller(&headers).await?.require_admin()?;
    let bill = bill_service::create_bill(state.db_pool(), req).await?;

    Ok((
        StatusCode::CREATED,
        Json(BillResponse {
            message: "Bill created successfully".to_string(),
            bill,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/bills/{id}",
    tag = "Bills",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Bill id")),
    responses(
        (status = 200, description = "Bill deleted", body = MessageResponse),
        (status = 404, description = "Bill not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_bill(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    state.caller(&headers).await?.require_admin()?;
    bill_service::delete_bill(state.db_pool(), state.uploads(), id).await?;
    Ok(Json(MessageResponse::new("Bill deleted successfully")))
}

#[utoipa::path(
    post,
    path = "/api/bills/generate-rent",
    tag = "Bills",
    security(("bearerAuth" = [])),
    request_body = GenerateRentRequest,
    responses(
        (status = 200, description = "Rent bills issued for the month", body = GenerateRentResponse),
        (status = 400, description = "Malformed billing month", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse)
    )
)]
pub async fn generate_rent(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<GenerateRentRequest>>,
) -> Result<Json<GenerateRentResponse>, ApiError> {
    state.caller(&headers).await?.require_admin()?;

    let req = body.map(|Json(req)| req).unwrap_or_default();
    let (billing_month, run) = bill_service::generate_rent(
        state.db_pool(),
        state.billing(),
        req.billing_month.as_deref(),
        today(),
    )
    .await?;

    Ok(Json(GenerateRentResponse {
        message: format!("Generated {} rent bill(s) for {billing_month}", run.created),
        billing_month,
        created: run.created,
        skipped: run.skipped,
    }))
}

#[utoipa::path(
    post,
    path = "/api/bills/mark-overdue",
    tag = "Bills",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Pending bills past due marked overdue", body = MarkOverdueResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse)
    )
)]
pub async fn mark_overdue(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MarkOverdueResponse>, ApiError> {
    state.caller(&headers).await?.require_admin()?;
    let updated = bill_service::mark_overdue(state.db_pool(), today()).await?;

    Ok(Json(MarkOverdueResponse {
        message: format!("{updated} bill(s) marked overdue"),
        updated,
    }))
}

#[utoipa::path(
    put,
    path = "/api/bills/{id}/pay",
    tag = "Bills",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Bill id")),
    responses(
        (status = 200, description = "Bill settled manually", body = BillResponse),
        (status = 404, description = "Bill not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Bill is already paid", body = crate::error::ErrorResponse)
    )
)]
pub async fn pay_bill(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<BillResponse>, ApiError> {
    let caller = state.caller(&headers).await?;
    caller.require_admin()?;

    let bill = bill_service::mark_paid_manually(state.db_pool(), id, today()).await?;
    info!(bill_id = id, admin_id = caller.user.id, "bill marked paid manually");

    Ok(Json(BillResponse {
        message: "Bill marked as paid".to_string(),
        bill,
    }))
}

/// Payment screenshot form.
#[derive(Debug, ToSchema)]
pub struct ScreenshotUpload {
    #[schema(value_type = String, format = Binary)]
    pub screenshot: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/api/bills/{id}/upload-screenshot",
    tag = "Bills",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Bill id")),
    request_body(content = ScreenshotUpload, content_type = "multipart/form-data", description = "A single `screenshot` part"),
    responses(
        (status = 200, description = "Screenshot stored, bill awaiting approval", body = BillResponse),
        (status = 400, description = "No screenshot provided", body = crate::error::ErrorResponse),
        (status = 403, description = "Bill belongs to another tenant", body = crate::error::ErrorResponse),
        (status = 409, description = "Bill is already paid", body = crate::error::ErrorResponse)
    )
)]
pub async fn upload_screenshot(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<BillResponse>, ApiError> {
    let caller = state.caller(&headers).await?;
    let file = read_file(multipart, "screenshot", "No screenshot provided").await?;

    let bill =
        bill_service::submit_screenshot(state.db_pool(), state.uploads(), &caller, id, file, today())
            .await?;

    Ok(Json(BillResponse {
        message: "Payment screenshot uploaded. Awaiting admin approval.".to_string(),
        bill,
    }))
}

#[utoipa::path(
    put,
    path = "/api/bills/{id}/mark-paid",
    tag = "Bills",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Bill id")),
    responses(
        (status = 200, description = "Screenshot approved, bill paid", body = BillResponse),
        (status = 400, description = "No screenshot uploaded", body = crate::error::ErrorResponse),
        (status = 409, description = "Bill is not awaiting approval", body = crate::error::ErrorResponse)
    )
)]
pub async fn approve_screenshot(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<BillResponse>, ApiError> {
    state.caller(&headers).await?.require_admin()?;
    let bill = bill_service::approve_screenshot(state.db_pool(), id, today()).await?;

    Ok(Json(BillResponse {
        message: "Payment approved".to_string(),
        bill,
    }))
}

#[utoipa::path(
    put,
    path = "/api/bills/{id}/reject",
    tag = "Bills",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Bill id")),
    responses(
        (status = 200, description = "Screenshot rejected, bill reopened", body = BillResponse),
        (status = 409, description = "Bill is not awaiting approval", body = crate::error::ErrorResponse)
    )
)]
pub async fn reject_screenshot(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<BillResponse>, ApiError> {
    state.caller(&headers).await?.require_admin()?;
    let bill =
        bill_service::reject_screenshot(state.db_pool(), state.uploads(), id, today()).await?;

    Ok(Json(BillResponse {
        message: "Payment rejected".to_string(),
        bill,
    }))
}

#[utoipa::path(
    get,
    path = "/api/bills/{id}/receipt",
    tag = "Bills",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Bill id")),
    responses(
        (status = 200, description = "Printable receipt", body = ReceiptResponse),
        (status = 403, description = "Bill belongs to another tenant", body = crate::error::ErrorResponse),
        (status = 404, description = "Bill not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn receipt(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<ReceiptResponse>, ApiError> {
    let caller = state.caller(&headers).await?;
    let receipt = bill_service::receipt(state.db_pool(), &caller, id, today()).await?;
    Ok(Json(receipt))
}
