use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use rentease_database::{Complaint, ComplaintCategory, ComplaintListing, ComplaintStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{services::complaint as complaint_service, ApiError, AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateComplaintRequest {
    pub subject: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<ComplaintCategory>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplyComplaintRequest {
    pub reply: String,
    /// Defaults to `in_progress`.
    #[serde(default)]
    pub status: Option<ComplaintStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComplaintResponse {
    pub message: String,
    pub complaint: Complaint,
}

#[utoipa::path(
    get,
    path = "/api/complaints",
    tag = "Complaints",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Complaints, newest first", body = [ComplaintListing]),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_complaints(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ComplaintListing>>, ApiError> {
    let caller = state.caller(&headers).await?;
    let complaints = complaint_service::list_complaints(state.db_pool(), &caller).await?;
    Ok(Json(complaints))
}

#[utoipa::path(
    post,
    path = "/api/complaints",
    tag = "Complaints",
    security(("bearerAuth" = [])),
    request_body = CreateComplaintRequest,
    responses(
        (status = 201, description = "Complaint filed", body = ComplaintResponse),
        (status = 400, description = "Subject or description missing", body = crate::error::ErrorResponse),
        (status = 403, description = "Only tenants can create complaints", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_complaint(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateComplaintRequest>,
) -> Result<(StatusCode, Json<ComplaintResponse>), ApiError> {
    let caller = state.caller(&headers).await?;
    let complaint = complaint_service::create_complaint(state.db_pool(), &caller, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(ComplaintResponse {
            message: "Complaint submitted successfully".to_string(),
            complaint,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/complaints/{id}/reply",
    tag = "Complaints",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Complaint id")),
    request_body = ReplyComplaintRequest,
    responses(
        (status = 200, description = "Reply stored", body = ComplaintResponse),
        (status = 404, description = "Complaint not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Complaint is already closed", body = crate::error::ErrorResponse)
    )
)]
pub async fn reply_to_complaint(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<ReplyComplaintRequest>,
) -> Result<Json<ComplaintResponse>, ApiError> {
    state.caller(&headers).await?.require_admin()?;
    let complaint = complaint_service::reply_to_complaint(state.db_pool(), id, req).await?;

    Ok(Json(ComplaintResponse {
        message: "Reply added successfully".to_string(),
        complaint,
    }))
}

#[utoipa::path(
    put,
    path = "/api/complaints/{id}/close",
    tag = "Complaints",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Complaint id")),
    responses(
        (status = 200, description = "Complaint closed", body = ComplaintResponse),
        (status = 404, description = "Complaint not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn close_complaint(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<ComplaintResponse>, ApiError> {
    state.caller(&headers).await?.require_admin()?;
    let complaint = complaint_service::close_complaint(state.db_pool(), id).await?;

    Ok(Json(ComplaintResponse {
        message: "Complaint closed".to_string(),
        complaint,
    }))
}
