use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::NaiveDate;
use rentease_database::{Tenant, TenantListing, TenantProfile, User};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{read_file, read_files, MessageResponse};
use crate::{
    services::tenant as tenant_service,
    util::{clearable, empty_as_none, optional_date},
    ApiError, AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTenantRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub room_id: Option<i64>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub id_proof_type: Option<String>,
    #[serde(default)]
    pub id_proof_number: Option<String>,
    #[serde(default, deserialize_with = "optional_date")]
    pub lease_start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional_date")]
    pub lease_end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub deposit_amount: Option<f64>,
    #[serde(default)]
    pub emergency_contact_name: Option<String>,
    #[serde(default)]
    pub emergency_contact_phone: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTenantRequest {
    /// Absent keeps the room, `null` or `""` vacates it, an id moves the tenant.
    #[serde(default, deserialize_with = "clearable")]
    #[schema(value_type = Option<i64>)]
    pub room_id: Option<Option<i64>>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub id_proof_type: Option<String>,
    #[serde(default)]
    pub id_proof_number: Option<String>,
    #[serde(default, deserialize_with = "optional_date")]
    pub lease_start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional_date")]
    pub lease_end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub deposit_amount: Option<f64>,
    #[serde(default)]
    pub emergency_contact_name: Option<String>,
    #[serde(default)]
    pub emergency_contact_phone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateTenantResponse {
    pub message: String,
    pub tenant: Tenant,
    pub user: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TenantResponse {
    pub message: String,
    pub tenant: Tenant,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentsResponse {
    pub message: String,
    pub documents: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PhotoResponse {
    pub message: String,
    pub photo: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MyDocumentsResponse {
    pub documents: Vec<String>,
    pub photo: Option<String>,
    pub deposit_amount: Option<f64>,
    pub full_name: String,
    pub id_proof_type: Option<String>,
    pub id_proof_number: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/tenants",
    tag = "Tenants",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "All tenants with their rooms", body = [TenantListing]),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_tenants(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<TenantListing>>, ApiError> {
    state.caller(&headers).await?.require_admin()?;
    let tenants = tenant_service::list_tenants(state.db_pool()).await?;
    Ok(Json(tenants))
}

#[utoipa::path(
    post,
    path = "/api/tenants",
    tag = "Tenants",
    security(("bearerAuth" = [])),
    request_body = CreateTenantRequest,
    responses(
        (status = 201, description = "Tenant and login account created", body = CreateTenantResponse),
        (status = 400, description = "Invalid tenant payload", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse),
        (status = 409, description = "Room occupied or account exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_tenant(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateTenantRequest>,
) -> Result<(StatusCode, Json<CreateTenantResponse>), ApiError> {
    state.caller(&headers).await?.require_admin()?;
    let (tenant, user) =
        tenant_service::create_tenant(state.db_pool(), state.authenticator(), req).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateTenantResponse {
            message: "Tenant created successfully".to_string(),
            tenant,
            user,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/tenants/{id}",
    tag = "Tenants",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Tenant id")),
    request_body = UpdateTenantRequest,
    responses(
        (status = 200, description = "Tenant updated", body = TenantResponse),
        (status = 404, description = "Tenant or room not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Target room is occupied", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_tenant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<UpdateTenantRequest>,
) -> Result<Json<TenantResponse>, ApiError> {
    state.caller(&headers).await?.require_admin()?;
    let tenant = tenant_service::update_tenant(state.db_pool(), id, req).await?;

    Ok(Json(TenantResponse {
        message: "Tenant updated successfully".to_string(),
        tenant,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/tenants/{id}",
    tag = "Tenants",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Tenant id")),
    responses(
        (status = 200, description = "Tenant deleted", body = MessageResponse),
        (status = 404, description = "Tenant not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_tenant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    state.caller(&headers).await?.require_admin()?;
    tenant_service::delete_tenant(state.db_pool(), state.uploads(), id).await?;
    Ok(Json(MessageResponse::new("Tenant deleted successfully")))
}

#[derive(Debug, ToSchema)]
pub struct DocumentsUpload {
    #[schema(value_type = Vec<String>)]
    pub documents: Vec<Vec<u8>>,
}

#[utoipa::path(
    post,
    path = "/api/tenants/{id}/documents",
    tag = "Tenants",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Tenant id")),
    request_body(content = DocumentsUpload, content_type = "multipart/form-data", description = "One or more `documents` parts"),
    responses(
        (status = 200, description = "Documents stored", body = DocumentsResponse),
        (status = 400, description = "No documents provided", body = crate::error::ErrorResponse),
        (status = 404, description = "Tenant not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn upload_documents(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<DocumentsResponse>, ApiError> {
    state.caller(&headers).await?.require_admin()?;

    let files = read_files(multipart, "documents").await?;
    if files.is_empty() {
        return Err(ApiError::bad_request("No documents provided"));
    }

    let documents =
        tenant_service::add_documents(state.db_pool(), state.uploads(), id, files).await?;
    Ok(Json(DocumentsResponse {
        message: "Documents uploaded successfully".to_string(),
        documents,
    }))
}

/// Tenant profile photo form.
#[derive(Debug, ToSchema)]
pub struct PhotoUpload {
    #[schema(value_type = String, format = Binary)]
    pub photo: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/api/tenants/{id}/photo",
    tag = "Tenants",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Tenant id")),
    request_body(content = PhotoUpload, content_type = "multipart/form-data", description = "A single `photo` part"),
    responses(
        (status = 200, description = "Photo stored", body = PhotoResponse),
        (status = 400, description = "No photo provided", body = crate::error::ErrorResponse),
        (status = 404, description = "Tenant not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn upload_photo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<PhotoResponse>, ApiError> {
    state.caller(&headers).await?.require_admin()?;

    let file = read_file(multipart, "photo", "No photo provided").await?;
    let photo = tenant_service::set_photo(state.db_pool(), state.uploads(), id, file).await?;
    Ok(Json(PhotoResponse {
        message: "Photo uploaded successfully".to_string(),
        photo,
    }))
}

#[utoipa::path(
    get,
    path = "/api/tenant/my-profile",
    tag = "Tenants",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Caller's tenancy", body = TenantProfile),
        (status = 403, description = "Not a tenant", body = crate::error::ErrorResponse)
    )
)]
pub async fn my_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TenantProfile>, ApiError> {
    let caller = state.caller(&headers).await?;
    let profile = tenant_service::my_profile(state.db_pool(), &caller).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    get,
    path = "/api/tenant/my-documents",
    tag = "Tenants",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Caller's documents and photo", body = MyDocumentsResponse),
        (status = 403, description = "Not a tenant", body = crate::error::ErrorResponse)
    )
)]
pub async fn my_documents(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MyDocumentsResponse>, ApiError> {
    let caller = state.caller(&headers).await?;
    Ok(Json(tenant_service::my_documents(&caller)?))
}
