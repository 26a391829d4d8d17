use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use rentease_database::{EmergencyContact, EmergencyContactChanges, NewEmergencyContact};
use serde::Serialize;
use utoipa::ToSchema;

use super::MessageResponse;
use crate::{services::emergency_contact as contact_service, ApiError, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct EmergencyContactResponse {
    pub message: String,
    pub contact: EmergencyContact,
}

#[utoipa::path(
    get,
    path = "/api/emergency-contacts",
    tag = "Emergency Contacts",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Emergency service numbers", body = [EmergencyContact]),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_contacts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<EmergencyContact>>, ApiError> {
    state.caller(&headers).await?;
    Ok(Json(contact_service::list_contacts(state.db_pool()).await?))
}

#[utoipa::path(
    post,
    path = "/api/emergency-contacts",
    tag = "Emergency Contacts",
    security(("bearerAuth" = [])),
    request_body = NewEmergencyContact,
    responses(
        (status = 201, description = "Contact added", body = EmergencyContactResponse),
        (status = 400, description = "Service type or phone missing", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewEmergencyContact>,
) -> Result<(StatusCode, Json<EmergencyContactResponse>), ApiError> {
    state.caller(&headers).await?.require_admin()?;
    let contact = contact_service::create_contact(state.db_pool(), req).await?;

    Ok((
        StatusCode::CREATED,
        Json(EmergencyContactResponse {
            message: "Emergency contact added".to_string(),
            contact,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/emergency-contacts/{id}",
    tag = "Emergency Contacts",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Contact id")),
    request_body = EmergencyContactChanges,
    responses(
        (status = 200, description = "Contact updated", body = EmergencyContactResponse),
        (status = 404, description = "Contact not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<EmergencyContactChanges>,
) -> Result<Json<EmergencyContactResponse>, ApiError> {
    state.caller(&headers).await?.require_admin()?;
    let contact = contact_service::update_contact(state.db_pool(), id, req).await?;

    Ok(Json(EmergencyContactResponse {
        message: "Emergency contact updated".to_string(),
        contact,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/emergency-contacts/{id}",
    tag = "Emergency Contacts",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Contact id")),
    responses(
        (status = 200, description = "Contact removed", body = MessageResponse),
        (status = 404, description = "Contact not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    state.caller(&headers).await?.require_admin()?;
    contact_service::delete_contact(state.db_pool(), id).await?;
    Ok(Json(MessageResponse::new("Emergency contact deleted")))
}
