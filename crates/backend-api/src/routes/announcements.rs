use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use rentease_database::{Announcement, AnnouncementChanges, NewAnnouncement};
use serde::Serialize;
use utoipa::ToSchema;

use super::MessageResponse;
use crate::{services::announcement as announcement_service, ApiError, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct AnnouncementResponse {
    pub message: String,
    pub announcement: Announcement,
}

#[utoipa::path(
    get,
    path = "/api/announcements",
    tag = "Announcements",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Latest announcements, newest first", body = [Announcement]),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_announcements(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Announcement>>, ApiError> {
    state.caller(&headers).await?;
    Ok(Json(
        announcement_service::list_announcements(state.db_pool()).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/announcements",
    tag = "Announcements",
    security(("bearerAuth" = [])),
    request_body = NewAnnouncement,
    responses(
        (status = 201, description = "Announcement posted", body = AnnouncementResponse),
        (status = 400, description = "Title or message missing", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_announcement(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewAnnouncement>,
) -> Result<(StatusCode, Json<AnnouncementResponse>), ApiError> {
    state.caller(&headers).await?.require_admin()?;
    let announcement = announcement_service::create_announcement(state.db_pool(), req).await?;

    Ok((
        StatusCode::CREATED,
        Json(AnnouncementResponse {
            message: "Announcement created".to_string(),
            announcement,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/announcements/{id}",
    tag = "Announcements",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Announcement id")),
    request_body = AnnouncementChanges,
    responses(
        (status = 200, description = "Announcement updated", body = AnnouncementResponse),
        (status = 404, description = "Announcement not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_announcement(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<AnnouncementChanges>,
) -> Result<Json<AnnouncementResponse>, ApiError> {
    state.caller(&headers).await?.require_admin()?;
    let announcement =
        announcement_service::update_announcement(state.db_pool(), id, req).await?;

    Ok(Json(AnnouncementResponse {
        message: "Announcement updated".to_string(),
        announcement,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/announcements/{id}",
    tag = "Announcements",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Announcement id")),
    responses(
        (status = 200, description = "Announcement removed", body = MessageResponse),
        (status = 404, description = "Announcement not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_announcement(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    state.caller(&headers).await?.require_admin()?;
    announcement_service::delete_announcement(state.db_pool(), id).await?;
    Ok(Json(MessageResponse::new("Announcement deleted")))
}
