use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use rentease_database::{Room, RoomCategory, RoomListing};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{read_files, MessageResponse};
use crate::{services::room as room_service, util::empty_as_none, ApiError, AppState};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRoomsQuery {
    pub building_id: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRoomRequest {
    pub building_id: i64,
    pub room_number: String,
    pub room_type: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub floor_number: Option<i64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub area_sqft: Option<f64>,
    pub rent_amount: f64,
    #[serde(default)]
    pub category: Option<RoomCategory>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateRoomRequest {
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub room_type: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub floor_number: Option<i64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub area_sqft: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub rent_amount: Option<f64>,
    #[serde(default)]
    pub category: Option<RoomCategory>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoomResponse {
    pub message: String,
    pub room: Room,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoomPhotosResponse {
    pub message: String,
    pub photos: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/api/rooms",
    tag = "Rooms",
    security(("bearerAuth" = [])),
    params(ListRoomsQuery),
    responses(
        (status = 200, description = "Rooms with building and occupant", body = [RoomListing]),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_rooms(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListRoomsQuery>,
) -> Result<Json<Vec<RoomListing>>, ApiError> {
    state.caller(&headers).await?;
    let rooms = room_service::list_rooms(state.db_pool(), query.building_id).await?;
    Ok(Json(rooms))
}

#[utoipa::path(
    post,
    path = "/api/rooms",
    tag = "Rooms",
    security(("bearerAuth" = [])),
    request_body = CreateRoomRequest,
    responses(
        (status = 201, description = "Room created", body = RoomResponse),
        (status = 400, description = "Invalid room payload", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse),
        (status = 404, description = "Building not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_room(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomResponse>), ApiError> {
    state.caller(&headers).await?.require_admin()?;
    let room = room_service::create_room(state.db_pool(), req).await?;

    Ok((
        StatusCode::CREATED,
        Json(RoomResponse {
            message: "Room created successfully".to_string(),
            room,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/rooms/{id}",
    tag = "Rooms",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Room id")),
    request_body = UpdateRoomRequest,
    responses(
        (status = 200, description = "Room updated", body = RoomResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse),
        (status = 404, description = "Room not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_room(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<UpdateRoomRequest>,
) -> Result<Json<RoomResponse>, ApiError> {
    state.caller(&headers).await?.require_admin()?;
    let room = room_service::update_room(state.db_pool(), id, req).await?;

    Ok(Json(RoomResponse {
        message: "Room updated successfully".to_string(),
        room,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/rooms/{id}",
    tag = "Rooms",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Room id")),
    responses(
        (status = 200, description = "Room deleted", body = MessageResponse),
        (status = 400, description = "Room is occupied", body = crate::error::ErrorResponse),
        (status = 404, description = "Room not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_room(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    state.caller(&headers).await?.require_admin()?;
    room_service::delete_room(state.db_pool(), id).await?;
    Ok(Json(MessageResponse::new("Room deleted successfully")))
}

/// Room photo form; repeat the `photos` part per file.
#[derive(Debug, ToSchema)]
pub struct RoomPhotosUpload {
    #[schema(value_type = Vec<String>)]
    pub photos: Vec<Vec<u8>>,
}

#[utoipa::path(
    post,
    path = "/api/rooms/{id}/photos",
    tag = "Rooms",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Room id")),
    request_body(content = RoomPhotosUpload, content_type = "multipart/form-data", description = "One or more `photos` parts"),
    responses(
        (status = 200, description = "Photos stored", body = RoomPhotosResponse),
        (status = 400, description = "No photos provided", body = crate::error::ErrorResponse),
        (status = 404, description = "Room not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn upload_photos(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<RoomPhotosResponse>, ApiError> {
    state.caller(&headers).await?.require_admin()?;

    let files = read_files(multipart, "photos").await?;
    if files.is_empty() {
        return Err(ApiError::bad_request("No photos provided"));
    }

    let photos = room_service::add_photos(state.db_pool(), state.uploads(), id, files).await?;
    Ok(Json(RoomPhotosResponse {
        message: "Photos uploaded successfully".to_string(),
        photos,
    }))
}
