use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use rentease_database::{Building, BuildingChanges, BuildingSummary, NewBuilding, RoomListing};
use serde::Serialize;
use utoipa::ToSchema;

use super::MessageResponse;
use crate::{services::building as building_service, ApiError, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct BuildingResponse {
    pub message: String,
    pub building: Building,
}

#[utoipa::path(
    get,
    path = "/api/buildings",
    tag = "Buildings",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Buildings with their room counts", body = [BuildingSummary]),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_buildings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<BuildingSummary>>, ApiError> {
    state.caller(&headers).await?;
    let buildings = building_service::list_buildings(state.db_pool()).await?;
    Ok(Json(buildings))
}

#[utoipa::path(
    post,
    path = "/api/buildings",
    tag = "Buildings",
    security(("bearerAuth" = [])),
    request_body = NewBuilding,
    responses(
        (status = 201, description = "Building created", body = BuildingResponse),
        (status = 400, description = "Invalid building payload", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_building(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewBuilding>,
) -> Result<(StatusCode, Json<BuildingResponse>), ApiError> {
    state.caller(&headers).await?.require_admin()?;
    let building = building_service::create_building(state.db_pool(), req).await?;

    Ok((
        StatusCode::CREATED,
        Json(BuildingResponse {
            message: "Building created successfully".to_string(),
            building,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/buildings/{id}",
    tag = "Buildings",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Building id")),
    request_body = BuildingChanges,
    responses(
        (status = 200, description = "Building updated", body = BuildingResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse),
        (status = 404, description = "Building not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_building(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<BuildingChanges>,
) -> Result<Json<BuildingResponse>, ApiError> {
    state.caller(&headers).await?.require_admin()?;
    let building = building_service::update_building(state.db_pool(), id, req).await?;

    Ok(Json(BuildingResponse {
        message: "Building updated successfully".to_string(),
        building,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/buildings/{id}",
    tag = "Buildings",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Building id")),
    responses(
        (status = 200, description = "Building deleted", body = MessageResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse),
        (status = 404, description = "Building not found", body = crate::error::ErrorResponse),
        (status = 400, description = "Building still has occupied rooms", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_building(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    state.caller(&headers).await?.require_admin()?;
    building_service::delete_building(state.db_pool(), id).await?;
    Ok(Json(MessageResponse::new("Building deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/buildings/{id}/rooms",
    tag = "Buildings",
    security(("bearerAuth" = [])),
    params(("id" = i64, Path, description = "Building id")),
    responses(
        (status = 200, description = "Rooms in the building", body = [RoomListing]),
        (status = 404, description = "Building not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn building_rooms(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Vec<RoomListing>>, ApiError> {
    state.caller(&headers).await?;
    let rooms = building_service::building_rooms(state.db_pool(), id).await?;
    Ok(Json(rooms))
}
