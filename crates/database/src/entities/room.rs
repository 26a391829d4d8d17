use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Room {
    pub id: i64,
    pub building_id: i64,
    pub room_number: String,
    pub room_type: String,
    pub floor_number: Option<i64>,
    pub area_sqft: Option<f64>,
    pub rent_amount: f64,
    pub status: RoomStatus,
    pub category: RoomCategory,
    #[schema(value_type = Vec<String>)]
    pub photos: Json<Vec<String>>,
    pub description: Option<String>,
    pub created_at: String,
}

/// Room joined with its building name and current occupant.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct RoomListing {
    pub id: i64,
    pub building_id: i64,
    pub building_name: String,
    pub room_number: String,
    pub room_type: String,
    pub floor_number: Option<i64>,
    pub area_sqft: Option<f64>,
    pub rent_amount: f64,
    pub status: RoomStatus,
    pub category: RoomCategory,
    #[schema(value_type = Vec<String>)]
    pub photos: Json<Vec<String>>,
    pub description: Option<String>,
    pub tenant_name: Option<String>,
    pub created_at: String,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    #[default]
    Vacant,
    Occupied,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RoomCategory {
    #[default]
    Residential,
    Commercial,
}

#[derive(Debug, Clone)]
pub struct NewRoom {
    pub building_id: i64,
    pub room_number: String,
    pub room_type: String,
    pub floor_number: Option<i64>,
    pub area_sqft: Option<f64>,
    pub rent_amount: f64,
    pub category: RoomCategory,
    pub description: Option<String>,
}

/// Partial update; occupancy is never changed through this path.
#[derive(Debug, Clone, Default)]
pub struct RoomChanges {
    pub room_number: Option<String>,
    pub room_type: Option<String>,
    pub floor_number: Option<i64>,
    pub area_sqft: Option<f64>,
    pub rent_amount: Option<f64>,
    pub category: Option<RoomCategory>,
    pub description: Option<String>,
}
