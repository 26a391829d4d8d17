use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Building {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub total_floors: Option<i64>,
    pub building_type: BuildingType,
    pub created_at: String,
}

/// Listing row with the number of rooms attached to the building.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct BuildingSummary {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub total_floors: Option<i64>,
    pub building_type: BuildingType,
    pub room_count: i64,
    pub created_at: String,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    #[default]
    Residential,
    Commercial,
    Mixed,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewBuilding {
    pub name: String,
    pub address: String,
    pub total_floors: Option<i64>,
    #[serde(default)]
    pub building_type: BuildingType,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BuildingChanges {
    pub name: Option<String>,
    pub address: Option<String>,
    pub total_floors: Option<i64>,
    pub building_type: Option<BuildingType>,
}
