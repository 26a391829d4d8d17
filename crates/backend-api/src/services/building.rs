use rentease_database::{
    Building, BuildingChanges, BuildingRepository, BuildingSummary, NewBuilding, RoomListing,
};
use sqlx::SqlitePool;

use super::error::ServiceError;
use super::required;

pub async fn list_buildings(pool: &SqlitePool) -> Result<Vec<BuildingSummary>, ServiceError> {
    Ok(BuildingRepository::new(pool.clone()).list().await?)
}

pub async fn create_building(
    pool: &SqlitePool,
    req: NewBuilding,
) -> Result<Building, ServiceError> {
    if req.total_floors.is_some_and(|floors| floors < 0) {
        return Err(ServiceError::bad_request("total_floors cannot be negative"));
    }

    let new_building = NewBuilding {
        name: required(&req.name, "name")?,
        address: required(&req.address, "address")?,
        ..req
    };

    Ok(BuildingRepository::new(pool.clone())
        .create(&new_building)
        .await?)
}

pub async fn update_building(
    pool: &SqlitePool,
    building_id: i64,
    changes: BuildingChanges,
) -> Result<Building, ServiceError> {
    let changes = BuildingChanges {
        name: changes.name.map(|name| required(&name, "name")).transpose()?,
        address: changes
            .address
            .map(|address| required(&address, "address"))
            .transpose()?,
        ..changes
    };

    Ok(BuildingRepository::new(pool.clone())
        .update(building_id, &changes)
        .await?)
}

pub async fn delete_building(pool: &SqlitePool, building_id: i64) -> Result<(), ServiceError> {
    Ok(BuildingRepository::new(pool.clone())
        .delete(building_id)
        .await?)
}

pub async fn building_rooms(
    pool: &SqlitePool,
    building_id: i64,
) -> Result<Vec<RoomListing>, ServiceError> {
    let buildings = BuildingRepository::new(pool.clone());
    if buildings.find_by_id(building_id).await?.is_none() {
        return Err(ServiceError::not_found("Building not found"));
    }
    Ok(buildings.rooms(building_id).await?)
}
