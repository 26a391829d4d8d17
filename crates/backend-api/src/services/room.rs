use rentease_database::{NewRoom, Room, RoomChanges, RoomListing, RoomRepository};
use sqlx::SqlitePool;
use tracing::info;

use super::error::ServiceError;
use super::{non_negative, required};
use crate::routes::rooms::{CreateRoomRequest, UpdateRoomRequest};
use crate::storage::{UploadDir, UploadStore, UploadedFile};
use crate::util::non_blank;

pub async fn list_rooms(
    pool: &SqlitePool,
    building_id: Option<i64>,
) -> Result<Vec<RoomListing>, ServiceError> {
    Ok(RoomRepository::new(pool.clone()).list(building_id).await?)
}

pub async fn create_room(pool: &SqlitePool, req: CreateRoomRequest) -> Result<Room, ServiceError> {
    let new_room = NewRoom {
        building_id: req.building_id,
        room_number: required(&req.room_number, "room_number")?,
        room_type: required(&req.room_type, "room_type")?,
        floor_number: req.floor_number,
        area_sqft: req.area_sqft.map(|area| non_negative(area, "area_sqft")).transpose()?,
        rent_amount: non_negative(req.rent_amount, "rent_amount")?,
        category: req.category.unwrap_or_default(),
        description: non_blank(req.description),
    };

    Ok(RoomRepository::new(pool.clone()).create(&new_room).await?)
}

pub async fn update_room(
    pool: &SqlitePool,
    room_id: i64,
    req: UpdateRoomRequest,
) -> Result<Room, ServiceError> {
    let changes = RoomChanges {
        room_number: req
            .room_number
            .map(|number| required(&number, "room_number"))
            .transpose()?,
        room_type: req
            .room_type
            .map(|kind| required(&kind, "room_type"))
            .transpose()?,
        floor_number: req.floor_number,
        area_sqft: req.area_sqft.map(|area| non_negative(area, "area_sqft")).transpose()?,
        rent_amount: req
            .rent_amount
            .map(|rent| non_negative(rent, "rent_amount"))
            .transpose()?,
        category: req.category,
        description: req.description,
    };

    Ok(RoomRepository::new(pool.clone())
        .update(room_id, &changes)
        .await?)
}

pub async fn delete_room(pool: &SqlitePool, room_id: i64) -> Result<(), ServiceError> {
    RoomRepository::new(pool.clone()).delete(room_id).await?;
    info!(room_id, "room deleted");
    Ok(())
}

/// Stores each photo and appends it to the room's gallery.
pub async fn add_photos(
    pool: &SqlitePool,
    uploads: &UploadStore,
    room_id: i64,
    files: Vec<UploadedFile>,
) -> Result<Vec<String>, ServiceError> {
    let rooms = RoomRepository::new(pool.clone());
    if rooms.find_by_id(room_id).await?.is_none() {
        return Err(ServiceError::not_found("Room not found"));
    }

    let prefix = format!("room_{room_id}_");
    let mut stored = Vec::with_capacity(files.len());
    for file in &files {
        let path = uploads
            .save(UploadDir::RoomPhotos, &prefix, file)
            .await
            .map_err(|e| ServiceError::internal(format!("failed to store room photo: {e}")))?;
        stored.push(path);
    }

    Ok(rooms.append_photos(room_id, &stored).await?)
}
