use sqlx::types::Json;
use sqlx::SqlitePool;

use super::timestamp;
use crate::entities::{NewRoom, Room, RoomChanges, RoomListing};
use crate::types::{DatabaseError, DatabaseResult};

const ROOM_COLUMNS: &str = "id, building_id, room_number, room_type, floor_number, area_sqft, \
    rent_amount, status, category, photos, description, created_at";

#[derive(Clone)]
pub struct RoomRepository {
    pool: SqlitePool,
}

impl RoomRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, building_id: Option<i64>) -> DatabaseResult<Vec<RoomListing>> {
        list_rooms(&self.pool, building_id).await
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Room>> {
        let room = sqlx::query_as::<_, Room>(&format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(room)
    }

    pub async fn create(&self, new_room: &NewRoom) -> DatabaseResult<Room> {
        let building_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM buildings WHERE id = ?)")
                .bind(new_room.building_id)
                .fetch_one(&self.pool)
                .await?;
        if !building_exists {
            return Err(DatabaseError::NotFound("Building"));
        }

        let created_at = timestamp();
        let result = sqlx::query(
            r#"
            INSERT INTO rooms (building_id, room_number, room_type, floor_number, area_sqft,
                               rent_amount, status, category, photos, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?, 'vacant', ?, '[]', ?, ?)
            "#,
        )
        .bind(new_room.building_id)
        .bind(&new_room.room_number)
        .bind(&new_room.room_type)
        .bind(new_room.floor_number)
        .bind(new_room.area_sqft)
        .bind(new_room.rent_amount)
        .bind(new_room.category)
        .bind(&new_room.description)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;

        self.find_by_id(result.last_insert_rowid())
            .await?
            .ok_or(DatabaseError::NotFound("Room"))
    }

    pub async fn update(&self, id: i64, changes: &RoomChanges) -> DatabaseResult<Room> {
        let result = sqlx::query(
            r#"
            UPDATE rooms
            SET room_number = COALESCE(?, room_number),
                room_type = COALESCE(?, room_type),
                floor_number = COALESCE(?, floor_number),
                area_sqft = COALESCE(?, area_sqft),
                rent_amount = COALESCE(?, rent_amount),
                category = COALESCE(?, category),
                description = COALESCE(?, description)
            WHERE id = ?
            "#,
        )
        .bind(&changes.room_number)
        .bind(&changes.room_type)
        .bind(changes.floor_number)
        .bind(changes.area_sqft)
        .bind(changes.rent_amount)
        .bind(changes.category)
        .bind(&changes.description)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Room"));
        }

        self.find_by_id(id).await?.ok_or(DatabaseError::NotFound("Room"))
    }

    /// Deletes a vacant room. Occupied rooms must be vacated first.
    pub async fn delete(&self, id: i64) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = ? AND status = 'vacant'")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() > 0 {
            return Ok(());
        }

        match self.find_by_id(id).await? {
            None => Err(DatabaseError::NotFound("Room")),
            Some(_) => Err(DatabaseError::ValidationError(
                "Cannot delete occupied room. Please remove or relocate the tenant first.".into(),
            )),
        }
    }

    /// Appends stored photo paths and returns the full list.
    pub async fn append_photos(&self, id: i64, paths: &[String]) -> DatabaseResult<Vec<String>> {
        let mut tx = self.pool.begin().await?;

        let current: Option<Json<Vec<String>>> =
            sqlx::query_scalar("SELECT photos FROM rooms WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(Json(mut photos)) = current else {
            return Err(DatabaseError::NotFound("Room"));
        };

        photos.extend(paths.iter().cloned());

        sqlx::query("UPDATE rooms SET photos = ? WHERE id = ?")
            .bind(Json(&photos))
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(photos)
    }
}

pub(crate) async fn list_rooms(
    pool: &SqlitePool,
    building_id: Option<i64>,
) -> DatabaseResult<Vec<RoomListing>> {
    let rooms = sqlx::query_as::<_, RoomListing>(
        r#"
        SELECT r.id, r.building_id, b.name AS building_name, r.room_number, r.room_type,
               r.floor_number, r.area_sqft, r.rent_amount, r.status, r.category, r.photos,
               r.description, t.full_name AS tenant_name, r.created_at
        FROM rooms r
        JOIN buildings b ON b.id = r.building_id
        LEFT JOIN tenants t ON t.room_id = r.id
        WHERE (?1 IS NULL OR r.building_id = ?1)
        ORDER BY r.building_id ASC, r.room_number ASC
        "#,
    )
    .bind(building_id)
    .fetch_all(pool)
    .await?;
    Ok(rooms)
}
