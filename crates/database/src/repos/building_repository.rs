use sqlx::SqlitePool;
use tracing::info;

use super::timestamp;
use crate::entities::{Building, BuildingChanges, BuildingSummary, NewBuilding, RoomListing};
use crate::types::{DatabaseError, DatabaseResult};

#[derive(Clone)]
pub struct BuildingRepository {
    pool: SqlitePool,
}

impl BuildingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> DatabaseResult<Vec<BuildingSummary>> {
        let buildings = sqlx::query_as::<_, BuildingSummary>(
            r#"
            SELECT b.id, b.name, b.address, b.total_floors, b.building_type, b.created_at,
                   (SELECT COUNT(*) FROM rooms r WHERE r.building_id = b.id) AS room_count
            FROM buildings b
            ORDER BY b.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(buildings)
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Building>> {
        let building = sqlx::query_as::<_, Building>(
            "SELECT id, name, address, total_floors, building_type, created_at FROM buildings WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(building)
    }

    pub async fn create(&self, new_building: &NewBuilding) -> DatabaseResult<Building> {
        let created_at = timestamp();
        let result = sqlx::query(
            "INSERT INTO buildings (name, address, total_floors, building_type, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&new_building.name)
        .bind(&new_building.address)
        .bind(new_building.total_floors)
        .bind(new_building.building_type)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;

        Ok(Building {
            id: result.last_insert_rowid(),
            name: new_building.name.clone(),
            address: new_building.address.clone(),
            total_floors: new_building.total_floors,
            building_type: new_building.building_type,
            created_at,
        })
    }

    pub async fn update(&self, id: i64, changes: &BuildingChanges) -> DatabaseResult<Building> {
        let result = sqlx::query(
            r#"
            UPDATE buildings
            SET name = COALESCE(?, name),
                address = COALESCE(?, address),
                total_floors = COALESCE(?, total_floors),
                building_type = COALESCE(?, building_type)
            WHERE id = ?
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.address)
        .bind(changes.total_floors)
        .bind(changes.building_type)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Building"));
        }

        self.find_by_id(id)
            .await?
            .ok_or(DatabaseError::NotFound("Building"))
    }

    /// Removes a building and its rooms. Refused while any room is let.
    pub async fn delete(&self, id: i64) -> DatabaseResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM buildings WHERE id = ?)")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if !exists {
            return Err(DatabaseError::NotFound("Building"));
        }

        let occupied: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM rooms WHERE building_id = ? AND status = 'occupied'",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if occupied > 0 {
            return Err(DatabaseError::ValidationError(format!(
                "Cannot delete building with {occupied} occupied room(s). Relocate the tenants first."
            )));
        }

        sqlx::query("DELETE FROM buildings WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(building_id = id, "building deleted");
        Ok(())
    }

    pub async fn rooms(&self, id: i64) -> DatabaseResult<Vec<RoomListing>> {
        super::room_repository::list_rooms(&self.pool, Some(id)).await
    }
}
