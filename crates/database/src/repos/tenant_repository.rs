//! Tenant records and the room occupancy they drive.
//!
//! Every method that touches both a tenant and a room runs in one
//! transaction so a room is `occupied` exactly when a tenant points at it.

use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use super::timestamp;
use super::user_repository::insert_user;
use crate::entities::{
    NewTenant, NewUser, RemovedTenant, Tenant, TenantChanges, TenantListing, TenantProfile, User,
};
use crate::types::{DatabaseError, DatabaseResult};

const TENANT_COLUMNS: &str = "id, user_id, room_id, full_name, phone, email, id_proof_type, \
    id_proof_number, photo_path, documents, lease_start_date, lease_end_date, deposit_amount, \
    emergency_contact_name, emergency_contact_phone, created_at";

#[derive(Clone)]
pub struct TenantRepository {
    pool: SqlitePool,
}

impl TenantRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> DatabaseResult<Vec<TenantListing>> {
        let tenants = sqlx::query_as::<_, TenantListing>(
            r#"
            SELECT t.id, t.user_id, u.username, t.full_name, t.phone, t.email, t.room_id,
                   r.room_number, b.name AS building_name, r.rent_amount, t.id_proof_type,
                   t.id_proof_number, t.photo_path, t.documents, t.lease_start_date,
                   t.lease_end_date, t.deposit_amount, t.emergency_contact_name,
                   t.emergency_contact_phone, t.created_at
            FROM tenants t
            JOIN users u ON u.id = t.user_id
            LEFT JOIN rooms r ON r.id = t.room_id
            LEFT JOIN buildings b ON b.id = r.building_id
            ORDER BY t.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tenants)
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Tenant>> {
        let tenant =
            sqlx::query_as::<_, Tenant>(&format!("SELECT {TENANT_COLUMNS} FROM tenants WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(tenant)
    }

    pub async fn find_by_user(&self, user_id: i64) -> DatabaseResult<Option<Tenant>> {
        let tenant = sqlx::query_as::<_, Tenant>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants WHERE user_id = ?"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(tenant)
    }

    pub async fn profile(&self, id: i64) -> DatabaseResult<Option<TenantProfile>> {
        let profile = sqlx::query_as::<_, TenantProfile>(
            r#"
            SELECT t.id, t.full_name, t.email, t.phone, t.photo_path, r.room_number,
                   b.name AS building_name, r.floor_number, r.room_type, r.rent_amount,
                   t.deposit_amount, t.lease_start_date, t.lease_end_date, t.id_proof_type,
                   t.emergency_contact_name, t.emergency_contact_phone, t.documents
            FROM tenants t
            LEFT JOIN rooms r ON r.id = t.room_id
            LEFT JOIN buildings b ON b.id = r.building_id
            WHERE t.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    /// Creates the login account and tenant record together and marks the
    /// chosen room occupied.
    pub async fn create_with_account(
        &self,
        new_user: &NewUser,
        new_tenant: &NewTenant,
    ) -> DatabaseResult<(Tenant, User)> {
        let mut tx = self.pool.begin().await?;

        let user = insert_user(&mut tx, new_user).await?;
        if let Some(room_id) = new_tenant.room_id {
            occupy_room(&mut tx, room_id).await?;
        }

        let result = sqlx::query(
            r#"
            INSERT INTO tenants (user_id, room_id, full_name, phone, email, id_proof_type,
                                 id_proof_number, documents, lease_start_date, lease_end_date,
                                 deposit_amount, emergency_contact_name, emergency_contact_phone,
                                 created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, '[]', ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id)
        .bind(new_tenant.room_id)
        .bind(&new_tenant.full_name)
        .bind(&new_tenant.phone)
        .bind(&new_tenant.email)
        .bind(&new_tenant.id_proof_type)
        .bind(&new_tenant.id_proof_number)
        .bind(new_tenant.lease_start_date)
        .bind(new_tenant.lease_end_date)
        .bind(new_tenant.deposit_amount)
        .bind(&new_tenant.emergency_contact_name)
        .bind(&new_tenant.emergency_contact_phone)
        .bind(timestamp())
        .execute(&mut *tx)
        .await
        .map_err(|e| DatabaseError::unique_violation(e, "Room is already occupied"))?;

        let tenant = fetch_tenant(&mut tx, result.last_insert_rowid()).await?;
        tx.commit().await?;

        info!(tenant_id = tenant.id, room_id = ?tenant.room_id, "tenant created");
        Ok((tenant, user))
    }

    /// Applies profile edits and, when requested, moves the tenant to
    /// another room (or out of its room).
    pub async fn update(&self, id: i64, changes: &TenantChanges) -> DatabaseResult<Tenant> {
        let mut tx = self.pool.begin().await?;
        let current = fetch_tenant(&mut tx, id).await?;

        let room_id = match changes.room_id {
            Some(target) if target != current.room_id => {
                if let Some(old_room) = current.room_id {
                    vacate_room(&mut tx, old_room).await?;
                }
                if let Some(new_room) = target {
                    occupy_room(&mut tx, new_room).await?;
                }
                info!(tenant_id = id, from = ?current.room_id, to = ?target, "tenant relocated");
                target
            }
            _ => current.room_id,
        };

        sqlx::query(
            r#"
            UPDATE tenants
            SET room_id = ?,
                full_name = COALESCE(?, full_name),
                phone = COALESCE(?, phone),
                email = COALESCE(?, email),
                id_proof_type = COALESCE(?, id_proof_type),
                id_proof_number = COALESCE(?, id_proof_number),
                lease_start_date = COALESCE(?, lease_start_date),
                lease_end_date = COALESCE(?, lease_end_date),
                deposit_amount = COALESCE(?, deposit_amount),
                emergency_contact_name = COALESCE(?, emergency_contact_name),
                emergency_contact_phone = COALESCE(?, emergency_contact_phone)
            WHERE id = ?
            "#,
        )
        .bind(room_id)
        .bind(&changes.full_name)
        .bind(&changes.phone)
        .bind(&changes.email)
        .bind(&changes.id_proof_type)
        .bind(&changes.id_proof_number)
        .bind(changes.lease_start_date)
        .bind(changes.lease_end_date)
        .bind(changes.deposit_amount)
        .bind(&changes.emergency_contact_name)
        .bind(&changes.emergency_contact_phone)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let tenant = fetch_tenant(&mut tx, id).await?;
        tx.commit().await?;
        Ok(tenant)
    }

    /// Frees the room and removes the login account. Bills and complaints
    /// go with the tenant row through the foreign-key cascade.
    /// Removes the tenant and its login. Bills and complaints cascade.
    pub async fn delete(&self, id: i64) -> DatabaseResult<RemovedTenant> {
        let mut tx = self.pool.begin().await?;
        let tenant = fetch_tenant(&mut tx, id).await?;
        let bill_screenshots: Vec<String> = sqlx::query_scalar(
            "SELECT payment_screenshot FROM bills WHERE tenant_id = ? AND payment_screenshot IS NOT NULL",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        if let Some(room_id) = tenant.room_id {
            vacate_room(&mut tx, room_id).await?;
        }

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(tenant.user_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(tenant_id = id, user_id = tenant.user_id, "tenant deleted");
        Ok(RemovedTenant {
            tenant,
            bill_screenshots,
        })
    }

    pub async fn append_documents(&self, id: i64, paths: &[String]) -> DatabaseResult<Vec<String>> {
        let mut tx = self.pool.begin().await?;
        let Json(mut documents) = fetch_tenant(&mut tx, id).await?.documents;

        documents.extend(paths.iter().cloned());

        sqlx::query("UPDATE tenants SET documents = ? WHERE id = ?")
            .bind(Json(&documents))
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(documents)
    }

    pub async fn set_photo(&self, id: i64, path: &str) -> DatabaseResult<()> {
        let result = sqlx::query("UPDATE tenants SET photo_path = ? WHERE id = ?")
            .bind(path)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Tenant"));
        }
        Ok(())
    }
}

async fn fetch_tenant(conn: &mut SqliteConnection, id: i64) -> DatabaseResult<Tenant> {
    sqlx::query_as::<_, Tenant>(&format!("SELECT {TENANT_COLUMNS} FROM tenants WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(DatabaseError::NotFound("Tenant"))
}

async fn occupy_room(conn: &mut SqliteConnection, room_id: i64) -> DatabaseResult<()> {
    let result =
        sqlx::query("UPDATE rooms SET status = 'occupied' WHERE id = ? AND status = 'vacant'")
            .bind(room_id)
            .execute(&mut *conn)
            .await?;
    if result.rows_affected() > 0 {
        return Ok(());
    }

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM rooms WHERE id = ?)")
        .bind(room_id)
        .fetch_one(&mut *conn)
        .await?;
    if exists {
        Err(DatabaseError::Conflict("Room is already occupied".into()))
    } else {
        Err(DatabaseError::NotFound("Room"))
    }
}

async fn vacate_room(conn: &mut SqliteConnection, room_id: i64) -> DatabaseResult<()> {
    sqlx::query("UPDATE rooms SET status = 'vacant' WHERE id = ?")
        .bind(room_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
