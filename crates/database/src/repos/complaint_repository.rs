use sqlx::SqlitePool;

use super::timestamp;
use crate::entities::{Complaint, ComplaintCategory, ComplaintListing, ComplaintStatus};
use crate::types::{DatabaseError, DatabaseResult};

const COMPLAINT_COLUMNS: &str =
    "id, tenant_id, subject, description, category, status, admin_reply, created_at, updated_at";

#[derive(Clone)]
pub struct ComplaintRepository {
    pool: SqlitePool,
}

impl ComplaintRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Newest first. `tenant_id` narrows the list to one tenant.
    pub async fn list(&self, tenant_id: Option<i64>) -> DatabaseResult<Vec<ComplaintListing>> {
        let complaints = sqlx::query_as::<_, ComplaintListing>(
            r#"
            SELECT c.id, c.tenant_id, t.full_name AS tenant_name, c.subject, c.description,
                   c.category, c.status, c.admin_reply, c.created_at, c.updated_at
            FROM complaints c
            JOIN tenants t ON t.id = c.tenant_id
            WHERE (?1 IS NULL OR c.tenant_id = ?1)
            ORDER BY c.created_at DESC, c.id DESC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(complaints)
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Complaint>> {
        let complaint = sqlx::query_as::<_, Complaint>(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(complaint)
    }

    pub async fn create(
        &self,
        tenant_id: i64,
        subject: &str,
        description: &str,
        category: ComplaintCategory,
    ) -> DatabaseResult<Complaint> {
        let now = timestamp();
        let result = sqlx::query(
            r#"
            INSERT INTO complaints (tenant_id, subject, description, category, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, 'open', ?, ?)
            "#,
        )
        .bind(tenant_id)
        .bind(subject)
        .bind(description)
        .bind(category)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Complaint {
            id: result.last_insert_rowid(),
            tenant_id,
            subject: subject.to_string(),
            description: description.to_string(),
            category,
            status: ComplaintStatus::Open,
            admin_reply: None,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Stores the admin reply. Closed complaints are left untouched.
    pub async fn reply(
        &self,
        id: i64,
        reply: &str,
        status: ComplaintStatus,
    ) -> DatabaseResult<Complaint> {
        let result = sqlx::query(
            r#"
            UPDATE complaints
            SET admin_reply = ?, status = ?, updated_at = ?
            WHERE id = ? AND status != 'closed'
            "#,
        )
        .bind(reply)
        .bind(status)
        .bind(timestamp())
        .bind(id)
        .execute(&self.pool)
        .await?;

        let complaint = self
            .find_by_id(id)
            .await?
            .ok_or(DatabaseError::NotFound("Complaint"))?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::Conflict("Complaint is already closed".into()));
        }
        Ok(complaint)
    }

    pub async fn close(&self, id: i64) -> DatabaseResult<Complaint> {
        let result = sqlx::query("UPDATE complaints SET status = 'closed', updated_at = ? WHERE id = ?")
            .bind(timestamp())
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Complaint"));
        }
        self.find_by_id(id)
            .await?
            .ok_or(DatabaseError::NotFound("Complaint"))
    }
}
