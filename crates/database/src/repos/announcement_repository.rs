use sqlx::SqlitePool;

use super::timestamp;
use crate::entities::{Announcement, AnnouncementChanges, NewAnnouncement};
use crate::types::{DatabaseError, DatabaseResult};

#[derive(Clone)]
pub struct AnnouncementRepository {
    pool: SqlitePool,
}

impl AnnouncementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The most recent `limit` announcements, newest first.
    pub async fn latest(&self, limit: i64) -> DatabaseResult<Vec<Announcement>> {
        let announcements = sqlx::query_as::<_, Announcement>(
            "SELECT id, title, message, priority, created_at FROM announcements \
             ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(announcements)
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Announcement>> {
        let announcement = sqlx::query_as::<_, Announcement>(
            "SELECT id, title, message, priority, created_at FROM announcements WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(announcement)
    }

    pub async fn create(&self, new_announcement: &NewAnnouncement) -> DatabaseResult<Announcement> {
        let created_at = timestamp();
        let result = sqlx::query(
            "INSERT INTO announcements (title, message, priority, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&new_announcement.title)
        .bind(&new_announcement.message)
        .bind(new_announcement.priority)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;

        Ok(Announcement {
            id: result.last_insert_rowid(),
            title: new_announcement.title.clone(),
            message: new_announcement.message.clone(),
            priority: new_announcement.priority,
            created_at,
        })
    }

    pub async fn update(
        &self,
        id: i64,
        changes: &AnnouncementChanges,
    ) -> DatabaseResult<Announcement> {
        let result = sqlx::query(
            r#"
            UPDATE announcements
            SET title = COALESCE(?, title),
                message = COALESCE(?, message),
                priority = COALESCE(?, priority)
            WHERE id = ?
            "#,
        )
        .bind(&changes.title)
        .bind(&changes.message)
        .bind(changes.priority)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Announcement"));
        }
        self.find_by_id(id)
            .await?
            .ok_or(DatabaseError::NotFound("Announcement"))
    }

    pub async fn delete(&self, id: i64) -> DatabaseResult<()> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Announcement"));
        }
        Ok(())
    }
}
