use rentease_database::{Announcement, AnnouncementChanges, AnnouncementRepository, NewAnnouncement};
use sqlx::SqlitePool;
use tracing::info;

use super::error::ServiceError;
use super::required;

/// How many announcements the board shows.
pub const BOARD_SIZE: i64 = 20;

pub async fn list_announcements(pool: &SqlitePool) -> Result<Vec<Announcement>, ServiceError> {
    Ok(AnnouncementRepository::new(pool.clone())
        .latest(BOARD_SIZE)
        .await?)
}

pub async fn create_announcement(
    pool: &SqlitePool,
    req: NewAnnouncement,
) -> Result<Announcement, ServiceError> {
    let announcement = NewAnnouncement {
        title: required(&req.title, "title")?,
        message: required(&req.message, "message")?,
        priority: req.priority,
    };
    let created = AnnouncementRepository::new(pool.clone())
        .create(&announcement)
        .await?;
    info!(announcement_id = created.id, priority = ?created.priority, "announcement posted");
    Ok(created)
}

pub async fn update_announcement(
    pool: &SqlitePool,
    announcement_id: i64,
    changes: AnnouncementChanges,
) -> Result<Announcement, ServiceError> {
    let changes = AnnouncementChanges {
        title: changes.title.map(|title| required(&title, "title")).transpose()?,
        message: changes
            .message
            .map(|message| required(&message, "message"))
            .transpose()?,
        ..changes
    };
    Ok(AnnouncementRepository::new(pool.clone())
        .update(announcement_id, &changes)
        .await?)
}

pub async fn delete_announcement(pool: &SqlitePool, announcement_id: i64) -> Result<(), ServiceError> {
    Ok(AnnouncementRepository::new(pool.clone())
        .delete(announcement_id)
        .await?)
}
