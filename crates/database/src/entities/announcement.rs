use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub priority: AnnouncementPriority,
    pub created_at: String,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewAnnouncement {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub priority: AnnouncementPriority,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AnnouncementChanges {
    pub title: Option<String>,
    pub message: Option<String>,
    pub priority: Option<AnnouncementPriority>,
}
