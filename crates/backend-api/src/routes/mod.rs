pub mod announcements;
pub mod auth;
pub mod bills;
pub mod buildings;
pub mod complaints;
pub mod dashboard;
pub mod emergency_contacts;
pub mod health;
pub mod payment_settings;
pub mod payments;
pub mod rooms;
pub mod tenants;

use axum::extract::Multipart;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::storage::UploadedFile;
use crate::ApiError;

/// Acknowledgement body for writes that return nothing else.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Calendar date used for due-date comparisons and paid dates.
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Collects every file sent under `field`. Parts without a filename are
/// skipped, as browsers send those for empty file inputs.
pub(crate) async fn read_files(
    mut multipart: Multipart,
    field: &str,
) -> Result<Vec<UploadedFile>, ApiError> {
    let mut files = Vec::new();

    while let Some(part) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {e}")))?
    {
        if part.name() != Some(field) {
            continue;
        }
        let Some(file_name) = part
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
        else {
            continue;
        };

        let data = part
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {e}")))?;
        files.push(UploadedFile { file_name, data });
    }

    Ok(files)
}

/// Like [`read_files`] for single-file inputs; 400 with `missing` when
/// nothing usable was sent.
pub(crate) async fn read_file(
    multipart: Multipart,
    field: &str,
    missing: &str,
) -> Result<UploadedFile, ApiError> {
    read_files(multipart, field)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::bad_request(missing))
}
