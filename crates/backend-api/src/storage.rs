//! On-disk storage for uploaded documents, photos and payment evidence.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::{debug, warn};
use uuid::Uuid;

/// Subdirectories of the upload root. QR codes live at the root itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadDir {
    TenantDocs,
    TenantPhotos,
    RoomPhotos,
    PaymentScreenshots,
    Root,
}

impl UploadDir {
    const ALL: [UploadDir; 4] = [
        UploadDir::TenantDocs,
        UploadDir::TenantPhotos,
        UploadDir::RoomPhotos,
        UploadDir::PaymentScreenshots,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            UploadDir::TenantDocs => "tenant_docs",
            UploadDir::TenantPhotos => "tenant_photos",
            UploadDir::RoomPhotos => "room_photos",
            UploadDir::PaymentScreenshots => "payment_screenshots",
            UploadDir::Root => "",
        }
    }
}

/// A file part pulled out of a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Bytes,
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the root and every subdirectory.
    pub async fn ensure_layout(&self) -> std::io::Result<()> {
        for dir in UploadDir::ALL {
            tokio::fs::create_dir_all(self.root.join(dir.as_str())).await?;
        }
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Writes the file under `dir` as `<prefix><unique id>_<sanitized name>`
    /// and returns its path relative to the upload root.
    pub async fn save(
        &self,
        dir: UploadDir,
        prefix: &str,
        file: &UploadedFile,
    ) -> std::io::Result<String> {
        let name = format!(
            "{prefix}{}_{}",
            Uuid::new_v4().simple(),
            sanitize_filename(&file.file_name)
        );

        let relative = match dir {
            UploadDir::Root => name,
            other => format!("{}/{name}", other.as_str()),
        };

        let target = self.root.join(&relative);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &file.data).await?;

        debug!(path = %relative, bytes = file.data.len(), "upload stored");
        Ok(relative)
    }

    /// Removes a previously stored file. Missing files are ignored.
    pub async fn remove(&self, relative: &str) {
        if relative.contains("..") {
            return;
        }
        if let Err(error) = tokio::fs::remove_file(self.root.join(relative)).await {
            if error.kind() != std::io::ErrorKind::NotFound {
                warn!(path = relative, %error, "failed to remove stored upload");
            }
        }
    }
}

/// Keeps ASCII alphanumerics, `.`, `-` and `_`, drops any directory part
/// and leading dots.
///
/// ```
/// use rentease_backend_api::storage::sanitize_filename;
///
/// assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
/// assert_eq!(sanitize_filename("lease agreement (1).pdf"), "leaseagreement1.pdf");
/// ```
pub fn sanitize_filename(original: &str) -> String {
    let base = original
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn sanitize_strips_hidden_and_windows_paths() {
        assert_eq!(sanitize_filename("C:\\Users\\me\\.id.png"), "id.png");
        assert_eq!(sanitize_filename("..."), "upload");
        assert_eq!(sanitize_filename("receipt-03_2024.JPG"), "receipt-03_2024.JPG");
    }

    #[tokio::test]
    async fn save_writes_into_subdirectory_with_prefix() {
        let temp = TempDir::new().expect("temp dir");
        let store = UploadStore::new(temp.path());
        store.ensure_layout().await.expect("layout");

        let file = UploadedFile {
            file_name: "front view.jpg".to_string(),
            data: Bytes::from_static(b"jpeg"),
        };
        let relative = store
            .save(UploadDir::RoomPhotos, "room_4_", &file)
            .await
            .expect("saved");

        assert!(relative.starts_with("room_photos/room_4_"));
        assert!(relative.ends_with("_frontview.jpg"));
        let stored = tokio::fs::read(temp.path().join(&relative)).await.expect("read back");
        assert_eq!(stored, b"jpeg");
    }

    #[tokio::test]
    async fn root_uploads_have_no_directory() {
        let temp = TempDir::new().expect("temp dir");
        let store = UploadStore::new(temp.path());

        let file = UploadedFile {
            file_name: "qr.png".to_string(),
            data: Bytes::from_static(b"png"),
        };
        let relative = store.save(UploadDir::Root, "qr_", &file).await.expect("saved");
        assert!(!relative.contains('/'));

        store.remove(&relative).await;
        assert!(!temp.path().join(&relative).exists());
    }
}
