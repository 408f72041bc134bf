//! File storage service implementation
//!
//! This service stores uploaded media under the configured media root and
//! maps stored files to the URLs the portal serves them from.

use std::path::Path;

use tokio::fs;
use tracing::debug;

use crate::config::MediaConfig;
use crate::utils::errors::{CampusBuddyError, Result};

/// Filesystem-backed media storage
#[derive(Debug, Clone)]
pub struct StorageService {
    config: MediaConfig,
}

impl StorageService {
    /// Create a new StorageService instance
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    /// Write a file under the media root, creating parent directories.
    /// Returns the normalized relative path the file was stored at.
    pub async fn save(&self, relative_path: &str, bytes: &[u8]) -> Result<String> {
        let stored = self.checked_relative(relative_path)?;
        let full_path = Path::new(&self.config.root).join(&stored);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&full_path, bytes).await?;

        debug!(path = %stored, size = bytes.len(), "Stored media file");
        Ok(stored)
    }

    /// Remove a stored file, a missing file counts as success
    pub async fn delete(&self, relative_path: &str) -> Result<()> {
        let stored = self.checked_relative(relative_path)?;
        let full_path = Path::new(&self.config.root).join(&stored);

        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(path = %stored, "Deleted media file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// URL prefix media files are served under
    pub fn url_prefix(&self) -> &str {
        &self.config.url_prefix
    }

    /// Public URL a stored file is served from
    pub fn media_url(&self, stored_path: &str) -> String {
        format!(
            "{}/{}",
            self.config.url_prefix,
            stored_path.trim_start_matches('/')
        )
    }

    /// Turn a media URL back into the relative storage path, if it is one of ours
    pub fn strip_media_prefix<'a>(&self, url: &'a str) -> Option<&'a str> {
        let prefix = self.config.url_prefix.trim_end_matches('/');
        let rest = url.strip_prefix(prefix)?;
        if !rest.starts_with('/') {
            return None;
        }
        let rest = rest.trim_start_matches('/');
        if rest.is_empty() {
            None
        } else {
            Some(rest)
        }
    }

    /// Normalize a relative path and refuse anything leaving the media root
    fn checked_relative(&self, raw: &str) -> Result<String> {
        let normalized = raw.replace('\\', "/");
        let trimmed = normalized.trim_start_matches('/');

        if trimmed.is_empty() {
            return Err(CampusBuddyError::InvalidInput(
                "Storage path must not be empty".to_string(),
            ));
        }
        for component in trimmed.split('/') {
            if component.is_empty() || component == "." || component == ".." {
                return Err(CampusBuddyError::InvalidInput(format!(
                    "Invalid storage path: {}",
                    raw
                )));
            }
        }

        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    fn storage_at(dir: &TempDir) -> StorageService {
        StorageService::new(MediaConfig {
            root: dir.path().to_string_lossy().to_string(),
            url_prefix: "/media".to_string(),
        })
    }

    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let storage = storage_at(&dir);

        let stored = storage.save("ugc/photos/pic.png", b"data").await.unwrap();
        assert_eq!(stored, "ugc/photos/pic.png");
        assert!(dir.path().join("ugc/photos/pic.png").exists());
    }

    #[tokio::test]
    async fn test_save_normalizes_separators() {
        let dir = TempDir::new().unwrap();
        let storage = storage_at(&dir);

        let stored = storage.save("ugc\\photos\\pic.png", b"data").await.unwrap();
        assert_eq!(stored, "ugc/photos/pic.png");
    }

    #[tokio::test]
    async fn test_delete_missing_file_is_success() {
        let dir = TempDir::new().unwrap();
        let storage = storage_at(&dir);

        storage.delete("ugc/photos/never-there.png").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_removes_stored_file() {
        let dir = TempDir::new().unwrap();
        let storage = storage_at(&dir);

        let stored = storage.save("ugc/photos/pic.png", b"data").await.unwrap();
        storage.delete(&stored).await.unwrap();
        assert!(!dir.path().join("ugc/photos/pic.png").exists());
    }

    #[tokio::test]
    async fn test_traversal_components_are_rejected() {
        let dir = TempDir::new().unwrap();
        let storage = storage_at(&dir);

        let err = storage.save("../outside.png", b"data").await.unwrap_err();
        assert_matches!(err, CampusBuddyError::InvalidInput(_));

        let err = storage.save("ugc/../../etc/passwd", b"data").await.unwrap_err();
        assert_matches!(err, CampusBuddyError::InvalidInput(_));

        let err = storage.delete("").await.unwrap_err();
        assert_matches!(err, CampusBuddyError::InvalidInput(_));
    }

    #[test]
    fn test_media_url_round_trips_through_strip() {
        let dir = TempDir::new().unwrap();
        let storage = storage_at(&dir);

        let url = storage.media_url("ugc/photos/pic.png");
        assert_eq!(url, "/media/ugc/photos/pic.png");
        assert_eq!(storage.strip_media_prefix(&url), Some("ugc/photos/pic.png"));
    }

    #[test]
    fn test_strip_media_prefix_requires_boundary() {
        let dir = TempDir::new().unwrap();
        let storage = storage_at(&dir);

        assert_eq!(storage.strip_media_prefix("/mediafoo/pic.png"), None);
        assert_eq!(storage.strip_media_prefix("/media"), None);
        assert_eq!(storage.strip_media_prefix("https://cdn.example.com/pic.png"), None);
    }
}
