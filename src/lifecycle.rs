//! Attachment storage lifecycle.
//!
//! An uploaded attachment occupies transient storage until its request
//! finishes. The guard here owns that storage and guarantees it is released
//! exactly once on every exit path: success, normalization failure, provider
//! failure, or cancellation of the in-flight future.

use std::path::PathBuf;

use crate::types::{Attachment, AttachmentSource};

/// Owning handle for an attachment's transient storage.
///
/// `release` is idempotent; the first call (or `Drop`, if the request future
/// is cancelled before an explicit release) deletes the backing file.
/// Deletion failures are logged and never surfaced as the request outcome.
#[derive(Debug)]
pub struct AttachmentGuard {
    path: Option<PathBuf>,
}

impl AttachmentGuard {
    /// Take ownership of the attachment's storage. Base64 blobs have no
    /// backing file, so their guard releases nothing.
    pub fn acquire(attachment: &Attachment) -> Self {
        let path = match &attachment.source {
            AttachmentSource::UploadedFile { path, .. } => Some(path.clone()),
            AttachmentSource::Base64Blob { .. } => None,
        };
        Self { path }
    }

    /// Delete the backing storage. Calling this twice is a no-op.
    pub async fn release(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(err) = tokio::fs::remove_file(&path).await {
                tracing::warn!(path = %path.display(), error = %err, "attachment cleanup failed");
            }
        }
    }

    /// True once the storage has been released (or there was none to begin with).
    pub fn is_released(&self) -> bool {
        self.path.is_none()
    }
}

impl Drop for AttachmentGuard {
    fn drop(&mut self) {
        // Cancellation path: the request future was dropped before an
        // explicit release. Blocking removal keeps the exactly-once
        // guarantee without requiring a runtime handle.
        if let Some(path) = self.path.take() {
            if let Err(err) = std::fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %err, "attachment cleanup failed on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_upload() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"payload").unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn release_deletes_the_backing_file() {
        let (_dir, path) = temp_upload();
        let attachment = Attachment::uploaded_file(&path, "upload.txt", "text/plain", 7);
        let mut guard = AttachmentGuard::acquire(&attachment);
        assert!(!guard.is_released());

        guard.release().await;
        assert!(guard.is_released());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn double_release_is_a_noop() {
        let (_dir, path) = temp_upload();
        let attachment = Attachment::uploaded_file(&path, "upload.txt", "text/plain", 7);
        let mut guard = AttachmentGuard::acquire(&attachment);
        guard.release().await;
        guard.release().await;
        assert!(guard.is_released());
    }

    #[tokio::test]
    async fn release_of_missing_file_does_not_panic() {
        let (_dir, path) = temp_upload();
        std::fs::remove_file(&path).unwrap();
        let attachment = Attachment::uploaded_file(&path, "upload.txt", "text/plain", 7);
        let mut guard = AttachmentGuard::acquire(&attachment);
        guard.release().await;
        assert!(guard.is_released());
    }

    #[test]
    fn drop_without_release_deletes_the_file() {
        let (_dir, path) = temp_upload();
        let attachment = Attachment::uploaded_file(&path, "upload.txt", "text/plain", 7);
        {
            let _guard = AttachmentGuard::acquire(&attachment);
        }
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn blob_guard_has_nothing_to_release() {
        let attachment = Attachment::base64_blob("aGVsbG8=");
        let mut guard = AttachmentGuard::acquire(&attachment);
        assert!(guard.is_released());
        guard.release().await;
    }
}
