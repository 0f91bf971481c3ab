/// Disk-backed storage for uploaded piece images
///
/// Files land in the uploads directory and are served statically under
/// `/uploads`. Names are collision-avoiding: millisecond timestamp plus a
/// random suffix, keeping the original extension.
use crate::error::{StoreError, StoreResult};
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Extensions accepted for piece images
const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif", "webp"];

/// Declared content types accepted for piece images
const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Upload store
#[derive(Clone)]
pub struct UploadStore {
    directory: PathBuf,
    /// Per-file size cap in bytes
    limit: usize,
}

impl UploadStore {
    pub fn new(directory: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            directory: directory.into(),
            limit,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Validate and persist one uploaded file, returning the stored name
    pub async fn save(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> StoreResult<String> {
        if bytes.is_empty() {
            return Err(StoreError::Validation(format!(
                "File '{}' is empty",
                original_name
            )));
        }
        if bytes.len() > self.limit {
            return Err(StoreError::Validation(format!(
                "File '{}' exceeds the {} byte limit",
                original_name, self.limit
            )));
        }

        let extension = extension_of(original_name).ok_or_else(|| {
            StoreError::Validation(format!(
                "File '{}' has no accepted image extension",
                original_name
            ))
        })?;

        if let Some(content_type) = content_type {
            if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
                return Err(StoreError::Validation(format!(
                    "Content type '{}' is not an accepted image type",
                    content_type
                )));
            }
        }

        // The extension and declared type are caller-controlled; the bytes
        // must actually decode as an image before they reach the disk.
        image::load_from_memory(bytes).map_err(|_| {
            StoreError::Validation(format!("File '{}' is not a valid image", original_name))
        })?;

        let stored_name = format!(
            "{}-{}.{}",
            Utc::now().timestamp_millis(),
            rand::random::<u32>(),
            extension
        );
        tokio::fs::write(self.directory.join(&stored_name), bytes).await?;

        Ok(stored_name)
    }

    /// Public URL for a stored file
    pub fn public_url(&self, stored_name: &str) -> String {
        format!("/uploads/{}", stored_name)
    }
}

fn extension_of(name: &str) -> Option<String> {
    let extension = name.rsplit_once('.')?.1.to_ascii_lowercase();
    ALLOWED_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest well-formed PNG: 1x1, one opaque pixel.
    fn tiny_png() -> Vec<u8> {
        let mut bytes = Vec::new();
        let mut encoder = image::codecs::png::PngEncoder::new(&mut bytes);
        use image::ImageEncoder;
        encoder
            .write_image(&[0u8, 0, 0, 255], 1, 1, image::ExtendedColorType::Rgba8)
            .unwrap();
        bytes
    }

    fn test_store(dir: &Path) -> UploadStore {
        UploadStore::new(dir, 5 * 1024 * 1024)
    }

    #[tokio::test]
    async fn save_writes_the_file_and_keeps_the_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        let name = store
            .save("vestido.png", Some("image/png"), &tiny_png())
            .await
            .unwrap();
        assert!(name.ends_with(".png"));
        assert!(dir.path().join(&name).exists());
        assert_eq!(store.public_url(&name), format!("/uploads/{}", name));
    }

    #[tokio::test]
    async fn stored_names_differ_across_calls() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());
        let png = tiny_png();

        let first = store.save("a.png", None, &png).await.unwrap();
        let second = store.save("a.png", None, &png).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn disallowed_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        let err = store
            .save("payload.svg", None, &tiny_png())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let err = store.save("noextension", None, &tiny_png()).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn disallowed_content_type_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        let err = store
            .save("a.png", Some("application/octet-stream"), &tiny_png())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn bytes_that_are_not_an_image_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        let err = store
            .save("fake.png", Some("image/png"), b"<script>alert(1)</script>")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn empty_and_oversized_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path(), 16);

        let err = store.save("a.png", None, &[]).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let err = store.save("a.png", None, &tiny_png()).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }
}
