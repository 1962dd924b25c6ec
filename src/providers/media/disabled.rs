use async_trait::async_trait;

use super::{MediaAsset, MediaStore, MediaUpload};
use crate::errors::internal::MediaError;

/// Stand-in used when no media host is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledMediaStore;

#[async_trait]
impl MediaStore for DisabledMediaStore {
    async fn upload(&self, upload: MediaUpload) -> Result<MediaAsset, MediaError> {
        tracing::warn!("Rejected upload of {}: media host not configured", upload.filename);
        Err(MediaError::NotConfigured)
    }

    async fn delete(&self, handle: &str) -> Result<(), MediaError> {
        tracing::warn!("Cannot delete media {}: media host not configured", handle);
        Err(MediaError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_operation_is_not_configured() {
        let store = DisabledMediaStore;
        let upload = MediaUpload {
            bytes: vec![1, 2, 3],
            filename: "photo.png".into(),
            content_type: Some("image/png".into()),
        };
        assert!(matches!(store.upload(upload).await, Err(MediaError::NotConfigured)));
        assert!(matches!(store.delete("students/x").await, Err(MediaError::NotConfigured)));
    }
}
