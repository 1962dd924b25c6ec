//! Remote media host adapter
//!
//! Student photos live on a third-party host. Records only keep the public URL and
//! the opaque handle needed to delete the asset later.

mod cloudinary;
mod disabled;
mod lease;

pub use cloudinary::CloudinaryMediaStore;
pub use disabled::DisabledMediaStore;
pub use lease::{MediaLease, delete_detached};

use async_trait::async_trait;

use crate::errors::internal::MediaError;

/// A stored asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAsset {
    /// Publicly reachable URL
    pub url: String,
    /// Opaque identifier used to delete the asset
    pub handle: String,
}

/// Binary payload of an uploaded file
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: Option<String>,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, upload: MediaUpload) -> Result<MediaAsset, MediaError>;

    /// Remove an asset; deleting an asset the host no longer knows is not an error
    async fn delete(&self, handle: &str) -> Result<(), MediaError>;
}
