use std::sync::Arc;

use super::{MediaAsset, MediaStore, MediaUpload};
use crate::errors::internal::MediaError;

/// An uploaded asset that is deleted again unless the workflow commits it
///
/// `release` performs the compensating delete inline. An armed lease that is dropped
/// (early return, panic, cancelled request) schedules the delete on the current tokio
/// runtime instead.
pub struct MediaLease {
    store: Arc<dyn MediaStore>,
    asset: MediaAsset,
    armed: bool,
}

impl MediaLease {
    /// Upload `upload` and hold the resulting asset
    pub async fn acquire(store: Arc<dyn MediaStore>, upload: MediaUpload) -> Result<Self, MediaError> {
        let asset = store.upload(upload).await?;
        Ok(Self {
            store,
            asset,
            armed: true,
        })
    }

    pub fn asset(&self) -> &MediaAsset {
        &self.asset
    }

    /// Keep the asset; it now belongs to a persisted record
    pub fn commit(mut self) -> MediaAsset {
        self.armed = false;
        self.asset.clone()
    }

    /// Delete the asset now; failures are logged since the workflow is already failing
    ///
    /// The delete runs on its own task, so cancelling the caller does not abandon it.
    pub async fn release(mut self) {
        self.armed = false;
        let handle = self.asset.handle.clone();
        match delete_detached(Arc::clone(&self.store), handle.clone()).await {
            Ok(()) => tracing::warn!("Rolled back uploaded media {}", handle),
            Err(e) => tracing::error!("Compensating delete of media {} failed: {}", handle, e),
        }
    }
}

/// Delete `handle` on a spawned task and wait for it
///
/// Dropping the returned future leaves the delete running to completion.
pub async fn delete_detached(store: Arc<dyn MediaStore>, handle: String) -> Result<(), MediaError> {
    let task_handle = handle.clone();
    tokio::spawn(async move { store.delete(&task_handle).await })
        .await
        .map_err(|e| MediaError::Delete {
            handle,
            message: format!("delete task failed: {}", e),
        })?
}

impl Drop for MediaLease {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let store = Arc::clone(&self.store);
        let handle = self.asset.handle.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    match store.delete(&handle).await {
                        Ok(()) => tracing::warn!("Rolled back abandoned media {}", handle),
                        Err(e) => {
                            tracing::error!("Delete of abandoned media {} failed: {}", handle, e)
                        }
                    }
                });
            }
            Err(_) => {
                tracing::error!("Media {} abandoned outside a runtime; not deleted", handle);
            }
        }
    }
}
