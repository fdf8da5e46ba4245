//! FsMediaStore - uploads persisted as files by the request layer.

use std::io::ErrorKind;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::MediaRef;
use crate::error::MediaError;
use crate::ports::MediaStore;

/// Deletes the uploaded file once its job is finished.
///
/// A file that is already gone counts as released.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMediaStore;

#[async_trait]
impl MediaStore for FsMediaStore {
    async fn release(&self, media: &MediaRef) -> Result<(), MediaError> {
        match tokio::fs::remove_file(&media.path).await {
            Ok(()) => {
                debug!(path = %media.path.display(), "media released");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(MediaError::Io {
                path: media.path.clone(),
                source,
            }),
        }
    }
}
