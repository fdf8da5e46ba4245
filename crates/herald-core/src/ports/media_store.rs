//! MediaStore port - lifetime of persisted uploads.

use async_trait::async_trait;

use crate::domain::MediaRef;
use crate::error::MediaError;

/// Releases a media payload once its job is finished.
///
/// Called exactly once per job that carries media, on delivery or
/// abandonment. Never called between retries of the same job.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn release(&self, media: &MediaRef) -> Result<(), MediaError>;
}
