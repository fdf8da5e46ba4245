//! PublishClient port - the external posting API.

use async_trait::async_trait;

use crate::domain::Job;
use crate::error::PublishError;

/// Successful publish, carrying the id the remote API assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub id: String,
}

impl Delivered {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Uploads media (if any) and publishes one job.
///
/// Implementations classify failures into `PublishError`; the queue never
/// looks at anything else. The queue guarantees calls never overlap.
#[async_trait]
pub trait PublishClient: Send + Sync {
    async fn publish(&self, job: &Job) -> Result<Delivered, PublishError>;
}
