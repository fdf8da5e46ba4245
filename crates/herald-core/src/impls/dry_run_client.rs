//! DryRunClient - a `PublishClient` that only logs.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::info;

use crate::domain::Job;
use crate::error::PublishError;
use crate::ports::{Delivered, PublishClient};

/// Logs each post instead of sending it and always succeeds.
///
/// Remote ids are `dry-run-1`, `dry-run-2`, ...
#[derive(Debug, Default)]
pub struct DryRunClient {
    published: AtomicU64,
}

impl DryRunClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PublishClient for DryRunClient {
    async fn publish(&self, job: &Job) -> Result<Delivered, PublishError> {
        let n = self.published.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            job_id = %job.id(),
            text = job.text().unwrap_or_default(),
            media = ?job.media().map(|m| &m.path),
            media_type = job.media().map(|m| m.media_type.as_str()).unwrap_or_default(),
            "dry run: would publish"
        );
        Ok(Delivered::new(format!("dry-run-{n}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{JobId, NewPost};
    use chrono::Utc;
    use ulid::Ulid;

    #[tokio::test]
    async fn numbers_remote_ids() {
        let client = DryRunClient::new();
        let job = Job::new(JobId::from_ulid(Ulid::new()), NewPost::text("hi"), Utc::now());

        assert_eq!(client.publish(&job).await.unwrap().id, "dry-run-1");
        assert_eq!(client.publish(&job).await.unwrap().id, "dry-run-2");
    }
}
