//! Timer port - the queue's only way to wait.

use std::time::Duration;

use async_trait::async_trait;

/// Timer suspends the caller for a duration.
///
/// Both the settle delay and backoff windows go through this port. The
/// default `TokioTimer` is driven by tokio's clock, so tests run under
/// `start_paused = true` and never wait real minutes.
#[async_trait]
pub trait Timer: Send + Sync {
    async fn sleep(&self, duration: Duration);
}
