//! TokioTimer - production `Timer`.

use std::time::Duration;

use async_trait::async_trait;

use crate::ports::Timer;

/// Sleeps on tokio's clock (so paused-time tests drive it too).
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[async_trait]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
