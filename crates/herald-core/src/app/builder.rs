//! QueueBuilder - wiring ports into a running `PublishQueue`.
//!
//! Only the publish client is mandatory; every other port has a production
//! default. `start()` fails fast instead of spawning a worker with nothing
//! to publish through.

use std::sync::Arc;

use crate::app::QueueConfig;
use crate::impls::{FsMediaStore, TokioTimer};
use crate::ports::{
    Clock, EventSink, IdGenerator, MediaStore, NoopEventSink, PublishClient, SystemClock, Timer,
    UlidGenerator,
};
use crate::queue::{PublishQueue, QueueParts};

/// Builds a `PublishQueue`.
///
/// # Example
/// ```ignore
/// let queue = QueueBuilder::new()
///     .config(QueueConfig::from_env()?)
///     .client(Arc::new(MyApiClient::new(token)))
///     .start()?;
/// ```
pub struct QueueBuilder {
    config: QueueConfig,
    client: Option<Arc<dyn PublishClient>>,
    timer: Arc<dyn Timer>,
    clock: Arc<dyn Clock>,
    ids: Option<Arc<dyn IdGenerator>>,
    media: Arc<dyn MediaStore>,
    events: Arc<dyn EventSink>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no publish client configured; call QueueBuilder::client() before start()")]
    MissingClient,
}

impl QueueBuilder {
    pub fn new() -> Self {
        Self {
            config: QueueConfig::default(),
            client: None,
            timer: Arc::new(TokioTimer),
            clock: Arc::new(SystemClock),
            ids: None,
            media: Arc::new(FsMediaStore),
            events: Arc::new(NoopEventSink),
        }
    }

    pub fn config(mut self, config: QueueConfig) -> Self {
        self.config = config;
        self
    }

    pub fn client(mut self, client: Arc<dyn PublishClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn timer(mut self, timer: Arc<dyn Timer>) -> Self {
        self.timer = timer;
        self
    }

    /// Clock for job timestamps. Also feeds the default id generator.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn media_store(mut self, media: Arc<dyn MediaStore>) -> Self {
        self.media = media;
        self
    }

    pub fn event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Spawn the worker and hand back the queue. Needs a tokio runtime.
    pub fn start(self) -> Result<PublishQueue, BuildError> {
        let client = self.client.ok_or(BuildError::MissingClient)?;
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(Arc::clone(&self.clock))));

        Ok(PublishQueue::start(QueueParts {
            settle_delay: self.config.settle_delay,
            backoff: self.config.backoff,
            client,
            timer: self.timer,
            clock: self.clock,
            ids,
            media: self.media,
            events: self.events,
        }))
    }
}

impl Default for QueueBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewPost;
    use crate::ports::FixedClock;
    use crate::testing::ScriptedClient;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn start_without_client_fails() {
        let result = QueueBuilder::new().start();
        assert!(matches!(result, Err(BuildError::MissingClient)));
    }

    #[tokio::test]
    async fn default_ids_follow_the_configured_clock() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let queue = QueueBuilder::new()
            .client(Arc::new(ScriptedClient::new()))
            .clock(Arc::new(FixedClock::new(at)))
            .start()
            .unwrap();

        let job_id = queue.enqueue(NewPost::text("hi")).await.unwrap();
        assert_eq!(job_id.as_ulid().timestamp_ms(), at.timestamp_millis() as u64);

        queue.shutdown().await;
    }
}
