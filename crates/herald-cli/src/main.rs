//! herald - feed posts from stdin through the publish queue.
//!
//! Reads one JSON object per line, enqueues it, waits until every post is
//! delivered or abandoned, then prints the final stats as JSON.
//!
//! ```bash
//! printf '{"text":"hello"}\n{"text":"pic","media":{"path":"/tmp/a.png","media_type":"image/png"}}\n' \
//!   | HERALD_SETTLE_DELAY_MS=500 HERALD_SIMULATED_RATE_LIMITS=2 herald-cli
//! ```
//!
//! ## Environment Variables
//!
//! - `HERALD_SETTLE_DELAY_MS`, `HERALD_BACKOFF_BASE_MS`, `HERALD_BACKOFF_MAX_MS`,
//!   `HERALD_MAX_RETRIES`: queue tuning (see `QueueConfig::from_env`)
//! - `HERALD_SIMULATED_RATE_LIMITS`: rate-limit responses the dry-run client
//!   returns before it starts succeeding (default 0)
//! - `HERALD_LOG_FORMAT`: `pretty` (default) or `json`
//! - `RUST_LOG`: log filter (default "info")

use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::{Context, bail};
use async_trait::async_trait;
use herald_core::impls::DryRunClient;
use herald_core::ports::{Delivered, PublishClient};
use herald_core::{Job, NewPost, PublishError, QueueBuilder, QueueConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Json,
    Pretty,
}

/// Dry-run client that answers "rate limited" a fixed number of times first,
/// to exercise the backoff path without a real API.
struct FlakyClient {
    inner: DryRunClient,
    remaining_rate_limits: AtomicU32,
}

impl FlakyClient {
    fn new(rate_limits: u32) -> Self {
        Self {
            inner: DryRunClient::new(),
            remaining_rate_limits: AtomicU32::new(rate_limits),
        }
    }
}

#[async_trait]
impl PublishClient for FlakyClient {
    async fn publish(&self, job: &Job) -> Result<Delivered, PublishError> {
        let limited = self
            .remaining_rate_limits
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |left| left.checked_sub(1))
            .is_ok();
        if limited {
            return Err(PublishError::RateLimited);
        }
        self.inner.publish(job).await
    }
}

fn log_format() -> anyhow::Result<LogFormat> {
    match env::var("HERALD_LOG_FORMAT") {
        Err(_) => Ok(LogFormat::Pretty),
        Ok(value) => match value.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => bail!("invalid HERALD_LOG_FORMAT: {other} (expected 'json' or 'pretty')"),
        },
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    // stdout is reserved for the final stats
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

/// Request-layer checks the queue itself does not repeat.
async fn validate(post: &NewPost) -> anyhow::Result<()> {
    if post.is_empty() {
        bail!("post has neither text nor media");
    }
    if let Some(media) = &post.media {
        tokio::fs::metadata(&media.path)
            .await
            .with_context(|| format!("media not readable: {}", media.path.display()))?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(log_format()?);

    let config = QueueConfig::from_env()?;
    let rate_limits: u32 = match env::var("HERALD_SIMULATED_RATE_LIMITS") {
        Ok(v) => v
            .trim()
            .parse()
            .with_context(|| format!("invalid HERALD_SIMULATED_RATE_LIMITS: {v:?}"))?,
        Err(_) => 0,
    };
    info!(
        settle_delay_ms = config.settle_delay.as_millis() as u64,
        backoff_base_ms = config.backoff.base_delay.as_millis() as u64,
        max_retries = config.backoff.max_retries,
        rate_limits,
        "starting herald"
    );

    let queue = QueueBuilder::new()
        .config(config)
        .client(Arc::new(FlakyClient::new(rate_limits)))
        .start()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no = 0usize;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let post: NewPost = match serde_json::from_str(line) {
            Ok(post) => post,
            Err(err) => {
                warn!(line_no, error = %err, "skipping malformed line");
                continue;
            }
        };
        if let Err(err) = validate(&post).await {
            warn!(line_no, error = %err, "skipping invalid post");
            continue;
        }

        let job_id = queue.enqueue(post).await?;
        info!(line_no, %job_id, "accepted");
    }

    tokio::select! {
        _ = queue.wait_idle() => {}
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted; pending posts are dropped");
        }
    }

    let stats = queue.stats();
    queue.shutdown().await;
    println!("{}", serde_json::to_string(&stats)?);
    Ok(())
}
