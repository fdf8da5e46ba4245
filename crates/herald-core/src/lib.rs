//! herald-core
//!
//! Delayed, rate-limit-aware publish queue.
//!
//! Posts are accepted immediately and published one at a time, each after a
//! settle delay. Rate-limited posts come back after an exponential backoff;
//! everything else that fails is dropped and logged.
//!
//! # Modules
//! - **domain**: jobs, ids, job states, queue events
//! - **ports**: traits for every collaborator (PublishClient, Timer, Clock, ...)
//! - **queue**: BackoffPolicy and PublishQueue (the drain loop)
//! - **app**: QueueBuilder, QueueConfig, QueueStats
//! - **impls**: TokioTimer, FsMediaStore, DryRunClient

pub mod app;
pub mod domain;
pub mod error;
pub mod impls;
pub mod ports;
pub mod queue;

#[cfg(test)]
mod testing;

pub use app::{QueueBuilder, QueueConfig, QueueStats};
pub use domain::{Job, JobId, MediaRef, NewPost};
pub use error::{PublishError, QueueError};
pub use queue::{BackoffPolicy, PublishQueue};
