//! App - configuration, wiring and status of the publish queue.

pub mod builder;
pub mod config;
pub mod status;

pub use self::builder::{BuildError, QueueBuilder};
pub use self::config::QueueConfig;
pub use self::status::QueueStats;
