//! Queue module: backoff policy, queue state, and the publish queue itself.

mod backoff;
mod publish_queue;
mod state;

pub use backoff::{BackoffPolicy, RetryDecision};
pub use publish_queue::PublishQueue;
pub(crate) use publish_queue::QueueParts;
