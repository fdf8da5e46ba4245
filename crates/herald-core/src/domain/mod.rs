//! Domain model (ids, jobs, states, events).

pub mod events;
pub mod ids;
pub mod job;
pub mod state;

pub use events::{AbandonReason, QueueEvent};
pub use ids::JobId;
pub use job::{Job, MediaRef, NewPost};
pub use state::JobState;
