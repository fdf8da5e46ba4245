//! Queue events reported to the `EventSink`.

use std::time::Duration;

use super::ids::JobId;
use super::state::JobState;

/// Why a job was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbandonReason {
    /// Still rate limited after `max_retries` retries.
    RetriesExhausted { attempts: u32 },

    /// Non-retryable failure (rejected payload or unclassified error).
    NonRetryable { error: String },
}

/// Something that happened to a job, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEvent {
    /// Accepted by `enqueue`.
    Enqueued { job_id: JobId },

    /// Back in the queue after its backoff window.
    Requeued { job_id: JobId, attempt: u32 },

    /// Checked out by the worker; the settle delay starts now.
    CheckedOut { job_id: JobId, attempt: u32 },

    Delivered { job_id: JobId, remote_id: String },

    RetryScheduled {
        job_id: JobId,
        attempt: u32,
        delay: Duration,
    },

    Abandoned { job_id: JobId, reason: AbandonReason },
}

impl QueueEvent {
    pub fn job_id(&self) -> JobId {
        match self {
            QueueEvent::Enqueued { job_id }
            | QueueEvent::Requeued { job_id, .. }
            | QueueEvent::CheckedOut { job_id, .. }
            | QueueEvent::Delivered { job_id, .. }
            | QueueEvent::RetryScheduled { job_id, .. }
            | QueueEvent::Abandoned { job_id, .. } => *job_id,
        }
    }

    /// State the job is in after this event.
    pub fn state(&self) -> JobState {
        match self {
            QueueEvent::Enqueued { .. } | QueueEvent::Requeued { .. } => JobState::Pending,
            QueueEvent::CheckedOut { .. } => JobState::InFlight,
            QueueEvent::Delivered { .. } => JobState::Delivered,
            QueueEvent::RetryScheduled { .. } => JobState::RetryScheduled,
            QueueEvent::Abandoned { .. } => JobState::Abandoned,
        }
    }
}
