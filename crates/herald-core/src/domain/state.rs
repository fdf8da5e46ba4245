//! Job state machine.

use serde::{Deserialize, Serialize};

/// Lifecycle of a single job.
///
/// State transitions:
/// - Pending -> InFlight -> Delivered
/// - Pending -> InFlight -> RetryScheduled -> Pending (rate limited, budget left)
/// - Pending -> InFlight -> Abandoned (rejected, or retry budget exhausted)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Waiting in the queue.
    Pending,

    /// Checked out by the worker (settle delay or publish call).
    InFlight,

    /// Waiting out a backoff window before rejoining the queue.
    RetryScheduled,

    /// Published successfully.
    Delivered,

    /// Dropped for good.
    Abandoned,
}

impl JobState {
    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Delivered | JobState::Abandoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(JobState::Pending, false)]
    #[case(JobState::InFlight, false)]
    #[case(JobState::RetryScheduled, false)]
    #[case(JobState::Delivered, true)]
    #[case(JobState::Abandoned, true)]
    fn terminal_states(#[case] state: JobState, #[case] terminal: bool) {
        assert_eq!(state.is_terminal(), terminal);
    }

    #[test]
    fn serializes_as_snake_case() {
        let s = serde_json::to_string(&JobState::RetryScheduled).unwrap();
        assert_eq!(s, "\"retry_scheduled\"");
    }
}
