use std::path::PathBuf;

use thiserror::Error;

/// Classified failure returned by a `PublishClient`.
///
/// The queue only looks at the classification, never at transport details:
/// - `RateLimited` is retried with backoff (bounded by `max_retries`).
/// - everything else is terminal after a single attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    #[error("rate limited by the remote API")]
    RateLimited,

    #[error("rejected by the remote API: {reason}")]
    Rejected { reason: String },

    /// Unclassified failure (network, decode, unexpected status, ...).
    #[error("transport error: {0}")]
    Transport(String),
}

impl PublishError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// Only rate-limit responses are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PublishError::RateLimited)
    }
}

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("publish queue is shut down")]
    Closed,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to release media at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::rate_limited(PublishError::RateLimited, true)]
    #[case::rejected(PublishError::rejected("too long"), false)]
    #[case::transport(PublishError::Transport("connection reset".into()), false)]
    fn only_rate_limits_are_retryable(#[case] err: PublishError, #[case] retryable: bool) {
        assert_eq!(err.is_retryable(), retryable);
    }

    #[test]
    fn rejected_message_includes_reason() {
        let err = PublishError::rejected("duplicate status");
        assert!(err.to_string().contains("duplicate status"));
    }
}
