//! Publish jobs: what the caller submits and what the queue carries.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::JobId;

/// Reference to a media payload that the request layer already persisted.
///
/// The queue never reads the bytes itself; it hands the reference to the
/// `PublishClient` on every attempt and releases it through the
/// `MediaStore` once the job reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub path: PathBuf,
    pub media_type: String,
}

impl MediaRef {
    pub fn new(path: impl Into<PathBuf>, media_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            media_type: media_type.into(),
        }
    }
}

/// A publish request as accepted from the caller.
///
/// At least one of `text` / `media` should be present. The caller validates
/// that (see `is_empty`); the queue does not check it again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaRef>,
}

impl NewPost {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            media: None,
        }
    }

    pub fn media(media: MediaRef) -> Self {
        Self {
            text: None,
            media: Some(media),
        }
    }

    pub fn with_media(mut self, media: MediaRef) -> Self {
        self.media = Some(media);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.as_deref().is_none_or(str::is_empty) && self.media.is_none()
    }
}

/// One pending publish with its retry state.
///
/// Mutated only by `record_rate_limit`, which bumps `attempt` before the
/// job is put back behind its backoff window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    id: JobId,
    text: Option<String>,
    media: Option<MediaRef>,

    /// Number of failed delivery attempts so far (0 for a fresh job).
    attempt: u32,

    enqueued_at: DateTime<Utc>,
}

impl Job {
    pub fn new(id: JobId, post: NewPost, enqueued_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text: post.text,
            media: post.media,
            attempt: 0,
            enqueued_at,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn media(&self) -> Option<&MediaRef> {
        self.media.as_ref()
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn enqueued_at(&self) -> DateTime<Utc> {
        self.enqueued_at
    }

    /// Record a rate-limited attempt and return the new attempt count.
    pub fn record_rate_limit(&mut self) -> u32 {
        self.attempt = self.attempt.saturating_add(1);
        self.attempt
    }

    /// Give up ownership of the media reference (terminal outcomes only).
    pub fn take_media(&mut self) -> Option<MediaRef> {
        self.media.take()
    }
}
