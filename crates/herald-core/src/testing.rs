//! Test doubles for the queue's ports.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{Job, JobId, JobState, MediaRef, QueueEvent};
use crate::error::{MediaError, PublishError};
use crate::ports::{Delivered, EventSink, MediaStore, PublishClient, Timer};

/// What the client saw on one `publish` call.
#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub text: Option<String>,
    pub media: Option<MediaRef>,
    pub attempt: u32,
}

/// Client answering from per-text scripts.
///
/// Unscripted calls (or exhausted scripts) succeed with the call number as
/// remote id, so the first successful call returns `Delivered { id: "1" }`
/// when nothing was scripted.
#[derive(Default)]
pub(crate) struct ScriptedClient {
    scripts: Mutex<HashMap<String, VecDeque<Result<Delivered, PublishError>>>>,
    calls: Mutex<Vec<Call>>,
    latency: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, text: &str, responses: Vec<Result<Delivered, PublishError>>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(text.to_string(), responses.into());
        self
    }

    /// Make every call take `latency` (tokio time).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|c| c.text.unwrap_or_default())
            .collect()
    }

    pub fn max_concurrent_calls(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PublishClient for ScriptedClient {
    async fn publish(&self, job: &Job) -> Result<Delivered, PublishError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let call_number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Call {
                text: job.text().map(str::to_string),
                media: job.media().cloned(),
                attempt: job.attempt(),
            });
            calls.len()
        };

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let scripted = job.text().and_then(|text| {
            self.scripts
                .lock()
                .unwrap()
                .get_mut(text)
                .and_then(VecDeque::pop_front)
        });

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        scripted.unwrap_or_else(|| Ok(Delivered::new(call_number.to_string())))
    }
}

/// Tokio timer that remembers every requested duration.
#[derive(Default)]
pub(crate) struct RecordingTimer {
    recorded: Mutex<Vec<Duration>>,
}

impl RecordingTimer {
    pub fn recorded(&self) -> Vec<Duration> {
        self.recorded.lock().unwrap().clone()
    }
}

#[async_trait]
impl Timer for RecordingTimer {
    async fn sleep(&self, duration: Duration) {
        self.recorded.lock().unwrap().push(duration);
        tokio::time::sleep(duration).await;
    }
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<QueueEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<QueueEvent> {
        self.events.lock().unwrap().clone()
    }

    /// States `job_id` went through, in order.
    pub fn states_of(&self, job_id: JobId) -> Vec<JobState> {
        self.events()
            .iter()
            .filter(|e| e.job_id() == job_id)
            .map(QueueEvent::state)
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: QueueEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[derive(Default)]
pub(crate) struct CountingMediaStore {
    released: Mutex<Vec<MediaRef>>,
}

impl CountingMediaStore {
    pub fn released(&self) -> Vec<MediaRef> {
        self.released.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStore for CountingMediaStore {
    async fn release(&self, media: &MediaRef) -> Result<(), MediaError> {
        self.released.lock().unwrap().push(media.clone());
        Ok(())
    }
}
