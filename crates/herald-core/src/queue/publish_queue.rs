//! The publish queue and its single worker.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::backoff::{BackoffPolicy, RetryDecision};
use super::state::QueueState;
use crate::app::QueueStats;
use crate::domain::{AbandonReason, Job, JobId, NewPost, QueueEvent};
use crate::error::QueueError;
use crate::ports::{Clock, EventSink, IdGenerator, MediaStore, PublishClient, Timer};

/// Everything the queue needs from the outside, wired by `QueueBuilder`.
pub(crate) struct QueueParts {
    pub(crate) settle_delay: Duration,
    pub(crate) backoff: BackoffPolicy,
    pub(crate) client: Arc<dyn PublishClient>,
    pub(crate) timer: Arc<dyn Timer>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) ids: Arc<dyn IdGenerator>,
    pub(crate) media: Arc<dyn MediaStore>,
    pub(crate) events: Arc<dyn EventSink>,
}

/// State shared between the queue handle, the worker, and retry timers.
struct Shared {
    state: Mutex<QueueState>,

    /// Wakes the worker when a job lands in an empty queue.
    wake: Notify,

    /// Latest stats; `wait_idle` watches this.
    stats_tx: watch::Sender<QueueStats>,

    parts: QueueParts,
}

/// Delayed, rate-limit-aware publish queue.
///
/// Design:
/// - `enqueue` appends to the tail and returns at once (acceptance only).
/// - One worker task checks out the head job, waits the settle delay, then
///   calls the `PublishClient`. Publish calls therefore never overlap.
/// - A rate-limited job leaves the queue for its backoff window and rejoins
///   at the tail, behind anything enqueued meanwhile.
/// - Publish errors never reach the caller; they are logged and reported to
///   the `EventSink`.
///
/// Share it between request handlers with `Arc<PublishQueue>`. Dropping the
/// last handle stops the worker; pending jobs are lost either way.
pub struct PublishQueue {
    shared: Arc<Shared>,
    shutdown_tx: watch::Sender<bool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl PublishQueue {
    /// Spawn the worker. Must run inside a tokio runtime.
    pub(crate) fn start(parts: QueueParts) -> Self {
        let (stats_tx, _) = watch::channel(QueueStats::default());
        let shared = Arc::new(Shared {
            state: Mutex::new(QueueState::default()),
            wake: Notify::new(),
            stats_tx,
            parts,
        });

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let worker = tokio::spawn(run_worker(Arc::clone(&shared), shutdown_rx));

        Self {
            shared,
            shutdown_tx,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Accept a post for eventual delivery.
    ///
    /// Only fails once the queue has been shut down.
    pub async fn enqueue(&self, post: NewPost) -> Result<JobId, QueueError> {
        let parts = &self.shared.parts;
        let job = Job::new(parts.ids.generate_job_id(), post, parts.clock.now());
        let job_id = job.id();

        let queue_len = self
            .shared
            .update(|state| {
                if state.is_closed() {
                    return Err(QueueError::Closed);
                }
                state.push_back(job);
                parts.events.emit(QueueEvent::Enqueued { job_id });
                Ok(state.len())
            })
            .await?;

        info!(%job_id, queue_len, "publish job enqueued");
        self.shared.wake.notify_one();
        Ok(job_id)
    }

    pub fn stats(&self) -> QueueStats {
        *self.shared.stats_tx.borrow()
    }

    /// Resolve once nothing is pending, in flight, or waiting out a backoff.
    pub async fn wait_idle(&self) {
        let mut rx = self.shared.stats_tx.subscribe();
        // the sender lives in `shared`, so this cannot observe a closed channel
        let _ = rx.wait_for(QueueStats::is_idle).await;
    }

    /// Stop the worker and drop every pending or backing-off job.
    ///
    /// A publish call already in progress is allowed to finish.
    pub async fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
        let dropped = self.shared.update(QueueState::close).await;

        if let Some(worker) = self.worker.lock().await.take()
            && let Err(err) = worker.await
        {
            error!(error = %err, "publish worker panicked");
        }
        info!(dropped, "publish queue shut down");
    }

    #[cfg(test)]
    async fn is_draining(&self) -> bool {
        self.shared.state.lock().await.is_draining()
    }
}

impl Shared {
    /// Mutate state under the lock and publish fresh stats.
    async fn update<R>(&self, f: impl FnOnce(&mut QueueState) -> R) -> R {
        let mut state = self.state.lock().await;
        let out = f(&mut *state);
        self.stats_tx.send_replace(state.stats());
        out
    }

    async fn check_out(&self) -> Option<Job> {
        self.update(|state| {
            let job = state.drain_once()?;
            self.parts.events.emit(QueueEvent::CheckedOut {
                job_id: job.id(),
                attempt: job.attempt(),
            });
            Some(job)
        })
        .await
    }

    /// Run one attempt and settle its outcome.
    async fn process_job(self: &Arc<Self>, mut job: Job, shutdown_rx: &watch::Receiver<bool>) {
        let job_id = job.id();
        debug!(%job_id, attempt = job.attempt(), "publishing job");

        match self.parts.client.publish(&job).await {
            Ok(delivered) => {
                let queued_for = self.parts.clock.now() - job.enqueued_at();
                info!(
                    %job_id,
                    remote_id = %delivered.id,
                    attempt = job.attempt(),
                    queued_ms = queued_for.num_milliseconds(),
                    "job delivered"
                );
                self.release_media(&mut job).await;
                self.update(|state| {
                    state.record_delivered();
                    self.parts.events.emit(QueueEvent::Delivered {
                        job_id,
                        remote_id: delivered.id,
                    });
                })
                .await;
            }
            Err(err) if err.is_retryable() => {
                let attempt = job.record_rate_limit();
                match self.parts.backoff.decide(attempt) {
                    RetryDecision::Retry(delay) => {
                        // a publish that outlived shutdown must not leave a retry behind
                        let scheduled = self
                            .update(|state| {
                                if state.is_closed() {
                                    return false;
                                }
                                state.retry_started();
                                self.parts.events.emit(QueueEvent::RetryScheduled {
                                    job_id,
                                    attempt,
                                    delay,
                                });
                                true
                            })
                            .await;
                        if scheduled {
                            warn!(%job_id, attempt, ?delay, "rate limited, retry scheduled");
                            self.schedule_retry(job, delay, shutdown_rx.clone());
                        } else {
                            info!(%job_id, attempt, "rate limited after shutdown, job dropped");
                        }
                    }
                    RetryDecision::GiveUp => {
                        self.abandon(job, AbandonReason::RetriesExhausted { attempts: attempt })
                            .await;
                    }
                }
            }
            Err(err) => {
                self.abandon(
                    job,
                    AbandonReason::NonRetryable {
                        error: err.to_string(),
                    },
                )
                .await;
            }
        }
    }

    /// Put `job` back at the tail once `delay` has elapsed.
    fn schedule_retry(
        self: &Arc<Self>,
        job: Job,
        delay: Duration,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        let shared = Arc::clone(self);
        tokio::spawn(async move {
            if *shutdown_rx.borrow_and_update() {
                return;
            }
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    debug!(job_id = %job.id(), "retry dropped on shutdown");
                }
                _ = shared.parts.timer.sleep(delay) => {
                    shared.requeue(job).await;
                }
            }
        });
    }

    async fn requeue(&self, job: Job) {
        let job_id = job.id();
        let attempt = job.attempt();
        let requeued = self
            .update(|state| {
                if state.is_closed() {
                    return false;
                }
                state.retry_finished();
                state.push_back(job);
                self.parts.events.emit(QueueEvent::Requeued { job_id, attempt });
                true
            })
            .await;

        if requeued {
            debug!(%job_id, attempt, "job back in queue after backoff");
            self.wake.notify_one();
        }
    }

    async fn abandon(&self, mut job: Job, reason: AbandonReason) {
        let job_id = job.id();
        match &reason {
            AbandonReason::RetriesExhausted { attempts } => {
                error!(%job_id, attempts, "job abandoned: still rate limited after retries");
            }
            AbandonReason::NonRetryable { error } => {
                error!(%job_id, error = %error, "job abandoned: non-retryable failure");
            }
        }

        self.release_media(&mut job).await;
        self.update(|state| {
            state.record_abandoned();
            self.parts
                .events
                .emit(QueueEvent::Abandoned { job_id, reason });
        })
        .await;
    }

    /// Release the job's media, if any. Only called on terminal outcomes.
    async fn release_media(&self, job: &mut Job) {
        let job_id = job.id();
        if let Some(media) = job.take_media()
            && let Err(err) = self.parts.media.release(&media).await
        {
            warn!(%job_id, error = %err, "failed to release media");
        }
    }
}

/// The drain loop: check out, settle, publish, repeat; park when empty.
async fn run_worker(shared: Arc<Shared>, mut shutdown_rx: watch::Receiver<bool>) {
    debug!("publish worker started");
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let Some(job) = shared.check_out().await else {
            tokio::select! {
                changed = shutdown_rx.changed() => {
                    // sender gone means the queue handle was dropped
                    if changed.is_err() {
                        break;
                    }
                }
                _ = shared.wake.notified() => {}
            }
            continue;
        };

        tokio::select! {
            _ = shutdown_rx.changed() => break,
            _ = shared.parts.timer.sleep(shared.parts.settle_delay) => {}
        }

        shared.process_job(job, &shutdown_rx).await;
    }
    debug!("publish worker stopped");
}
