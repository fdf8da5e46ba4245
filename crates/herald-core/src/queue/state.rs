//! Queue state: the FIFO of pending jobs plus bookkeeping for stats.

use std::collections::VecDeque;

use crate::app::QueueStats;
use crate::domain::Job;

/// Mutable queue state. Always accessed under the queue's lock.
///
/// Design:
/// - `pending` holds jobs eligible to run, in service order.
/// - A job checked out by the worker is *not* in `pending`; `draining` is
///   true while it is out (settle delay + publish call).
/// - Jobs waiting out a backoff window live in a timer task, only counted here.
#[derive(Debug, Default)]
pub(crate) struct QueueState {
    pending: VecDeque<Job>,
    draining: bool,
    retry_scheduled: usize,
    delivered: u64,
    abandoned: u64,
    closed: bool,
}

impl QueueState {
    /// Append a job at the tail (new jobs and re-queued retries alike).
    pub(crate) fn push_back(&mut self, job: Job) {
        self.pending.push_back(job);
    }

    /// Check out the head job for the worker.
    ///
    /// On an empty queue this only clears `draining`, so it is safe to call
    /// any number of times.
    pub(crate) fn drain_once(&mut self) -> Option<Job> {
        match self.pending.pop_front() {
            Some(job) => {
                self.draining = true;
                Some(job)
            }
            None => {
                self.draining = false;
                None
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn is_draining(&self) -> bool {
        self.draining
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn retry_started(&mut self) {
        self.retry_scheduled += 1;
    }

    pub(crate) fn retry_finished(&mut self) {
        self.retry_scheduled = self.retry_scheduled.saturating_sub(1);
    }

    pub(crate) fn record_delivered(&mut self) {
        self.delivered += 1;
    }

    pub(crate) fn record_abandoned(&mut self) {
        self.abandoned += 1;
    }

    /// Drop everything still pending; later enqueues are refused.
    pub(crate) fn close(&mut self) -> usize {
        self.closed = true;
        self.draining = false;
        self.retry_scheduled = 0;
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn stats(&self) -> QueueStats {
        QueueStats {
            pending: self.pending.len(),
            in_flight: usize::from(self.draining),
            retry_scheduled: self.retry_scheduled,
            delivered: self.delivered,
            abandoned: self.abandoned,
        }
    }
}
