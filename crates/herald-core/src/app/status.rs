//! Status snapshot of a running queue.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Jobs waiting in the FIFO.
    pub pending: usize,

    /// 0 or 1: the single worker never holds more than one job.
    pub in_flight: usize,

    /// Jobs waiting out a backoff window.
    pub retry_scheduled: usize,

    pub delivered: u64,
    pub abandoned: u64,
}

impl QueueStats {
    /// Nothing pending, in flight, or waiting to come back.
    pub fn is_idle(&self) -> bool {
        self.pending == 0 && self.in_flight == 0 && self.retry_scheduled == 0
    }
}
