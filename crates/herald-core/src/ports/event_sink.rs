//! EventSink port - structured queue events.

use crate::domain::QueueEvent;

/// EventSink records queue events.
///
/// Emission is fire-and-forget: it cannot fail a job and must not block.
/// Logging happens through `tracing` regardless of the sink in use.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: QueueEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: QueueEvent) {}
}
