//! Event sinks
//!
//! A sink is where a workflow delivers its events. This abstracts over the
//! transport (in-process dispatcher, tokio channel, frontend bridge, ...)
//! so the code emitting events does not care who listens.

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::error::{EventError, Result};
use crate::event::WorkflowEvent;

/// Trait for sending workflow events
pub trait EventSink: Send + Sync {
    /// Send an event
    ///
    /// Returns an error if the event could not be delivered (e.g. channel closed)
    fn send(&self, event: WorkflowEvent) -> Result<()>;
}

impl<S: EventSink + ?Sized> EventSink for std::sync::Arc<S> {
    fn send(&self, event: WorkflowEvent) -> Result<()> {
        (**self).send(event)
    }
}

/// A no-op event sink that discards all events
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: WorkflowEvent) -> Result<()> {
        Ok(())
    }
}

/// A vector-based event sink that records events in arrival order
///
/// Useful for tests and for batching events before forwarding them.
#[derive(Default)]
pub struct VecEventSink {
    events: Mutex<Vec<WorkflowEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<WorkflowEvent> {
        self.events.lock().clone()
    }

    /// Take all collected events, leaving the sink empty
    pub fn drain(&self) -> Vec<WorkflowEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: WorkflowEvent) -> Result<()> {
        self.events.lock().push(event);
        Ok(())
    }
}

/// Sink forwarding events into an unbounded tokio channel
pub struct ChannelEventSink {
    tx: mpsc::UnboundedSender<WorkflowEvent>,
}

impl ChannelEventSink {
    /// Wrap an existing sender
    pub fn new(tx: mpsc::UnboundedSender<WorkflowEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink together with the receiver it feeds
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<WorkflowEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl EventSink for ChannelEventSink {
    fn send(&self, event: WorkflowEvent) -> Result<()> {
        self.tx.send(event).map_err(|err| {
            log::warn!("Dropping {} event: receiver closed", err.0.kind());
            EventError::ChannelClosed
        })
    }
}
