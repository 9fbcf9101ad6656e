//! Error types for event delivery

use thiserror::Error;

/// Result type alias using EventError
pub type Result<T> = std::result::Result<T, EventError>;

/// Errors that can occur while delivering or decoding workflow events
///
/// Constructing an event never fails; only transports, queues and parsing do.
#[derive(Debug, Error)]
pub enum EventError {
    /// The receiving end of a sink is gone
    #[error("Channel closed")]
    ChannelClosed,

    /// A dispatcher queue reached its configured limit
    #[error("Event queue full (capacity {capacity})")]
    QueueFull { capacity: usize },

    /// An event kind name or code did not match any known kind
    #[error("Unknown event kind: {0}")]
    UnknownKind(String),

    /// Dispatcher configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl EventError {
    /// Create an unknown kind error from anything printable
    pub fn unknown_kind(kind: impl std::fmt::Display) -> Self {
        Self::UnknownKind(kind.to_string())
    }
}
