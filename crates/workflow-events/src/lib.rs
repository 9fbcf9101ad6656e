//! Workflow Events - notifications for workflow graph editors
//!
//! This crate defines the events a workflow (a graph of nodes connected
//! by links, optionally annotated) sends to its observers:
//!
//! - Structural changes: nodes, links and annotations added or removed
//! - Runtime state changes of nodes, links and the workflow itself
//! - Requests addressed to nodes (initialize, restore, activate, ...)
//! - Environment property changes
//!
//! # Architecture
//!
//! - `WorkflowEventKind`: closed set of event kinds with stable codes
//! - `WorkflowEvent`: tagged union of the event carriers
//! - `EventSink`: transport-agnostic delivery (channel, vec, dispatcher)
//! - `Dispatcher`: in-process observer registration, send and post
//! - `RuntimeEnv`: environment properties announcing their changes
//!
//! Events never own workflow entities; they carry `NodeId`, `LinkId` and
//! `AnnotationId` handles plus a position that is -1 when not applicable.

pub mod dispatch;
pub mod env;
pub mod error;
pub mod event;
pub mod kind;
pub mod sink;
pub mod types;

// Re-export key types
pub use dispatch::{Dispatcher, DispatcherConfig, EventHandler, KindFilter, SubscriptionId};
pub use env::RuntimeEnv;
pub use error::{EventError, Result};
pub use event::{AnnotationEvent, LinkEvent, NodeEvent, WorkflowEnvChanged, WorkflowEvent};
pub use kind::{KindCategory, PayloadKind, WorkflowEventKind};
pub use sink::{ChannelEventSink, EventSink, NullEventSink, VecEventSink};
pub use types::{AnnotationId, LinkId, NodeId, NO_POSITION};
