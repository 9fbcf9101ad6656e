//! Workflow event carriers
//!
//! A [`WorkflowEvent`] is a kind tag plus, depending on the kind, the
//! handle of the affected node, link or annotation and its position, or
//! the name and values of a changed environment property. Events are
//! immutable once built and are consumed by pattern matching:
//!
//! ```
//! use workflow_events::{NodeId, WorkflowEvent, WorkflowEventKind};
//!
//! let event = WorkflowEvent::node_added(NodeId::new("file-reader"), 0);
//! match &event {
//!     WorkflowEvent::Node(ev) => assert_eq!(ev.node().as_str(), "file-reader"),
//!     _ => unreachable!(),
//! }
//! assert_eq!(event.kind(), WorkflowEventKind::NodeAdded);
//! ```

use serde::{Deserialize, Serialize};

use crate::kind::WorkflowEventKind;
use crate::types::{position_index, AnnotationId, LinkId, NodeId, NO_POSITION};

fn no_position() -> isize {
    NO_POSITION
}

/// Event about a single node
///
/// Used with `NodeAdded`, `NodeRemoved`, `NodeStateChange`,
/// `NodeInitialize`, `NodeRestore`, `NodeSaveStateRequest`,
/// `NodeActivateRequest` and `ActivateParentRequest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeEvent {
    kind: WorkflowEventKind,
    node: NodeId,
    #[serde(default = "no_position")]
    pos: isize,
}

impl NodeEvent {
    /// Create a node event at a position
    pub fn new(kind: WorkflowEventKind, node: NodeId, pos: isize) -> Self {
        Self { kind, node, pos }
    }

    /// Create a node event without positional information
    pub fn without_position(kind: WorkflowEventKind, node: NodeId) -> Self {
        Self::new(kind, node, NO_POSITION)
    }

    pub fn kind(&self) -> WorkflowEventKind {
        self.kind
    }

    /// The affected node
    pub fn node(&self) -> &NodeId {
        &self.node
    }

    /// For `NodeAdded`/`NodeRemoved`, the index in the workflow's node list
    /// the node was inserted at or removed from; -1 if not applicable
    pub fn pos(&self) -> isize {
        self.pos
    }

    /// [`pos`](Self::pos) as an index, `None` when not applicable
    pub fn index(&self) -> Option<usize> {
        position_index(self.pos)
    }
}

/// Event about a single link
///
/// Used with `LinkAdded`, `LinkRemoved`, `InputLinkAdded`,
/// `InputLinkRemoved`, `OutputLinkAdded`, `OutputLinkRemoved`,
/// `LinkStateChange`, `InputLinkStateChange` and `OutputLinkStateChange`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkEvent {
    kind: WorkflowEventKind,
    link: LinkId,
    #[serde(default = "no_position")]
    pos: isize,
}

impl LinkEvent {
    /// Create a link event at a position
    pub fn new(kind: WorkflowEventKind, link: LinkId, pos: isize) -> Self {
        Self { kind, link, pos }
    }

    /// Create a link event without positional information
    pub fn without_position(kind: WorkflowEventKind, link: LinkId) -> Self {
        Self::new(kind, link, NO_POSITION)
    }

    pub fn kind(&self) -> WorkflowEventKind {
        self.kind
    }

    /// The link subject to change
    pub fn link(&self) -> &LinkId {
        &self.link
    }

    /// The link position index
    ///
    /// - `LinkAdded`/`LinkRemoved`: index in the workflow's link list
    /// - `InputLinkAdded`/`InputLinkRemoved`: position among the sink
    ///   node's input links
    /// - `OutputLinkAdded`/`OutputLinkRemoved`: position among the source
    ///   node's output links
    ///
    /// -1 if not applicable.
    pub fn pos(&self) -> isize {
        self.pos
    }

    /// [`pos`](Self::pos) as an index, `None` when not applicable
    pub fn index(&self) -> Option<usize> {
        position_index(self.pos)
    }
}

/// Event about a single annotation
///
/// Used with `AnnotationAdded`, `AnnotationRemoved` and `AnnotationChange`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationEvent {
    kind: WorkflowEventKind,
    annotation: AnnotationId,
    #[serde(default = "no_position")]
    pos: isize,
}

impl AnnotationEvent {
    pub fn new(kind: WorkflowEventKind, annotation: AnnotationId, pos: isize) -> Self {
        Self {
            kind,
            annotation,
            pos,
        }
    }

    pub fn without_position(kind: WorkflowEventKind, annotation: AnnotationId) -> Self {
        Self::new(kind, annotation, NO_POSITION)
    }

    pub fn kind(&self) -> WorkflowEventKind {
        self.kind
    }

    /// The annotation subject to change
    pub fn annotation(&self) -> &AnnotationId {
        &self.annotation
    }

    /// Index in the workflow's annotation list, -1 if not applicable
    pub fn pos(&self) -> isize {
        self.pos
    }

    pub fn index(&self) -> Option<usize> {
        position_index(self.pos)
    }
}

/// A workflow environment property changed
///
/// Always of kind `WorkflowEnvironmentChange`. Values are opaque and are
/// not compared, so an event with identical old and new values is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowEnvChanged {
    name: String,
    new_value: serde_json::Value,
    old_value: serde_json::Value,
}

impl WorkflowEnvChanged {
    pub fn new(
        name: impl Into<String>,
        new_value: impl Into<serde_json::Value>,
        old_value: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            name: name.into(),
            new_value: new_value.into(),
            old_value: old_value.into(),
        }
    }

    pub fn kind(&self) -> WorkflowEventKind {
        WorkflowEventKind::WorkflowEnvironmentChange
    }

    /// Name of the environment property
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn new_value(&self) -> &serde_json::Value {
        &self.new_value
    }

    pub fn old_value(&self) -> &serde_json::Value {
        &self.old_value
    }
}

/// Events dispatched to and from a workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkflowEvent {
    /// A node was added, removed, changed state or was asked to act
    Node(NodeEvent),

    /// A link was added, removed or changed state
    Link(LinkEvent),

    /// An annotation was added, removed or edited
    Annotation(AnnotationEvent),

    /// An environment property changed
    EnvChanged(WorkflowEnvChanged),

    /// A workflow-wide notification with no payload
    /// (runtime state change, about to close, close)
    Workflow { kind: WorkflowEventKind },
}

impl WorkflowEvent {
    /// The kind tag of this event
    pub fn kind(&self) -> WorkflowEventKind {
        match self {
            Self::Node(ev) => ev.kind(),
            Self::Link(ev) => ev.kind(),
            Self::Annotation(ev) => ev.kind(),
            Self::EnvChanged(ev) => ev.kind(),
            Self::Workflow { kind } => *kind,
        }
    }

    /// Position carried by node, link and annotation events
    pub fn pos(&self) -> Option<isize> {
        match self {
            Self::Node(ev) => Some(ev.pos()),
            Self::Link(ev) => Some(ev.pos()),
            Self::Annotation(ev) => Some(ev.pos()),
            Self::EnvChanged(_) | Self::Workflow { .. } => None,
        }
    }

    /// Create a workflow-wide event of the given kind
    pub fn workflow(kind: WorkflowEventKind) -> Self {
        Self::Workflow { kind }
    }

    pub fn node_added(node: NodeId, pos: isize) -> Self {
        Self::Node(NodeEvent::new(WorkflowEventKind::NodeAdded, node, pos))
    }

    pub fn node_removed(node: NodeId, pos: isize) -> Self {
        Self::Node(NodeEvent::new(WorkflowEventKind::NodeRemoved, node, pos))
    }

    pub fn link_added(link: LinkId, pos: isize) -> Self {
        Self::Link(LinkEvent::new(WorkflowEventKind::LinkAdded, link, pos))
    }

    pub fn link_removed(link: LinkId, pos: isize) -> Self {
        Self::Link(LinkEvent::new(WorkflowEventKind::LinkRemoved, link, pos))
    }

    pub fn annotation_added(annotation: AnnotationId, pos: isize) -> Self {
        Self::Annotation(AnnotationEvent::new(
            WorkflowEventKind::AnnotationAdded,
            annotation,
            pos,
        ))
    }

    pub fn annotation_removed(annotation: AnnotationId, pos: isize) -> Self {
        Self::Annotation(AnnotationEvent::new(
            WorkflowEventKind::AnnotationRemoved,
            annotation,
            pos,
        ))
    }

    /// Create an environment change event
    pub fn env_changed(
        name: impl Into<String>,
        new_value: impl Into<serde_json::Value>,
        old_value: impl Into<serde_json::Value>,
    ) -> Self {
        Self::EnvChanged(WorkflowEnvChanged::new(name, new_value, old_value))
    }
}

impl From<NodeEvent> for WorkflowEvent {
    fn from(ev: NodeEvent) -> Self {
        Self::Node(ev)
    }
}

impl From<LinkEvent> for WorkflowEvent {
    fn from(ev: LinkEvent) -> Self {
        Self::Link(ev)
    }
}

impl From<AnnotationEvent> for WorkflowEvent {
    fn from(ev: AnnotationEvent) -> Self {
        Self::Annotation(ev)
    }
}

impl From<WorkflowEnvChanged> for WorkflowEvent {
    fn from(ev: WorkflowEnvChanged) -> Self {
        Self::EnvChanged(ev)
    }
}
