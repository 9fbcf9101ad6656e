//! The closed set of workflow event kinds
//!
//! Every kind is known at compile time. Numeric codes follow declaration
//! order on top of [`USER_EVENT_BASE`], so they never change between runs
//! and never collide with each other.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EventError;

/// First code handed out to workflow event kinds
pub const USER_EVENT_BASE: u16 = 1000;

/// Kind tag of a workflow event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u16)]
pub enum WorkflowEventKind {
    /// A node has been added to the workflow
    NodeAdded = USER_EVENT_BASE,
    /// A node has been removed from the workflow
    NodeRemoved,
    /// A link has been added to the workflow
    LinkAdded,
    /// A link has been removed from the workflow
    LinkRemoved,
    /// An input link has been added to a node
    InputLinkAdded,
    /// An output link has been added to a node
    OutputLinkAdded,
    /// An input link has been removed from a node
    InputLinkRemoved,
    /// An output link has been removed from a node
    OutputLinkRemoved,
    /// A node's runtime state has changed
    NodeStateChange,
    /// A link's runtime state has changed
    LinkStateChange,
    /// An input link's runtime state has changed
    InputLinkStateChange,
    /// An output link's runtime state has changed
    OutputLinkStateChange,
    /// Request for a node's runtime initialization (load data, connect, ...)
    NodeInitialize,
    /// Restore a node from its serialized state
    NodeRestore,
    /// Ask a node to save its state
    NodeSaveStateRequest,
    /// User activation of a node (e.g. double click on the canvas)
    NodeActivateRequest,
    /// Workflow runtime changed (running, paused, stopped, ...)
    RuntimeStateChange,
    /// A workflow environment property changed (work directory, variables, ...)
    #[serde(alias = "workflow_resource_change")]
    WorkflowEnvironmentChange,
    /// The workflow is about to close
    WorkflowAboutToClose,
    /// The workflow closed
    WorkflowClose,
    /// An annotation has been added to the workflow
    AnnotationAdded,
    /// An annotation has been removed from the workflow
    AnnotationRemoved,
    /// An annotation's content or geometry changed
    AnnotationChange,
    /// Show and raise the window containing the workflow view
    ActivateParentRequest,
}

/// Which carrier an event kind is documented to travel in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    Node,
    Link,
    Annotation,
    Environment,
    /// No payload beyond the kind itself
    None,
}

/// Coarse grouping of event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindCategory {
    /// Nodes, links or annotations added, removed or edited
    Structure,
    /// Runtime state of a node or link changed
    State,
    /// A request addressed to a node or to the view
    Request,
    /// Workflow runtime or environment changed
    Runtime,
    /// Workflow closing
    Lifecycle,
}

impl WorkflowEventKind {
    /// Alias kept for resource-oriented callers
    pub const WORKFLOW_RESOURCE_CHANGE: Self = Self::WorkflowEnvironmentChange;

    /// All kinds in declaration order
    pub const ALL: [Self; 24] = [
        Self::NodeAdded,
        Self::NodeRemoved,
        Self::LinkAdded,
        Self::LinkRemoved,
        Self::InputLinkAdded,
        Self::OutputLinkAdded,
        Self::InputLinkRemoved,
        Self::OutputLinkRemoved,
        Self::NodeStateChange,
        Self::LinkStateChange,
        Self::InputLinkStateChange,
        Self::OutputLinkStateChange,
        Self::NodeInitialize,
        Self::NodeRestore,
        Self::NodeSaveStateRequest,
        Self::NodeActivateRequest,
        Self::RuntimeStateChange,
        Self::WorkflowEnvironmentChange,
        Self::WorkflowAboutToClose,
        Self::WorkflowClose,
        Self::AnnotationAdded,
        Self::AnnotationRemoved,
        Self::AnnotationChange,
        Self::ActivateParentRequest,
    ];

    /// Stable numeric code of this kind
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Look up a kind by its numeric code
    pub fn from_code(code: u16) -> Option<Self> {
        let offset = code.checked_sub(USER_EVENT_BASE)?;
        Self::ALL.get(usize::from(offset)).copied()
    }

    /// Stable snake_case name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NodeAdded => "node_added",
            Self::NodeRemoved => "node_removed",
            Self::LinkAdded => "link_added",
            Self::LinkRemoved => "link_removed",
            Self::InputLinkAdded => "input_link_added",
            Self::OutputLinkAdded => "output_link_added",
            Self::InputLinkRemoved => "input_link_removed",
            Self::OutputLinkRemoved => "output_link_removed",
            Self::NodeStateChange => "node_state_change",
            Self::LinkStateChange => "link_state_change",
            Self::InputLinkStateChange => "input_link_state_change",
            Self::OutputLinkStateChange => "output_link_state_change",
            Self::NodeInitialize => "node_initialize",
            Self::NodeRestore => "node_restore",
            Self::NodeSaveStateRequest => "node_save_state_request",
            Self::NodeActivateRequest => "node_activate_request",
            Self::RuntimeStateChange => "runtime_state_change",
            Self::WorkflowEnvironmentChange => "workflow_environment_change",
            Self::WorkflowAboutToClose => "workflow_about_to_close",
            Self::WorkflowClose => "workflow_close",
            Self::AnnotationAdded => "annotation_added",
            Self::AnnotationRemoved => "annotation_removed",
            Self::AnnotationChange => "annotation_change",
            Self::ActivateParentRequest => "activate_parent_request",
        }
    }

    /// The carrier this kind is documented to use
    ///
    /// Advisory only: event constructors accept any kind.
    pub fn payload(self) -> PayloadKind {
        match self {
            Self::NodeAdded
            | Self::NodeRemoved
            | Self::NodeStateChange
            | Self::NodeInitialize
            | Self::NodeRestore
            | Self::NodeSaveStateRequest
            | Self::NodeActivateRequest
            | Self::ActivateParentRequest => PayloadKind::Node,
            Self::LinkAdded
            | Self::LinkRemoved
            | Self::InputLinkAdded
            | Self::OutputLinkAdded
            | Self::InputLinkRemoved
            | Self::OutputLinkRemoved
            | Self::LinkStateChange
            | Self::InputLinkStateChange
            | Self::OutputLinkStateChange => PayloadKind::Link,
            Self::AnnotationAdded | Self::AnnotationRemoved | Self::AnnotationChange => {
                PayloadKind::Annotation
            }
            Self::WorkflowEnvironmentChange => PayloadKind::Environment,
            Self::RuntimeStateChange | Self::WorkflowAboutToClose | Self::WorkflowClose => {
                PayloadKind::None
            }
        }
    }

    /// Coarse category of this kind
    pub fn category(self) -> KindCategory {
        match self {
            Self::NodeAdded
            | Self::NodeRemoved
            | Self::LinkAdded
            | Self::LinkRemoved
            | Self::InputLinkAdded
            | Self::OutputLinkAdded
            | Self::InputLinkRemoved
            | Self::OutputLinkRemoved
            | Self::AnnotationAdded
            | Self::AnnotationRemoved
            | Self::AnnotationChange => KindCategory::Structure,
            Self::NodeStateChange
            | Self::LinkStateChange
            | Self::InputLinkStateChange
            | Self::OutputLinkStateChange => KindCategory::State,
            Self::NodeInitialize
            | Self::NodeRestore
            | Self::NodeSaveStateRequest
            | Self::NodeActivateRequest
            | Self::ActivateParentRequest => KindCategory::Request,
            Self::RuntimeStateChange | Self::WorkflowEnvironmentChange => KindCategory::Runtime,
            Self::WorkflowAboutToClose | Self::WorkflowClose => KindCategory::Lifecycle,
        }
    }
}

impl fmt::Display for WorkflowEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowEventKind {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "workflow_resource_change" {
            return Ok(Self::WORKFLOW_RESOURCE_CHANGE);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EventError::unknown_kind(s))
    }
}

impl TryFrom<u16> for WorkflowEventKind {
    type Error = EventError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| EventError::unknown_kind(code))
    }
}
