//! Entity handles carried by workflow events
//!
//! Nodes, links and annotations are owned by the workflow. Events only
//! name them, so every handle here is a cheap identifier into the
//! workflow's own storage rather than the entity itself.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Position value meaning "not applicable"
pub const NO_POSITION: isize = -1;

/// Convert an event position into a collection index
///
/// Any negative position (normally [`NO_POSITION`]) maps to `None`.
pub fn position_index(pos: isize) -> Option<usize> {
    usize::try_from(pos).ok()
}

macro_rules! entity_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a handle from an identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The raw identifier
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

entity_handle!(
    /// Handle of a node in the workflow graph
    NodeId
);

entity_handle!(
    /// Handle of a link between two node ports
    LinkId
);

entity_handle!(
    /// Handle of a canvas annotation (text, arrow, ...)
    AnnotationId
);
