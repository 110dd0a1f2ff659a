//! Node ID generation and management

use serde::{Deserialize, Serialize};

/// Identifier for a node in the document tree.
///
/// IDs are indices into the tree's arena. They are stable for the lifetime of
/// the tree: detaching a node never invalidates its ID, and two IDs compare
/// equal only when they name the same node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position of this node in the arena
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
