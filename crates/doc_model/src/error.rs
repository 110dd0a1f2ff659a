//! Error types for tree operations

use crate::NodeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocModelError {
    #[error("node {0} does not exist")]
    NodeNotFound(NodeId),

    /// An element-only or text-only operation applied to the wrong kind of node
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("cannot insert {child} under its own descendant {parent}")]
    Cycle { child: NodeId, parent: NodeId },

    /// The reference node of a sibling insertion is not attached to a parent
    #[error("{0} is detached")]
    Detached(NodeId),
}

pub type Result<T> = std::result::Result<T, DocModelError>;
