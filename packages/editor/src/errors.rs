//! Error types for the editor

use crate::node::NodeId;
use thiserror::Error;

/// Why an insertion was rejected before touching the tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InsertionError {
    #[error("{0} does not accept children")]
    NotDroppable(NodeId),

    #[error("inserting {node} under {target} would create a cycle")]
    Cycle { node: NodeId, target: NodeId },

    #[error("page {0} cannot be inserted as a child")]
    PageAsChild(NodeId),

    #[error("{0} is listed more than once")]
    DuplicateNode(NodeId),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("Invalid insertion: {0}")]
    InvalidInsertion(#[from] InsertionError),

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node is not a page: {0}")]
    NotAPage(NodeId),

    #[error("Unknown node definition: {0}")]
    UnknownDefinition(String),
}

pub type EditorResult<T> = Result<T, EditorError>;
