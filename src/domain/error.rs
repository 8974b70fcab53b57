//! Error taxonomy for document diffing
//!
//! Every failure is fatal for the whole `diff` call: the engine never hands
//! back a partially patched tree.

use crate::domain::node::NodeType;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiffError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    /// Two nodes that had to be patched against each other have different types.
    #[error("node type mismatch: {old} !== {new}")]
    TypeMismatch { old: NodeType, new: NodeType },

    /// A node breaks the text-leaf exclusivity rule.
    #[error("malformed {node_type} node: {reason}")]
    MalformedNode {
        node_type: NodeType,
        reason: &'static str,
    },

    /// The document nests deeper than the configured limit.
    #[error("document nesting exceeds the maximum depth of {limit}")]
    DepthExceeded { limit: usize },
}

impl DiffError {
    pub fn type_mismatch(old: NodeType, new: NodeType) -> Self {
        DiffError::TypeMismatch { old, new }
    }

    pub fn malformed(node_type: NodeType, reason: &'static str) -> Self {
        DiffError::MalformedNode { node_type, reason }
    }
}
