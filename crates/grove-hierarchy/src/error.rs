//! Error types for hierarchy construction.

use crate::record::NodeId;

/// Errors that can occur while building or validating a forest.
#[derive(Debug, thiserror::Error)]
pub enum HierarchyError {
    /// Two input records carried the same id.
    #[error("duplicate node id: {0}")]
    DuplicateId(NodeId),

    /// A chain of parent links revisits a node (includes self-parenting).
    #[error("cycle detected involving node {0}")]
    CycleDetected(NodeId),

    /// Parent and child bookkeeping disagree.
    #[error("inconsistent forest: node {node}: {detail}")]
    Inconsistent {
        /// The node at which the inconsistency was found.
        node: NodeId,
        /// What disagreed.
        detail: String,
    },

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for hierarchy results.
pub type HierarchyResult<T> = Result<T, HierarchyError>;
