use thiserror::Error;

use crate::node::NodeId;

/// Structural failures of scene-graph operations.
///
/// These are all rejected without mutating the tree; callers decide whether
/// to surface them or recover.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("node {0} not found in scene")]
    NodeNotFound(NodeId),

    #[error("node {child} already has parent {parent}; detach it first")]
    AlreadyParented { child: NodeId, parent: NodeId },

    #[error("node {child} is not a child of node {parent}")]
    NotAChild { child: NodeId, parent: NodeId },

    #[error("attaching node {child} under node {parent} would create a cycle")]
    WouldCycle { child: NodeId, parent: NodeId },

    #[error("node {0} is not a camera")]
    NotACamera(NodeId),

    #[error("the scene root cannot be removed")]
    CannotRemoveRoot,
}
