// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors reported by a scene host.

use crate::context::SubscriptionId;
use crate::node::NodeId;

/// Error raised by a [`SceneContext`](crate::SceneContext) operation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Another node already uses this name
    #[error("Node name already in use: {0}")]
    NameInUse(String),

    /// Asset is not registered with the host
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// Frame-change subscription not found
    #[error("Subscription not found: {0:?}")]
    SubscriptionNotFound(SubscriptionId),

    /// Parenting would create a cycle
    #[error("Invalid parent for node {0:?}")]
    InvalidParent(NodeId),
}
