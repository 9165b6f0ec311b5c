// SPDX-License-Identifier: MIT OR Apache-2.0
//! Orientation constraints between nodes.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstraintId(pub Uuid);

impl ConstraintId {
    /// Create a new random constraint ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConstraintId {
    fn default() -> Self {
        Self::new()
    }
}

/// Local axis a tracking constraint aims at its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrackAxis {
    /// +X
    #[default]
    PosX,
    /// +Y
    PosY,
    /// +Z
    PosZ,
    /// -X
    NegX,
    /// -Y
    NegY,
    /// -Z
    NegZ,
}

/// A "point-at" constraint: `owner` keeps `axis` aimed at `target`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constraint {
    /// Unique constraint ID
    pub id: ConstraintId,
    /// Constrained node
    pub owner: NodeId,
    /// Node being tracked
    pub target: NodeId,
    /// Owner axis that points at the target
    pub axis: TrackAxis,
}

impl Constraint {
    /// Create a new tracking constraint
    pub fn new(owner: NodeId, target: NodeId, axis: TrackAxis) -> Self {
        Self {
            id: ConstraintId::new(),
            owner,
            target,
            axis,
        }
    }

    /// Check if this constraint involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.owner == node_id || self.target == node_id
    }
}
