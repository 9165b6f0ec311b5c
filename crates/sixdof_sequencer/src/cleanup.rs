// SPDX-License-Identifier: MIT OR Apache-2.0
//! Removal of generated nodes.

use crate::error::Result;
use sixdof_scene::{NodeId, SceneContext};

/// Nodes created during one construction, removed again if it fails
#[derive(Debug, Default)]
pub(crate) struct CreatedNodes(Vec<NodeId>);

impl CreatedNodes {
    /// Remember a node for rollback
    pub(crate) fn track(&mut self, node: NodeId) -> NodeId {
        self.0.push(node);
        node
    }

    /// Remove every tracked node, newest first
    pub(crate) fn rollback(self, ctx: &mut dyn SceneContext) {
        for node in self.0.into_iter().rev() {
            if !ctx.contains(node) {
                continue; // Already gone with an ancestor
            }
            if let Err(e) = ctx.remove_node(node) {
                tracing::warn!("Rollback could not remove {:?}: {}", node, e);
            }
        }
    }
}

/// Remove every node whose name contains `name`, except the node called
/// exactly `name`.
///
/// This clears the frames, vectors, streamlines and overlays generated for
/// an object so it can be rebuilt. Only matching nodes are removed: a
/// surviving node under a removed one, including the node called `name`, is
/// first moved to its nearest surviving ancestor. Returns the number of
/// nodes removed.
pub fn erase_related(ctx: &mut dyn SceneContext, name: &str) -> Result<usize> {
    let keep = ctx.find_by_name(name);
    let doomed: Vec<NodeId> = ctx
        .nodes_matching(name)
        .into_iter()
        .filter(|id| Some(*id) != keep)
        .collect();

    for node in ctx.nodes_matching("") {
        if doomed.contains(&node) {
            continue;
        }
        let original = ctx.parent_of(node)?;
        let mut parent = original;
        while let Some(p) = parent.filter(|p| doomed.contains(p)) {
            parent = ctx.parent_of(p)?;
        }
        if parent != original {
            ctx.set_parent(node, parent)?;
        }
    }

    let before = ctx.nodes_matching("").len();
    for node in &doomed {
        if ctx.contains(*node) {
            ctx.remove_node(*node)?;
        }
    }
    let removed = before - ctx.nodes_matching("").len();

    if removed == 0 {
        tracing::warn!("No nodes related to {} to remove", name);
    } else {
        tracing::info!("Removed {} nodes related to {}", removed, name);
    }
    Ok(removed)
}
