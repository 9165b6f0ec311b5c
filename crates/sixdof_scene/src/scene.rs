// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-memory scene graph.
//!
//! [`MemoryScene`] is a complete [`SceneContext`] without a rendering
//! backend. It stores nodes, keyframes and constraints, and can evaluate any
//! node's transform at any frame. Constraints are recorded but not solved.

use crate::channel::{ChannelKind, ChannelValue};
use crate::constraint::{Constraint, ConstraintId, TrackAxis};
use crate::context::{FrameListener, SceneContext, SubscriptionId, TextUpdate};
use crate::error::HostError;
use crate::node::{CurveData, NodeId, NodeKind, SceneNode};
use glam::{DAffine3, DQuat, DVec3};
use indexmap::{IndexMap, IndexSet};

/// Default playback frame rate
pub const DEFAULT_FRAME_RATE: f64 = 24.0;

/// A scene graph held in memory
pub struct MemoryScene {
    nodes: IndexMap<NodeId, SceneNode>,
    constraints: IndexMap<ConstraintId, Constraint>,
    listeners: IndexMap<SubscriptionId, Box<dyn FrameListener>>,
    assets: IndexSet<String>,
    frame_rate: f64,
    frame_start: i32,
    frame_end: i32,
    current_frame: i32,
}

impl MemoryScene {
    /// Create an empty scene playing at `frame_rate`
    pub fn new(frame_rate: f64) -> Self {
        Self {
            nodes: IndexMap::new(),
            constraints: IndexMap::new(),
            listeners: IndexMap::new(),
            assets: IndexSet::new(),
            frame_rate,
            frame_start: 1,
            frame_end: 250,
            current_frame: 1,
        }
    }

    /// Make a mesh asset available to [`SceneContext::import_asset`]
    pub fn register_asset(&mut self, asset: impl Into<String>) {
        self.assets.insert(asset.into());
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&node_id)
    }

    /// Get a node by exact name
    pub fn node_by_name(&self, name: &str) -> Option<&SceneNode> {
        self.nodes.values().find(|n| n.name == name)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.values()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Direct children of a node
    pub fn children(&self, node_id: NodeId) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|n| n.parent == Some(node_id))
            .map(|n| n.id)
            .collect()
    }

    /// Get all constraints
    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.values()
    }

    /// Get constraints involving a node
    pub fn constraints_for_node(&self, node_id: NodeId) -> impl Iterator<Item = &Constraint> {
        self.constraints.values().filter(move |c| c.involves_node(node_id))
    }

    /// Get the number of constraints
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Get the number of frame-change listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Timeline playback range
    pub fn frame_range(&self) -> (i32, i32) {
        (self.frame_start, self.frame_end)
    }

    /// Frame currently displayed
    pub fn current_frame(&self) -> i32 {
        self.current_frame
    }

    /// Display a frame, running every listener in registration order
    pub fn set_current_frame(&mut self, frame: i32) {
        self.current_frame = frame;

        let updates: Vec<TextUpdate> = self
            .listeners
            .values()
            .filter_map(|l| l.on_frame(frame))
            .collect();

        for update in updates {
            match self.nodes.get_mut(&update.node) {
                Some(SceneNode { kind: NodeKind::Text { body }, .. }) => *body = update.body,
                _ => tracing::warn!("Frame listener targeted missing text node {:?}", update.node),
            }
        }
    }

    /// Body of a text node
    pub fn text_body(&self, node_id: NodeId) -> Option<&str> {
        match &self.nodes.get(&node_id)?.kind {
            NodeKind::Text { body } => Some(body),
            _ => None,
        }
    }

    /// Evaluate a node property at a frame
    pub fn value_at(
        &self,
        node_id: NodeId,
        kind: ChannelKind,
        frame: i32,
    ) -> Result<ChannelValue, HostError> {
        Ok(self.get(node_id)?.value_at(kind, frame))
    }

    /// Local transform of a node at a frame
    pub fn local_transform_at(&self, node_id: NodeId, frame: i32) -> Result<DAffine3, HostError> {
        let node = self.get(node_id)?;
        Ok(DAffine3::from_scale_rotation_translation(
            vec3_at(node, ChannelKind::Scale, frame),
            rotation_at(node, frame),
            vec3_at(node, ChannelKind::Location, frame),
        ))
    }

    /// World transform of a node at a frame (parent chain composed)
    pub fn world_transform_at(&self, node_id: NodeId, frame: i32) -> Result<DAffine3, HostError> {
        let mut node = self.get(node_id)?;
        let mut world = self.local_transform_at(node.id, frame)?;
        while let Some(parent_id) = node.parent {
            node = self.get(parent_id)?;
            world = self.local_transform_at(parent_id, frame)? * world;
        }
        Ok(world)
    }

    /// World rotation of a node at a frame, ignoring scale
    pub fn world_rotation_at(&self, node_id: NodeId, frame: i32) -> Result<DQuat, HostError> {
        let mut node = self.get(node_id)?;
        let mut rotation = rotation_at(node, frame);
        while let Some(parent_id) = node.parent {
            node = self.get(parent_id)?;
            rotation = rotation_at(node, frame) * rotation;
        }
        Ok(rotation)
    }

    /// World position of a node's origin at a frame
    pub fn world_location_at(&self, node_id: NodeId, frame: i32) -> Result<DVec3, HostError> {
        Ok(self.world_transform_at(node_id, frame)?.translation)
    }

    fn get(&self, node_id: NodeId) -> Result<&SceneNode, HostError> {
        self.nodes.get(&node_id).ok_or(HostError::NodeNotFound(node_id))
    }

    fn get_mut(&mut self, node_id: NodeId) -> Result<&mut SceneNode, HostError> {
        self.nodes
            .get_mut(&node_id)
            .ok_or(HostError::NodeNotFound(node_id))
    }

    fn insert_node(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        kind: NodeKind,
    ) -> Result<NodeId, HostError> {
        if self.node_by_name(name).is_some() {
            return Err(HostError::NameInUse(name.to_string()));
        }
        if let Some(parent_id) = parent {
            self.get(parent_id)?;
        }

        let node = SceneNode::new(name, parent, kind);
        let id = node.id;
        self.nodes.insert(id, node);
        Ok(id)
    }
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_RATE)
    }
}

fn vec3_at(node: &SceneNode, kind: ChannelKind, frame: i32) -> DVec3 {
    let fallback = if kind == ChannelKind::Scale { DVec3::ONE } else { DVec3::ZERO };
    node.value_at(kind, frame).as_vec3().unwrap_or(fallback)
}

fn rotation_at(node: &SceneNode, frame: i32) -> DQuat {
    node.value_at(ChannelKind::Rotation, frame)
        .as_rotation()
        .map(|q| q.to_dquat())
        .unwrap_or(DQuat::IDENTITY)
}

impl SceneContext for MemoryScene {
    fn create_empty(&mut self, name: &str, parent: Option<NodeId>) -> Result<NodeId, HostError> {
        self.insert_node(name, parent, NodeKind::Empty)
    }

    fn import_asset(
        &mut self,
        asset: &str,
        name: &str,
        parent: Option<NodeId>,
    ) -> Result<NodeId, HostError> {
        if !self.assets.contains(asset) {
            return Err(HostError::AssetNotFound(asset.to_string()));
        }
        self.insert_node(name, parent, NodeKind::Mesh { asset: asset.to_string() })
    }

    fn create_curve(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        curve: CurveData,
    ) -> Result<NodeId, HostError> {
        self.insert_node(name, parent, NodeKind::Curve(curve))
    }

    fn create_text(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        body: &str,
    ) -> Result<NodeId, HostError> {
        self.insert_node(name, parent, NodeKind::Text { body: body.to_string() })
    }

    fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) -> Result<(), HostError> {
        self.get(node)?;

        // Walk up from the new parent; meeting `node` means a cycle
        let mut cursor = parent;
        while let Some(ancestor) = cursor {
            if ancestor == node {
                return Err(HostError::InvalidParent(node));
            }
            cursor = self.get(ancestor)?.parent;
        }

        self.get_mut(node)?.parent = parent;
        Ok(())
    }

    fn parent_of(&self, node: NodeId) -> Result<Option<NodeId>, HostError> {
        Ok(self.get(node)?.parent)
    }

    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn node_name(&self, node: NodeId) -> Option<String> {
        self.nodes.get(&node).map(|n| n.name.clone())
    }

    fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.node_by_name(name).map(|n| n.id)
    }

    fn nodes_matching(&self, fragment: &str) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|n| n.name.contains(fragment))
            .map(|n| n.id)
            .collect()
    }

    fn set_static(&mut self, node: NodeId, value: ChannelValue) -> Result<(), HostError> {
        self.get_mut(node)?.set_static(value);
        Ok(())
    }

    fn static_value(&self, node: NodeId, kind: ChannelKind) -> Result<ChannelValue, HostError> {
        Ok(self.get(node)?.static_value(kind))
    }

    fn insert_keyframe(
        &mut self,
        node: NodeId,
        frame: i32,
        value: ChannelValue,
    ) -> Result<(), HostError> {
        let node = self.get_mut(node)?;
        node.set_static(value);
        node.channel_mut(value.kind()).set_keyframe(frame, value);
        Ok(())
    }

    fn add_track_constraint(
        &mut self,
        owner: NodeId,
        target: NodeId,
        axis: TrackAxis,
    ) -> Result<ConstraintId, HostError> {
        self.get(owner)?;
        self.get(target)?;

        let constraint = Constraint::new(owner, target, axis);
        let id = constraint.id;
        self.constraints.insert(id, constraint);
        Ok(id)
    }

    fn remove_node(&mut self, node: NodeId) -> Result<(), HostError> {
        self.get(node)?;

        // Collect the whole subtree
        let mut doomed = IndexSet::new();
        doomed.insert(node);
        loop {
            let before = doomed.len();
            for n in self.nodes.values() {
                if n.parent.is_some_and(|p| doomed.contains(&p)) {
                    doomed.insert(n.id);
                }
            }
            if doomed.len() == before {
                break;
            }
        }

        self.constraints
            .retain(|_, c| !doomed.iter().any(|id| c.involves_node(*id)));
        self.nodes.retain(|id, _| !doomed.contains(id));
        Ok(())
    }

    fn set_frame_range(&mut self, start: i32, end: i32) {
        self.frame_start = start;
        self.frame_end = end;
    }

    fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn subscribe_frame_change(&mut self, listener: Box<dyn FrameListener>) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.listeners.insert(id, listener);
        id
    }

    fn unsubscribe(&mut self, subscription: SubscriptionId) -> Result<(), HostError> {
        self.listeners
            .shift_remove(&subscription)
            .map(|_| ())
            .ok_or(HostError::SubscriptionNotFound(subscription))
    }
}
