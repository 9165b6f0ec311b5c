// SPDX-License-Identifier: MIT OR Apache-2.0
//! The host interface the animation engine drives.

use crate::channel::{ChannelKind, ChannelValue};
use crate::constraint::{ConstraintId, TrackAxis};
use crate::error::HostError;
use crate::node::{CurveData, NodeId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a frame-change subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    /// Create a new random subscription ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Text a listener wants displayed on a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUpdate {
    /// Text node to update
    pub node: NodeId,
    /// New text body
    pub body: String,
}

/// Callback run by the host on every display-frame change.
///
/// The host may call it several times for one frame or skip frames while
/// scrubbing, so implementations must not keep per-call state. The host
/// applies the returned update.
pub trait FrameListener {
    /// Compute the update for the frame now displayed
    fn on_frame(&self, frame: i32) -> Option<TextUpdate>;
}

/// Scene-graph mutations and queries needed to author an animation
pub trait SceneContext {
    /// Create an empty transform node
    fn create_empty(&mut self, name: &str, parent: Option<NodeId>) -> Result<NodeId, HostError>;

    /// Instantiate a named mesh asset
    fn import_asset(
        &mut self,
        asset: &str,
        name: &str,
        parent: Option<NodeId>,
    ) -> Result<NodeId, HostError>;

    /// Create a renderable curve through ordered points
    fn create_curve(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        curve: CurveData,
    ) -> Result<NodeId, HostError>;

    /// Create a text node
    fn create_text(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        body: &str,
    ) -> Result<NodeId, HostError>;

    /// Reparent a node (`None` for the scene root)
    fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) -> Result<(), HostError>;

    /// Parent of a node
    fn parent_of(&self, node: NodeId) -> Result<Option<NodeId>, HostError>;

    /// Whether a node exists
    fn contains(&self, node: NodeId) -> bool;

    /// Name of a node
    fn node_name(&self, node: NodeId) -> Option<String>;

    /// Find a node by exact name
    fn find_by_name(&self, name: &str) -> Option<NodeId>;

    /// Nodes whose name contains `fragment`
    fn nodes_matching(&self, fragment: &str) -> Vec<NodeId>;

    /// Set a value once, without recording a keyframe
    fn set_static(&mut self, node: NodeId, value: ChannelValue) -> Result<(), HostError>;

    /// Value set once for a property, ignoring keyframes
    fn static_value(&self, node: NodeId, kind: ChannelKind) -> Result<ChannelValue, HostError>;

    /// Set a value and record it as a keyframe at `frame`
    fn insert_keyframe(
        &mut self,
        node: NodeId,
        frame: i32,
        value: ChannelValue,
    ) -> Result<(), HostError>;

    /// Keep `axis` of `owner` aimed at `target`
    fn add_track_constraint(
        &mut self,
        owner: NodeId,
        target: NodeId,
        axis: TrackAxis,
    ) -> Result<ConstraintId, HostError>;

    /// Remove a node and everything parented under it
    fn remove_node(&mut self, node: NodeId) -> Result<(), HostError>;

    /// Set the playback range of the timeline
    fn set_frame_range(&mut self, start: i32, end: i32);

    /// Playback frame rate in frames per second
    fn frame_rate(&self) -> f64;

    /// Register a frame-change listener
    fn subscribe_frame_change(&mut self, listener: Box<dyn FrameListener>) -> SubscriptionId;

    /// Remove a frame-change listener
    fn unsubscribe(&mut self, subscription: SubscriptionId) -> Result<(), HostError>;
}
