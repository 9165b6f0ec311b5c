// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene node definitions.

use crate::channel::{Channel, ChannelKind, ChannelValue, WxyzQuat};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a scene node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Geometry of a renderable curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveData {
    /// Ordered control points in parent space
    pub points: Vec<DVec3>,
    /// Uniform cross-sectional radius
    pub thickness: f64,
}

/// What a node holds besides its transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Transform-only node (a reference frame)
    Empty,
    /// Instance of a named mesh asset
    Mesh {
        /// Asset the mesh was imported from
        asset: String,
    },
    /// Renderable curve
    Curve(CurveData),
    /// Display text
    Text {
        /// Current text body
        body: String,
    },
}

/// A node in the scene graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneNode {
    /// Unique node ID
    pub id: NodeId,
    /// Unique node name
    pub name: String,
    /// Parent node, `None` for the scene root
    pub parent: Option<NodeId>,
    /// Node payload
    pub kind: NodeKind,
    /// Static location
    pub location: DVec3,
    /// Static rotation
    pub rotation: WxyzQuat,
    /// Static scale
    pub scale: DVec3,
    /// Static curve reveal fraction (end of the visible range)
    pub reveal_end: f64,
    /// Keyframed location
    pub location_channel: Channel,
    /// Keyframed rotation
    pub rotation_channel: Channel,
    /// Keyframed scale
    pub scale_channel: Channel,
    /// Keyframed curve reveal fraction
    pub reveal_channel: Channel,
}

impl SceneNode {
    /// Create a node with an identity transform
    pub fn new(name: impl Into<String>, parent: Option<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            parent,
            kind,
            location: DVec3::ZERO,
            rotation: WxyzQuat::IDENTITY,
            scale: DVec3::ONE,
            reveal_end: 1.0,
            location_channel: Channel::new(ChannelKind::Location),
            rotation_channel: Channel::new(ChannelKind::Rotation),
            scale_channel: Channel::new(ChannelKind::Scale),
            reveal_channel: Channel::new(ChannelKind::RevealEnd),
        }
    }

    /// Set a static (non-keyframed) value
    pub fn set_static(&mut self, value: ChannelValue) {
        match value {
            ChannelValue::Location(v) => self.location = v,
            ChannelValue::Rotation(q) => self.rotation = q,
            ChannelValue::Scale(v) => self.scale = v,
            ChannelValue::RevealEnd(f) => self.reveal_end = f,
        }
    }

    /// Get the channel for a property
    pub fn channel(&self, kind: ChannelKind) -> &Channel {
        match kind {
            ChannelKind::Location => &self.location_channel,
            ChannelKind::Rotation => &self.rotation_channel,
            ChannelKind::Scale => &self.scale_channel,
            ChannelKind::RevealEnd => &self.reveal_channel,
        }
    }

    /// Get the mutable channel for a property
    pub fn channel_mut(&mut self, kind: ChannelKind) -> &mut Channel {
        match kind {
            ChannelKind::Location => &mut self.location_channel,
            ChannelKind::Rotation => &mut self.rotation_channel,
            ChannelKind::Scale => &mut self.scale_channel,
            ChannelKind::RevealEnd => &mut self.reveal_channel,
        }
    }

    /// Get the static value of a property
    pub fn static_value(&self, kind: ChannelKind) -> ChannelValue {
        match kind {
            ChannelKind::Location => ChannelValue::Location(self.location),
            ChannelKind::Rotation => ChannelValue::Rotation(self.rotation),
            ChannelKind::Scale => ChannelValue::Scale(self.scale),
            ChannelKind::RevealEnd => ChannelValue::RevealEnd(self.reveal_end),
        }
    }

    /// Evaluate a property at a frame.
    ///
    /// Keyframed channels win over the static value.
    pub fn value_at(&self, kind: ChannelKind, frame: i32) -> ChannelValue {
        self.channel(kind)
            .evaluate(frame)
            .unwrap_or_else(|| self.static_value(kind))
    }

    /// Whether any channel carries keyframes
    pub fn is_animated(&self) -> bool {
        [
            &self.location_channel,
            &self.rotation_channel,
            &self.scale_channel,
            &self.reveal_channel,
        ]
        .iter()
        .any(|c| !c.is_empty())
    }
}
