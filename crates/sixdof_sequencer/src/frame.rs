// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reference frames and the keyframe sampler.
//!
//! A [`ReferenceFrame`] is an empty transform node that other nodes are
//! parented to. [`ReferenceFrame::dynamic_sample`] writes one transform
//! sample per clock frame. The rotation and translation channels are
//! independent: either may be absent without touching the other.

use crate::clock::{Animation, AnimationClock};
use crate::error::{AnimationError, Result};
use glam::{DQuat, DVec3};
use sixdof_scene::{ChannelValue, NodeId, SceneContext, WxyzQuat};

/// Borrowed x, y, z position series of equal length
#[derive(Debug, Clone, Copy)]
pub struct PositionSeries<'a> {
    /// X positions
    pub x: &'a [f64],
    /// Y positions
    pub y: &'a [f64],
    /// Z positions
    pub z: &'a [f64],
}

impl<'a> PositionSeries<'a> {
    /// Create a position series
    pub fn new(x: &'a [f64], y: &'a [f64], z: &'a [f64]) -> Self {
        Self { x, y, z }
    }

    /// Number of samples, if all three components agree
    pub fn len(&self) -> Result<usize> {
        if self.x.len() != self.y.len() || self.x.len() != self.z.len() {
            return Err(AnimationError::invalid(format!(
                "position components have different lengths: {}, {}, {}",
                self.x.len(),
                self.y.len(),
                self.z.len()
            )));
        }
        Ok(self.x.len())
    }

    /// Whether the series has no samples
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() && self.y.is_empty() && self.z.is_empty()
    }

    /// Sample `i` as a vector
    pub fn point(&self, i: usize) -> DVec3 {
        DVec3::new(self.x[i], self.y[i], self.z[i])
    }

    /// All samples as vectors, multiplied by `scale`
    pub fn scaled_points(&self, scale: f64) -> Result<Vec<DVec3>> {
        let len = self.len()?;
        Ok((0..len).map(|i| self.point(i) * scale).collect())
    }
}

/// An empty transform node that can be posed and keyframed
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceFrame {
    name: String,
    node: NodeId,
    parent: Option<NodeId>,
    scale: f64,
}

impl ReferenceFrame {
    /// Create an empty node under `parent` (`None` for the scene root)
    pub fn create(
        ctx: &mut dyn SceneContext,
        name: impl Into<String>,
        parent: Option<NodeId>,
        anim: &Animation,
    ) -> Result<Self> {
        let name = name.into();
        let node = ctx.create_empty(&name, parent)?;
        tracing::debug!("Created reference frame {}", name);

        Ok(Self {
            name,
            node,
            parent,
            scale: anim.scale(),
        })
    }

    /// Node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Host node backing this frame
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Parent node
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Global scale applied to sampled positions
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Place the frame once, without keyframes.
    ///
    /// Useful for fixed center-of-mass or principal-axis offsets. The
    /// position is in parent space and not scaled.
    pub fn set_static_pose(
        &self,
        ctx: &mut dyn SceneContext,
        rotation: Option<DQuat>,
        position: Option<DVec3>,
    ) -> Result<()> {
        if let Some(q) = rotation {
            ctx.set_static(self.node, ChannelValue::Rotation(WxyzQuat::from_xyzw(q.to_array())))?;
        }
        if let Some(p) = position {
            ctx.set_static(self.node, ChannelValue::Location(p))?;
        }
        Ok(())
    }

    /// Keyframe the frame at every clock frame.
    ///
    /// `rotations[i]` becomes the local rotation at `clock.frames()[i]`;
    /// `positions` sample `i` times the global scale becomes the local
    /// location at the same frame. Every provided series must have one
    /// value per clock frame; lengths are checked before anything is written.
    pub fn dynamic_sample(
        &self,
        ctx: &mut dyn SceneContext,
        clock: &AnimationClock,
        rotations: Option<&[DQuat]>,
        positions: Option<PositionSeries<'_>>,
    ) -> Result<()> {
        if let Some(rotations) = rotations {
            clock.ensure_len("rotation series", rotations.len())?;
        }
        if let Some(positions) = &positions {
            clock.ensure_len("position series", positions.len()?)?;
        }

        if let Some(rotations) = rotations {
            for (frame, q) in clock.frames().iter().zip(rotations) {
                let stored = WxyzQuat::from_xyzw(q.to_array());
                ctx.insert_keyframe(self.node, *frame, ChannelValue::Rotation(stored))?;
            }
            tracing::debug!("{}: keyed {} rotation samples", self.name, rotations.len());
        }

        if let Some(positions) = positions {
            for (i, frame) in clock.frames().iter().enumerate() {
                let location = positions.point(i) * self.scale;
                ctx.insert_keyframe(self.node, *frame, ChannelValue::Location(location))?;
            }
            tracing::debug!("{}: keyed {} position samples", self.name, clock.len());
        }

        Ok(())
    }
}
