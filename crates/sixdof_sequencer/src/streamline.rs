// SPDX-License-Identifier: MIT OR Apache-2.0
//! Streamlines: curves tracing a path, optionally drawn over time.

use crate::clock::Animation;
use crate::error::{AnimationError, Result};
use crate::frame::PositionSeries;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use sixdof_scene::{ChannelValue, CurveData, NodeId, SceneContext};
use std::str::FromStr;

/// Whether a streamline is revealed over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Staticity {
    /// Full path visible from the first frame
    #[default]
    Static,
    /// Path draws itself in step with the animation
    Dynamic,
}

impl FromStr for Staticity {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "static" => Ok(Self::Static),
            "dynamic" => Ok(Self::Dynamic),
            other => Err(AnimationError::invalid(format!(
                "staticity must be \"static\" or \"dynamic\", got {other:?}"
            ))),
        }
    }
}

/// Revealed fraction of a dynamic streamline at `frame`
pub fn reveal_fraction(frame: i32, total_frames: i32) -> f64 {
    f64::from(frame) / f64::from(total_frames.max(1))
}

/// A rendered path
#[derive(Debug, Clone, PartialEq)]
pub struct Streamline {
    name: String,
    node: NodeId,
    points: Vec<DVec3>,
    thickness: f64,
    staticity: Staticity,
    reveal: Vec<(i32, f64)>,
}

impl Streamline {
    /// Build a curve through `positions` times the global scale.
    ///
    /// A dynamic streamline keys its reveal fraction at every clock frame,
    /// reaching 1 on the last frame.
    pub fn build(
        ctx: &mut dyn SceneContext,
        anim: &Animation,
        name: impl Into<String>,
        parent: Option<NodeId>,
        positions: PositionSeries<'_>,
        thickness: f64,
        staticity: Staticity,
    ) -> Result<Self> {
        let name = name.into();
        if !(thickness.is_finite() && thickness > 0.0) {
            return Err(AnimationError::invalid(format!(
                "streamline thickness must be positive, got {thickness}"
            )));
        }
        let points = positions.scaled_points(anim.scale())?;
        if points.len() < 2 {
            return Err(AnimationError::invalid(format!(
                "streamline needs at least 2 points, got {}",
                points.len()
            )));
        }

        let clock = anim.clock();
        let reveal: Vec<(i32, f64)> = match staticity {
            Staticity::Static => Vec::new(),
            Staticity::Dynamic => clock
                .frames()
                .iter()
                .map(|f| (*f, reveal_fraction(*f, clock.frame_duration())))
                .collect(),
        };

        let node = ctx.create_curve(
            &name,
            parent,
            CurveData {
                points: points.clone(),
                thickness,
            },
        )?;

        let keyed = match staticity {
            Staticity::Static => ctx.set_static(node, ChannelValue::RevealEnd(1.0)),
            Staticity::Dynamic => reveal
                .iter()
                .try_for_each(|(f, r)| ctx.insert_keyframe(node, *f, ChannelValue::RevealEnd(*r))),
        };
        if let Err(e) = keyed {
            if let Err(cleanup) = ctx.remove_node(node) {
                tracing::warn!("Could not remove streamline {}: {}", name, cleanup);
            }
            return Err(e.into());
        }

        tracing::info!(
            "Built {:?} streamline {} with {} points",
            staticity,
            name,
            points.len()
        );

        Ok(Self {
            name,
            node,
            points,
            thickness,
            staticity,
            reveal,
        })
    }

    /// Node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Curve node
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Scaled curve points
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Cross-sectional radius
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Static or dynamic
    pub fn staticity(&self) -> Staticity {
        self.staticity
    }

    /// Keyed (frame, revealed fraction) pairs; empty for a static streamline
    pub fn reveal(&self) -> &[(i32, f64)] {
        &self.reveal
    }
}
