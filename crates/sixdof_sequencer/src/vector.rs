// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dynamic vectors: an arrow glyph driven by a 3-vector time series.
//!
//! Length and direction are separated. A magnitude frame is scaled along
//! its local X axis, and a tracking constraint keeps that axis aimed at a
//! pointing frame whose location is the normalized vector. One arrow asset
//! can show any time-varying vector without per-frame rotations.

use crate::cleanup::CreatedNodes;
use crate::clock::Animation;
use crate::error::{AnimationError, Result};
use crate::frame::{PositionSeries, ReferenceFrame};
use glam::DVec3;
use sixdof_scene::{ChannelValue, ConstraintId, NodeId, SceneContext, TrackAxis};

/// Mesh asset instantiated for every vector
pub const ARROW_ASSET: &str = "arrow";

/// Per-component normalization of a vector series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorNormalization {
    divisors: DVec3,
    scale: f64,
}

impl VectorNormalization {
    /// Divide each component by its series maximum (1 when the maximum is 0)
    pub fn from_series(series: PositionSeries<'_>, scale: f64) -> Result<Self> {
        series.len()?;
        Ok(Self {
            divisors: DVec3::new(
                series_divisor(series.x),
                series_divisor(series.y),
                series_divisor(series.z),
            ),
            scale,
        })
    }

    /// Component divisors
    pub fn divisors(&self) -> DVec3 {
        self.divisors
    }

    /// Normalized and scaled vector
    pub fn normalize(&self, v: DVec3) -> DVec3 {
        v / self.divisors * self.scale
    }

    /// Arrow length for a normalized vector
    pub fn magnitude(&self, normalized: DVec3) -> f64 {
        normalized.length() * self.scale
    }
}

fn series_divisor(series: &[f64]) -> f64 {
    let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max != 0.0 && max.is_finite() {
        max
    } else {
        1.0
    }
}

/// An arrow glyph attached to a parent node
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicVector {
    name: String,
    parent: Option<NodeId>,
    magnitude: ReferenceFrame,
    arrow: NodeId,
    pointing: Option<ReferenceFrame>,
    constraint: Option<ConstraintId>,
    scale_mag: f64,
    scale_off: f64,
}

impl DynamicVector {
    /// Create the magnitude frame at `offset` under `parent` and the arrow mesh under it.
    ///
    /// `scale_mag` scales the arrow's length axis, `scale_off` its other two
    /// axes; both are cosmetic.
    pub fn build(
        ctx: &mut dyn SceneContext,
        anim: &Animation,
        parent: Option<NodeId>,
        name: &str,
        scale_mag: f64,
        scale_off: f64,
        offset: DVec3,
    ) -> Result<Self> {
        for (what, value) in [("scale_mag", scale_mag), ("scale_off", scale_off)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(AnimationError::invalid(format!(
                    "{what} must be positive, got {value}"
                )));
            }
        }

        let name = format!("{name}_vector");
        let mut created = CreatedNodes::default();
        match Self::assemble(ctx, anim, &name, parent, scale_mag, scale_off, offset, &mut created) {
            Ok((magnitude, arrow)) => {
                tracing::info!("Built dynamic vector {}", name);
                Ok(Self {
                    name,
                    parent,
                    magnitude,
                    arrow,
                    pointing: None,
                    constraint: None,
                    scale_mag,
                    scale_off,
                })
            }
            Err(e) => {
                created.rollback(ctx);
                Err(e)
            }
        }
    }

    fn assemble(
        ctx: &mut dyn SceneContext,
        anim: &Animation,
        name: &str,
        parent: Option<NodeId>,
        scale_mag: f64,
        scale_off: f64,
        offset: DVec3,
        created: &mut CreatedNodes,
    ) -> Result<(ReferenceFrame, NodeId)> {
        let magnitude = ReferenceFrame::create(ctx, format!("{name}_magnitude"), parent, anim)?;
        created.track(magnitude.node());
        magnitude.set_static_pose(ctx, None, Some(offset))?;

        let arrow = ctx.import_asset(ARROW_ASSET, name, Some(magnitude.node()))?;
        created.track(arrow);
        ctx.set_static(
            arrow,
            ChannelValue::Scale(DVec3::new(scale_mag, scale_off, scale_off)),
        )?;
        Ok((magnitude, arrow))
    }

    /// Arrow node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Frame scaled by the vector magnitude
    pub fn magnitude_frame(&self) -> &ReferenceFrame {
        &self.magnitude
    }

    /// Frame the arrow points at, once animated
    pub fn pointing_frame(&self) -> Option<&ReferenceFrame> {
        self.pointing.as_ref()
    }

    /// Arrow mesh node
    pub fn arrow(&self) -> NodeId {
        self.arrow
    }

    /// Tracking constraint, once animated
    pub fn constraint(&self) -> Option<ConstraintId> {
        self.constraint
    }

    /// Length-axis scale
    pub fn scale_mag(&self) -> f64 {
        self.scale_mag
    }

    /// Off-axis scale
    pub fn scale_off(&self) -> f64 {
        self.scale_off
    }

    /// Keyframe the vector from component series, one value per clock frame.
    ///
    /// The pointing frame and its tracking constraint are created on the
    /// first call and reused afterwards.
    pub fn animate(
        &mut self,
        ctx: &mut dyn SceneContext,
        anim: &Animation,
        x: &[f64],
        y: &[f64],
        z: &[f64],
    ) -> Result<()> {
        let series = PositionSeries::new(x, y, z);
        let clock = anim.clock();
        clock.ensure_len("vector series", series.len()?)?;
        let normalization = VectorNormalization::from_series(series, self.scale_mag)?;

        let pointing = match self.pointing.as_ref().map(ReferenceFrame::node) {
            Some(node) => node,
            None => {
                let (pointing, constraint) = self.create_pointing(ctx, anim)?;
                let node = pointing.node();
                self.pointing = Some(pointing);
                self.constraint = Some(constraint);
                node
            }
        };

        for (i, frame) in clock.frames().iter().enumerate() {
            let n = normalization.normalize(series.point(i));
            let length = normalization.magnitude(n);
            ctx.insert_keyframe(pointing, *frame, ChannelValue::Location(n))?;
            ctx.insert_keyframe(
                self.magnitude.node(),
                *frame,
                ChannelValue::Scale(DVec3::new(length, 1.0, 1.0)),
            )?;
        }

        tracing::debug!("{}: keyed {} vector samples", self.name, clock.len());
        Ok(())
    }

    fn create_pointing(
        &self,
        ctx: &mut dyn SceneContext,
        anim: &Animation,
    ) -> Result<(ReferenceFrame, ConstraintId)> {
        let pointing =
            ReferenceFrame::create(ctx, format!("{}_pointing", self.name), self.parent, anim)?;
        match ctx.add_track_constraint(self.magnitude.node(), pointing.node(), TrackAxis::PosX) {
            Ok(constraint) => Ok((pointing, constraint)),
            Err(e) => {
                if let Err(cleanup) = ctx.remove_node(pointing.node()) {
                    tracing::warn!("Could not remove {}: {}", pointing.name(), cleanup);
                }
                Err(e.into())
            }
        }
    }
}
