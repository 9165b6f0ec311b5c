// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dynamic objects: a visible object driven through three reference frames.
//!
//! ```text
//! parent
//! └── <name>_translation      keyframed location
//!     └── <name>_principal_axes   static Q, keyframed R·Q
//!         └── <name>_body         static Q⁻¹
//!             └── <name>          the visible object, scaled
//! ```
//!
//! The principal-axis offset Q and its inverse cancel, so the body frame's
//! world rotation is exactly the raw orientation R and its world position is
//! the raw position times the global scale. The translation or
//! principal-axis frame can be offset independently without disturbing the
//! body orientation.

use crate::cleanup::CreatedNodes;
use crate::clock::Animation;
use crate::config::PrincipalAxisOffset;
use crate::error::{AnimationError, Result};
use crate::frame::{PositionSeries, ReferenceFrame};
use crate::rotation::principal_axis_pair;
use crate::streamline::{Staticity, Streamline};
use glam::{DQuat, DVec3};
use sixdof_scene::{ChannelKind, ChannelValue, HostError, NodeId, SceneContext};

/// A scene object animated in six degrees of freedom
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicObject {
    name: String,
    target: NodeId,
    original_parent: Option<NodeId>,
    original_scale: DVec3,
    offset: PrincipalAxisOffset,
    principal_axis: DQuat,
    translation: ReferenceFrame,
    principal_axes: ReferenceFrame,
    body: ReferenceFrame,
    scale: f64,
}

impl DynamicObject {
    /// Build the frame chain for `target` under `parent`.
    ///
    /// Fails without leaving nodes behind if the offset order is invalid,
    /// the target is missing, or the host rejects any step. An unknown
    /// target is an invalid parameter; an unknown `parent` is a host error.
    pub fn build(
        ctx: &mut dyn SceneContext,
        anim: &Animation,
        target: NodeId,
        offset: &PrincipalAxisOffset,
        parent: Option<NodeId>,
    ) -> Result<Self> {
        let principal_axis = offset.quaternion()?;
        let name = ctx
            .node_name(target)
            .ok_or_else(|| AnimationError::invalid(format!("unknown target node {target:?}")))?;
        if let Some(parent) = parent {
            if !ctx.contains(parent) {
                return Err(HostError::NodeNotFound(parent).into());
            }
        }
        let original_parent = ctx.parent_of(target)?;
        let original_scale = ctx
            .static_value(target, ChannelKind::Scale)?
            .as_vec3()
            .unwrap_or(DVec3::ONE);

        let mut created = CreatedNodes::default();
        match Self::assemble(ctx, anim, &name, target, parent, principal_axis, &mut created) {
            Ok((translation, principal_axes, body)) => {
                tracing::info!(
                    "Built dynamic object {} (principal-axis offset {:?} {})",
                    name,
                    offset.angles,
                    offset.order
                );
                Ok(Self {
                    name,
                    target,
                    original_parent,
                    original_scale,
                    offset: offset.clone(),
                    principal_axis,
                    translation,
                    principal_axes,
                    body,
                    scale: anim.scale(),
                })
            }
            Err(e) => {
                // Put the target back before its new ancestors disappear
                if ctx
                    .parent_of(target)
                    .is_ok_and(|p| p != original_parent)
                {
                    if let Err(restore) = ctx.set_parent(target, original_parent) {
                        tracing::warn!("Could not restore parent of {}: {}", name, restore);
                    }
                }
                created.rollback(ctx);
                Err(e)
            }
        }
    }

    fn assemble(
        ctx: &mut dyn SceneContext,
        anim: &Animation,
        name: &str,
        target: NodeId,
        parent: Option<NodeId>,
        principal_axis: DQuat,
        created: &mut CreatedNodes,
    ) -> Result<(ReferenceFrame, ReferenceFrame, ReferenceFrame)> {
        let (offset, inverse) = principal_axis_pair(principal_axis);

        let translation = ReferenceFrame::create(ctx, format!("{name}_translation"), parent, anim)?;
        created.track(translation.node());

        let principal_axes = ReferenceFrame::create(
            ctx,
            format!("{name}_principal_axes"),
            Some(translation.node()),
            anim,
        )?;
        created.track(principal_axes.node());
        principal_axes.set_static_pose(ctx, Some(offset), None)?;

        let body = ReferenceFrame::create(
            ctx,
            format!("{name}_body"),
            Some(principal_axes.node()),
            anim,
        )?;
        created.track(body.node());
        body.set_static_pose(ctx, Some(inverse), None)?;

        ctx.set_parent(target, Some(body.node()))?;
        ctx.set_static(target, ChannelValue::Scale(DVec3::splat(anim.scale())))?;

        Ok((translation, principal_axes, body))
    }

    /// Name of the animated object
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The animated object
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Principal-axis offset the object was built with
    pub fn offset(&self) -> &PrincipalAxisOffset {
        &self.offset
    }

    /// Principal-axis offset quaternion Q
    pub fn principal_axis(&self) -> DQuat {
        self.principal_axis
    }

    /// Frame owning translational motion
    pub fn translation_frame(&self) -> &ReferenceFrame {
        &self.translation
    }

    /// Frame carrying the principal-axis offset and dynamic rotation
    pub fn principal_axes_frame(&self) -> &ReferenceFrame {
        &self.principal_axes
    }

    /// Frame carrying the inverse offset; its world pose is the raw pose
    pub fn body_frame(&self) -> &ReferenceFrame {
        &self.body
    }

    /// Global physical scale
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Animate the object in six degrees of freedom.
    ///
    /// Positions drive the translation frame, raw orientations drive the
    /// principal-axis frame (composed with the offset). Either channel may be
    /// `None`, e.g. for objects that only translate.
    pub fn apply_animation(
        &self,
        ctx: &mut dyn SceneContext,
        anim: &Animation,
        positions: Option<PositionSeries<'_>>,
        rotations: Option<&[DQuat]>,
    ) -> Result<()> {
        let clock = anim.clock();
        if let Some(positions) = &positions {
            clock.ensure_len("position series", positions.len()?)?;
        }
        if let Some(rotations) = rotations {
            clock.ensure_len("rotation series", rotations.len())?;
        }

        if let Some(rotations) = rotations {
            let composed: Vec<DQuat> = rotations.iter().map(|r| *r * self.principal_axis).collect();
            self.principal_axes
                .dynamic_sample(ctx, clock, Some(composed.as_slice()), None)?;
        }
        if let Some(positions) = positions {
            self.translation
                .dynamic_sample(ctx, clock, None, Some(positions))?;
        }
        Ok(())
    }

    /// Trace the object's path with a streamline named `<name>_streamline`
    pub fn apply_streamline(
        &self,
        ctx: &mut dyn SceneContext,
        anim: &Animation,
        staticity: Staticity,
        positions: PositionSeries<'_>,
        thickness: f64,
    ) -> Result<Streamline> {
        Streamline::build(
            ctx,
            anim,
            format!("{}_streamline", self.name),
            self.translation.parent(),
            positions,
            thickness,
            staticity,
        )
    }

    /// Remove the three frames, returning the object to its original parent
    /// and scale
    pub fn remove(self, ctx: &mut dyn SceneContext) -> Result<()> {
        if ctx.contains(self.target) {
            ctx.set_parent(self.target, self.original_parent)?;
            ctx.set_static(self.target, ChannelValue::Scale(self.original_scale))?;
        }
        if ctx.contains(self.translation.node()) {
            ctx.remove_node(self.translation.node())?;
        }
        tracing::info!("Removed frames of dynamic object {}", self.name);
        Ok(())
    }
}
