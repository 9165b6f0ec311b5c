// SPDX-License-Identifier: MIT OR Apache-2.0
//! Text overlays showing an interpolated value on every displayed frame.
//!
//! Values are given per clock frame. Display frames in between are
//! interpolated, frames outside the sampled range are extrapolated. The text
//! is computed when the host changes frame, through a listener the overlay
//! registers and removes again on [`TextOverlay::detach`].

use crate::clock::AnimationClock;
use crate::error::Result;
use crate::interpolate::LinearInterpolant;
use sixdof_scene::{FrameListener, NodeId, SceneContext, SubscriptionId, TextUpdate};
use std::sync::Arc;

/// Per-frame display text for one scalar series
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayText {
    interpolant: LinearInterpolant,
    label: String,
    decimal_places: usize,
}

impl OverlayText {
    /// Build the lookup from one value per clock frame
    pub fn build(
        clock: &AnimationClock,
        values: &[f64],
        label: impl Into<String>,
        decimal_places: usize,
    ) -> Result<Self> {
        clock.ensure_len("overlay values", values.len())?;
        let frames: Vec<f64> = clock.frames().iter().map(|f| f64::from(*f)).collect();
        Ok(Self {
            interpolant: LinearInterpolant::new(&frames, values)?,
            label: label.into(),
            decimal_places,
        })
    }

    /// Interpolated value at a display frame
    pub fn value_at(&self, frame: i32) -> f64 {
        self.interpolant.evaluate(f64::from(frame))
    }

    /// Formatted text at a display frame
    pub fn text_at(&self, frame: i32) -> String {
        let value = self.value_at(frame);
        if self.label.is_empty() {
            format!("{:.*}", self.decimal_places, value)
        } else {
            format!("{:.*} {}", self.decimal_places, value, self.label)
        }
    }

    /// Label appended to the value
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Fixed number of decimals
    pub fn decimal_places(&self) -> usize {
        self.decimal_places
    }
}

struct OverlayListener {
    node: NodeId,
    text: Arc<OverlayText>,
}

impl FrameListener for OverlayListener {
    fn on_frame(&self, frame: i32) -> Option<TextUpdate> {
        Some(TextUpdate {
            node: self.node,
            body: self.text.text_at(frame),
        })
    }
}

/// A text node kept up to date by a frame-change subscription
#[derive(Debug)]
pub struct TextOverlay {
    name: String,
    node: NodeId,
    subscription: SubscriptionId,
    text: Arc<OverlayText>,
}

impl TextOverlay {
    /// Create the `<name>_text` node under `parent` and subscribe it
    pub fn attach(
        ctx: &mut dyn SceneContext,
        clock: &AnimationClock,
        name: &str,
        parent: Option<NodeId>,
        values: &[f64],
        label: &str,
        decimal_places: usize,
    ) -> Result<Self> {
        let text = Arc::new(OverlayText::build(clock, values, label, decimal_places)?);

        let name = format!("{name}_text");
        let first_frame = clock.frames()[0];
        let node = ctx.create_text(&name, parent, &text.text_at(first_frame))?;
        let subscription = ctx.subscribe_frame_change(Box::new(OverlayListener {
            node,
            text: Arc::clone(&text),
        }));

        tracing::info!("Attached text overlay {} ({} samples)", name, clock.len());
        Ok(Self {
            name,
            node,
            subscription,
            text,
        })
    }

    /// Text node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text node
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Host subscription
    pub fn subscription(&self) -> SubscriptionId {
        self.subscription
    }

    /// The lookup behind the overlay
    pub fn text(&self) -> &OverlayText {
        &self.text
    }

    /// Stop updating the text; the node keeps its last value
    pub fn detach(self, ctx: &mut dyn SceneContext) -> Result<()> {
        ctx.unsubscribe(self.subscription)?;
        tracing::info!("Detached text overlay {}", self.name);
        Ok(())
    }
}
