// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation settings.
//!
//! Settings are plain serde structs persisted as RON:
//!
//! ```ron
//! (
//!     speed_up: 4000.0,
//!     global_scale: 0.001,
//!     frame_count: Floor,
//! )
//! ```

use crate::error::{AnimationError, Result};
use crate::rotation::euler_to_quat;
use glam::DQuat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the total playback frame count is derived from the last sample time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FrameCountPolicy {
    /// `floor(t_last * frame_rate / speed_up)`
    #[default]
    Floor,
    /// `floor(t_last * frame_rate / speed_up + 1)`
    FloorPlusOne,
}

impl FrameCountPolicy {
    /// Largest total frame count; the timeline ends one frame later
    pub const MAX_FRAMES: i32 = i32::MAX - 1;

    /// Total frame count for a playback span of `frames` (fractional)
    pub fn total_frames(&self, frames: f64) -> i32 {
        let total = match self {
            Self::Floor => frames.floor(),
            Self::FloorPlusOne => (frames + 1.0).floor(),
        };
        // Saturating float-to-int cast; between one and MAX_FRAMES frames
        (total as i32).clamp(1, Self::MAX_FRAMES)
    }
}

/// Global settings shared by every object of one animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Ratio of data duration to animation duration
    pub speed_up: f64,
    /// Physical scale applied to every position, e.g. 0.1 shrinks to a tenth
    pub global_scale: f64,
    /// Total frame count rule
    pub frame_count: FrameCountPolicy,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            speed_up: 1.0,
            global_scale: 1.0,
            frame_count: FrameCountPolicy::Floor,
        }
    }
}

impl AnimationSettings {
    /// Create settings with the default frame count rule
    pub fn new(speed_up: f64, global_scale: f64) -> Self {
        Self {
            speed_up,
            global_scale,
            ..Self::default()
        }
    }

    /// Set the frame count rule
    pub fn with_frame_count(mut self, policy: FrameCountPolicy) -> Self {
        self.frame_count = policy;
        self
    }

    /// Check that speed-up and scale are positive and finite
    pub fn validate(&self) -> Result<()> {
        if !(self.speed_up.is_finite() && self.speed_up > 0.0) {
            return Err(AnimationError::invalid(format!(
                "speed_up must be positive, got {}",
                self.speed_up
            )));
        }
        if !(self.global_scale.is_finite() && self.global_scale > 0.0) {
            return Err(AnimationError::invalid(format!(
                "global_scale must be positive, got {}",
                self.global_scale
            )));
        }
        Ok(())
    }

    /// Parse settings from RON
    pub fn from_ron_str(source: &str) -> Result<Self> {
        let settings: Self = ron::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings to pretty RON
    pub fn to_ron_string(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load settings from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron_str(&source)
    }
}

/// Offset of an object's principal axes from its modeled axes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrincipalAxisOffset {
    /// Euler angles in radians
    pub angles: [f64; 3],
    /// Euler sequence, lowercase extrinsic ("xyz") or uppercase intrinsic ("ZXZ")
    pub order: String,
}

impl Default for PrincipalAxisOffset {
    fn default() -> Self {
        Self {
            angles: [0.0; 3],
            order: "xyz".to_string(),
        }
    }
}

impl PrincipalAxisOffset {
    /// Create an offset
    pub fn new(angles: [f64; 3], order: impl Into<String>) -> Self {
        Self {
            angles,
            order: order.into(),
        }
    }

    /// The offset as a quaternion
    pub fn quaternion(&self) -> Result<DQuat> {
        euler_to_quat(self.angles, &self.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AnimationSettings::default();
        assert_eq!(settings.speed_up, 1.0);
        assert_eq!(settings.global_scale, 1.0);
        assert_eq!(settings.frame_count, FrameCountPolicy::Floor);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_serialization() {
        let settings = AnimationSettings::new(4000.0, 0.001)
            .with_frame_count(FrameCountPolicy::FloorPlusOne);
        let ron_str = settings.to_ron_string().unwrap();
        let loaded = AnimationSettings::from_ron_str(&ron_str).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let loaded = AnimationSettings::from_ron_str("(speed_up: 3.0)").unwrap();
        assert_eq!(loaded.speed_up, 3.0);
        assert_eq!(loaded.global_scale, 1.0);
    }

    #[test]
    fn test_rejects_non_positive_values() {
        assert!(matches!(
            AnimationSettings::new(0.0, 1.0).validate(),
            Err(AnimationError::InvalidParameter(_))
        ));
        assert!(matches!(
            AnimationSettings::new(1.0, -2.0).validate(),
            Err(AnimationError::InvalidParameter(_))
        ));
        assert!(matches!(
            AnimationSettings::from_ron_str("(speed_up: -1.0)"),
            Err(AnimationError::InvalidParameter(_))
        ));
        assert!(matches!(
            AnimationSettings::from_ron_str("(speed_up: \"fast\")"),
            Err(AnimationError::Config(_))
        ));
    }

    #[test]
    fn test_frame_count_policies() {
        assert_eq!(FrameCountPolicy::Floor.total_frames(72.0), 72);
        assert_eq!(FrameCountPolicy::FloorPlusOne.total_frames(72.0), 73);
        assert_eq!(FrameCountPolicy::Floor.total_frames(71.9), 71);
        assert_eq!(FrameCountPolicy::Floor.total_frames(0.2), 1);
        assert_eq!(
            FrameCountPolicy::FloorPlusOne.total_frames(1e12),
            FrameCountPolicy::MAX_FRAMES
        );
    }

    #[test]
    fn test_offset_default_is_identity() {
        let q = PrincipalAxisOffset::default().quaternion().unwrap();
        assert_eq!(q.to_array(), [0.0, 0.0, 0.0, 1.0]);
    }
}
