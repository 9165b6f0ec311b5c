// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframed property channels.
//!
//! Every animatable node property is a [`Channel`]: an ordered list of
//! integer-frame keyframes. Inserting at a frame that already carries a key
//! replaces that key, so later samples win when two samples round onto the
//! same frame.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// Quaternion in the host's storage order (w, x, y, z)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WxyzQuat {
    /// Scalar part
    pub w: f64,
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl WxyzQuat {
    /// The identity rotation
    pub const IDENTITY: Self = Self {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create from components in (w, x, y, z) order
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Reorder a quaternion given in (x, y, z, w) order
    pub fn from_xyzw(q: [f64; 4]) -> Self {
        Self {
            w: q[3],
            x: q[0],
            y: q[1],
            z: q[2],
        }
    }

    /// Components in (x, y, z, w) order
    pub fn to_xyzw(self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Components in (w, x, y, z) order
    pub fn to_array(self) -> [f64; 4] {
        [self.w, self.x, self.y, self.z]
    }

    /// Convert to a math-layer quaternion
    pub fn to_dquat(self) -> DQuat {
        DQuat::from_array(self.to_xyzw())
    }
}

impl Default for WxyzQuat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Animatable node property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    /// Local position
    Location,
    /// Local rotation quaternion
    Rotation,
    /// Local scale
    Scale,
    /// End of the revealed range of a curve (0 to 1)
    RevealEnd,
}

impl ChannelKind {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Rotation => "rotation_quaternion",
            Self::Scale => "scale",
            Self::RevealEnd => "reveal_end",
        }
    }
}

/// Value of a channel at one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ChannelValue {
    /// Local position
    Location(DVec3),
    /// Local rotation
    Rotation(WxyzQuat),
    /// Local scale
    Scale(DVec3),
    /// Curve reveal fraction
    RevealEnd(f64),
}

impl ChannelValue {
    /// The channel this value belongs to
    pub fn kind(&self) -> ChannelKind {
        match self {
            Self::Location(_) => ChannelKind::Location,
            Self::Rotation(_) => ChannelKind::Rotation,
            Self::Scale(_) => ChannelKind::Scale,
            Self::RevealEnd(_) => ChannelKind::RevealEnd,
        }
    }

    /// Interpolate between two values of the same channel
    pub fn interpolate(&self, other: &ChannelValue, t: f64) -> Option<ChannelValue> {
        match (self, other) {
            (Self::Location(a), Self::Location(b)) => Some(Self::Location(a.lerp(*b, t))),
            (Self::Scale(a), Self::Scale(b)) => Some(Self::Scale(a.lerp(*b, t))),
            (Self::Rotation(a), Self::Rotation(b)) => {
                let q = a.to_dquat().slerp(b.to_dquat(), t);
                Some(Self::Rotation(WxyzQuat::from_xyzw(q.to_array())))
            }
            (Self::RevealEnd(a), Self::RevealEnd(b)) => Some(Self::RevealEnd(a + (b - a) * t)),
            _ => None, // Mismatched channels
        }
    }

    /// Get as a vector if possible
    pub fn as_vec3(&self) -> Option<DVec3> {
        match self {
            Self::Location(v) | Self::Scale(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as a rotation if possible
    pub fn as_rotation(&self) -> Option<WxyzQuat> {
        match self {
            Self::Rotation(q) => Some(*q),
            _ => None,
        }
    }

    /// Get as a scalar if possible
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::RevealEnd(f) => Some(*f),
            _ => None,
        }
    }
}

/// A keyframe at an integer frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Frame index
    pub frame: i32,
    /// Value at this frame
    pub value: ChannelValue,
}

/// Keyframes of one property, sorted by frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Property this channel animates
    pub kind: ChannelKind,
    keyframes: Vec<Keyframe>,
}

impl Channel {
    /// Create an empty channel
    pub fn new(kind: ChannelKind) -> Self {
        Self {
            kind,
            keyframes: Vec::new(),
        }
    }

    /// Insert or replace the keyframe at a frame
    pub fn set_keyframe(&mut self, frame: i32, value: ChannelValue) {
        match self.keyframes.binary_search_by_key(&frame, |k| k.frame) {
            Ok(idx) => self.keyframes[idx].value = value,
            Err(idx) => self.keyframes.insert(idx, Keyframe { frame, value }),
        }
    }

    /// Get keyframe at frame (if exists)
    pub fn keyframe_at(&self, frame: i32) -> Option<&Keyframe> {
        self.keyframes
            .binary_search_by_key(&frame, |k| k.frame)
            .ok()
            .map(|idx| &self.keyframes[idx])
    }

    /// Get all keyframes
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Get keyframe count
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Whether the channel has no keyframes
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Remove all keyframes
    pub fn clear(&mut self) {
        self.keyframes.clear();
    }

    /// Evaluate the channel at a frame.
    ///
    /// Values between keys are interpolated; outside the keyed range the
    /// nearest key holds. Returns `None` for an empty channel.
    pub fn evaluate(&self, frame: i32) -> Option<ChannelValue> {
        let first = self.keyframes.first()?;
        let last = self.keyframes.last()?;

        if frame <= first.frame {
            return Some(first.value);
        }
        if frame >= last.frame {
            return Some(last.value);
        }

        let next_idx = self.keyframes.partition_point(|k| k.frame < frame);
        let b = &self.keyframes[next_idx];
        if b.frame == frame {
            return Some(b.value);
        }
        let a = &self.keyframes[next_idx - 1];
        let t = f64::from(frame - a.frame) / f64::from(b.frame - a.frame);
        a.value.interpolate(&b.value, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reorders_xyzw_into_storage_order() {
        let q = WxyzQuat::from_xyzw([0.1, 0.2, 0.3, 0.9]);
        assert_eq!(q.to_array(), [0.9, 0.1, 0.2, 0.3]);
        assert_eq!(q.to_xyzw(), [0.1, 0.2, 0.3, 0.9]);
    }

    #[test]
    fn test_set_keyframe_replaces_same_frame() {
        let mut channel = Channel::new(ChannelKind::RevealEnd);
        channel.set_keyframe(10, ChannelValue::RevealEnd(0.5));
        channel.set_keyframe(1, ChannelValue::RevealEnd(0.1));
        channel.set_keyframe(10, ChannelValue::RevealEnd(0.7));

        assert_eq!(channel.len(), 2);
        assert_eq!(channel.keyframes()[0].frame, 1);
        assert_eq!(
            channel.keyframe_at(10).map(|k| k.value),
            Some(ChannelValue::RevealEnd(0.7))
        );
    }

    #[test]
    fn test_evaluate_interpolates_and_holds() {
        let mut channel = Channel::new(ChannelKind::Location);
        channel.set_keyframe(1, ChannelValue::Location(DVec3::ZERO));
        channel.set_keyframe(11, ChannelValue::Location(DVec3::new(10.0, 0.0, 0.0)));

        let mid = channel.evaluate(6).and_then(|v| v.as_vec3()).unwrap();
        assert_relative_eq!(mid.x, 5.0, epsilon = 1e-12);

        let before = channel.evaluate(-3).and_then(|v| v.as_vec3()).unwrap();
        assert_eq!(before, DVec3::ZERO);
        let after = channel.evaluate(40).and_then(|v| v.as_vec3()).unwrap();
        assert_eq!(after, DVec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_evaluate_empty_channel() {
        let channel = Channel::new(ChannelKind::Scale);
        assert!(channel.evaluate(1).is_none());
    }

    #[test]
    fn test_rotation_slerp_midpoint() {
        let a = WxyzQuat::IDENTITY;
        let half = std::f64::consts::FRAC_PI_2;
        let b = WxyzQuat::from_xyzw(DQuat::from_rotation_z(half).to_array());
        let mid = ChannelValue::Rotation(a)
            .interpolate(&ChannelValue::Rotation(b), 0.5)
            .and_then(|v| v.as_rotation())
            .unwrap();
        let expected = DQuat::from_rotation_z(half / 2.0);
        assert!(mid.to_dquat().abs_diff_eq(expected, 1e-12));
    }
}
