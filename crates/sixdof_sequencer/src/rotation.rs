// SPDX-License-Identifier: MIT OR Apache-2.0
//! Euler-angle sequences and quaternion helpers.
//!
//! Order strings follow the usual three-letter convention: lowercase letters
//! mean extrinsic rotations about the fixed axes, uppercase letters mean
//! intrinsic rotations about the moving axes. Angles are radians.
//! Quaternions are [`DQuat`], stored (x, y, z, w).

use crate::error::{AnimationError, Result};
use glam::{DQuat, DVec3};
use std::fmt;
use std::str::FromStr;

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

impl Axis {
    /// Unit vector along the axis
    pub fn unit(&self) -> DVec3 {
        match self {
            Self::X => DVec3::X,
            Self::Y => DVec3::Y,
            Self::Z => DVec3::Z,
        }
    }

    fn letter(&self) -> char {
        match self {
            Self::X => 'x',
            Self::Y => 'y',
            Self::Z => 'z',
        }
    }
}

/// Whether a sequence rotates about fixed or moving axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationFrame {
    /// Fixed axes (lowercase order string)
    Extrinsic,
    /// Moving axes (uppercase order string)
    Intrinsic,
}

/// A parsed Euler-angle sequence such as `xyz` or `ZXZ`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EulerOrder {
    /// Axes in the order the angles are given
    pub axes: [Axis; 3],
    /// Fixed or moving axes
    pub frame: RotationFrame,
}

impl EulerOrder {
    /// Quaternion for three angles in this sequence
    pub fn to_quat(&self, angles: [f64; 3]) -> DQuat {
        let [q1, q2, q3] =
            [0, 1, 2].map(|i| DQuat::from_axis_angle(self.axes[i].unit(), angles[i]));
        match self.frame {
            // Each later rotation is about a fixed axis, so it applies on the left
            RotationFrame::Extrinsic => q3 * q2 * q1,
            RotationFrame::Intrinsic => q1 * q2 * q3,
        }
    }

    /// Whether the first and last axes match (proper Euler rather than Tait-Bryan)
    pub fn is_proper(&self) -> bool {
        self.axes[0] == self.axes[2]
    }
}

impl FromStr for EulerOrder {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AnimationError::invalid(format!("unrecognized Euler order {s:?}"));

        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 3 {
            return Err(invalid());
        }

        let frame = if chars.iter().all(char::is_ascii_lowercase) {
            RotationFrame::Extrinsic
        } else if chars.iter().all(char::is_ascii_uppercase) {
            RotationFrame::Intrinsic
        } else {
            return Err(invalid());
        };

        let mut axes = [Axis::X; 3];
        for (slot, c) in axes.iter_mut().zip(&chars) {
            *slot = match c.to_ascii_lowercase() {
                'x' => Axis::X,
                'y' => Axis::Y,
                'z' => Axis::Z,
                _ => return Err(invalid()),
            };
        }

        if axes[0] == axes[1] || axes[1] == axes[2] {
            return Err(invalid());
        }

        Ok(Self { axes, frame })
    }
}

impl fmt::Display for EulerOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for axis in &self.axes {
            let c = match self.frame {
                RotationFrame::Extrinsic => axis.letter(),
                RotationFrame::Intrinsic => axis.letter().to_ascii_uppercase(),
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// Convert one set of Euler angles to a quaternion
pub fn euler_to_quat(angles: [f64; 3], order: &str) -> Result<DQuat> {
    if angles.iter().any(|a| !a.is_finite()) {
        return Err(AnimationError::invalid(format!("non-finite Euler angles {angles:?}")));
    }
    Ok(order.parse::<EulerOrder>()?.to_quat(angles))
}

/// Convert three angle series to a quaternion series
pub fn euler_series_to_quats(
    angles1: &[f64],
    angles2: &[f64],
    angles3: &[f64],
    order: &str,
) -> Result<Vec<DQuat>> {
    if angles1.len() != angles2.len() || angles1.len() != angles3.len() {
        return Err(AnimationError::invalid(format!(
            "angle series lengths differ: {}, {}, {}",
            angles1.len(),
            angles2.len(),
            angles3.len()
        )));
    }

    let order: EulerOrder = order.parse()?;
    Ok(angles1
        .iter()
        .zip(angles2)
        .zip(angles3)
        .map(|((a, b), c)| order.to_quat([*a, *b, *c]))
        .collect())
}

/// The principal-axis rotation and the inverse the body frame carries
pub fn principal_axis_pair(offset: DQuat) -> (DQuat, DQuat) {
    (offset, offset.inverse())
}
