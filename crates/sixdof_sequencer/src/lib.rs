// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframed 6DOF animation from time-series motion data.
//!
//! This crate turns pre-computed position and orientation telemetry into a
//! keyframed transform hierarchy inside a host scene:
//! - Timeline mapping from physical time to animation frames
//! - Three-tier reference frames (translation, principal axes, body)
//! - Independent rotation and translation keyframe channels
//! - Vector glyphs, streamlines, and interpolated text overlays
//!
//! ## Architecture
//!
//! Every constructor takes the host as an explicit
//! [`SceneContext`](sixdof_scene::SceneContext). Input validation happens
//! before the first host mutation, and constructors that create several
//! nodes remove them again when a later step fails.

pub mod cleanup;
pub mod clock;
pub mod config;
pub mod error;
pub mod frame;
pub mod interpolate;
pub mod object;
pub mod overlay;
pub mod rotation;
pub mod streamline;
pub mod vector;

pub use cleanup::erase_related;
pub use clock::{Animation, AnimationClock};
pub use config::{AnimationSettings, FrameCountPolicy, PrincipalAxisOffset};
pub use error::{AnimationError, Result};
pub use frame::{PositionSeries, ReferenceFrame};
pub use interpolate::LinearInterpolant;
pub use object::DynamicObject;
pub use overlay::{OverlayText, TextOverlay};
pub use rotation::{euler_series_to_quats, euler_to_quat, Axis, EulerOrder, RotationFrame};
pub use streamline::{reveal_fraction, Staticity, Streamline};
pub use vector::{DynamicVector, VectorNormalization, ARROW_ASSET};
