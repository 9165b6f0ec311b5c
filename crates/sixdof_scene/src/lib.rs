// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene-graph host interface for 6DOF animation authoring.
//!
//! This crate describes everything the animation engine needs from a host
//! 3D tool, and ships an in-memory host:
//! - Transform nodes (empties, meshes, curves, text)
//! - Keyframed channels (location, rotation, scale, curve reveal)
//! - "Point-at" tracking constraints
//! - Timeline range, frame rate, and frame-change listeners
//!
//! ## Architecture
//!
//! The host is abstracted behind the [`SceneContext`] trait and passed
//! explicitly to every constructor. [`MemoryScene`] implements it with
//! transform evaluation at arbitrary frames, so hierarchies can be checked
//! without a live host.

pub mod channel;
pub mod constraint;
pub mod context;
pub mod error;
pub mod node;
pub mod scene;

pub use channel::{Channel, ChannelKind, ChannelValue, Keyframe, WxyzQuat};
pub use constraint::{Constraint, ConstraintId, TrackAxis};
pub use context::{FrameListener, SceneContext, SubscriptionId, TextUpdate};
pub use error::HostError;
pub use node::{CurveData, NodeId, NodeKind, SceneNode};
pub use scene::MemoryScene;
