// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for animation authoring.

use sixdof_scene::HostError;

/// Error raised while building or sampling an animation
#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    /// Malformed or mismatched input
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Required host object or asset missing, or host refused an operation
    #[error("Host state error: {0}")]
    HostState(#[from] HostError),

    /// Settings could not be parsed
    #[error("Config parse error: {0}")]
    Config(#[from] ron::error::SpannedError),

    /// Settings could not be serialized
    #[error("Config serialization error: {0}")]
    Serialization(#[from] ron::Error),

    /// Settings file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnimationError {
    /// Shorthand for an [`AnimationError::InvalidParameter`]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}

/// Result alias for this crate
pub type Result<T> = std::result::Result<T, AnimationError>;
