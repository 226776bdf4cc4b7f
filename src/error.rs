//! Error types for lanyard construction and physics operations.

use thiserror::Error;

use crate::runtime::BodyId;

/// Errors that can occur while building or driving a lanyard.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LanyardError {
    /// Mass must be positive and finite.
    #[error("mass must be positive and finite")]
    InvalidMass,
    /// Timestep must be positive and finite.
    #[error("timestep must be positive and finite, got {0}")]
    InvalidTimestep(f32),
    /// A constraint or query referenced a body the runtime does not know.
    #[error("body {id:?} out of bounds (count: {count})")]
    UnknownBody { id: BodyId, count: usize },
    /// A constraint joined a body to itself.
    #[error("constraint joins body {0:?} to itself")]
    SelfConstraint(BodyId),
    /// A card model or texture could not be loaded.
    #[error("failed to load `{resource}`: {reason}")]
    AssetLoad { resource: String, reason: String },
    /// The card mesh bounding box has zero width or height.
    #[error("card geometry has a degenerate bounding box ({width} x {height})")]
    DegenerateGeometry { width: f32, height: f32 },
    /// A configuration value is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
