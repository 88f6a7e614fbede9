//! Error types for scene construction and mesh loading

use std::io;
use thiserror::Error;

/// Errors raised while building the rolling scene.
///
/// Everything here is a configuration failure detected before the animation
/// starts; the per-tick operations never fail.
#[derive(Debug, Error)]
pub enum Error {
    /// A path segment starts and ends at the same point
    #[error("segment {index} has zero length")]
    ZeroLengthSegment { index: usize },

    /// A path segment runs along the up vector, so no rolling axis exists
    #[error("segment {index} is parallel to the up vector")]
    AxisParallelToUp { index: usize },

    /// The world up vector is zero
    #[error("up vector must be non-zero")]
    ZeroUpVector,

    /// Segment `index` does not end where the next one starts
    #[error("path is not closed: segment {index} ends away from the next start")]
    PathNotClosed { index: usize },

    /// A closed path needs at least two segments
    #[error("path needs at least 2 segments, got {0}")]
    TooFewSegments(usize),

    /// Rolling radius is not a positive finite number
    #[error("rolling radius must be positive, got {0}")]
    InvalidRadius(f32),

    /// Angular speed is negative or not finite
    #[error("angular speed must be a non-negative number of degrees, got {0}")]
    InvalidSpeed(f32),

    /// The light sits on the floor plane and casts no usable shadow
    #[error("light position lies on the floor plane")]
    LightOnFloorPlane,

    /// Floor plane normal is zero
    #[error("floor plane normal must be non-zero")]
    ZeroFloorNormal,

    /// Malformed sphere mesh file
    #[error("invalid mesh file: {0}")]
    MeshParse(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Scene configuration could not be decoded
    #[error("invalid scene config: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;
