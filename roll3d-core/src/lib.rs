//! roll3d Core Library - rolling-sphere motion engine and scene geometry
//!
//! This library holds everything that does not touch a display: the segment
//! table, the no-slip rolling state machine, pose and shadow composition,
//! camera projection, scene configuration and the sphere mesh reader.

pub mod animation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod mesh_file;
pub mod path;
pub mod pose;
pub mod projection;
pub mod rolling;
pub mod shadow;

// Re-export commonly used types
pub use animation::{Animation, Phase};
pub use config::{Scene, SceneConfig};
pub use error::{Error, Result};
pub use geometry::{Mesh, Triangle, Vertex};
pub use path::{Segment, SegmentTable};
pub use pose::{compute_pose, Pose};
pub use projection::{Camera, ProjectionMode};
pub use rolling::{Handoff, RollingState};
pub use shadow::{FloorPlane, ShadowProjector};
