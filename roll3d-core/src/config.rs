//! Scene configuration
//!
//! Every constant the scene depends on lives here. The defaults reproduce the
//! classic demo: a unit sphere rolling around a triangle above a green floor,
//! lit from the upper left.

use std::fs;
use std::path::Path;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::path::SegmentTable;
use crate::projection::{ProjectionMode, DEFAULT_EYE};
use crate::shadow::{FloorPlane, ShadowProjector};

/// Tolerance for the "path sits one radius above the floor" check
const HEIGHT_TOLERANCE: f32 = 1e-3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    /// Rolling radius; also the scale of the drawn sphere
    pub radius: f32,
    pub up: [f32; 3],
    /// Corners of the closed path, visited in order and back to the first
    pub waypoints: Vec<[f32; 3]>,
    pub degrees_per_tick: f32,
    pub light_position: [f32; 3],
    pub floor_normal: [f32; 3],
    pub floor_offset: f32,
    /// Translation applied to the flattened shadow
    pub shadow_anchor: [f32; 3],
    pub floor_corners: [[f32; 3]; 4],
    pub eye: [f32; 3],
    /// `"perspective"` or `"orthographic"`
    pub projection: ProjectionMode,
    pub frame_rate: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            up: [0.0, 1.0, 0.0],
            waypoints: vec![[-4.0, 1.0, 4.0], [3.0, 1.0, -4.0], [-3.0, 1.0, -3.0]],
            degrees_per_tick: 2.0,
            light_position: [-14.0, 12.0, -3.0],
            floor_normal: [0.0, 1.0, 0.0],
            floor_offset: 0.0,
            shadow_anchor: [0.0, 0.01, 0.0],
            floor_corners: [
                [5.0, 0.0, 8.0],
                [5.0, 0.0, -4.0],
                [-5.0, 0.0, -4.0],
                [-5.0, 0.0, 8.0],
            ],
            eye: DEFAULT_EYE,
            projection: ProjectionMode::Perspective,
            frame_rate: 30,
        }
    }
}

/// Validated, ready-to-use parts of a scene
#[derive(Debug, Clone)]
pub struct Scene {
    pub path: SegmentTable,
    pub shadow: ShadowProjector,
    pub radius: f32,
    pub degrees_per_tick: f32,
}

impl SceneConfig {
    /// Load from a JSON file; missing fields keep their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        log::info!("loaded scene config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn up(&self) -> Vector3<f32> {
        Vector3::from(self.up)
    }

    pub fn waypoints(&self) -> Vec<Point3<f32>> {
        self.waypoints.iter().copied().map(Point3::from).collect()
    }

    pub fn floor_corners(&self) -> [Point3<f32>; 4] {
        self.floor_corners.map(Point3::from)
    }

    /// Validate the configuration and build the path and shadow projector.
    ///
    /// Fails on any geometry that would leave the motion undefined.
    pub fn build(&self) -> Result<Scene> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(Error::InvalidRadius(self.radius));
        }
        if !(self.degrees_per_tick.is_finite() && self.degrees_per_tick >= 0.0) {
            return Err(Error::InvalidSpeed(self.degrees_per_tick));
        }

        let path = SegmentTable::from_waypoints(&self.waypoints(), self.up())?;
        let plane = FloorPlane::new(Vector3::from(self.floor_normal), self.floor_offset)?;
        let shadow = ShadowProjector::new(
            Point3::from(self.light_position),
            plane,
            Vector3::from(self.shadow_anchor),
        )?;

        for (index, segment) in path.iter().enumerate() {
            let height = plane.distance(&segment.start);
            if (height - self.radius).abs() > HEIGHT_TOLERANCE {
                log::warn!(
                    "waypoint {} sits {:.3} above the floor but the sphere radius is {:.3}; \
                     the sphere will float or sink",
                    index,
                    height,
                    self.radius
                );
            }
        }

        log::debug!(
            "scene built: {} segments, perimeter {:.3}, radius {}",
            path.len(),
            path.perimeter(),
            self.radius
        );

        Ok(Scene {
            path,
            shadow,
            radius: self.radius,
            degrees_per_tick: self.degrees_per_tick,
        })
    }
}
