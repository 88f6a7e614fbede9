/// Pose composition for the rolling sphere
use nalgebra::{Isometry3, Matrix4, Point3, Rotation3, Translation3, UnitQuaternion};

use crate::path::SegmentTable;
use crate::rolling::{segment_rotation, RollingState};

/// Rigid transform of the sphere for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub translation: Point3<f32>,
    pub rotation: UnitQuaternion<f32>,
}

impl Pose {
    pub fn isometry(&self) -> Isometry3<f32> {
        Isometry3::from_parts(Translation3::from(self.translation.coords), self.rotation)
    }

    /// Homogeneous `T * R`
    pub fn to_homogeneous(&self) -> Matrix4<f32> {
        self.isometry().to_homogeneous()
    }

    pub fn rotation_matrix(&self) -> Rotation3<f32> {
        self.rotation.to_rotation_matrix()
    }

    /// Model matrix for a unit sphere mesh scaled to `radius`.
    ///
    /// Use the same radius that drives the rolling so the drawn sphere does
    /// not appear to slip.
    pub fn model_matrix(&self, radius: f32) -> Matrix4<f32> {
        self.to_homogeneous() * Matrix4::new_scaling(radius)
    }

    /// Row-major 4x4 layout, ready for upload to a row-major consumer
    pub fn to_row_major(&self) -> [[f32; 4]; 4] {
        let m = self.to_homogeneous();
        let mut rows = [[0.0; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = m[(r, c)];
            }
        }
        rows
    }
}

/// Pose of the sphere for `state`.
///
/// The rotation of the active segment is applied on top of the carried
/// orientation, never the other way round.
pub fn compute_pose(state: &RollingState, path: &SegmentTable, radius: f32) -> Pose {
    let segment = path.segment(state.segment());
    let translation = segment.point_at(state.distance_traveled(radius));
    let rotation = segment_rotation(segment, state.angle_deg()) * state.carried();

    Pose {
        translation,
        rotation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Matrix3, Vector3};

    fn default_path() -> SegmentTable {
        SegmentTable::triangle(
            Point3::new(-4.0, 1.0, 4.0),
            Point3::new(3.0, 1.0, -4.0),
            Point3::new(-3.0, 1.0, -3.0),
            Vector3::y(),
        )
        .unwrap()
    }

    #[test]
    fn test_initial_pose() {
        let path = default_path();
        let pose = compute_pose(&RollingState::new(), &path, 1.0);
        assert_relative_eq!(pose.translation, Point3::new(-4.0, 1.0, 4.0));
        assert_relative_eq!(pose.to_homogeneous(), Matrix4::new_translation(&Vector3::new(-4.0, 1.0, 4.0)));
    }

    #[test]
    fn test_pose_after_first_tick() {
        let path = default_path();
        let mut state = RollingState::new();
        state.advance(&path, 1.0, 2.0);
        let pose = compute_pose(&state, &path, 1.0);

        let a = Point3::new(-4.0, 1.0, 4.0);
        let ab = Vector3::new(7.0, 0.0, -8.0);
        let expected = a + ab.normalize() * 2.0_f32.to_radians();
        assert_relative_eq!(pose.translation, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_top_of_sphere_moves_forward() {
        let path = default_path();
        let mut state = RollingState::new();
        state.advance(&path, 1.0, 10.0);
        let pose = compute_pose(&state, &path, 1.0);

        let top = pose.rotation * Vector3::y();
        let forward = path.segment(0).dir().normalize();
        assert!(top.dot(&forward) > 0.0);
    }

    #[test]
    fn test_pose_query_is_idempotent() {
        let path = default_path();
        let mut state = RollingState::new();
        for _ in 0..500 {
            state.advance(&path, 1.0, 2.0);
        }
        let first = compute_pose(&state, &path, 1.0);
        let second = compute_pose(&state, &path, 1.0);
        assert_eq!(first.to_row_major(), second.to_row_major());
        assert_eq!(first, second);
    }

    #[test]
    fn test_translation_is_continuous_across_handoffs() {
        let path = default_path();
        let speed = 2.0;
        let step = 2.0_f32.to_radians();
        let mut state = RollingState::new();
        let mut previous = compute_pose(&state, &path, 1.0).translation;
        for _ in 0..2_000 {
            state.advance(&path, 1.0, speed);
            let current = compute_pose(&state, &path, 1.0).translation;
            assert!((current - previous).norm() <= step + 1e-4);
            previous = current;
        }
    }

    #[test]
    fn test_rotation_stays_orthonormal() {
        let path = default_path();
        let mut state = RollingState::new();
        for _ in 0..10_000 {
            state.advance(&path, 1.0, 2.0);
            let m = compute_pose(&state, &path, 1.0).rotation_matrix().into_inner();
            assert!((m.determinant() - 1.0).abs() < 1e-4);
        }
        let m = compute_pose(&state, &path, 1.0).rotation_matrix().into_inner();
        assert_relative_eq!(m.transpose() * m, Matrix3::identity(), epsilon = 1e-4);
    }

    #[test]
    fn test_composition_order_matches_world_space_rotation() {
        let path = default_path();
        let mut state = RollingState::new();
        // Finish AB and roll part of BC.
        for _ in 0..305 + 40 {
            state.advance(&path, 1.0, 2.0);
        }
        assert_eq!(state.segment(), 1);
        let pose = compute_pose(&state, &path, 1.0);

        let ab = segment_rotation(path.segment(0), 610.0);
        let bc = segment_rotation(path.segment(1), 80.0);
        assert_relative_eq!(pose.rotation, bc * ab, epsilon = 1e-4);
    }

    #[test]
    fn test_row_major_layout() {
        let pose = Pose {
            translation: Point3::new(1.0, 2.0, 3.0),
            rotation: UnitQuaternion::identity(),
        };
        let rows = pose.to_row_major();
        assert_eq!(rows[0], [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(rows[1], [0.0, 1.0, 0.0, 2.0]);
        assert_eq!(rows[2], [0.0, 0.0, 1.0, 3.0]);
        assert_eq!(rows[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_model_matrix_scales_by_radius() {
        let pose = Pose {
            translation: Point3::origin(),
            rotation: UnitQuaternion::identity(),
        };
        let surface = pose.model_matrix(0.5).transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(surface, Point3::new(0.5, 0.0, 0.0));
    }
}
