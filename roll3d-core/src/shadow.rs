/// Planar shadow projection onto the floor
use nalgebra::{Matrix4, Point3, Unit, Vector3, Vector4};

use crate::error::{Error, Result};
use crate::pose::Pose;

/// Plane `normal . x + offset = 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorPlane {
    pub normal: Unit<Vector3<f32>>,
    pub offset: f32,
}

impl FloorPlane {
    pub fn new(normal: Vector3<f32>, offset: f32) -> Result<Self> {
        // Keep the equation's scale consistent when normalizing.
        let norm = normal.norm();
        if norm <= f32::EPSILON {
            return Err(Error::ZeroFloorNormal);
        }
        Ok(Self {
            normal: Unit::new_unchecked(normal / norm),
            offset: offset / norm,
        })
    }

    /// The `y = 0` plane
    pub fn ground() -> Self {
        Self {
            normal: Vector3::y_axis(),
            offset: 0.0,
        }
    }

    /// Signed distance of `point` from the plane
    pub fn distance(&self, point: &Point3<f32>) -> f32 {
        self.normal.dot(&point.coords) + self.offset
    }

    fn coefficients(&self) -> Vector4<f32> {
        Vector4::new(self.normal.x, self.normal.y, self.normal.z, self.offset)
    }
}

/// Shadow projection for a single fixed point light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowProjector {
    light: Point3<f32>,
    plane: FloorPlane,
    projection: Matrix4<f32>,
    anchor: Matrix4<f32>,
}

impl ShadowProjector {
    /// Build the projection once; `anchor` offsets the flattened silhouette
    /// (usually a small lift off the floor).
    pub fn new(light: Point3<f32>, plane: FloorPlane, anchor: Vector3<f32>) -> Result<Self> {
        if plane.distance(&light).abs() <= f32::EPSILON {
            return Err(Error::LightOnFloorPlane);
        }
        Ok(Self {
            light,
            plane,
            projection: planar_shadow_matrix(&light, &plane),
            anchor: Matrix4::new_translation(&anchor),
        })
    }

    pub fn light(&self) -> Point3<f32> {
        self.light
    }

    pub fn plane(&self) -> FloorPlane {
        self.plane
    }

    pub fn projection(&self) -> Matrix4<f32> {
        self.projection
    }

    /// `anchor * projection * pose`
    pub fn shadow_transform(&self, pose: &Pose) -> Matrix4<f32> {
        self.project_model(&pose.to_homogeneous())
    }

    /// `anchor * projection * model` for any model matrix
    pub fn project_model(&self, model: &Matrix4<f32>) -> Matrix4<f32> {
        self.anchor * self.projection * model
    }
}

/// `(P . L) I - L P^T`: flattens points onto plane `P` along rays from `L`
fn planar_shadow_matrix(light: &Point3<f32>, plane: &FloorPlane) -> Matrix4<f32> {
    let l = light.to_homogeneous();
    let p = plane.coefficients();
    Matrix4::identity() * p.dot(&l) - l * p.transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;

    fn projector() -> ShadowProjector {
        ShadowProjector::new(Point3::new(-14.0, 12.0, -3.0), FloorPlane::ground(), Vector3::zeros())
            .unwrap()
    }

    #[test]
    fn test_ground_projection_matches_classic_matrix() {
        let m = projector().projection();
        #[rustfmt::skip]
        let expected = Matrix4::new(
            12.0, 14.0,  0.0,  0.0,
             0.0,  0.0,  0.0,  0.0,
             0.0,  3.0, 12.0,  0.0,
             0.0, -1.0,  0.0, 12.0,
        );
        assert_relative_eq!(m, expected);
    }

    #[test]
    fn test_shadow_points_land_on_floor_along_light_ray() {
        let projector = projector();
        let light = projector.light();
        let model = Matrix4::identity();
        for point in [
            Point3::new(-4.0, 1.0, 4.0),
            Point3::new(3.0, 2.0, -4.0),
            Point3::new(0.5, 0.25, 0.5),
        ] {
            let shadow = projector.project_model(&model).transform_point(&point);
            assert_relative_eq!(shadow.y, 0.0, epsilon = 1e-5);
            let to_point = (point - light).normalize();
            let to_shadow = (shadow - light).normalize();
            assert_relative_eq!(to_point, to_shadow, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_shadow_transform_uses_pose() {
        let projector = projector();
        let pose = Pose {
            translation: Point3::new(1.0, 1.0, 1.0),
            rotation: UnitQuaternion::identity(),
        };
        let center = projector.shadow_transform(&pose).transform_point(&Point3::origin());
        let direct = projector.project_model(&Matrix4::identity()).transform_point(&Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(center, direct, epsilon = 1e-5);
    }

    #[test]
    fn test_anchor_lifts_shadow() {
        let projector = ShadowProjector::new(
            Point3::new(-14.0, 12.0, -3.0),
            FloorPlane::ground(),
            Vector3::new(0.0, 0.01, 0.0),
        )
        .unwrap();
        let shadow = projector
            .project_model(&Matrix4::identity())
            .transform_point(&Point3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(shadow.y, 0.01, epsilon = 1e-6);
    }

    #[test]
    fn test_tilted_plane() {
        let plane = FloorPlane::new(Vector3::new(0.0, 2.0, 0.0), -2.0).unwrap();
        assert_relative_eq!(plane.offset, -1.0);
        let projector = ShadowProjector::new(Point3::new(0.0, 10.0, 0.0), plane, Vector3::zeros()).unwrap();
        let shadow = projector
            .project_model(&Matrix4::identity())
            .transform_point(&Point3::new(2.0, 5.5, 0.0));
        assert_relative_eq!(plane.distance(&shadow), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_rejects_light_on_plane() {
        let result = ShadowProjector::new(Point3::new(1.0, 0.0, 1.0), FloorPlane::ground(), Vector3::zeros());
        assert!(matches!(result, Err(Error::LightOnFloorPlane)));
        assert!(matches!(FloorPlane::new(Vector3::zeros(), 1.0), Err(Error::ZeroFloorNormal)));
    }
}
