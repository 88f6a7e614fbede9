/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Default viewer position
pub const DEFAULT_EYE: [f32; 3] = [7.0, 3.0, -10.0];

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub home: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    /// Perspective camera looking at the origin from `eye`
    pub fn new(eye: Point3<f32>, aspect: f32) -> Self {
        Self {
            position: eye,
            home: eye,
            target: Point3::origin(),
            up: Vector3::y(),
            fov: 45.0_f32.to_radians(),
            aspect,
            near: 0.5,
            far: 50.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Aspect ratio for a `width` x `height` viewport whose pixels are
    /// `cell_aspect` times as wide as they are tall
    pub fn set_viewport(&mut self, width: u32, height: u32, cell_aspect: f32) {
        self.aspect = width as f32 * cell_aspect / height.max(1) as f32;
    }

    /// Move the viewer by the given offsets
    pub fn move_eye(&mut self, dx: f32, dy: f32, dz: f32) {
        self.position += Vector3::new(dx, dy, dz);
    }

    /// Put the viewer back where it started
    pub fn reset_eye(&mut self) {
        self.position = self.home;
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).norm();
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// `projection * view`, computed once per draw call
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a 3D point to 2D screen space, returning `(x, y, depth)`
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        project_with(&(self.view_projection() * model_matrix), point, width, height)
    }
}

/// Project through a precomputed model-view-projection matrix
pub fn project_with(
    mvp: &Matrix4<f32>,
    point: &Point3<f32>,
    width: u32,
    height: u32,
) -> Option<(f32, f32, f32)> {
    let clip = mvp * point.to_homogeneous();

    // Behind the eye or on the camera plane
    if clip.w <= 1e-6 {
        return None;
    }

    let ndc = clip.xyz() / clip.w;

    // Clip test; x and y get a margin so triangles crossing the border
    // are still rasterized and cut at the screen edge
    if ndc.z < -1.0 || ndc.z > 1.0 || ndc.x.abs() > 4.0 || ndc.y.abs() > 4.0 {
        return None;
    }

    // Convert to screen space
    let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

    Some((screen_x, screen_y, ndc.z))
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Point3::from(DEFAULT_EYE), 800.0 / 600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::default();
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_relative_eq!(camera.fov, std::f32::consts::FRAC_PI_4);
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::default();
        let view = camera.view_matrix();
        // View matrix should be non-zero
        assert!(view.norm() > 0.0);
    }

    #[test]
    fn test_target_projects_to_center() {
        let camera = Camera::default();
        let (x, y, depth) = camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 80, 24)
            .unwrap();
        assert_relative_eq!(x, 40.0, epsilon = 1e-3);
        assert_relative_eq!(y, 12.0, epsilon = 1e-3);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_point_behind_camera_is_clipped() {
        let camera = Camera::default();
        let behind = Point3::new(14.0, 6.0, -20.0);
        assert!(camera
            .project_to_screen(&behind, &Matrix4::identity(), 80, 24)
            .is_none());
    }

    #[test]
    fn test_move_and_reset_eye() {
        let mut camera = Camera::default();
        camera.move_eye(1.0, -1.0, 0.0);
        assert_relative_eq!(camera.position, Point3::new(8.0, 2.0, -10.0));
        camera.reset_eye();
        assert_relative_eq!(camera.position, Point3::from(DEFAULT_EYE));
    }

    #[test]
    fn test_orthographic_keeps_size_with_depth() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 10.0), 1.0);
        camera.mode = ProjectionMode::Orthographic;
        let identity = Matrix4::identity();
        let near = camera.project_to_screen(&Point3::new(1.0, 0.0, 2.0), &identity, 80, 80).unwrap();
        let far = camera.project_to_screen(&Point3::new(1.0, 0.0, -2.0), &identity, 80, 80).unwrap();
        assert_relative_eq!(near.0, far.0, epsilon = 1e-3);
        assert!(near.2 < far.2);
    }

    #[test]
    fn test_viewport_aspect() {
        let mut camera = Camera::default();
        camera.set_viewport(120, 40, 0.5);
        assert_relative_eq!(camera.aspect, 1.5);
    }
}
