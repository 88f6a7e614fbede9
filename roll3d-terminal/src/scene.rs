/// Static meshes of the rolling scene
use nalgebra::{Point3, Vector3};
use roll3d_core::{Mesh, SceneConfig};

/// Edge length of one floor tile and of one axis bar piece
const TILE_SIZE: f32 = 1.0;

/// Length and thickness of the coordinate axis bars
const AXIS_LENGTH: f32 = 50.0;
const AXIS_THICKNESS: f32 = 0.1;

/// Everything drawn besides the shadow, built once at start-up.
///
/// Large meshes are split into small pieces so a piece crossing the view
/// frustum only drops itself rather than the whole object.
pub struct SceneMeshes {
    /// Floor tiles split by checker parity
    pub floor: [Mesh; 2],
    /// Bars along x, y and z
    pub axes: [Mesh; 3],
    pub sphere_smooth: Mesh,
    pub sphere_flat: Mesh,
}

impl SceneMeshes {
    pub fn new(config: &SceneConfig, sphere: Mesh) -> Self {
        Self {
            floor: checker_floor(config.floor_corners(), config.up()),
            axes: [
                axis_bar(Vector3::x()),
                axis_bar(Vector3::y()),
                axis_bar(Vector3::z()),
            ],
            sphere_flat: sphere.flat_shaded(),
            sphere_smooth: sphere,
        }
    }

    pub fn sphere(&self, flat: bool) -> &Mesh {
        if flat {
            &self.sphere_flat
        } else {
            &self.sphere_smooth
        }
    }
}

/// Tile the floor quad and sort tiles into the two checker colours
fn checker_floor(corners: [Point3<f32>; 4], up: Vector3<f32>) -> [Mesh; 2] {
    let [c0, c1, c2, c3] = corners;
    let columns = tile_count((c1 - c0).norm());
    let rows = tile_count((c3 - c0).norm());

    let at = |i: usize, j: usize| {
        let u = i as f32 / columns as f32;
        let v = j as f32 / rows as f32;
        let near = c0 + (c1 - c0) * u;
        let far = c3 + (c2 - c3) * u;
        near + (far - near) * v
    };

    let mut tiles = [Mesh::new(), Mesh::new()];
    for j in 0..rows {
        for i in 0..columns {
            let tile = Mesh::floor([at(i, j), at(i + 1, j), at(i + 1, j + 1), at(i, j + 1)], up);
            tiles[(i + j) % 2].append(tile);
        }
    }
    tiles
}

/// Thin bar from the origin along `direction`
fn axis_bar(direction: Vector3<f32>) -> Mesh {
    let half = Vector3::repeat(AXIS_THICKNESS / 2.0) - direction * (AXIS_THICKNESS / 2.0);
    let pieces = tile_count(AXIS_LENGTH);
    let step = AXIS_LENGTH / pieces as f32;

    let mut bar = Mesh::with_capacity(pieces * 12);
    for k in 0..pieces {
        let start = Point3::from(direction * (k as f32 * step));
        let end = Point3::from(direction * ((k + 1) as f32 * step));
        bar.append(Mesh::cuboid(start - half, end + half));
    }
    bar
}

fn tile_count(length: f32) -> usize {
    ((length / TILE_SIZE).ceil() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_floor_tiles() {
        let meshes = SceneMeshes::new(&SceneConfig::default(), Mesh::uv_sphere(4, 6));
        // 10 x 12 tiles, two triangles each
        assert_eq!(meshes.floor[0].len() + meshes.floor[1].len(), 240);
        assert_eq!(meshes.floor[0].len(), meshes.floor[1].len());
        for tile in meshes.floor.iter().flat_map(|m| &m.triangles) {
            assert_relative_eq!(tile.calculate_normal(), Vector3::y(), epsilon = 1e-5);
        }
    }

    #[test]
    fn test_axis_bar_extent() {
        let bar = axis_bar(Vector3::z());
        assert_eq!(bar.len(), 50 * 12);
        let max_z = bar
            .triangles
            .iter()
            .flat_map(|t| t.vertices.iter())
            .map(|v| v.position.z)
            .fold(f32::MIN, f32::max);
        let max_x = bar
            .triangles
            .iter()
            .flat_map(|t| t.vertices.iter())
            .map(|v| v.position.x)
            .fold(f32::MIN, f32::max);
        assert_relative_eq!(max_z, AXIS_LENGTH, epsilon = 1e-4);
        assert_relative_eq!(max_x, AXIS_THICKNESS / 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_sphere_variants() {
        let meshes = SceneMeshes::new(&SceneConfig::default(), Mesh::uv_sphere(4, 6));
        assert_eq!(meshes.sphere(true).len(), meshes.sphere(false).len());
        assert_ne!(meshes.sphere(true), meshes.sphere(false));
    }
}
