/// Geometry primitives for the rolling scene
use nalgebra::{Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Face normal from the winding order, zero for a degenerate triangle
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1
            .cross(&edge2)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Same triangle with every vertex normal replaced by the face normal
    pub fn flattened(&self) -> Self {
        let normal = self.calculate_normal();
        let mut flat = self.clone();
        for vertex in &mut flat.vertices {
            vertex.normal = normal;
        }
        flat
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Move every triangle of `other` into this mesh
    pub fn append(&mut self, mut other: Mesh) {
        self.triangles.append(&mut other.triangles);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Copy of the mesh shaded with face normals
    pub fn flat_shaded(&self) -> Self {
        Self {
            triangles: self.triangles.iter().map(Triangle::flattened).collect(),
        }
    }

    /// Floor quad from four corners, counter-clockwise seen from above
    pub fn floor(corners: [Point3<f32>; 4], up: Vector3<f32>) -> Self {
        let v = corners.map(|p| Vertex::new(p, up));
        let mut mesh = Self::with_capacity(2);
        mesh.add_triangle(Triangle::new(v[0], v[1], v[2]));
        mesh.add_triangle(Triangle::new(v[2], v[3], v[0]));
        mesh
    }

    /// Axis-aligned box between `min` and `max`
    pub fn cuboid(min: Point3<f32>, max: Point3<f32>) -> Self {
        let corner = |x: bool, y: bool, z: bool| {
            Point3::new(
                if x { max.x } else { min.x },
                if y { max.y } else { min.y },
                if z { max.z } else { min.z },
            )
        };
        // (normal, four corners counter-clockwise seen from outside)
        let faces = [
            (Vector3::z(), [corner(false, false, true), corner(true, false, true), corner(true, true, true), corner(false, true, true)]),
            (-Vector3::z(), [corner(true, false, false), corner(false, false, false), corner(false, true, false), corner(true, true, false)]),
            (Vector3::y(), [corner(false, true, true), corner(true, true, true), corner(true, true, false), corner(false, true, false)]),
            (-Vector3::y(), [corner(false, false, false), corner(true, false, false), corner(true, false, true), corner(false, false, true)]),
            (Vector3::x(), [corner(true, false, true), corner(true, false, false), corner(true, true, false), corner(true, true, true)]),
            (-Vector3::x(), [corner(false, false, false), corner(false, false, true), corner(false, true, true), corner(false, true, false)]),
        ];

        let mut mesh = Self::with_capacity(12);
        for (normal, quad) in faces {
            let v = quad.map(|p| Vertex::new(p, normal));
            mesh.add_triangle(Triangle::new(v[0], v[1], v[2]));
            mesh.add_triangle(Triangle::new(v[0], v[2], v[3]));
        }
        mesh
    }

    /// Unit sphere at the origin with smooth (radial) normals
    pub fn uv_sphere(stacks: usize, slices: usize) -> Self {
        let stacks = stacks.max(2);
        let slices = slices.max(3);
        let point = |stack: usize, slice: usize| {
            let theta = std::f32::consts::PI * stack as f32 / stacks as f32;
            let phi = std::f32::consts::TAU * slice as f32 / slices as f32;
            let p = Point3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
            Vertex::new(p, p.coords)
        };

        let mut mesh = Self::with_capacity(2 * stacks * slices);
        for stack in 0..stacks {
            for slice in 0..slices {
                let a = point(stack, slice);
                let b = point(stack + 1, slice);
                let c = point(stack + 1, slice + 1);
                let d = point(stack, slice + 1);
                if stack != 0 {
                    mesh.add_triangle(Triangle::new(a, d, c));
                }
                if stack + 1 != stacks {
                    mesh.add_triangle(Triangle::new(a, c, b));
                }
            }
        }
        mesh
    }
}
