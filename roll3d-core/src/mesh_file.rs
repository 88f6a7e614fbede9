/// Reader for the plain-text sphere mesh format
///
/// The file holds a polygon count followed by that many polygons, each given
/// as a vertex count and then `x y z` for every vertex:
///
/// ```text
/// 2
/// 3  0.0 1.0 0.0   1.0 0.0 0.0   0.0 0.0 1.0
/// 3  0.0 1.0 0.0   0.0 0.0 1.0  -1.0 0.0 0.0
/// ```
use std::fs;
use std::path::Path;

use nalgebra::{Point3, Vector3};
use nom::{
    character::complete::{multispace0, u32 as decimal},
    multi::count,
    number::complete::float,
    sequence::preceded,
    IResult,
};

use crate::error::{Error, Result};
use crate::geometry::{Mesh, Triangle, Vertex};

/// Parse mesh text into a triangle mesh.
///
/// Polygons with more than three vertices are fan-triangulated. Vertex
/// normals point away from the origin, which is correct for a sphere
/// centred there.
pub fn parse_mesh_file(input: &str) -> Result<Mesh> {
    let polygons = match parse_polygons(input) {
        Ok((rest, polygons)) if rest.is_empty() => polygons,
        Ok((rest, _)) => {
            let snippet: String = rest.chars().take(16).collect();
            return Err(Error::MeshParse(format!("unexpected trailing data near {:?}", snippet)));
        }
        Err(e) => return Err(Error::MeshParse(format!("{:?}", e))),
    };

    let mut mesh = Mesh::with_capacity(polygons.len());
    for (index, polygon) in polygons.iter().enumerate() {
        if polygon.len() < 3 {
            return Err(Error::MeshParse(format!(
                "polygon {} has {} vertices, need at least 3",
                index,
                polygon.len()
            )));
        }
        for i in 1..polygon.len() - 1 {
            mesh.add_triangle(radial_triangle(polygon[0], polygon[i], polygon[i + 1]));
        }
    }

    log::debug!("parsed mesh: {} polygons, {} triangles", polygons.len(), mesh.len());
    Ok(mesh)
}

/// Read and parse a mesh file from disk
pub fn load_mesh_file<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let text = fs::read_to_string(path.as_ref())?;
    log::info!("loading mesh from {}", path.as_ref().display());
    parse_mesh_file(&text)
}

fn radial_triangle(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Triangle {
    let face = Triangle::new(
        Vertex::new(a, Vector3::zeros()),
        Vertex::new(b, Vector3::zeros()),
        Vertex::new(c, Vector3::zeros()),
    )
    .calculate_normal();
    let vertex = |p: Point3<f32>| {
        let normal = p.coords.try_normalize(f32::EPSILON).unwrap_or(face);
        Vertex::new(p, normal)
    };
    Triangle::new(vertex(a), vertex(b), vertex(c))
}

fn parse_polygons(input: &str) -> IResult<&str, Vec<Vec<Point3<f32>>>> {
    let (input, polygon_count) = preceded(multispace0, decimal)(input)?;
    let (input, polygons) = count(parse_polygon, polygon_count as usize)(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, polygons))
}

fn parse_polygon(input: &str) -> IResult<&str, Vec<Point3<f32>>> {
    let (input, vertex_count) = preceded(multispace0, decimal)(input)?;
    count(parse_point, vertex_count as usize)(input)
}

fn parse_point(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, x) = preceded(multispace0, float)(input)?;
    let (input, y) = preceded(multispace0, float)(input)?;
    let (input, z) = preceded(multispace0, float)(input)?;
    Ok((input, Point3::new(x, y, z)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_triangles() {
        let text = "2\n3\n0.0 1.0 0.0\n1.0 0.0 0.0\n0.0 0.0 1.0\n3 0 1 0 0 0 1 -1 0 0\n";
        let mesh = parse_mesh_file(text).unwrap();
        assert_eq!(mesh.len(), 2);
        assert_relative_eq!(mesh.triangles[1].vertices[2].position, Point3::new(-1.0, 0.0, 0.0));
        assert_relative_eq!(
            mesh.triangles[0].vertices[1].normal,
            Vector3::new(1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_fan_triangulates_quads() {
        let text = "1 4  1 1 0  -1 1 0  -1 -1 0  1 -1 0";
        let mesh = parse_mesh_file(text).unwrap();
        assert_eq!(mesh.len(), 2);
        assert_eq!(mesh.triangles[0].vertices[0].position, mesh.triangles[1].vertices[0].position);
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = parse_mesh_file("0\n").unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_rejects_short_polygon() {
        let result = parse_mesh_file("1 2 0 0 0 1 1 1");
        assert!(matches!(result, Err(Error::MeshParse(_))));
    }

    #[test]
    fn test_rejects_truncated_file() {
        let result = parse_mesh_file("2 3 0 1 0 1 0 0 0 0 1 3 0 1");
        assert!(matches!(result, Err(Error::MeshParse(_))));
    }

    #[test]
    fn test_rejects_trailing_data() {
        let result = parse_mesh_file("1 3 0 1 0 1 0 0 0 0 1 garbage");
        assert!(matches!(result, Err(Error::MeshParse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_mesh_file("/nonexistent/sphere.txt");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
