/// Closed rolling path made of directed floor segments
use nalgebra::{Point3, Unit, Vector3};

use crate::error::{Error, Result};

/// Relative tolerance for the parallel-to-up test
const PARALLEL_EPSILON: f32 = 1e-6;

/// Maximum gap allowed between a segment end and the next segment start
const CLOSURE_TOLERANCE: f32 = 1e-4;

/// A directed path segment with its rolling geometry precomputed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point3<f32>,
    pub end: Point3<f32>,
    dir: Vector3<f32>,
    length: f32,
    axis: Unit<Vector3<f32>>,
}

impl Segment {
    /// Direction vector `end - start` (not normalized)
    pub fn dir(&self) -> Vector3<f32> {
        self.dir
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    /// Rolling axis, `normalize(cross(up, dir))`
    pub fn axis(&self) -> Unit<Vector3<f32>> {
        self.axis
    }

    /// Point reached after travelling `distance` along the segment
    pub fn point_at(&self, distance: f32) -> Point3<f32> {
        self.start + self.dir * (distance / self.length)
    }
}

/// Immutable cycle of segments the sphere rolls along
#[derive(Debug, Clone)]
pub struct SegmentTable {
    segments: Vec<Segment>,
    up: Unit<Vector3<f32>>,
}

impl SegmentTable {
    /// Validate explicit `(start, end)` pairs, including closure of the cycle
    pub fn new(pairs: &[(Point3<f32>, Point3<f32>)], up: Vector3<f32>) -> Result<Self> {
        if pairs.len() < 2 {
            return Err(Error::TooFewSegments(pairs.len()));
        }
        let up = Unit::try_new(up, f32::EPSILON).ok_or(Error::ZeroUpVector)?;

        let segments = pairs
            .iter()
            .enumerate()
            .map(|(index, &(start, end))| build_segment(index, start, end, &up))
            .collect::<Result<Vec<_>>>()?;

        for (index, segment) in segments.iter().enumerate() {
            let next = &segments[(index + 1) % segments.len()];
            if (segment.end - next.start).norm() > CLOSURE_TOLERANCE {
                return Err(Error::PathNotClosed { index });
            }
        }

        Ok(Self { segments, up })
    }

    /// Build the closed polygon `p0 -> p1 -> ... -> p(n-1) -> p0`
    pub fn from_waypoints(points: &[Point3<f32>], up: Vector3<f32>) -> Result<Self> {
        let pairs: Vec<_> = points
            .iter()
            .enumerate()
            .map(|(i, &start)| (start, points[(i + 1) % points.len()]))
            .collect();
        Self::new(&pairs, up)
    }

    /// The triangular path `a -> b -> c -> a`
    pub fn triangle(
        a: Point3<f32>,
        b: Point3<f32>,
        c: Point3<f32>,
        up: Vector3<f32>,
    ) -> Result<Self> {
        Self::from_waypoints(&[a, b, c], up)
    }

    /// Segment at `index`, wrapping around the cycle
    pub fn segment(&self, index: usize) -> &Segment {
        &self.segments[index % self.segments.len()]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false: construction rejects empty paths
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn up(&self) -> Unit<Vector3<f32>> {
        self.up
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Sum of all segment lengths
    pub fn perimeter(&self) -> f32 {
        self.segments.iter().map(Segment::length).sum()
    }
}

fn build_segment(
    index: usize,
    start: Point3<f32>,
    end: Point3<f32>,
    up: &Unit<Vector3<f32>>,
) -> Result<Segment> {
    let dir = end - start;
    let length = dir.norm();
    if length <= f32::EPSILON {
        return Err(Error::ZeroLengthSegment { index });
    }

    let cross = up.cross(&dir);
    if cross.norm() <= PARALLEL_EPSILON * length {
        return Err(Error::AxisParallelToUp { index });
    }

    Ok(Segment {
        start,
        end,
        dir,
        length,
        axis: Unit::new_normalize(cross),
    })
}
