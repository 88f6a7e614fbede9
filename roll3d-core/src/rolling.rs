/// No-slip rolling state machine
use nalgebra::UnitQuaternion;

use crate::path::{Segment, SegmentTable};

/// Arc length covered after rolling `angle_deg` degrees on a sphere of `radius`
pub fn arc_length(angle_deg: f64, radius: f32) -> f64 {
    angle_deg.to_radians() * f64::from(radius)
}

/// Rotation produced by rolling `angle_deg` degrees along `segment`
pub fn segment_rotation(segment: &Segment, angle_deg: f32) -> UnitQuaternion<f32> {
    UnitQuaternion::from_axis_angle(&segment.axis(), angle_deg.to_radians())
}

/// Emitted when the sphere finishes a segment and moves onto the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handoff {
    pub from: usize,
    pub to: usize,
}

/// Where the sphere is on the path and how it has turned so far
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingState {
    segment: usize,
    /// Summed in f64 so slow speeds hand off on the exact tick
    angle_deg: f64,
    carried: UnitQuaternion<f32>,
}

impl RollingState {
    /// Segment 0, no rotation
    pub fn new() -> Self {
        Self {
            segment: 0,
            angle_deg: 0.0,
            carried: UnitQuaternion::identity(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Index of the segment being rolled along
    pub fn segment(&self) -> usize {
        self.segment
    }

    /// Angle rolled on the active segment, in degrees
    pub fn angle_deg(&self) -> f32 {
        self.angle_deg as f32
    }

    /// Orientation accumulated from every completed segment
    pub fn carried(&self) -> UnitQuaternion<f32> {
        self.carried
    }

    /// Distance covered on the active segment
    pub fn distance_traveled(&self, radius: f32) -> f32 {
        arc_length(self.angle_deg, radius) as f32
    }

    /// Roll forward by `degrees_per_tick`.
    ///
    /// Once the arc length reaches the active segment's length the whole
    /// segment rotation is folded into the carried orientation (applied after
    /// the rotations already carried), the index moves to the next segment
    /// and the angle restarts at zero. Any overshoot within the last tick is
    /// dropped rather than carried over as angle.
    pub fn advance(
        &mut self,
        path: &SegmentTable,
        radius: f32,
        degrees_per_tick: f32,
    ) -> Option<Handoff> {
        self.angle_deg += f64::from(degrees_per_tick);

        let segment = path.segment(self.segment);
        if arc_length(self.angle_deg, radius) < f64::from(segment.length()) {
            return None;
        }

        let mut carried = segment_rotation(segment, self.angle_deg()) * self.carried;
        carried.renormalize();
        self.carried = carried;

        let from = self.segment;
        self.segment = (self.segment + 1) % path.len();
        self.angle_deg = 0.0;

        Some(Handoff {
            from,
            to: self.segment,
        })
    }
}

impl Default for RollingState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};

    const SPEED: f32 = 2.0;

    fn default_path() -> SegmentTable {
        SegmentTable::triangle(
            Point3::new(-4.0, 1.0, 4.0),
            Point3::new(3.0, 1.0, -4.0),
            Point3::new(-3.0, 1.0, -3.0),
            Vector3::y(),
        )
        .unwrap()
    }

    fn ticks_to_finish(length: f32, radius: f32, speed: f32) -> usize {
        let exact = f64::from(length) * 180.0 / (std::f64::consts::PI * f64::from(radius) * f64::from(speed));
        exact.ceil() as usize
    }

    #[test]
    fn test_first_tick() {
        let path = default_path();
        let mut state = RollingState::new();
        assert_eq!(state.advance(&path, 1.0, SPEED), None);
        assert_eq!(state.segment(), 0);
        assert_relative_eq!(state.angle_deg(), 2.0);
        assert_relative_eq!(state.distance_traveled(1.0), 0.034_906_6, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_speed_is_noop() {
        let path = default_path();
        let mut state = RollingState::new();
        state.advance(&path, 1.0, SPEED);
        let before = state;
        for _ in 0..100 {
            assert_eq!(state.advance(&path, 1.0, 0.0), None);
        }
        assert_eq!(state, before);
    }

    #[test]
    fn test_handoff_after_exact_tick_count() {
        let path = default_path();
        let mut state = RollingState::new();
        let expected = ticks_to_finish(path.segment(0).length(), 1.0, SPEED);
        assert_eq!(expected, 305);

        for _ in 1..expected {
            assert_eq!(state.advance(&path, 1.0, SPEED), None);
        }
        let handoff = state.advance(&path, 1.0, SPEED);
        assert_eq!(handoff, Some(Handoff { from: 0, to: 1 }));
        assert_eq!(state.segment(), 1);
        assert_eq!(state.angle_deg(), 0.0);
    }

    #[test]
    fn test_handoff_tick_matches_formula_for_slow_speeds() {
        let path = default_path();
        for step in 1..=200 {
            let speed = step as f32 * 0.01;
            let mut state = RollingState::new();
            for segment in path.iter() {
                let expected = ticks_to_finish(segment.length(), 1.0, speed);
                let mut ticks = 1;
                while state.advance(&path, 1.0, speed).is_none() {
                    ticks += 1;
                }
                assert_eq!(ticks, expected, "speed {}", speed);
            }
            assert_eq!(state.segment(), 0);
        }
    }

    #[test]
    fn test_handoff_tick_with_other_radius() {
        let path = default_path();
        let (radius, speed) = (0.7, 0.13);
        let mut state = RollingState::new();
        let expected = ticks_to_finish(path.segment(0).length(), radius, speed);
        let mut ticks = 1;
        while state.advance(&path, radius, speed).is_none() {
            ticks += 1;
        }
        assert_eq!(ticks, expected);
    }

    #[test]
    fn test_handoff_carries_full_segment_rotation() {
        let path = default_path();
        let mut state = RollingState::new();
        let ticks = ticks_to_finish(path.segment(0).length(), 1.0, SPEED);
        for _ in 0..ticks {
            state.advance(&path, 1.0, SPEED);
        }
        let expected = segment_rotation(path.segment(0), ticks as f32 * SPEED);
        assert_relative_eq!(state.carried(), expected, epsilon = 1e-5);
    }

    #[test]
    fn test_cycle_wraps_to_first_segment() {
        let path = default_path();
        let mut state = RollingState::new();
        let mut handoffs = Vec::new();
        let total: usize = path
            .iter()
            .map(|s| ticks_to_finish(s.length(), 1.0, SPEED))
            .sum();
        for _ in 0..total {
            if let Some(handoff) = state.advance(&path, 1.0, SPEED) {
                handoffs.push(handoff);
            }
        }
        assert_eq!(
            handoffs,
            vec![
                Handoff { from: 0, to: 1 },
                Handoff { from: 1, to: 2 },
                Handoff { from: 2, to: 0 },
            ]
        );
        assert_eq!(state.segment(), 0);
        assert_eq!(state.angle_deg(), 0.0);
    }

    #[test]
    fn test_distance_never_exceeds_segment() {
        let path = default_path();
        let radius = 0.5;
        let mut state = RollingState::new();
        for _ in 0..5_000 {
            state.advance(&path, radius, 3.5);
            let length = path.segment(state.segment()).length();
            assert!(state.distance_traveled(radius) < length);
        }
    }

    #[test]
    fn test_carried_orientation_stays_unit_after_many_ticks() {
        let path = default_path();
        let mut state = RollingState::new();
        for _ in 0..10_000 {
            state.advance(&path, 1.0, 7.0);
        }
        let matrix = state.carried().to_rotation_matrix().into_inner();
        assert_relative_eq!(matrix.determinant(), 1.0, epsilon = 1e-4);
        assert_relative_eq!(matrix * matrix.transpose(), nalgebra::Matrix3::identity(), epsilon = 1e-4);
    }

    #[test]
    fn test_reset() {
        let path = default_path();
        let mut state = RollingState::new();
        for _ in 0..400 {
            state.advance(&path, 1.0, SPEED);
        }
        assert_eq!(state.segment(), 1);
        state.reset();
        assert_eq!(state, RollingState::new());
    }
}
