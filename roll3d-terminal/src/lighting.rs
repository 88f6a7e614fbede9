/// Per-vertex lighting and fog for the ASCII renderer
use nalgebra::{Point3, Vector3};

const AMBIENT: f32 = 0.2;
const DIRECTIONAL_DIFFUSE: f32 = 0.8;
const POSITIONAL_DIFFUSE: f32 = 1.0;

/// Scales the attenuated positional term back into the character ramp
const POSITIONAL_GAIN: f32 = 2.0;

const CONST_ATTENUATION: f32 = 2.0;
const LINEAR_ATTENUATION: f32 = 0.01;
const QUADRATIC_ATTENUATION: f32 = 0.001;

/// Spot light aim point, exponent and cutoff half-angle (degrees)
const SPOT_TARGET: [f32; 3] = [-6.0, 0.0, -4.5];
const SPOT_EXPONENT: f32 = 15.0;
const SPOT_CUTOFF_DEG: f32 = 20.0;

const FOG_START: f32 = 0.0;
const FOG_END: f32 = 18.0;
const FOG_DENSITY: f32 = 0.09;

/// Kind of positional light
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightSource {
    Spot,
    Point,
}

/// Depth fog applied on top of lighting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fog {
    Off,
    Linear,
    Exponential,
    ExponentialSquared,
}

impl Fog {
    pub fn next(self) -> Self {
        match self {
            Fog::Off => Fog::Linear,
            Fog::Linear => Fog::Exponential,
            Fog::Exponential => Fog::ExponentialSquared,
            Fog::ExponentialSquared => Fog::Off,
        }
    }

    /// Fraction of the lit colour that survives at `distance` from the eye
    pub fn visibility(self, distance: f32) -> f32 {
        let f = match self {
            Fog::Off => 1.0,
            Fog::Linear => (FOG_END - distance) / (FOG_END - FOG_START),
            Fog::Exponential => (-FOG_DENSITY * distance).exp(),
            Fog::ExponentialSquared => (-(FOG_DENSITY * distance).powi(2)).exp(),
        };
        f.clamp(0.0, 1.0)
    }
}

/// Scene lights; intensities are grey-scale in `[0, 1]`
#[derive(Debug, Clone)]
pub struct Lighting {
    pub enabled: bool,
    pub source: LightSource,
    pub fog: Fog,
    position: Point3<f32>,
    spot_direction: Vector3<f32>,
}

impl Lighting {
    pub fn new(position: Point3<f32>) -> Self {
        let spot_direction = (Point3::from(SPOT_TARGET) - position)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| -Vector3::y());
        Self {
            enabled: true,
            source: LightSource::Spot,
            fog: Fog::Off,
            position,
            spot_direction,
        }
    }

    pub fn toggle_source(&mut self) {
        self.source = match self.source {
            LightSource::Spot => LightSource::Point,
            LightSource::Point => LightSource::Spot,
        };
    }

    /// Intensity of a surface point seen from `eye`.
    ///
    /// The directional light shines from the viewer towards the scene.
    pub fn intensity(&self, point: &Point3<f32>, normal: &Vector3<f32>, eye: &Point3<f32>) -> f32 {
        let to_eye = eye - point;
        let lit = if self.enabled {
            let normal = normal.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros);
            let directional = to_eye
                .try_normalize(f32::EPSILON)
                .map_or(0.0, |l| DIRECTIONAL_DIFFUSE * normal.dot(&l).max(0.0));
            AMBIENT + directional + self.positional(point, &normal)
        } else {
            1.0
        };
        (lit * self.fog.visibility(to_eye.norm())).clamp(0.0, 1.0)
    }

    fn positional(&self, point: &Point3<f32>, normal: &Vector3<f32>) -> f32 {
        let to_light = self.position - point;
        let distance = to_light.norm();
        let Some(l) = to_light.try_normalize(f32::EPSILON) else {
            return 0.0;
        };

        let attenuation = 1.0
            / (CONST_ATTENUATION
                + LINEAR_ATTENUATION * distance
                + QUADRATIC_ATTENUATION * distance * distance);

        let spot = match self.source {
            LightSource::Point => 1.0,
            LightSource::Spot => {
                let cos_angle = (-l).dot(&self.spot_direction);
                if cos_angle < SPOT_CUTOFF_DEG.to_radians().cos() {
                    0.0
                } else {
                    cos_angle.powf(SPOT_EXPONENT)
                }
            }
        };

        POSITIONAL_GAIN * attenuation * spot * POSITIONAL_DIFFUSE * normal.dot(&l).max(0.0)
    }
}
