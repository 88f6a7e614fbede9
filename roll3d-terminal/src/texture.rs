/// Procedural sphere textures
///
/// Texture coordinates are generated from a point's position, either in the
/// sphere's own (unrotated) frame so the pattern rolls with the sphere, or in
/// eye space so it stays fixed to the viewer.
use crossterm::style::Color;
use nalgebra::Point3;

/// Checks per texture repeat along each coordinate
const CHECKS_PER_REPEAT: f32 = 4.0;

/// Share of each contour repeat drawn as the line
const CONTOUR_LINE_WIDTH: f32 = 5.0 / 32.0;

const CHECKER_COLORS: [Color; 2] = [Color::Red, Color::White];
const CONTOUR_LINE: Color = Color::Red;
const CONTOUR_FILL: Color = Color::Yellow;

/// What is painted on the sphere
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Checker,
    Contour,
}

/// Direction the texture coordinates run in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Along the x axis; contour lines come out vertical
    Vertical,
    /// Along the x + y + z diagonal
    Slanted,
}

/// Frame the texture coordinates are taken in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSpace {
    Object,
    Eye,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SphereTexture {
    pub pattern: Pattern,
    pub orientation: Orientation,
    pub space: TextureSpace,
}

impl Default for SphereTexture {
    fn default() -> Self {
        Self {
            pattern: Pattern::Checker,
            orientation: Orientation::Slanted,
            space: TextureSpace::Object,
        }
    }
}

impl SphereTexture {
    /// Texture coordinates `(s, t)` for a point in the chosen space
    pub fn coords(&self, p: &Point3<f32>) -> (f32, f32) {
        match (self.pattern, self.orientation) {
            (Pattern::Contour, Orientation::Vertical) => (2.5 * p.x, 0.0),
            (Pattern::Contour, Orientation::Slanted) => (1.5 * (p.x + p.y + p.z), 0.0),
            (Pattern::Checker, Orientation::Vertical) => (0.75 * (p.x + 1.0), 0.75 * (p.y + 1.0)),
            (Pattern::Checker, Orientation::Slanted) => {
                (0.45 * (p.x + p.y + p.z), 0.45 * (p.x - p.y + p.z))
            }
        }
    }

    /// Colour at texture coordinates `(s, t)`; the pattern repeats every unit
    pub fn color(&self, (s, t): (f32, f32)) -> Color {
        match self.pattern {
            Pattern::Checker => {
                let cell = (s * CHECKS_PER_REPEAT).floor() + (t * CHECKS_PER_REPEAT).floor();
                CHECKER_COLORS[cell.rem_euclid(2.0) as usize]
            }
            Pattern::Contour => {
                if s.rem_euclid(1.0) < CONTOUR_LINE_WIDTH {
                    CONTOUR_LINE
                } else {
                    CONTOUR_FILL
                }
            }
        }
    }
}

/// Checker, then contour lines, then untextured
pub fn next_pattern(texture: Option<Pattern>) -> Option<Pattern> {
    match texture {
        Some(Pattern::Checker) => Some(Pattern::Contour),
        Some(Pattern::Contour) => None,
        None => Some(Pattern::Checker),
    }
}
