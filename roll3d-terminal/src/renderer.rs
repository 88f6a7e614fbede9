/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3};
use std::io::Write;
use roll3d_core::{projection::project_with, Camera, Mesh, Triangle};

use crate::lighting::Lighting;
use crate::texture::{SphereTexture, TextureSpace};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// How a draw call picks its characters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shade {
    /// Lit per vertex and interpolated across the face
    Lit,
    /// One fixed character, no lighting
    Solid(char),
    /// Darken whatever is already drawn; empty cells get the character
    Blend(char),
}

/// Per-draw-call appearance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawStyle {
    pub color: Color,
    pub shade: Shade,
    pub wireframe: bool,
    /// Replaces `color` when set
    pub texture: Option<SphereTexture>,
}

impl DrawStyle {
    pub fn lit(color: Color) -> Self {
        Self {
            color,
            shade: Shade::Lit,
            wireframe: false,
            texture: None,
        }
    }

    pub fn solid(color: Color, character: char) -> Self {
        Self {
            color,
            shade: Shade::Solid(character),
            wireframe: false,
            texture: None,
        }
    }

    pub fn blend(color: Color, character: char) -> Self {
        Self {
            color,
            shade: Shade::Blend(character),
            wireframe: false,
            texture: None,
        }
    }

    pub fn wireframe(self, wireframe: bool) -> Self {
        Self { wireframe, ..self }
    }

    pub fn textured(self, texture: Option<SphereTexture>) -> Self {
        Self { texture, ..self }
    }
}

/// Screen-space vertex: position, depth, intensity and texture coordinates
#[derive(Debug, Clone, Copy, Default)]
struct ScreenVertex {
    x: f32,
    y: f32,
    depth: f32,
    intensity: f32,
    tex: (f32, f32),
}

impl ScreenVertex {
    fn interpolate(a: &Self, wa: f32, b: &Self, wb: f32, c: &Self, wc: f32) -> Self {
        Self {
            x: wa * a.x + wb * b.x + wc * c.x,
            y: wa * a.y + wb * b.y + wc * c.y,
            depth: wa * a.depth + wb * b.depth + wc * c.depth,
            intensity: wa * a.intensity + wb * b.intensity + wc * c.intensity,
            tex: (
                wa * a.tex.0 + wb * b.tex.0 + wc * c.tex.0,
                wa * a.tex.1 + wb * b.tex.1 + wc * c.tex.1,
            ),
        }
    }
}

/// Matrices and lights shared by every triangle of one draw call
struct DrawContext<'a> {
    model: &'a Matrix4<f32>,
    model_view: Matrix4<f32>,
    mvp: Matrix4<f32>,
    camera: &'a Camera,
    lighting: &'a Lighting,
    style: DrawStyle,
}

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
    /// Cells already darkened by a blended draw this frame
    blended: Vec<bool>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
            blended: vec![false; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
        self.blended.fill(false);
    }

    /// Character at a cell, mainly for inspection
    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    /// Colour at a cell, mainly for inspection
    pub fn color(&self, x: usize, y: usize) -> Option<Color> {
        (x < self.width && y < self.height).then(|| self.color_buffer[y * self.width + x])
    }

    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        lighting: &Lighting,
        style: DrawStyle,
    ) {
        let model_view = camera.view_matrix() * model_matrix;
        let context = DrawContext {
            model: model_matrix,
            mvp: camera.projection_matrix() * model_view,
            model_view,
            camera,
            lighting,
            style,
        };
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, &context);
        }
    }

    fn render_triangle(&mut self, triangle: &Triangle, context: &DrawContext) {
        let style = context.style;

        // Project vertices to screen space
        let mut screen = [ScreenVertex::default(); 3];
        for (out, vertex) in screen.iter_mut().zip(&triangle.vertices) {
            let Some((x, y, depth)) = project_with(
                &context.mvp,
                &vertex.position,
                self.width as u32,
                self.height as u32,
            ) else {
                return; // Triangle is clipped
            };

            let intensity = match style.shade {
                Shade::Lit => {
                    let world: Point3<f32> = context.model.transform_point(&vertex.position);
                    let normal = context.model.transform_vector(&vertex.normal);
                    context
                        .lighting
                        .intensity(&world, &normal, &context.camera.position)
                }
                Shade::Solid(_) | Shade::Blend(_) => 1.0,
            };

            let tex = match style.texture {
                Some(texture) => match texture.space {
                    TextureSpace::Object => texture.coords(&vertex.position),
                    TextureSpace::Eye => {
                        texture.coords(&context.model_view.transform_point(&vertex.position))
                    }
                },
                None => (0.0, 0.0),
            };

            *out = ScreenVertex {
                x,
                y,
                depth,
                intensity,
                tex,
            };
        }

        if style.wireframe {
            for (a, b) in [(0, 1), (1, 2), (2, 0)] {
                self.rasterize_line(screen[a], screen[b], style);
            }
        } else {
            self.rasterize_triangle(&screen, style);
        }
    }

    fn rasterize_triangle(&mut self, coords: &[ScreenVertex; 3], style: DrawStyle) {
        let (v0, v1, v2) = (&coords[0], &coords[1], &coords[2]);

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) =
                    barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let fragment = ScreenVertex::interpolate(v0, w0, v1, w1, v2, w2);
                        self.plot(x as usize, y as usize, &fragment, style);
                    }
                }
            }
        }
    }

    fn rasterize_line(&mut self, a: ScreenVertex, b: ScreenVertex, style: DrawStyle) {
        let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let fragment = ScreenVertex::interpolate(&a, 1.0 - t, &b, t, &b, 0.0);
            if fragment.x < 0.0
                || fragment.y < 0.0
                || fragment.x >= self.width as f32
                || fragment.y >= self.height as f32
            {
                continue;
            }
            self.plot(fragment.x as usize, fragment.y as usize, &fragment, style);
        }
    }

    fn plot(&mut self, x: usize, y: usize, fragment: &ScreenVertex, style: DrawStyle) {
        let idx = y * self.width + x;
        if fragment.depth >= self.depth_buffer[idx] {
            return;
        }
        self.depth_buffer[idx] = fragment.depth;

        if let Shade::Blend(empty) = style.shade {
            if !self.blended[idx] {
                self.blended[idx] = true;
                if self.color_buffer[idx] == Color::Reset {
                    self.char_buffer[idx] = empty;
                    self.color_buffer[idx] = style.color;
                } else {
                    self.char_buffer[idx] = dim_char(self.char_buffer[idx]);
                    self.color_buffer[idx] = dim_color(self.color_buffer[idx]);
                }
            }
            return;
        }

        self.blended[idx] = false;
        self.char_buffer[idx] = match style.shade {
            Shade::Solid(c) => c,
            _ => ramp_char(fragment.intensity),
        };
        self.color_buffer[idx] = match style.texture {
            Some(texture) => texture.color(fragment.tex),
            None => style.color,
        };
    }

    /// Write the frame starting at terminal row `top`
    pub fn draw<W: Write>(&self, writer: &mut W, top: u16) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, top + y as u16))?;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = self.color_buffer[idx];
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Map an intensity in `[0, 1]` onto the luminosity ramp
fn ramp_char(intensity: f32) -> char {
    let char_index = (intensity.clamp(0.0, 1.0) * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
    LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)]
}

/// Halve a ramp character's brightness; other characters are kept
fn dim_char(c: char) -> char {
    match LUMINOSITY_RAMP.iter().position(|&r| r == c) {
        Some(index) => LUMINOSITY_RAMP[index / 2],
        None => c,
    }
}

/// Darker terminal colour for shaded cells
fn dim_color(color: Color) -> Color {
    match color {
        Color::White => Color::Grey,
        Color::Grey => Color::DarkGrey,
        Color::Green => Color::DarkGreen,
        Color::Yellow => Color::DarkYellow,
        Color::Red => Color::DarkRed,
        Color::Blue => Color::DarkBlue,
        Color::Magenta => Color::DarkMagenta,
        Color::Cyan => Color::DarkCyan,
        _ => Color::DarkGrey,
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
