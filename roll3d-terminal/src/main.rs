/// roll3d terminal demo - a sphere rolling around a triangular path
///
/// Controls:
///   - B: Begin rolling, P / right click: Pause, R: Restart
///   - x/X y/Y z/Z: Move the eye, Space: Reset the eye
///   - H: Shadow, J: Shadow blending, W: Wireframe, F: Flat shading, L: Lighting
///   - N: Spot/point light, G: Fog, T: Floor checker
///   - C: Sphere texture (checker, contour lines, off)
///   - V/S: Vertical/slanted texture, O/E: Object/eye space texture
///   - Q/ESC: Quit
///
/// Log output goes to stderr; redirect it (`2> roll3d.log`) when raising
/// the verbosity.
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use roll3d_core::{mesh_file, Mesh, SceneConfig};
use roll3d_terminal::TerminalApp;

/// Sphere mesh resolution used when no mesh file is given
const SPHERE_STACKS: usize = 16;
const SPHERE_SLICES: usize = 24;

#[derive(Parser)]
#[command(name = "roll3d-terminal")]
#[command(about = "Watch a sphere roll without slipping, rendered as ASCII art")]
#[command(version)]
struct Cli {
    /// Scene configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sphere mesh file (polygon count, then vertex count and coordinates per polygon)
    #[arg(short, long)]
    mesh: Option<PathBuf>,

    /// Override the rolling speed in degrees per tick
    #[arg(short, long)]
    speed: Option<f32>,

    /// Enable verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => SceneConfig::from_json_file(path)
            .with_context(|| format!("Failed to load scene config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if let Some(speed) = cli.speed {
        config.degrees_per_tick = speed;
    }

    let sphere = match &cli.mesh {
        Some(path) => mesh_file::load_mesh_file(path)
            .with_context(|| format!("Failed to load sphere mesh {}", path.display()))?,
        None => Mesh::uv_sphere(SPHERE_STACKS, SPHERE_SLICES),
    };
    log::info!("sphere mesh: {} triangles", sphere.len());

    let mut app = TerminalApp::new(&config, sphere).context("Failed to set up the scene")?;
    app.run().context("Terminal error")?;

    Ok(())
}
