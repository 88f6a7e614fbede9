/// Example: Roll the sphere once around the default path without a display
///
/// Prints the sphere centre and rotation at every segment hand-off, then the
/// shadow transform of the final pose.
///
/// Usage: cargo run --example trace_path -- [degrees-per-tick]
use std::env;

use roll3d_core::{compute_pose, Animation, SceneConfig};

fn main() -> roll3d_core::Result<()> {
    let mut config = SceneConfig::default();
    if let Some(speed) = env::args().nth(1).and_then(|arg| arg.parse().ok()) {
        config.degrees_per_tick = speed;
    }
    let scene = config.build()?;

    println!(
        "{} segments, perimeter {:.3}, radius {}",
        scene.path.len(),
        scene.path.perimeter(),
        scene.radius
    );

    let mut animation = Animation::new();
    animation.begin();

    let mut ticks = 0u32;
    let mut laps = 0usize;
    while laps < scene.path.len() && scene.degrees_per_tick > 0.0 {
        ticks += 1;
        if let Some(handoff) = animation.tick(&scene.path, scene.radius, scene.degrees_per_tick) {
            laps += 1;
            let pose = compute_pose(animation.state(), &scene.path, scene.radius);
            let (roll, pitch, yaw) = pose.rotation.euler_angles();
            println!(
                "tick {:5}: segment {} -> {} at ({:6.3}, {:6.3}, {:6.3}), euler ({:6.1}, {:6.1}, {:6.1})",
                ticks,
                handoff.from,
                handoff.to,
                pose.translation.x,
                pose.translation.y,
                pose.translation.z,
                roll.to_degrees(),
                pitch.to_degrees(),
                yaw.to_degrees(),
            );
        }
    }

    let pose = compute_pose(animation.state(), &scene.path, scene.radius);
    println!("shadow transform:\n{}", scene.shadow.shadow_transform(&pose));
    Ok(())
}
