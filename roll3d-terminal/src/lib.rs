/// Terminal front-end for the rolling sphere scene
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use nalgebra::{Matrix4, Point3};
use roll3d_core::{compute_pose, Animation, Camera, Mesh, Phase, Scene, SceneConfig};

pub mod lighting;
pub mod renderer;
pub mod scene;
pub mod texture;

pub use lighting::{Fog, LightSource, Lighting};
pub use renderer::{AsciiRenderer, DrawStyle, Shade};
pub use scene::SceneMeshes;
pub use texture::{Orientation, Pattern, SphereTexture, TextureSpace};

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 0.5;

/// Distance the eye moves per key press
const EYE_STEP: f32 = 1.0;

/// Rows reserved above the picture for the status line
const STATUS_ROWS: u16 = 1;

const SHADOW_CHAR: char = '░';

/// Something the user asked for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Quit,
    Begin,
    TogglePause,
    Restart,
    MoveEye(f32, f32, f32),
    ResetEye,
    ToggleShadow,
    ToggleShadowBlend,
    ToggleWireframe,
    ToggleLighting,
    ToggleFlatShading,
    ToggleLightSource,
    ToggleFloorChecker,
    CycleFog,
    CycleSphereTexture,
    SetTextureOrientation(Orientation),
    SetTextureSpace(TextureSpace),
}

impl Command {
    /// Key bindings
    pub fn from_key(code: KeyCode) -> Option<Self> {
        let command = match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Command::Quit,
            KeyCode::Char('b') | KeyCode::Char('B') => Command::Begin,
            KeyCode::Char('p') | KeyCode::Char('P') => Command::TogglePause,
            KeyCode::Char('r') | KeyCode::Char('R') => Command::Restart,
            KeyCode::Char('X') => Command::MoveEye(EYE_STEP, 0.0, 0.0),
            KeyCode::Char('x') => Command::MoveEye(-EYE_STEP, 0.0, 0.0),
            KeyCode::Char('Y') => Command::MoveEye(0.0, EYE_STEP, 0.0),
            KeyCode::Char('y') => Command::MoveEye(0.0, -EYE_STEP, 0.0),
            KeyCode::Char('Z') => Command::MoveEye(0.0, 0.0, EYE_STEP),
            KeyCode::Char('z') => Command::MoveEye(0.0, 0.0, -EYE_STEP),
            KeyCode::Char(' ') => Command::ResetEye,
            KeyCode::Char('h') | KeyCode::Char('H') => Command::ToggleShadow,
            KeyCode::Char('j') | KeyCode::Char('J') => Command::ToggleShadowBlend,
            KeyCode::Char('w') | KeyCode::Char('W') => Command::ToggleWireframe,
            KeyCode::Char('l') | KeyCode::Char('L') => Command::ToggleLighting,
            KeyCode::Char('f') | KeyCode::Char('F') => Command::ToggleFlatShading,
            KeyCode::Char('n') | KeyCode::Char('N') => Command::ToggleLightSource,
            KeyCode::Char('t') | KeyCode::Char('T') => Command::ToggleFloorChecker,
            KeyCode::Char('g') | KeyCode::Char('G') => Command::CycleFog,
            KeyCode::Char('c') | KeyCode::Char('C') => Command::CycleSphereTexture,
            KeyCode::Char('v') | KeyCode::Char('V') => {
                Command::SetTextureOrientation(Orientation::Vertical)
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                Command::SetTextureOrientation(Orientation::Slanted)
            }
            KeyCode::Char('o') | KeyCode::Char('O') => Command::SetTextureSpace(TextureSpace::Object),
            KeyCode::Char('e') | KeyCode::Char('E') => Command::SetTextureSpace(TextureSpace::Eye),
            _ => return None,
        };
        Some(command)
    }
}

/// Display toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub shadow: bool,
    /// Darken the floor under the shadow instead of covering it
    pub shadow_blend: bool,
    pub wireframe: bool,
    pub flat_shading: bool,
    pub floor_checker: bool,
    /// `None` draws the sphere in a single colour
    pub sphere_pattern: Option<Pattern>,
    pub texture_orientation: Orientation,
    pub texture_space: TextureSpace,
}

impl RenderOptions {
    pub fn sphere_texture(&self) -> Option<SphereTexture> {
        self.sphere_pattern.map(|pattern| SphereTexture {
            pattern,
            orientation: self.texture_orientation,
            space: self.texture_space,
        })
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        let texture = SphereTexture::default();
        Self {
            shadow: true,
            shadow_blend: true,
            wireframe: false,
            flat_shading: false,
            floor_checker: true,
            sphere_pattern: Some(texture.pattern),
            texture_orientation: texture.orientation,
            texture_space: texture.space,
        }
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    meshes: SceneMeshes,
    animation: Animation,
    camera: Camera,
    lighting: Lighting,
    renderer: AsciiRenderer,
    options: RenderOptions,
    frame_time: Duration,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Build the app sized to the current terminal
    pub fn new(config: &SceneConfig, sphere: Mesh) -> roll3d_core::Result<Self> {
        let (width, height) = terminal::size()?;
        Self::with_size(config, sphere, width, height)
    }

    /// Build the app for a `width` x `height` character terminal
    pub fn with_size(
        config: &SceneConfig,
        sphere: Mesh,
        width: u16,
        height: u16,
    ) -> roll3d_core::Result<Self> {
        let scene = config.build()?;
        let rows = height.saturating_sub(STATUS_ROWS).max(1);
        let mut camera = Camera::new(Point3::from(config.eye), 1.0);
        camera.mode = config.projection;
        camera.set_viewport(u32::from(width), u32::from(rows), CELL_ASPECT);

        Ok(Self {
            lighting: Lighting::new(scene.shadow.light()),
            meshes: SceneMeshes::new(config, sphere),
            scene,
            animation: Animation::new(),
            camera,
            renderer: AsciiRenderer::new(usize::from(width), usize::from(rows)),
            options: RenderOptions::default(),
            frame_time: Duration::from_millis(1000 / u64::from(config.frame_rate.max(1))),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Update
            self.update();

            // Render
            self.render_frame();
            self.present()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                if let Some(command) = Command::from_key(code) {
                    self.apply(command);
                }
            }
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Right),
                ..
            }) => self.apply(Command::TogglePause),
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
    }

    /// Carry out a user command
    pub fn apply(&mut self, command: Command) {
        log::trace!("command: {:?}", command);
        match command {
            Command::Quit => self.running = false,
            Command::Begin => self.animation.begin(),
            Command::TogglePause => self.animation.toggle_pause(),
            Command::Restart => self.animation.restart(),
            Command::MoveEye(dx, dy, dz) => self.camera.move_eye(dx, dy, dz),
            Command::ResetEye => self.camera.reset_eye(),
            Command::ToggleShadow => self.options.shadow = !self.options.shadow,
            Command::ToggleShadowBlend => self.options.shadow_blend = !self.options.shadow_blend,
            Command::ToggleWireframe => self.options.wireframe = !self.options.wireframe,
            Command::ToggleLighting => self.lighting.enabled = !self.lighting.enabled,
            Command::ToggleFlatShading => self.options.flat_shading = !self.options.flat_shading,
            Command::ToggleLightSource => self.lighting.toggle_source(),
            Command::ToggleFloorChecker => self.options.floor_checker = !self.options.floor_checker,
            Command::CycleFog => self.lighting.fog = self.lighting.fog.next(),
            Command::CycleSphereTexture => {
                self.options.sphere_pattern = texture::next_pattern(self.options.sphere_pattern)
            }
            Command::SetTextureOrientation(orientation) => {
                self.options.texture_orientation = orientation
            }
            Command::SetTextureSpace(space) => self.options.texture_space = space,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        let rows = height.saturating_sub(STATUS_ROWS).max(1);
        self.renderer.resize(usize::from(width), usize::from(rows));
        self.camera
            .set_viewport(u32::from(width), u32::from(rows), CELL_ASPECT);
        log::debug!("resized to {}x{}", width, rows);
    }

    /// Advance the animation by one tick
    pub fn update(&mut self) {
        self.animation.tick(
            &self.scene.path,
            self.scene.radius,
            self.scene.degrees_per_tick,
        );
    }

    /// Rasterize the scene into the renderer's buffers
    pub fn render_frame(&mut self) {
        let pose = compute_pose(self.animation.state(), &self.scene.path, self.scene.radius);
        let sphere_model = pose.model_matrix(self.scene.radius);
        let identity = Matrix4::identity();
        let wireframe = self.options.wireframe;

        self.renderer.clear();

        // Floor
        let floor_colors = if self.options.floor_checker {
            [Color::Green, Color::White]
        } else {
            [Color::Green, Color::Green]
        };
        for (tiles, color) in self.meshes.floor.iter().zip(floor_colors) {
            self.renderer
                .render_mesh(tiles, &identity, &self.camera, &self.lighting, DrawStyle::lit(color));
        }

        // Shadow
        if self.options.shadow {
            let shadow_model = self.scene.shadow.project_model(&sphere_model);
            let style = if self.options.shadow_blend {
                DrawStyle::blend(Color::DarkGrey, SHADOW_CHAR)
            } else {
                DrawStyle::solid(Color::DarkGrey, SHADOW_CHAR)
            };
            self.renderer.render_mesh(
                self.meshes.sphere(self.options.flat_shading),
                &shadow_model,
                &self.camera,
                &self.lighting,
                style.wireframe(wireframe),
            );
        }

        // Sphere
        self.renderer.render_mesh(
            self.meshes.sphere(self.options.flat_shading),
            &sphere_model,
            &self.camera,
            &self.lighting,
            DrawStyle::lit(Color::Yellow)
                .wireframe(wireframe)
                .textured(self.options.sphere_texture()),
        );

        // Axes
        for (axis, color) in self
            .meshes
            .axes
            .iter()
            .zip([Color::Red, Color::Magenta, Color::Blue])
        {
            self.renderer
                .render_mesh(axis, &identity, &self.camera, &self.lighting, DrawStyle::solid(color, '#'));
        }
    }

    fn status_line(&self) -> String {
        let state = self.animation.state();
        let phase = match self.animation.phase() {
            Phase::Idle => "press B to roll",
            Phase::Rolling => "rolling",
            Phase::Paused => "paused",
        };
        format!(
            "roll3d | FPS: {:.1} | segment {} angle {:5.1} | {} | light: {:?} fog: {:?} texture: {} | \
             B=Begin P=Pause R=Restart xyz/XYZ=Eye H=Shadow J=Blend W=Wire F=Flat L=Light N=Spot \
             G=Fog C=Texture V/S=Vertical/Slanted O/E=Object/Eye Q=Quit",
            self.fps,
            state.segment(),
            state.angle_deg(),
            phase,
            self.lighting.source,
            self.lighting.fog,
            match self.options.sphere_texture() {
                Some(texture) => format!(
                    "{:?} {:?} {:?}",
                    texture.pattern, texture.orientation, texture.space
                ),
                None => "off".to_string(),
            },
        )
    }

    fn present(&mut self) -> io::Result<()> {
        let mut stdout = stdout();

        // Output to terminal
        self.renderer.draw(&mut stdout, STATUS_ROWS)?;

        // Draw UI overlay
        let (width, _) = terminal::size()?;
        let mut status = self.status_line();
        status.truncate(usize::from(width));
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(status),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
