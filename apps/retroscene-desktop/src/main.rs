use anyhow::Result;
use clap::Parser;
use glam::Vec2;
use retroscene_frame::{
    DisplayMode, FrameInputs, LoopControl, PointerState, RenderLoop, StartupCues, Viewport,
};
use retroscene_render_wgpu::{
    GpuContext, ScenePresenter, SceneResources, SetupError, load_scene_mesh,
};
use retroscene_scene::{LightRig, Placement, SceneConfig};
use retroscene_screen::{TerminalText, TextCanvas};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

#[cfg(feature = "audio")]
mod audio;

#[derive(Parser)]
#[command(name = "retroscene-desktop", about = "Retro computer scene in a window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene configuration (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Host-side input and page state fed into each tick.
struct HostState {
    mode: DisplayMode,
    pointer: PointerState,
    terminal: TerminalText,
    started: Instant,
    /// A redraw is pending or the loop is running.
    animating: bool,
}

impl HostState {
    fn new(config: &SceneConfig) -> Self {
        let mode = if config.start_retro {
            DisplayMode::Retro
        } else {
            DisplayMode::Terminal
        };
        Self {
            mode,
            pointer: PointerState::default(),
            terminal: TerminalText::new(config.banner.clone()),
            started: Instant::now(),
            animating: false,
        }
    }

    fn inputs(&self, viewport: Viewport) -> FrameInputs {
        FrameInputs {
            timestamp_ms: self.started.elapsed().as_secs_f64() * 1000.0,
            pointer: self.pointer,
            viewport,
            mode: self.mode,
        }
    }

    /// Apply a pressed key. Returns true when the mode switched back to retro
    /// and the loop must be restarted.
    fn handle_key(&mut self, key: &Key, text: Option<&str>) -> bool {
        match key {
            Key::Named(NamedKey::Tab) => {
                self.mode = self.mode.toggled();
                tracing::info!("display mode: {:?}", self.mode);
                return self.mode.is_active();
            }
            Key::Named(NamedKey::Backspace) => self.terminal.backspace(),
            Key::Named(NamedKey::Enter) => self.terminal.newline(),
            _ => {
                if let Some(text) = text {
                    self.terminal.push_str(text);
                }
            }
        }
        false
    }

    /// Start a redraw chain unless one is already running. Returns whether
    /// the caller must request the first redraw.
    fn begin_frames(&mut self) -> bool {
        if self.animating {
            return false;
        }
        self.animating = true;
        true
    }

    /// Record the outcome of a tick. Returns whether another redraw must be
    /// requested.
    fn frame_finished(&mut self, control: LoopControl) -> bool {
        match control {
            LoopControl::Continue => true,
            LoopControl::Stop => {
                self.animating = false;
                false
            }
        }
    }
}

struct GpuApp {
    config: SceneConfig,
    state: HostState,
    window: Option<Arc<Window>>,
    presenter: Option<ScenePresenter>,
    render_loop: Option<RenderLoop>,
    failure: Option<SetupError>,
}

impl GpuApp {
    fn new(config: SceneConfig) -> Self {
        Self {
            state: HostState::new(&config),
            config,
            window: None,
            presenter: None,
            render_loop: None,
            failure: None,
        }
    }

    fn setup(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SetupError> {
        let window_config = &self.config.window;
        let attrs = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| SetupError::NoGraphicsContext(format!("create window: {e}")))?,
        );

        let size = window.inner_size();
        let ctx = GpuContext::new(window.clone(), size.width, size.height)?;
        let mesh = load_scene_mesh(&self.config.mesh_source())?;
        let canvas = TextCanvas::with_font_search(
            self.config.text_canvas_size.max(1),
            self.config.font.as_deref(),
        );

        let placement = Placement::default();
        let light_space = LightRig::default().light_space_matrix(&placement);
        let resources = SceneResources::new(
            &ctx,
            &mesh,
            light_space,
            self.config.shadow_map_size,
            canvas,
        )?;

        self.presenter = Some(ScenePresenter::new(ctx, resources));
        self.render_loop = Some(RenderLoop::new(placement, light_space, self.startup_cues()));
        self.window = Some(window);
        Ok(())
    }

    #[cfg(feature = "audio")]
    fn startup_cues(&self) -> Box<dyn StartupCues> {
        Box::new(audio::RodioCues::new(
            self.config.boot_sound.clone(),
            self.config.ambient_sound.clone(),
        ))
    }

    #[cfg(not(feature = "audio"))]
    fn startup_cues(&self) -> Box<dyn StartupCues> {
        Box::new(retroscene_frame::LoggedCues)
    }

    fn request_frame(&mut self) {
        if let Some(window) = &self.window {
            if self.state.begin_frames() {
                window.request_redraw();
            }
        }
    }

    fn on_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        if self.state.handle_key(&event.logical_key, event.text.as_deref()) {
            self.request_frame();
        }
    }

    fn redraw(&mut self) {
        let (Some(window), Some(presenter), Some(render_loop)) =
            (&self.window, &mut self.presenter, &mut self.render_loop)
        else {
            return;
        };
        let size = window.inner_size();
        let inputs = self.state.inputs(Viewport::new(size.width, size.height));
        let control = render_loop.tick(&inputs, &mut self.state.terminal, presenter);
        if self.state.frame_finished(control) {
            window.request_redraw();
        } else {
            tracing::debug!("render loop paused at {:.2}s", render_loop.time());
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.failure.is_some() {
            return;
        }
        match self.setup(event_loop) {
            // One frame always renders so the scene is visible even when
            // starting in terminal mode.
            Ok(()) => self.request_frame(),
            Err(e) => {
                tracing::error!("scene setup failed: {e}");
                self.failure = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(_) => {
                if self.state.animating {
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state
                    .pointer
                    .move_to(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.state.pointer.press(),
                ElementState::Released => self.state.pointer.release(),
            },
            WindowEvent::KeyboardInput { event, .. } => self.on_key(&event),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("retroscene-desktop starting");

    let config = match &cli.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GpuApp::new(config);
    event_loop.run_app(&mut app)?;

    if let Some(failure) = app.failure {
        eprintln!("retroscene: {failure}");
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_starts_in_configured_mode() {
        let retro = HostState::new(&SceneConfig::default());
        assert_eq!(retro.mode, DisplayMode::Retro);

        let config = SceneConfig {
            start_retro: false,
            ..SceneConfig::default()
        };
        assert_eq!(HostState::new(&config).mode, DisplayMode::Terminal);
    }

    #[test]
    fn inputs_carry_pointer_and_viewport() {
        let mut state = HostState::new(&SceneConfig::default());
        state.pointer.move_to(Vec2::new(4.0, 5.0));
        state.pointer.press();
        let inputs = state.inputs(Viewport::new(640, 480));
        assert!(inputs.pointer.down);
        assert_eq!(inputs.viewport, Viewport::new(640, 480));
        assert!(inputs.timestamp_ms >= 0.0);
    }

    fn tab() -> Key {
        Key::Named(NamedKey::Tab)
    }

    #[test]
    fn tab_restarts_only_when_returning_to_retro() {
        let mut state = HostState::new(&SceneConfig::default());
        assert!(!state.handle_key(&tab(), None));
        assert_eq!(state.mode, DisplayMode::Terminal);
        assert!(state.handle_key(&tab(), None));
        assert_eq!(state.mode, DisplayMode::Retro);
    }

    #[test]
    fn typing_edits_the_terminal_without_restarting() {
        let mut state = HostState::new(&SceneConfig::default());
        let key = Key::Character("a".into());
        assert!(!state.handle_key(&key, Some("a")));
        assert!(!state.handle_key(&key, Some("b")));
        assert_eq!(state.terminal.input(), "ab");

        assert!(!state.handle_key(&Key::Named(NamedKey::Backspace), None));
        assert_eq!(state.terminal.input(), "a");

        assert!(!state.handle_key(&Key::Named(NamedKey::Enter), Some("\r")));
        assert_eq!(state.terminal.input(), "");
        assert_eq!(state.mode, DisplayMode::Retro);
    }

    #[test]
    fn only_one_redraw_chain_runs_at_a_time() {
        let mut state = HostState::new(&SceneConfig::default());
        assert!(state.begin_frames());
        assert!(!state.begin_frames());

        assert!(state.frame_finished(LoopControl::Continue));
        assert!(!state.begin_frames());

        assert!(!state.frame_finished(LoopControl::Stop));
        assert!(state.begin_frames());
    }

    #[test]
    fn switching_back_to_retro_restarts_a_stopped_loop() {
        let mut state = HostState::new(&SceneConfig::default());
        assert!(state.begin_frames());

        state.handle_key(&tab(), None);
        let control = LoopControl::from_mode(state.mode);
        assert!(!state.frame_finished(control));

        assert!(state.handle_key(&tab(), None));
        assert!(state.begin_frames());
        assert!(state.frame_finished(LoopControl::from_mode(state.mode)));
    }
}
