use crate::clock::FrameClock;
use crate::matrices::FrameMatrices;
use crate::orbit::{OrbitRotation, PointerState, Viewport};
use crate::uniforms::FrameUniforms;
use glam::Mat4;
use retroscene_scene::Placement;
use tracing::{debug, info};

/// Which page view the host is showing. Only `Retro` keeps the loop running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    #[default]
    Retro,
    Terminal,
}

impl DisplayMode {
    pub fn is_active(self) -> bool {
        self == DisplayMode::Retro
    }

    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Retro => DisplayMode::Terminal,
            DisplayMode::Terminal => DisplayMode::Retro,
        }
    }
}

/// Whether the host should schedule another tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

impl LoopControl {
    pub fn from_mode(mode: DisplayMode) -> Self {
        if mode.is_active() {
            LoopControl::Continue
        } else {
            LoopControl::Stop
        }
    }
}

/// Host state sampled once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInputs {
    /// Monotonic host timestamp in milliseconds.
    pub timestamp_ms: f64,
    pub pointer: PointerState,
    pub viewport: Viewport,
    pub mode: DisplayMode,
}

/// Backend that turns a tick into pixels.
pub trait FrameSink {
    /// Rasterize `text` into the screen texture, replacing its previous content.
    fn upload_text(&mut self, text: &str);
    /// Match the drawing surface to `viewport`. Must be a no-op when unchanged.
    fn resize(&mut self, viewport: Viewport);
    /// Clear, upload `uniforms` and issue the single draw.
    fn draw(&mut self, uniforms: &FrameUniforms);
}

/// Supplies the text shown on the CRT.
pub trait TextSource {
    fn current_text(&mut self, time: f64) -> String;
}

impl<F> TextSource for F
where
    F: FnMut(f64) -> String,
{
    fn current_text(&mut self, time: f64) -> String {
        self(time)
    }
}

/// One-shot effects tied to the first rendered frame (boot sound, ambience).
pub trait StartupCues {
    fn on_first_frame(&mut self);
}

/// Cues that only log.
#[derive(Debug, Default)]
pub struct LoggedCues;

impl StartupCues for LoggedCues {
    fn on_first_frame(&mut self) {
        info!("startup cues: boot sound, ambient loop");
    }
}

/// Per-frame render loop state.
pub struct RenderLoop {
    clock: FrameClock,
    rotation: OrbitRotation,
    placement: Placement,
    light_space: Mat4,
    cues: Box<dyn StartupCues>,
}

impl std::fmt::Debug for RenderLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderLoop")
            .field("clock", &self.clock)
            .field("rotation", &self.rotation)
            .field("placement", &self.placement)
            .finish_non_exhaustive()
    }
}

impl RenderLoop {
    pub fn new(placement: Placement, light_space: Mat4, cues: Box<dyn StartupCues>) -> Self {
        Self {
            clock: FrameClock::new(),
            rotation: OrbitRotation::default(),
            placement,
            light_space,
            cues,
        }
    }

    /// Run one frame: advance time, refresh the screen text, resize, update
    /// the orbit, draw, and report whether to keep going.
    pub fn tick(
        &mut self,
        inputs: &FrameInputs,
        text: &mut dyn TextSource,
        sink: &mut impl FrameSink,
    ) -> LoopControl {
        let tick = self.clock.advance(inputs.timestamp_ms);
        if tick.first {
            info!("render loop started at {:.3}s", inputs.timestamp_ms * 0.001);
            self.cues.on_first_frame();
        }

        sink.upload_text(&text.current_text(tick.time));
        sink.resize(inputs.viewport);

        self.rotation.update(&inputs.pointer, inputs.viewport);
        let matrices = FrameMatrices::compose(
            &self.rotation,
            inputs.viewport,
            &self.placement,
            self.light_space,
        );
        sink.draw(&matrices.uniforms(tick.time));

        let control = LoopControl::from_mode(inputs.mode);
        if control == LoopControl::Stop {
            debug!("render loop stopping in {:?} mode", inputs.mode);
        }
        control
    }

    pub fn time(&self) -> f64 {
        self.clock.time()
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn rotation(&self) -> OrbitRotation {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: OrbitRotation) {
        self.rotation = rotation;
    }
}

/// Sink that records every call instead of drawing.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub texts: Vec<String>,
    pub viewports: Vec<Viewport>,
    pub draws: Vec<FrameUniforms>,
}

impl FrameSink for RecordingSink {
    fn upload_text(&mut self, text: &str) {
        self.texts.push(text.to_owned());
    }

    fn resize(&mut self, viewport: Viewport) {
        if self.viewports.last() != Some(&viewport) {
            self.viewports.push(viewport);
        }
    }

    fn draw(&mut self, uniforms: &FrameUniforms) {
        self.draws.push(*uniforms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingCues(Rc<Cell<u32>>);

    impl StartupCues for CountingCues {
        fn on_first_frame(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn inputs(timestamp_ms: f64) -> FrameInputs {
        FrameInputs {
            timestamp_ms,
            pointer: PointerState::default(),
            viewport: Viewport::new(800, 600),
            mode: DisplayMode::Retro,
        }
    }

    fn counting_loop() -> (RenderLoop, Rc<Cell<u32>>) {
        let count = Rc::new(Cell::new(0));
        let render_loop = RenderLoop::new(
            Placement::default(),
            Mat4::IDENTITY,
            Box::new(CountingCues(count.clone())),
        );
        (render_loop, count)
    }

    fn time_text(time: f64) -> String {
        format!("{time:.2}")
    }

    #[test]
    fn cues_fire_once_on_first_tick() {
        let (mut render_loop, count) = counting_loop();
        let mut sink = RecordingSink::default();
        for i in 0..5 {
            render_loop.tick(&inputs(1000.0 + 16.0 * i as f64), &mut time_text, &mut sink);
        }
        assert_eq!(count.get(), 1);
        assert!((render_loop.clock().last_time() - 1.064).abs() < 1e-9);
    }

    #[test]
    fn first_tick_reports_backdated_time() {
        let (mut render_loop, _) = counting_loop();
        let mut sink = RecordingSink::default();
        render_loop.tick(&inputs(2000.0), &mut time_text, &mut sink);
        assert_eq!(sink.texts, vec!["0.01".to_string()]);
        assert!((sink.draws[0].time - 0.01).abs() < 1e-6);
    }

    #[test]
    fn every_tick_uploads_text_and_draws_once() {
        let (mut render_loop, _) = counting_loop();
        let mut sink = RecordingSink::default();
        let mut text = |_: f64| "same".to_string();
        for i in 0..3 {
            render_loop.tick(&inputs(16.0 * i as f64), &mut text, &mut sink);
        }
        assert_eq!(sink.texts.len(), 3);
        assert_eq!(sink.draws.len(), 3);
        // Resizes to an unchanged viewport collapse to one.
        assert_eq!(sink.viewports.len(), 1);
    }

    #[test]
    fn terminal_mode_draws_then_stops() {
        let (mut render_loop, _) = counting_loop();
        let mut sink = RecordingSink::default();
        let mut frame = inputs(0.0);
        assert_eq!(
            render_loop.tick(&frame, &mut time_text, &mut sink),
            LoopControl::Continue
        );
        frame.timestamp_ms = 16.0;
        frame.mode = DisplayMode::Terminal;
        assert_eq!(
            render_loop.tick(&frame, &mut time_text, &mut sink),
            LoopControl::Stop
        );
        assert_eq!(sink.draws.len(), 2);
    }

    #[test]
    fn drag_rotation_reaches_the_uniforms() {
        let (mut render_loop, _) = counting_loop();
        let mut sink = RecordingSink::default();
        let mut frame = inputs(0.0);
        frame.pointer = PointerState {
            down: true,
            position: Vec2::new(400.0, 300.0),
            drag_start: Vec2::new(200.0, 300.0),
        };
        render_loop.tick(&frame, &mut time_text, &mut sink);

        let rotation = render_loop.rotation();
        assert!((rotation.yaw - 0.1 * 200.0 / 1600.0).abs() < 1e-6);
        assert_eq!(rotation.pitch, 0.0);

        let expected = FrameMatrices::compose(
            &rotation,
            frame.viewport,
            &Placement::default(),
            Mat4::IDENTITY,
        );
        assert_eq!(sink.draws[0].vertex_transformation(), expected.mvp);
        assert_eq!(sink.draws[0].light_space(), Mat4::IDENTITY);
    }

    #[test]
    fn released_pointer_decays_rotation() {
        let (mut render_loop, _) = counting_loop();
        render_loop.set_rotation(OrbitRotation::new(1.0, 1.0));
        let mut sink = RecordingSink::default();
        render_loop.tick(&inputs(0.0), &mut time_text, &mut sink);
        assert!((render_loop.rotation().pitch - 0.95).abs() < 1e-6);
    }

    #[test]
    fn mode_toggle_round_trips() {
        assert_eq!(DisplayMode::Retro.toggled(), DisplayMode::Terminal);
        assert_eq!(DisplayMode::Terminal.toggled(), DisplayMode::Retro);
        assert_eq!(LoopControl::from_mode(DisplayMode::Terminal), LoopControl::Stop);
    }
}
