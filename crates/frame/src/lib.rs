//! Frame logic: everything one redraw does that does not need a GPU.
//!
//! A [`RenderLoop`] owns the mutable per-frame state (clock and rotation) and
//! drives a [`FrameSink`] backend. Swapping the backend (wgpu, a recorder in
//! tests) does not change the loop.
//!
//! # Invariants
//! - The clock only ever accumulates host-supplied timestamp deltas.
//! - Startup cues fire exactly once per loop, on its first tick.
//! - Every tick draws once; the returned [`LoopControl`] alone decides whether
//!   the host schedules another tick.

mod clock;
mod matrices;
mod orbit;
mod render_loop;
mod uniforms;

pub use clock::{ClockTick, FIRST_FRAME_DELTA, FrameClock};
pub use matrices::{FAR_PLANE, FIELD_OF_VIEW, FrameMatrices, NEAR_PLANE};
pub use orbit::{DRAG_BLEND, IDLE_DECAY, OrbitRotation, PointerState, Viewport};
pub use render_loop::{
    DisplayMode, FrameInputs, FrameSink, LoggedCues, LoopControl, RecordingSink, RenderLoop,
    StartupCues, TextSource,
};
pub use uniforms::FrameUniforms;

pub fn crate_info() -> &'static str {
    "retroscene-frame v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("frame"));
    }
}
