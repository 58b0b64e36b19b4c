use glam::{Mat4, Vec2};

/// Fraction of the remaining distance to the drag target covered per tick.
pub const DRAG_BLEND: f32 = 0.1;
/// Per-tick multiplier pulling the rotation back to rest while idle.
pub const IDLE_DECAY: f32 = 0.95;

/// Primary pointer state as seen by the loop.
///
/// `drag_start` is the position where the button went down; it is only
/// meaningful while `down` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub down: bool,
    pub position: Vec2,
    pub drag_start: Vec2,
}

impl PointerState {
    pub fn press(&mut self) {
        self.down = true;
        self.drag_start = self.position;
    }

    pub fn release(&mut self) {
        self.down = false;
    }

    pub fn move_to(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Pointer travel since the button went down.
    pub fn drag_offset(&self) -> Vec2 {
        self.position - self.drag_start
    }
}

/// Displayed surface size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height. A zero dimension counts as one pixel.
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Camera orbit angles in radians.
///
/// While dragging, each axis eases toward the drag offset measured in
/// half-viewport units; once released it decays geometrically back to rest.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitRotation {
    pub pitch: f32,
    pub yaw: f32,
}

impl OrbitRotation {
    pub fn new(pitch: f32, yaw: f32) -> Self {
        Self { pitch, yaw }
    }

    /// Target angles `(pitch, yaw)` for the current drag.
    pub fn drag_target(pointer: &PointerState, viewport: Viewport) -> Vec2 {
        let offset = pointer.drag_offset();
        let width = viewport.width.max(1) as f32;
        let height = viewport.height.max(1) as f32;
        Vec2::new(offset.y / (2.0 * height), offset.x / (2.0 * width))
    }

    pub fn update(&mut self, pointer: &PointerState, viewport: Viewport) {
        if pointer.down {
            let target = Self::drag_target(pointer, viewport);
            self.pitch += DRAG_BLEND * (target.x - self.pitch);
            self.yaw += DRAG_BLEND * (target.y - self.yaw);
        } else {
            self.pitch *= IDLE_DECAY;
            self.yaw *= IDLE_DECAY;
        }
    }

    /// Camera-to-world transform: the camera sits at the origin and turns
    /// against the drag.
    pub fn camera_matrix(&self) -> Mat4 {
        Mat4::from_rotation_x(-self.pitch) * Mat4::from_rotation_y(-self.yaw)
    }
}
