use glam::{Mat4, Vec3};

/// World-space offset of the single renderable object.
pub const MODEL_TRANSLATION: Vec3 = Vec3::new(0.0, 0.0, -1.25);
/// Yaw applied to the object so its screen faces the camera.
pub const MODEL_YAW: f32 = -1.571;
/// Uniform object scale.
pub const MODEL_SCALE: f32 = 0.5;

/// Static pose of the scene's one object: translate, then rotate about Y,
/// then scale (applied right to left to object-space vertices).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub translation: Vec3,
    pub yaw: f32,
    pub scale: f32,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            translation: MODEL_TRANSLATION,
            yaw: MODEL_YAW,
            scale: MODEL_SCALE,
        }
    }
}

impl Placement {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation) * self.orientation_matrix()
    }

    /// Rotation and scale only, no translation.
    pub fn orientation_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.yaw) * Mat4::from_scale(Vec3::splat(self.scale))
    }

    /// Normal transform derived from the yaw alone.
    ///
    /// Equals the normalized inverse-transpose of the model matrix only while
    /// the scale is uniform. A non-uniform scale would distort lighting here.
    pub fn normal_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.yaw)
    }
}

/// Fixed directional light used for the one-time shadow pass.
///
/// The light looks from `eye` at the origin through an orthographic box. The
/// resulting matrix is applied to object-space vertices, so it folds in the
/// object's rotation and scale but not its translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRig {
    pub eye: Vec3,
    pub half_extent: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 5.0, 1.0),
            half_extent: 1.0,
            near: 4.1,
            far: 6.1,
        }
    }
}

impl LightRig {
    /// Unit vector from a surface toward the light.
    pub fn surface_to_light(&self) -> Vec3 {
        self.eye.normalize()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let h = self.half_extent;
        Mat4::orthographic_rh(-h, h, -h, h, self.near, self.far)
    }

    pub fn light_space_matrix(&self, placement: &Placement) -> Mat4 {
        self.projection_matrix() * self.view_matrix() * placement.orientation_matrix()
    }
}
