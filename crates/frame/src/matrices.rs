use crate::orbit::{OrbitRotation, Viewport};
use crate::uniforms::FrameUniforms;
use glam::Mat4;
use retroscene_scene::Placement;

/// Vertical field of view in radians.
pub const FIELD_OF_VIEW: f32 = 0.5;
pub const NEAR_PLANE: f32 = 1.0;
pub const FAR_PLANE: f32 = 20000.0;

/// All matrices one frame needs, composed from the current rotation and
/// viewport. Projection targets a 0..1 depth range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMatrices {
    pub camera: Mat4,
    pub projection: Mat4,
    pub view: Mat4,
    pub view_projection: Mat4,
    pub model: Mat4,
    pub mvp: Mat4,
    pub normal: Mat4,
    pub light_space: Mat4,
}

impl FrameMatrices {
    pub fn compose(
        rotation: &OrbitRotation,
        viewport: Viewport,
        placement: &Placement,
        light_space: Mat4,
    ) -> Self {
        let camera = rotation.camera_matrix();
        let projection =
            Mat4::perspective_rh(FIELD_OF_VIEW, viewport.aspect(), NEAR_PLANE, FAR_PLANE);
        let view = camera.inverse();
        let view_projection = projection * view;
        let model = placement.model_matrix();
        Self {
            camera,
            projection,
            view,
            view_projection,
            model,
            mvp: view_projection * model,
            normal: placement.normal_matrix(),
            light_space,
        }
    }

    pub fn uniforms(&self, time: f64) -> FrameUniforms {
        FrameUniforms::new(self.mvp, self.normal, self.light_space, self.model, time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn compose(rotation: OrbitRotation) -> FrameMatrices {
        FrameMatrices::compose(
            &rotation,
            Viewport::new(1280, 720),
            &Placement::default(),
            Mat4::IDENTITY,
        )
    }

    #[test]
    fn mvp_is_projection_view_model() {
        let m = compose(OrbitRotation::new(0.2, -0.3));
        let expected = m.projection * m.view * m.model;
        assert!(m.mvp.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn object_origin_projects_to_screen_center_at_rest() {
        let m = compose(OrbitRotation::default());
        let clip = m.mvp * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn rotation_moves_the_object_off_center() {
        let m = compose(OrbitRotation::new(0.0, 0.3));
        let clip = m.mvp * Vec3::ZERO.extend(1.0);
        assert!((clip.x / clip.w).abs() > 0.1);
    }

    #[test]
    fn projection_uses_viewport_aspect() {
        let wide = FrameMatrices::compose(
            &OrbitRotation::default(),
            Viewport::new(2000, 1000),
            &Placement::default(),
            Mat4::IDENTITY,
        );
        let expected = Mat4::perspective_rh(FIELD_OF_VIEW, 2.0, NEAR_PLANE, FAR_PLANE);
        assert!(wide.projection.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn uniforms_carry_every_matrix() {
        let m = compose(OrbitRotation::new(0.1, 0.1));
        let block = m.uniforms(2.5);
        assert_eq!(block.vertex_transformation(), m.mvp);
        assert_eq!(block.normal_transformation(), m.normal);
        assert_eq!(block.model(), m.model);
        assert_eq!(block.time, 2.5);
    }
}
