use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Per-frame uniform block, laid out to match the `FrameUniforms` struct in
/// the scene shader (four column-major `mat4x4<f32>` followed by `Time`).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub vertex_transformation: [[f32; 4]; 4],
    pub normal_transformation: [[f32; 4]; 4],
    pub light_space: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub time: f32,
    pub _padding: [f32; 3],
}

impl FrameUniforms {
    pub fn new(mvp: Mat4, normal: Mat4, light_space: Mat4, model: Mat4, time: f64) -> Self {
        Self {
            vertex_transformation: mvp.to_cols_array_2d(),
            normal_transformation: normal.to_cols_array_2d(),
            light_space: light_space.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            time: time as f32,
            _padding: [0.0; 3],
        }
    }

    pub fn vertex_transformation(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.vertex_transformation)
    }

    pub fn normal_transformation(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.normal_transformation)
    }

    pub fn light_space(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.light_space)
    }

    pub fn model(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_matches_shader_layout() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 272);
        assert_eq!(std::mem::size_of::<FrameUniforms>() % 16, 0);
        assert_eq!(std::mem::offset_of!(FrameUniforms, time), 256);
    }

    #[test]
    fn matrices_survive_the_block() {
        let model = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let block = FrameUniforms::new(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::ZERO, model, 1.5);
        assert_eq!(block.model(), model);
        assert_eq!(block.light_space(), Mat4::ZERO);
        assert_eq!(block.time, 1.5);
        assert_eq!(bytemuck::bytes_of(&block).len(), 272);
    }
}
