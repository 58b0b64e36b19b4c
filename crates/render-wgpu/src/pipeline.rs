//! Vertex layouts and error-scoped creation of shader modules and pipelines.

use crate::error::SetupError;
use retroscene_scene::mesh::{COLOR_WIDTH, NORMAL_WIDTH, POSITION_WIDTH, TEXCOORD_WIDTH};
use tracing::error;

const FLOAT: u64 = std::mem::size_of::<f32>() as u64;

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const TEXCOORD_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x2];
const NORMAL_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x3];
const COLOR_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![3 => Float32x3];

pub const POSITION_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: POSITION_WIDTH as u64 * FLOAT,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &POSITION_ATTRS,
};

/// One tightly packed buffer per attribute, in slot order 0..3.
pub const SCENE_LAYOUTS: [wgpu::VertexBufferLayout<'static>; 4] = [
    POSITION_LAYOUT,
    wgpu::VertexBufferLayout {
        array_stride: TEXCOORD_WIDTH as u64 * FLOAT,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &TEXCOORD_ATTRS,
    },
    wgpu::VertexBufferLayout {
        array_stride: NORMAL_WIDTH as u64 * FLOAT,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &NORMAL_ATTRS,
    },
    wgpu::VertexBufferLayout {
        array_stride: COLOR_WIDTH as u64 * FLOAT,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &COLOR_ATTRS,
    },
];

/// Compile WGSL, turning any compiler diagnostic of error severity into
/// [`SetupError::ShaderCompile`].
pub fn checked_shader(
    device: &wgpu::Device,
    stage: &'static str,
    source: &str,
) -> Result<wgpu::ShaderModule, SetupError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(stage),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    let info = pollster::block_on(module.get_compilation_info());
    let scoped = pollster::block_on(device.pop_error_scope());

    let mut log: Vec<String> = info
        .messages
        .iter()
        .filter(|m| m.message_type == wgpu::CompilationMessageType::Error)
        .map(|m| m.message.clone())
        .collect();
    if let Some(e) = scoped {
        log.push(e.to_string());
    }

    if log.is_empty() {
        Ok(module)
    } else {
        let log = log.join("\n");
        error!("{stage} shader compile log:\n{log}");
        Err(SetupError::ShaderCompile { stage, log })
    }
}

/// Build a pipeline inside a validation scope so interface mismatches surface
/// as [`SetupError::ProgramLink`] instead of an uncaptured device error.
pub fn checked_pipeline(
    device: &wgpu::Device,
    create: impl FnOnce() -> wgpu::RenderPipeline,
) -> Result<wgpu::RenderPipeline, SetupError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = create();
    match pollster::block_on(device.pop_error_scope()) {
        None => Ok(pipeline),
        Some(e) => {
            let log = e.to_string();
            error!("pipeline creation failed: {log}");
            Err(SetupError::ProgramLink { log })
        }
    }
}
