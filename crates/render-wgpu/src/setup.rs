use crate::context::GpuContext;
use crate::error::SetupError;
use crate::pipeline::{SCENE_LAYOUTS, checked_pipeline, checked_shader};
use crate::shaders;
use crate::shadow::ShadowMap;
use crate::text_texture::TextTexture;
use glam::Mat4;
use retroscene_frame::FrameUniforms;
use retroscene_scene::{MeshBuffers, MeshSource, fallback, load_mesh};
use retroscene_screen::TextCanvas;
use tracing::info;
use wgpu::util::DeviceExt;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Resolve the configured mesh source into validated buffers.
pub fn load_scene_mesh(source: &MeshSource) -> Result<MeshBuffers, SetupError> {
    match source {
        MeshSource::Files { object, material } => Ok(load_mesh(object, material)?),
        MeshSource::Builtin => {
            info!("no mesh files configured, using built-in monitor");
            Ok(fallback::retro_monitor()?)
        }
    }
}

/// Everything created once at startup: vertex data on the GPU, the scene
/// pipeline and its bindings, the static shadow map and the text texture.
pub struct SceneResources {
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffers: [wgpu::Buffer; 4],
    pub vertex_count: u32,
    pub uniform_buffer: wgpu::Buffer,
    pub frame_bind_group: wgpu::BindGroup,
    pub texture_bind_group: wgpu::BindGroup,
    pub shadow: ShadowMap,
    pub text: TextTexture,
    depth_view: wgpu::TextureView,
}

impl SceneResources {
    pub fn new(
        ctx: &GpuContext,
        mesh: &MeshBuffers,
        light_space: Mat4,
        shadow_size: u32,
        canvas: TextCanvas,
    ) -> Result<Self, SetupError> {
        if mesh.is_empty() {
            return Err(SetupError::EmptyMesh);
        }
        let device = &ctx.device;
        let vertex_count = mesh.vertex_count() as u32;

        let vertex_buffers = [
            ("position_buffer", mesh.positions()),
            ("texcoord_buffer", mesh.texcoords()),
            ("normal_buffer", mesh.normals()),
            ("color_buffer", mesh.colors()),
        ]
        .map(|(label, data)| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        let shadow = ShadowMap::render(
            device,
            &ctx.queue,
            &vertex_buffers[0],
            vertex_count,
            light_space,
            shadow_size,
        )?;
        let text = TextTexture::new(device, canvas);

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame_uniforms"),
            contents: bytemuck::bytes_of(&FrameUniforms::new(
                Mat4::IDENTITY,
                Mat4::IDENTITY,
                light_space,
                Mat4::IDENTITY,
                0.0,
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("texture_bind_group"),
            layout: &texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&shadow.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&text.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&text.sampler),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let module = checked_shader(device, "scene", shaders::SCENE_SHADER)?;
        let pipeline = checked_pipeline(device, || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("scene_pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: Some(shaders::SCENE_VERTEX_ENTRY),
                    compilation_options: Default::default(),
                    buffers: &SCENE_LAYOUTS,
                },
                fragment: Some(wgpu::FragmentState {
                    module: &module,
                    entry_point: Some(shaders::SCENE_FRAGMENT_ENTRY),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.format(),
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: Default::default(),
                    bias: Default::default(),
                }),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        })?;

        let (width, height) = ctx.size();
        let depth_view = create_depth_texture(device, width, height);

        info!(
            "scene ready: {} triangles, text texture {} mips",
            vertex_count / 3,
            text.mip_levels()
        );

        Ok(Self {
            pipeline,
            vertex_buffers,
            vertex_count,
            uniform_buffer,
            frame_bind_group,
            texture_bind_group,
            shadow,
            text,
            depth_view,
        })
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    pub fn resize_depth(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_view = create_depth_texture(device, width, height);
    }
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_source_loads_fallback_model() {
        let mesh = load_scene_mesh(&MeshSource::Builtin).unwrap();
        assert_eq!(mesh, fallback::retro_monitor().unwrap());
    }

    #[test]
    fn missing_files_fail_setup() {
        let source = MeshSource::Files {
            object: "/nonexistent/pc.obj".into(),
            material: "/nonexistent/pc.mtl".into(),
        };
        let err = load_scene_mesh(&source).unwrap_err();
        assert!(matches!(err, SetupError::Load(_)));
    }
}
