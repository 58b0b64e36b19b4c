use crate::context::GpuContext;
use crate::setup::SceneResources;
use retroscene_frame::{FrameSink, FrameUniforms, Viewport};
use tracing::debug;

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.1,
    b: 0.1,
    a: 1.0,
};

/// Window-backed [`FrameSink`]: one cleared pass, one draw, present.
pub struct ScenePresenter {
    ctx: GpuContext,
    resources: SceneResources,
}

impl ScenePresenter {
    pub fn new(ctx: GpuContext, resources: SceneResources) -> Self {
        Self { ctx, resources }
    }

    pub fn context(&self) -> &GpuContext {
        &self.ctx
    }
}

impl FrameSink for ScenePresenter {
    fn upload_text(&mut self, text: &str) {
        self.resources.text.upload(&self.ctx.queue, text);
    }

    fn resize(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            return;
        }
        if self.ctx.resize(viewport.width, viewport.height) {
            debug!("surface resized to {}x{}", viewport.width, viewport.height);
            self.resources
                .resize_depth(&self.ctx.device, viewport.width, viewport.height);
        }
    }

    fn draw(&mut self, uniforms: &FrameUniforms) {
        let resources = &self.resources;
        self.ctx
            .queue
            .write_buffer(&resources.uniform_buffer, 0, bytemuck::bytes_of(uniforms));

        let Some(frame) = self.ctx.acquire() else {
            return;
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: resources.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&resources.pipeline);
            pass.set_bind_group(0, &resources.frame_bind_group, &[]);
            pass.set_bind_group(1, &resources.texture_bind_group, &[]);
            for (slot, buffer) in resources.vertex_buffers.iter().enumerate() {
                pass.set_vertex_buffer(slot as u32, buffer.slice(..));
            }
            pass.draw(0..resources.vertex_count, 0..1);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}
