use retroscene_screen::{TextCanvas, build_mip_chain, mip_level_count};

pub const TEXT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// GPU side of the CRT text: a square RGBA texture with a full mip chain,
/// overwritten in place on every upload.
pub struct TextTexture {
    canvas: TextCanvas,
    texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    mip_levels: u32,
}

impl TextTexture {
    pub fn new(device: &wgpu::Device, canvas: TextCanvas) -> Self {
        let size = canvas.size().max(1);
        let mip_levels = mip_level_count(size, size);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("text_texture"),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
            mip_level_count: mip_levels,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXT_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&Default::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("text_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            canvas,
            texture,
            view,
            sampler,
            mip_levels,
        }
    }

    pub fn mip_levels(&self) -> u32 {
        self.mip_levels
    }

    /// Rasterize `text` and replace every mip level.
    pub fn upload(&mut self, queue: &wgpu::Queue, text: &str) {
        self.canvas.draw_text(text);
        let size = self.canvas.size();
        self.write_level(queue, 0, size, size, self.canvas.pixels());
        for (level, mip) in build_mip_chain(self.canvas.pixels(), size, size)
            .iter()
            .enumerate()
        {
            self.write_level(queue, level as u32 + 1, mip.width, mip.height, &mip.data);
        }
    }

    fn write_level(&self, queue: &wgpu::Queue, level: u32, width: u32, height: u32, data: &[u8]) {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: level,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }
}
