//! GPU textures loaded with `image`
//!
//! Color textures are uploaded as RGBA8 sRGB with a single mip level and sampled
//! with linear filtering and repeat addressing.

use std::path::Path;

use image::{DynamicImage, GenericImageView};
use wgpu::*;

use crate::error::{Result, ViewerError};

pub struct GpuTexture {
    pub view: TextureView,
    pub sampler: Sampler,
    pub size: (u32, u32),
}

impl GpuTexture {
    pub fn load(device: &Device, queue: &Queue, path: &Path) -> Result<Self> {
        let img = image::open(path).map_err(|source| ViewerError::Texture {
            path: path.to_path_buf(),
            source,
        })?;

        let label = path.file_name().and_then(|n| n.to_str()).unwrap_or("texture");
        let texture = Self::from_image(device, queue, &img, label);
        log::info!("Loaded texture: {} ({}x{})", path.display(), texture.size.0, texture.size.1);
        Ok(texture)
    }

    /// Load `path`, or fall back to 1x1 white so the scene still draws untextured
    pub fn load_or_white(device: &Device, queue: &Queue, path: &Path) -> Self {
        match Self::load(device, queue, path) {
            Ok(texture) => texture,
            Err(e) => {
                log::warn!("{}; using white", e);
                Self::solid_color(device, queue, [255, 255, 255, 255])
            }
        }
    }

    pub fn solid_color(device: &Device, queue: &Queue, color: [u8; 4]) -> Self {
        Self::upload(device, queue, &color, (1, 1), "solid_color_texture")
    }

    pub fn from_image(device: &Device, queue: &Queue, img: &DynamicImage, label: &str) -> Self {
        let size = img.dimensions();
        let rgba = img.to_rgba8();
        Self::upload(device, queue, rgba.as_raw(), size, label)
    }

    fn upload(
        device: &Device,
        queue: &Queue,
        data: &[u8],
        (width, height): (u32, u32),
        label: &str,
    ) -> Self {
        let extent = Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&TextureDescriptor {
            label: Some(label),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8UnormSrgb,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: Origin3d::ZERO,
                aspect: TextureAspect::All,
            },
            data,
            ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            extent,
        );

        let view = texture.create_view(&TextureViewDescriptor::default());
        let sampler = device.create_sampler(&SamplerDescriptor {
            label: Some("texture_sampler"),
            address_mode_u: AddressMode::Repeat,
            address_mode_v: AddressMode::Repeat,
            address_mode_w: AddressMode::Repeat,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            mipmap_filter: FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            view,
            sampler,
            size: (width, height),
        }
    }
}
