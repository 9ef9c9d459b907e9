//! Presenter - window surface and GPU device via wgpu

use std::sync::Arc;
use wgpu::*;
use winit::window::Window;

use crate::error::{Result, ViewerError};

pub struct Presenter {
    surface: Surface<'static>,
    device: Device,
    queue: Queue,
    config: SurfaceConfiguration,
    size: (u32, u32),
}

impl Presenter {
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self> {
        log::info!("Creating presenter...");

        let instance = Instance::new(InstanceDescriptor {
            backends: Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(ViewerError::Adapter)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: Some("launchpad_device"),
                    required_features: Features::empty(),
                    required_limits: Limits::default(),
                    memory_hints: MemoryHints::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .unwrap_or(TextureFormat::Bgra8UnormSrgb);
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(CompositeAlphaMode::Auto);

        let size = window.inner_size();
        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if vsync {
                PresentMode::AutoVsync
            } else {
                PresentMode::AutoNoVsync
            },
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        log::info!(
            "Presenter initialized: {}x{}, format: {:?}, present mode: {:?}",
            config.width,
            config.height,
            format,
            config.present_mode
        );

        Ok(Self {
            surface,
            device,
            queue,
            size: (config.width, config.height),
            config,
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn format(&self) -> TextureFormat {
        self.config.format
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Zero-sized requests (minimized window) are ignored
    pub fn resize(&mut self, new_size: (u32, u32)) {
        if new_size.0 > 0 && new_size.1 > 0 {
            self.size = new_size;
            self.config.width = new_size.0;
            self.config.height = new_size.1;
            self.surface.configure(&self.device, &self.config);
            log::debug!("Presenter resized to {}x{}", new_size.0, new_size.1);
        }
    }

    /// Reconfigure after the surface was lost or went out of date
    pub fn reconfigure(&mut self) {
        log::debug!("Reconfiguring surface");
        self.surface.configure(&self.device, &self.config);
    }

    pub fn acquire_frame(&mut self) -> std::result::Result<SurfaceTexture, SurfaceError> {
        self.surface.get_current_texture()
    }
}
