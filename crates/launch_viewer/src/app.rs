//! Window event loop

use std::sync::Arc;
use std::time::Instant;

use launch_scene::{SceneState, SceneView, ViewerConfig};
use rand::rngs::ThreadRng;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{ModifiersState, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::error::{Result, ViewerError};
use crate::input;
use crate::presenter::Presenter;
use crate::renderer::SceneRenderer;

struct Gpu {
    presenter: Presenter,
    renderer: SceneRenderer,
}

struct LaunchpadApp {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    scene: SceneState,
    views: Vec<SceneView>,
    rng: ThreadRng,
    modifiers: ModifiersState,
    cursor_hidden: bool,
    minimized: bool,
    last_frame: Instant,
    frame: u64,
    error: Option<ViewerError>,
}

impl LaunchpadApp {
    fn new(config: ViewerConfig) -> Self {
        let scene = SceneState::new(&config);
        Self {
            config,
            window: None,
            gpu: None,
            scene,
            views: Vec::new(),
            rng: rand::rng(),
            modifiers: ModifiersState::empty(),
            cursor_hidden: false,
            minimized: false,
            last_frame: Instant::now(),
            frame: 0,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_config = &self.config.window;
        let attributes = WindowAttributes::default()
            .with_title(window_config.title.clone())
            .with_inner_size(PhysicalSize::new(window_config.width, window_config.height));
        let window = Arc::new(event_loop.create_window(attributes)?);

        let presenter = pollster::block_on(Presenter::new(window.clone(), window_config.vsync))?;
        let renderer = SceneRenderer::new(
            presenter.device(),
            presenter.queue(),
            presenter.format(),
            presenter.size(),
            &self.config,
        );

        log::info!("Controls: F launch, P pause, R reset, V split screen, C/Shift+C cycle camera");
        log::info!(
            "Camera: WASD move, E/Q up/down, Shift fast, Ctrl slow, right mouse look, Esc exit"
        );

        self.window = Some(window);
        self.gpu = Some(Gpu { presenter, renderer });
        self.last_frame = Instant::now();
        Ok(())
    }

    fn resize(&mut self, event_loop: &ActiveEventLoop, size: PhysicalSize<u32>) {
        // Zero size means minimized: block on events instead of spinning
        self.minimized = size.width == 0 || size.height == 0;
        if self.minimized {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        }

        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(gpu) = &mut self.gpu {
            gpu.presenter.resize((size.width, size.height));
            gpu.renderer.resize(gpu.presenter.device(), (size.width, size.height));
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let delta = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame += 1;

        self.scene.update(delta, &mut self.rng);
        if self.scene.exit_requested() {
            log::info!("Exit requested");
            event_loop.exit();
            return;
        }

        let mouse_look = self.scene.mouse_look_active();
        if mouse_look != self.cursor_hidden {
            if let Some(window) = &self.window {
                window.set_cursor_visible(!mouse_look);
            }
            self.cursor_hidden = mouse_look;
        }

        if self.minimized {
            return;
        }
        let Some(gpu) = &mut self.gpu else { return };

        let output = match gpu.presenter.acquire_frame() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.presenter.reconfigure();
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Surface out of memory");
                event_loop.exit();
                return;
            }
            Err(e) => {
                log::warn!("Failed to acquire frame: {:?}", e);
                return;
            }
        };

        let cpu_start = Instant::now();
        let (width, height) = gpu.presenter.size();
        self.scene.write_views(width, height, &mut self.views);

        let target = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        gpu.renderer.render(
            gpu.presenter.device(),
            gpu.presenter.queue(),
            &target,
            &self.scene,
            &self.views,
        );
        output.present();

        if self.config.diagnostics.log_frame_times {
            log::debug!(
                "Frame {}: dt {:.2} ms, cpu {:.2} ms, particles {}",
                self.frame,
                delta * 1000.0,
                cpu_start.elapsed().as_secs_f32() * 1000.0,
                self.scene.exhaust.active_count()
            );
        }
    }
}

impl ApplicationHandler for LaunchpadApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window closed");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => self.resize(event_loop, size),

            WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    let intent = input::map_key(code, event.state, event.repeat, self.modifiers);
                    if let Some(intent) = intent {
                        self.scene.push_intent(intent);
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(intent) = input::map_mouse_button(button, state) {
                    self.scene.push_intent(intent);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.scene.push_intent(input::map_cursor(position.x, position.y));
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.minimized {
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Open the window and run until exit
pub fn run(config: ViewerConfig) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = LaunchpadApp::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
