use anyhow::Result;
use clap::Parser;
use glam::Mat4;
use spindle_common::Viewport;
use spindle_input::{DollyControl, KeyTracker};
use spindle_render::{texture, CubeRenderer, DollyCamera, FlyCamera};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

const WINDOW_TITLE: &str = "spindle cubes";
const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 720;

/// The one asset this demo reads. Fixed; absence is fatal.
const TEXTURE_PATH: &str = "resources/container.jpg";

#[derive(Parser)]
#[command(name = "spindle-cubes", about = "Ten spinning textured cubes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Use the free-fly camera (WASD) instead of the W/S dolly
    #[arg(long)]
    fly: bool,
}

/// Which camera drives the view matrix this run.
enum CameraRig {
    Dolly {
        camera: DollyCamera,
        control: DollyControl,
    },
    Fly(FlyCamera),
}

impl CameraRig {
    fn new(fly: bool) -> Self {
        if fly {
            Self::Fly(FlyCamera::default())
        } else {
            let camera = DollyCamera::default();
            Self::Dolly {
                control: DollyControl::new(camera.distance),
                camera,
            }
        }
    }

    /// Apply one frame of key input. The dolly steps a fixed amount per
    /// frame; the fly camera scales with dt.
    fn update(&mut self, keys: &KeyTracker, dt: f32) {
        match self {
            Self::Dolly { camera, control } => {
                control.step(keys);
                camera.distance = control.distance();
            }
            Self::Fly(camera) => {
                if keys.is_held(KeyCode::KeyW) {
                    camera.move_forward(dt);
                }
                if keys.is_held(KeyCode::KeyS) {
                    camera.move_backward(dt);
                }
                if keys.is_held(KeyCode::KeyA) {
                    camera.move_left(dt);
                }
                if keys.is_held(KeyCode::KeyD) {
                    camera.move_right(dt);
                }
            }
        }
    }

    fn view(&self) -> Mat4 {
        match self {
            Self::Dolly { camera, .. } => camera.view(),
            Self::Fly(camera) => camera.view(),
        }
    }

    fn projection(&self, aspect: f32) -> Mat4 {
        match self {
            Self::Dolly { camera, .. } => camera.projection(aspect),
            Self::Fly(camera) => camera.projection(aspect),
        }
    }
}

struct CubesApp {
    rig: CameraRig,
    keys: KeyTracker,
    viewport: Viewport,
    started: Instant,
    last_frame: Instant,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<CubeRenderer>,
    init_error: Option<anyhow::Error>,
}

impl CubesApp {
    fn new(fly: bool) -> Self {
        Self {
            rig: CameraRig::new(fly),
            keys: KeyTracker::new(),
            viewport: Viewport::new(WINDOW_WIDTH, WINDOW_HEIGHT),
            started: Instant::now(),
            last_frame: Instant::now(),
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            init_error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err}");
        self.init_error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for CubesApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("spindle_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        self.viewport = Viewport::new(size.width, size.height);

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: self.viewport.width(),
            height: self.viewport.height(),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let image = match texture::load_jpeg(TEXTURE_PATH) {
            Ok(image) => image,
            Err(err) => {
                self.fail(event_loop, err.into());
                return;
            }
        };

        let renderer = match CubeRenderer::new(
            &device,
            &queue,
            surface_format,
            self.viewport,
            &image,
        ) {
            Ok(renderer) => renderer,
            Err(err) => {
                self.fail(event_loop, err.into());
                return;
            }
        };

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.started = Instant::now();
        self.last_frame = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                tracing::info!("changing to {}x{}", new_size.width, new_size.height);
                self.viewport = Viewport::new(new_size.width, new_size.height);
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = self.viewport.width();
                    config.height = self.viewport.height();
                    surface.configure(device, config);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, self.viewport);
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.keys.handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::RedrawRequested => {
                // Close request raised last frame is honored before any work.
                if self.keys.close_requested() {
                    event_loop.exit();
                    return;
                }

                let now = Instant::now();
                let dt = (now - self.last_frame).as_secs_f32().min(0.1);
                self.last_frame = now;
                self.rig.update(&self.keys, dt);

                let (Some(surface), Some(device), Some(queue)) =
                    (&self.surface, &self.device, &self.queue)
                else {
                    return;
                };

                let output = match surface.get_current_texture() {
                    Ok(t) => t,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(config) = &self.config {
                            surface.configure(device, config);
                        }
                        return;
                    }
                    Err(e) => {
                        tracing::error!("surface error: {e}");
                        return;
                    }
                };

                let target = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                if let Some(renderer) = &self.renderer {
                    renderer.render(
                        device,
                        queue,
                        &target,
                        self.rig.view(),
                        self.rig.projection(self.viewport.aspect()),
                        self.started.elapsed().as_secs_f32(),
                    );
                }

                output.present();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.keys.close_requested() {
            event_loop.exit();
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("spindle-cubes starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = CubesApp::new(cli.fly);
    event_loop.run_app(&mut app)?;

    if let Some(err) = app.init_error.take() {
        return Err(err);
    }
    Ok(())
}
