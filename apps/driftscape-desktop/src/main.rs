use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use driftscape_common::SceneConfig;
use driftscape_input::{Action, pointer_to_ndc};
use driftscape_render::Viewport;
use driftscape_render_wgpu::{ChaseCamera, IsometricCamera, WgpuRenderer};
use driftscape_scene::{Cityscape, FlightScene, MutationTask, SceneCommand};
use driftscape_tools::SceneInspector;
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SceneKind {
    Cityscape,
    Flight,
}

#[derive(Parser)]
#[command(name = "driftscape-desktop", about = "Driftscape desktop application")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene to run
    #[arg(long, value_enum, default_value = "cityscape")]
    scene: SceneKind,

    /// YAML scene configuration (defaults when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed for scene generation
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Drive cityscape mutations from a background thread instead of the frame clock
    #[arg(long)]
    threaded_mutations: bool,
}

enum ActiveScene {
    Cityscape {
        scene: Cityscape,
        task: Option<MutationTask>,
    },
    Flight(FlightScene),
}

/// Application state.
struct AppState {
    scene: ActiveScene,
    config: SceneConfig,
    viewport: Viewport,
    iso_camera: IsometricCamera,
    chase_camera: ChaseCamera,
    show_inspector: bool,
    last_frame: Instant,
    // Fixed timestep for the flight scene
    tick_accumulator: f64,
    tick_rate: f64,
}

impl AppState {
    fn new(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => SceneConfig::load_yaml(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => SceneConfig::default(),
        };

        let scene = match cli.scene {
            SceneKind::Cityscape => {
                let mut scene = Cityscape::new(&config.voxel, cli.seed)?;
                let task = if cli.threaded_mutations {
                    scene = scene.with_external_mutations();
                    let task = MutationTask::spawn(
                        scene.command_sender(),
                        &config.voxel,
                        cli.seed.wrapping_add(1),
                    )?;
                    tracing::info!("mutations driven by background task");
                    Some(task)
                } else {
                    None
                };
                ActiveScene::Cityscape { scene, task }
            }
            SceneKind::Flight => ActiveScene::Flight(FlightScene::new(&config, cli.seed)?),
        };

        Ok(Self {
            scene,
            config,
            viewport: Viewport::default(),
            iso_camera: IsometricCamera::default(),
            chase_camera: ChaseCamera::default(),
            show_inspector: true,
            last_frame: Instant::now(),
            tick_accumulator: 0.0,
            tick_rate: 1.0 / 60.0,
        })
    }

    fn update(&mut self, dt: f32) {
        match &mut self.scene {
            ActiveScene::Cityscape { scene, .. } => {
                scene.advance(Duration::from_secs_f32(dt));
            }
            ActiveScene::Flight(scene) => {
                self.tick_accumulator += dt as f64;
                while self.tick_accumulator >= self.tick_rate {
                    self.tick_accumulator -= self.tick_rate;
                    scene.frame();
                }
            }
        }
    }

    fn handle_action(&mut self, action: Action) {
        if let ActiveScene::Flight(scene) = &mut self.scene {
            scene.handle(action);
        }
    }

    /// Apply a window size. Zero-sized (minimized) windows are skipped.
    fn resize(&mut self, width: u32, height: u32) -> bool {
        if !self.viewport.resize(width, height) {
            return false;
        }
        let aspect = self.viewport.aspect();
        self.iso_camera.aspect = aspect;
        self.chase_camera.aspect = aspect;
        true
    }

    fn rebuild(&mut self) {
        if let ActiveScene::Cityscape { scene, .. } = &self.scene {
            let command = SceneCommand::Rebuild(self.config.voxel.clone());
            if let Err(e) = scene.command_sender().send(command) {
                tracing::warn!("rebuild not queued: {e}");
            }
        }
    }

    /// Stop all mutation sources before the window goes away.
    fn teardown(&mut self) {
        if let ActiveScene::Cityscape { scene, task } = &mut self.scene {
            scene.teardown();
            if let Some(mut task) = task.take() {
                task.stop();
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::F1 => {
                self.show_inspector = !self.show_inspector;
            }
            KeyCode::KeyR => self.rebuild(),
            _ => {}
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_inspector {
            return;
        }

        let mut rebuild = false;
        egui::SidePanel::left("inspector")
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.heading("Driftscape");
                ui.separator();
                ui.label(format!(
                    "Viewport: {}x{}",
                    self.viewport.width, self.viewport.height
                ));

                match &self.scene {
                    ActiveScene::Cityscape { scene, task } => {
                        let summary = SceneInspector::cityscape(scene);
                        ui.label(format!("Frame: {}", summary.frame));
                        ui.label(format!(
                            "Grid: {0}x{0} ({1} columns)",
                            summary.grid_size, summary.columns
                        ));
                        ui.label(format!("Active columns: {}", summary.active));
                        ui.label(format!(
                            "Height: mean {:.2}  max {:.2}",
                            summary.mean_height, summary.max_height
                        ));
                        let clock = match task {
                            Some(t) if t.is_running() => "background task",
                            Some(_) => "background task (stopped)",
                            None => "frame clock",
                        };
                        ui.label(format!("Mutations: {clock}"));
                        ui.separator();
                        if ui.button("Rebuild (R)").clicked() {
                            rebuild = true;
                        }
                    }
                    ActiveScene::Flight(scene) => {
                        let summary = SceneInspector::flight(scene);
                        let [x, y, z] = summary.plane_position;
                        ui.label(format!("Frame: {}", summary.frame));
                        ui.label(format!("Plane: ({x:.1}, {y:.1}, {z:.1})"));
                        ui.label(format!("Propeller: {:.2}", summary.propeller_angle));
                        ui.label(format!(
                            "Sea: {} vertices, {} ticks",
                            summary.sea_vertices, summary.wave_ticks
                        ));
                        ui.label(format!("Clouds: {}", summary.clouds));
                        ui.label(if summary.steering {
                            "Steering: pointer"
                        } else {
                            "Steering: click to engage"
                        });
                    }
                }

                ui.separator();
                ui.small("F1: Toggle Inspector | R: Rebuild");
            });

        if rebuild {
            self.rebuild();
        }
    }
}

/// Everything that exists once the window has a GPU surface.
struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            window: None,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Driftscape")
            .with_inner_size(PhysicalSize::new(
                self.state.viewport.width,
                self.state.viewport.height,
            ));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("driftscape_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        self.state.resize(size.width, size.height);

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: self.state.viewport.width,
            height: self.state.viewport.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, &self.state.viewport);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        self.window = Some(window);
        self.gpu = Some(Gpu {
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        });
        Ok(())
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let dt = (now - self.state.last_frame).as_secs_f32().min(0.1);
        self.state.last_frame = now;
        self.state.update(dt);

        let (Some(window), Some(gpu)) = (&self.window, &mut self.gpu) else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        match &mut self.state.scene {
            ActiveScene::Cityscape { scene, .. } => {
                gpu.renderer.sync_cityscape(&gpu.device, &gpu.queue, scene);
                gpu.renderer
                    .render_cityscape(&gpu.device, &gpu.queue, &view, &self.state.iso_camera);
            }
            ActiveScene::Flight(scene) => {
                gpu.renderer.sync_flight(&gpu.device, &gpu.queue, scene);
                gpu.renderer
                    .render_flight(&gpu.device, &gpu.queue, &view, &self.state.chase_camera);
            }
        }

        let raw_input = gpu.egui_winit.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            self.state.draw_ui(ctx);
        });

        gpu.egui_winit
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_gpu(event_loop) {
            tracing::error!("failed to initialize GPU: {e:#}");
            self.state.teardown();
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(window), Some(gpu)) = (&self.window, &mut self.gpu) {
            let response = gpu.egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.state.teardown();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if !self.state.resize(new_size.width, new_size.height) {
                    return;
                }
                if let Some(gpu) = &mut self.gpu {
                    gpu.config.width = self.state.viewport.width;
                    gpu.config.height = self.state.viewport.height;
                    gpu.surface.configure(&gpu.device, &gpu.config);
                    gpu.renderer.resize(&gpu.device, &self.state.viewport);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let viewport = self.state.viewport;
                if let Some(ndc) = pointer_to_ndc(
                    position.x as f32,
                    position.y as f32,
                    viewport.width as f32,
                    viewport.height as f32,
                ) {
                    self.state.handle_action(Action::PointerMoved(ndc));
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                self.state.handle_action(Action::Click);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.state.handle_key(key);
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
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

    tracing::info!(scene = ?cli.scene, seed = cli.seed, "driftscape-desktop starting");

    let state = AppState::new(&cli)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state);
    event_loop.run_app(&mut app)?;

    Ok(())
}
