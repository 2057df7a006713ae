mod events;

use anyhow::Result;
use clap::Parser;
use drift_common::Extent;
use drift_input::InputEvent;
use drift_kernel::{LoopDriver, SessionEvent, TickOutcome, VehicleTuning};
use drift_render::{SceneRenderer, Tessellator};
use drift_render_wgpu::WgpuRenderer;
use egui::Context as EguiContext;
use events::FrameClock;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "drift-desktop", about = "Tap-to-steer drift toy")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Initial window width in pixels
    #[arg(long, default_value = "480")]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value = "800")]
    height: u32,

    /// YAML file overriding vehicle tuning
    #[arg(long)]
    tuning: Option<PathBuf>,
}

/// Application state.
struct AppState {
    driver: LoopDriver,
    scene: SceneRenderer,
    tessellator: Tessellator,
    clock: FrameClock,
    cursor: Option<PhysicalPosition<f64>>,
}

impl AppState {
    fn new(tuning: VehicleTuning) -> Self {
        Self {
            driver: LoopDriver::new(tuning),
            scene: SceneRenderer::default(),
            tessellator: Tessellator::new(Extent::default()),
            clock: FrameClock::new(),
            cursor: None,
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let extent = Extent::new(size.width.max(1) as f32, size.height.max(1) as f32);
        self.driver.resize(extent);
        self.log_session_events();
    }

    /// Feed an input event to the driver. Returns true when the event must not
    /// reach the egui overlay.
    fn handle_input(&mut self, event: InputEvent) -> bool {
        let response = self.driver.handle_input(event, self.clock.now_ms());
        self.log_session_events();
        response.suppress_default
    }

    fn tick(&mut self) -> TickOutcome {
        let outcome = self.driver.tick(self.clock.now_ms());
        if outcome == TickOutcome::Skipped {
            tracing::trace!("non-positive frame time, physics skipped");
        }
        self.log_session_events();
        outcome
    }

    /// Tessellate the current frame. Before the game starts only the
    /// background is drawn.
    fn build_frame(&mut self, extent: Extent) {
        self.tessellator.begin(extent);
        if self.driver.is_running() {
            self.scene.render(self.driver.session(), &mut self.tessellator);
        } else {
            self.scene.draw_background(&mut self.tessellator);
        }
    }

    fn log_session_events(&mut self) {
        let score = self.driver.score_display();
        for event in self.driver.session_mut().drain_events() {
            match event {
                SessionEvent::DriftEnded { frames, .. } => {
                    tracing::info!(frames, score, "drift ended");
                }
                other => tracing::debug!(event = ?other, "session event"),
            }
        }
    }

    fn draw_ui(&self, ctx: &EguiContext) {
        egui::Area::new(egui::Id::new("score"))
            .fixed_pos(egui::pos2(16.0, 12.0))
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(format!("Score: {}", self.driver.score_display()))
                        .size(24.0)
                        .strong()
                        .color(egui::Color32::WHITE),
                );
            });

        if self.driver.prompt_visible() {
            egui::Area::new(egui::Id::new("start_prompt"))
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.label(
                        egui::RichText::new("Press left or right to start")
                            .size(28.0)
                            .color(egui::Color32::WHITE),
                    );
                });
        }
    }
}

struct GpuApp {
    state: AppState,
    initial_size: PhysicalSize<u32>,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(tuning: VehicleTuning, initial_size: PhysicalSize<u32>) -> Self {
        Self {
            state: AppState::new(tuning),
            initial_size,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    /// Schedule the next frame unless one is already outstanding.
    fn schedule_frame(&mut self) {
        if self.state.driver.request_frame() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }

    fn translate_input(&self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::MouseInput { state, .. } => events::pointer_event(*state, self.state.cursor),
            WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeave),
            WindowEvent::Touch(touch) => events::touch_event(touch.phase, touch.location),
            _ => None,
        }
    }

    fn draw_frame(&mut self) {
        let (Some(surface), Some(device), Some(queue), Some(config)) =
            (&self.surface, &self.device, &self.queue, &self.config)
        else {
            return;
        };

        let output = match surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(device, config);
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

        let extent = Extent::new(config.width as f32, config.height as f32);
        self.state.build_frame(extent);
        if let Some(renderer) = &mut self.renderer {
            renderer.render(device, queue, &view, extent, self.state.tessellator.vertices());
        }

        let (Some(window), Some(egui_winit), Some(egui_renderer)) = (
            self.window.as_ref(),
            self.egui_winit.as_mut(),
            self.egui_renderer.as_mut(),
        ) else {
            output.present();
            return;
        };

        let raw_input = egui_winit.take_egui_input(window);
        let state = &self.state;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [config.width, config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        egui_renderer.update_buffers(device, queue, &mut encoder, &paint_jobs, &screen_descriptor);
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
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Drift")
            .with_inner_size(self.initial_size);
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("drift_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        // Palette colours are sRGB-encoded already; write them unconverted.
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        self.state.resize(size);

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::CursorMoved { position, .. } = &event {
            self.state.cursor = Some(*position);
        }

        if let Some(input) = self.translate_input(&event) {
            let suppress = self.state.handle_input(input);
            self.schedule_frame();
            if suppress {
                return;
            }
        }

        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                }
                self.state.resize(new_size);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                match self.state.tick() {
                    TickOutcome::Skipped => {}
                    TickOutcome::Idle | TickOutcome::Stepped(_) => self.draw_frame(),
                }
                self.schedule_frame();
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let tuning = match &cli.tuning {
        Some(path) => VehicleTuning::load(path)?,
        None => VehicleTuning::default(),
    };

    tracing::info!("drift-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GpuApp::new(tuning, PhysicalSize::new(cli.width, cli.height));
    event_loop.run_app(&mut app)?;

    Ok(())
}
