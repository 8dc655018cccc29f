use anyhow::{Context, Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tidewater_assets::{
    Asset, AssetLoader, AssetManifest, AssetRequest, AssetStore, CHARACTER_CLIPS, DEFAULT_CLIP,
    LoadEvent, RequestId,
};
use tidewater_common::{ModelHandle, Role};
use tidewater_input::{InputMap, KeyState, apply_action};
use tidewater_kernel::{SceneConfig, World};
use tidewater_render::{DebugTextRenderer, Environment, Renderer};
use tidewater_render_wgpu::{OrbitCamera, WgpuRenderer};
use tidewater_tools::{FrameStats, SceneInspector};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key as LogicalKey, NamedKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "tidewater-desktop", about = "Tidewater ocean cleanup scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene configuration (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding `assets/` and `models/`
    #[arg(long, default_value = ".")]
    assets: PathBuf,
}

/// Logical key name as the input bindings expect it.
fn key_name(key: &LogicalKey) -> Option<&str> {
    match key {
        LogicalKey::Named(NamedKey::ArrowUp) => Some("ArrowUp"),
        LogicalKey::Named(NamedKey::ArrowDown) => Some("ArrowDown"),
        LogicalKey::Named(NamedKey::ArrowLeft) => Some("ArrowLeft"),
        LogicalKey::Named(NamedKey::ArrowRight) => Some("ArrowRight"),
        LogicalKey::Character(c) => Some(c.as_str()),
        _ => None,
    }
}

fn forwards_key(key_state: ElementState, consumed_by_ui: bool) -> bool {
    key_state == ElementState::Released || !consumed_by_ui
}

/// Application state.
struct AppState {
    world: World,
    input: InputMap,
    camera: OrbitCamera,
    env: Environment,
    loader: AssetLoader,
    store: AssetStore,
    /// Clip selected in the panel.
    clip: String,
    /// Latest character request; older completions are discarded.
    pending_character: Option<RequestId>,
    stats: FrameStats,
    orbiting: bool,
    started: Instant,
    last_frame: Instant,
}

impl AppState {
    fn new(config: SceneConfig, manifest: AssetManifest) -> Self {
        let input = InputMap::new(&config.drive);
        let mut state = Self {
            world: World::new(config),
            input,
            camera: OrbitCamera::default(),
            env: Environment::default(),
            loader: AssetLoader::new(manifest),
            store: AssetStore::new(),
            clip: DEFAULT_CLIP.to_string(),
            pending_character: None,
            stats: FrameStats::default(),
            orbiting: false,
            started: Instant::now(),
            last_frame: Instant::now(),
        };
        state.loader.request(AssetRequest::WaterNormals);
        state.loader.request(AssetRequest::Boat);
        state.loader.request(AssetRequest::Trash);
        state.request_character(DEFAULT_CLIP.to_string());
        state
    }

    fn request_character(&mut self, clip: String) {
        tracing::info!(%clip, "loading character");
        self.pending_character = Some(self.loader.request(AssetRequest::Character(clip.clone())));
        self.clip = clip;
    }

    fn poll_loads(&mut self) {
        for event in self.loader.poll() {
            self.on_loaded(event);
        }
    }

    fn on_loaded(&mut self, event: LoadEvent) {
        let is_character = matches!(event.request, AssetRequest::Character(_));
        if is_character && self.pending_character != Some(event.id) {
            tracing::debug!(asset = event.request.label(), "stale character load discarded");
            return;
        }
        if is_character {
            self.pending_character = None;
        }

        let loaded = match event.result {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!(asset = event.request.label(), error = %e, "asset failed to load");
                return;
            }
        };
        let handle = ModelHandle::from(loaded.id);
        let first_clip = match &loaded.asset {
            Asset::Model(model) => model.first_clip().map(str::to_string),
            Asset::Texture(_) => None,
        };
        if let Asset::Texture(texture) = &loaded.asset {
            tracing::info!(
                name = %texture.name,
                width = texture.width,
                height = texture.height,
                "texture loaded"
            );
        }
        self.store.insert(loaded.id, loaded.asset);

        match event.request {
            AssetRequest::Boat => self.world.attach_model(Role::Boat, handle, None),
            AssetRequest::Character(_) => {
                self.world
                    .attach_model(Role::Character, handle, first_clip.as_deref());
            }
            AssetRequest::Trash => {
                if self.world.tracked_count() == 0 {
                    self.world.scatter_trash(handle);
                }
            }
            AssetRequest::WaterNormals => {}
        }
    }

    fn update(&mut self, frame_time: Duration) {
        self.stats.record(frame_time);
        self.poll_loads();

        let dt = frame_time.as_secs_f32().min(0.1);
        let report = {
            let _span = tracing::info_span!("frame", tick = self.world.tick()).entered();
            self.world.step(dt)
        };
        if !report.is_quiet() {
            tracing::debug!(
                tick = report.tick,
                detached = report.detached.len(),
                collected = report.collected.len(),
                remaining = self.world.tracked_count(),
                "trash contact"
            );
        }
        for event in self.world.drain_events() {
            tracing::trace!(?event, "world event");
        }
    }

    /// Route a key event from the window. egui may swallow presses, but a
    /// release always reaches the bindings so a held key never sticks.
    fn on_key(&mut self, name: &str, key_state: ElementState, consumed_by_ui: bool) {
        if forwards_key(key_state, consumed_by_ui) {
            self.handle_key(name, key_state == ElementState::Pressed);
        }
    }

    fn handle_key(&mut self, name: &str, pressed: bool) {
        let state = if pressed { KeyState::Down } else { KeyState::Up };
        if let Some(action) = self.input.on_key_name(name, state) {
            apply_action(&mut self.world, action);
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        let mut selected = self.clip.clone();
        let mut hemi = self.env.hemisphere_intensity();
        let mut dir = self.env.directional_intensity();
        let mut fog = self.env.fog_density();

        egui::Window::new("Controls")
            .default_pos([10.0, 10.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading("Character");
                egui::ComboBox::from_label("Animation")
                    .selected_text(selected.as_str())
                    .show_ui(ui, |ui| {
                        for clip in CHARACTER_CLIPS {
                            ui.selectable_value(&mut selected, clip.to_string(), clip);
                        }
                    });

                ui.separator();
                ui.heading("Lights");
                ui.add(
                    egui::Slider::new(&mut hemi, Environment::HEMISPHERE_RANGE).text("Hemisphere"),
                );
                ui.add(
                    egui::Slider::new(&mut dir, Environment::DIRECTIONAL_RANGE)
                        .text("Directional"),
                );

                ui.separator();
                ui.heading("Fog");
                ui.add(egui::Slider::new(&mut fog, Environment::FOG_RANGE).text("Density"));

                ui.separator();
                ui.small("Boat: arrow keys | Character: W A S D | RMB drag: orbit");
            });

        if selected != self.clip {
            self.request_character(selected);
        }
        self.env.set_hemisphere_intensity(hemi);
        self.env.set_directional_intensity(dir);
        self.env.set_fog_density(fog);

        let summary = SceneInspector::summary(&self.world);
        egui::Window::new("Stats")
            .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
            .title_bar(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!(
                    "{:.0} FPS  {:.1} ms (worst {:.1})",
                    self.stats.fps(),
                    self.stats.frame_ms(),
                    self.stats.worst_ms()
                ));
                ui.label(format!("Frames: {}", self.stats.frames()));
                ui.label(format!(
                    "Trash: {} visible / {} tracked",
                    summary.visible_trash, summary.tracked_trash
                ));
                for role in Role::ALL {
                    ui.label(SceneInspector::inspect_vessel(&self.world, role).to_string());
                }
                let nearest = SceneInspector::nearest_trash(&self.world, Role::Character)
                    .and_then(|(id, dist)| {
                        SceneInspector::inspect_trash(&self.world, id).map(|info| (info, dist))
                    });
                if let Some((info, dist)) = nearest {
                    ui.label(format!(
                        "Nearest trash: {dist:.1} at ({:.0}, {:.0})",
                        info.position.x, info.position.z
                    ));
                }
                if self.loader.in_flight() > 0 {
                    ui.label(format!("Loading {} asset(s)...", self.loader.in_flight()));
                }
                ui.collapsing("Scene dump", |ui| {
                    let text = DebugTextRenderer::new()
                        .render(&self.world, &self.camera.render_view());
                    ui.monospace(text);
                });
            });
    }
}

/// Window, device and the renderers that draw into it.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Tidewater")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no suitable GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("tidewater_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
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

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            format = ?surface_format,
            "GPU initialized"
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn render(&mut self, state: &mut AppState, egui_ctx: &EguiContext) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
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

        self.renderer.render(
            &self.device,
            &self.queue,
            &view,
            &state.camera,
            &state.world,
            &state.env,
            state.started.elapsed().as_secs_f32(),
        );

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
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
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
        self.window.request_redraw();
    }
}

struct App {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                self.state.camera.set_viewport(size.width, size.height);
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to initialize graphics: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    logical_key,
                    state: key_state,
                    repeat: false,
                    ..
                },
            ..
        } = &event
        {
            if let Some(name) = key_name(logical_key) {
                self.state.on_key(name, *key_state, response.consumed);
            }
            return;
        }
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                gpu.resize(new_size);
                self.state
                    .camera
                    .set_viewport(gpu.config.width, gpu.config.height);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state: btn_state,
                ..
            } => {
                self.state.orbiting = btn_state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let notches = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 50.0,
                };
                self.state.camera.zoom(notches);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let frame_time = now - self.state.last_frame;
                self.state.last_frame = now;
                self.state.update(frame_time);
                gpu.render(&mut self.state, &self.egui_ctx);
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.orbiting {
                self.state.camera.orbit(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("tidewater-desktop starting");

    let config = match &cli.config {
        Some(path) => SceneConfig::from_yaml_file(path)
            .with_context(|| format!("load scene config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    let manifest = AssetManifest::new(cli.assets.clone());
    tracing::info!(root = %manifest.root().display(), "asset root");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        state: AppState::new(config, manifest),
        gpu: None,
        egui_ctx: EguiContext::default(),
    };
    event_loop.run_app(&mut app)?;

    Ok(())
}
