mod hud;
mod viewer;

use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use viewer::{ViewerConfig, ViewerState};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key as WinitKey, KeyCode, NamedKey, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};
use virtworld_input::{Button, Key};
use virtworld_render::TextureSlot;
use virtworld_render_wgpu::{GpuContext, WgpuRenderer};

#[derive(Parser)]
#[command(name = "virtworld-desktop", about = "Walk around and edit a voxel world")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON height-map level; the built-in maze when omitted
    #[arg(long)]
    level: Option<PathBuf>,

    /// Half the edge length of one block
    #[arg(long, default_value_t = 0.5)]
    cube_size: f32,

    /// Height of the built-in level's outer wall, in blocks
    #[arg(long, default_value_t = 10_000)]
    wall_height: u32,

    /// Empty rows above the tallest column, so blocks can be stacked
    #[arg(long, default_value_t = 8)]
    headroom: usize,

    /// Distance moved per key press
    #[arg(long, default_value_t = 0.2)]
    move_speed: f32,

    /// Degrees turned per key press
    #[arg(long, default_value_t = 5.0)]
    pan_speed: f32,

    /// Degrees of look per pixel of pointer motion
    #[arg(long, default_value_t = 0.5)]
    mouse_sensitivity: f32,

    /// Draw one call per block instead of one instanced call
    #[arg(long)]
    naive: bool,

    /// Texture for the blocks
    #[arg(long)]
    stone_texture: Option<PathBuf>,

    /// Texture for the ground
    #[arg(long)]
    grass_texture: Option<PathBuf>,

    /// Key override such as `i=forwards` (repeatable)
    #[arg(long = "bind", value_name = "KEY=COMMAND")]
    bindings: Vec<String>,
}

impl Cli {
    fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            level: self.level.clone(),
            cube_size: self.cube_size,
            wall_height: self.wall_height,
            headroom: self.headroom,
            move_speed: self.move_speed,
            pan_speed: self.pan_speed,
            mouse_sensitivity: self.mouse_sensitivity,
            naive: self.naive,
            bindings: self.bindings.clone(),
        }
    }
}

struct GpuApp {
    state: ViewerState,
    textures: Vec<(TextureSlot, PathBuf)>,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    fatal: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(state: ViewerState, textures: Vec<(TextureSlot, PathBuf)>) -> Self {
        Self {
            state,
            textures,
            window: None,
            gpu: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
            fatal: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("VirtWorld")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs)?);
        let size = window.inner_size();

        let gpu = GpuContext::new(window.clone(), size.width, size.height)?;
        self.state.camera.set_aspect(gpu.aspect());

        let mut renderer = WgpuRenderer::new(
            &gpu.device,
            &gpu.queue,
            gpu.format(),
            gpu.config.width,
            gpu.config.height,
        );
        for (slot, path) in self.textures.drain(..) {
            renderer.load_texture(slot, path);
        }
        let resident = renderer.prepare(&gpu.device, self.state.scene.meshes());
        tracing::debug!("{resident} meshes uploaded before the first frame");

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.format(), None, 1, false);

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!("{error:#}");
        self.fatal = Some(error);
        event_loop.exit();
    }

    /// Match the window's cursor grab to the viewer's pointer-lock state.
    fn sync_pointer_lock(&self) {
        let Some(window) = &self.window else {
            return;
        };
        if self.state.pointer_locked() {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                tracing::warn!("pointer lock unavailable: {e}");
            }
            window.set_cursor_visible(false);
        } else {
            let _ = window.set_cursor_grab(CursorGrabMode::None);
            window.set_cursor_visible(true);
        }
    }

    fn redraw(&mut self) -> Result<()> {
        let (Some(window), Some(gpu), Some(renderer), Some(egui_winit), Some(egui_renderer)) = (
            &self.window,
            &self.gpu,
            &mut self.renderer,
            &mut self.egui_winit,
            &mut self.egui_renderer,
        ) else {
            return Ok(());
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.reconfigure();
                return Ok(());
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return Ok(());
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        {
            let (camera, list) = self.state.frame();
            renderer.render(&gpu.device, &gpu.queue, &view, camera, &list)?;
        }

        let pending_textures = renderer.pending_textures();
        let raw_input = egui_winit.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            hud::draw_hud(ctx, &mut self.state, pending_textures);
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let (width, height) = gpu.size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        egui_renderer.update_buffers(
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
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();
        self.state.frame_done();
        window.request_redraw();
        Ok(())
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e.context("GPU setup failed"));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
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
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    self.state.camera.set_aspect(gpu.aspect());
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(&gpu.device, gpu.config.width, gpu.config.height);
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if physical_key == PhysicalKey::Code(KeyCode::F1) {
                    self.state.show_hud = !self.state.show_hud;
                    return;
                }
                let key = match logical_key {
                    WinitKey::Named(NamedKey::Escape) => Some(Key::Escape),
                    WinitKey::Character(s) => s.chars().next().map(Key::Char),
                    _ => None,
                };
                if let Some(key) = key {
                    self.state.key_pressed(key);
                    self.sync_pointer_lock();
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => {
                let button = match button {
                    MouseButton::Left => Button::Left,
                    MouseButton::Right => Button::Right,
                    MouseButton::Middle => Button::Middle,
                    _ => return,
                };
                self.state.button_pressed(button);
                self.sync_pointer_lock();
            }
            WindowEvent::Focused(false) => {
                self.state.apply(virtworld_input::Action::ReleasePointer);
                self.sync_pointer_lock();
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    self.fail(event_loop, e);
                }
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
            self.state.pointer_moved(delta.0 as f32, delta.1 as f32);
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

    tracing::info!("virtworld-desktop starting");

    let state = ViewerState::new(&cli.viewer_config(), 1.0)?;
    let textures = [
        (TextureSlot::Zero, cli.stone_texture),
        (TextureSlot::One, cli.grass_texture),
    ]
    .into_iter()
    .filter_map(|(slot, path)| path.map(|p| (slot, p)))
    .collect();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state, textures);
    event_loop.run_app(&mut app)?;

    match app.fatal {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
