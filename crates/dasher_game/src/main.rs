//! Dapper Dasher: jump the nebulae, reach the finish line.
//!
//! Frame structure inside `RedrawRequested`:
//!   1. fixed-step simulation (`World::update`) fed by the wall-clock accumulator
//!   2. CPU mesh rebuild from the post-update world (`frame::build_frame`)
//!   3. sprite pass, then the egui pass (banner + optional debug panel)

mod assets;
mod collision;
mod config;
mod controller;
mod frame;
mod outcome;
mod parallax;
#[cfg(test)]
mod replay;
mod world;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use assets::{load_all_textures, GpuSpriteTexture, TextureId, TextureSizes, TEXTURE_ROOT};
use config::{load_config_from_path, load_config_or_default, ConfigWatcher, GameConfig};
use dasher_core::input::{InputState, Key};
use dasher_core::time::TimeState;
use dasher_devtools::{DebugOverlay, OverlayStats};
use dasher_platform::PlatformConfig;
use dasher_render::{Camera2D, GpuContext, SpritePipeline, SpriteVertex};
use frame::{build_frame, DrawCall};
use outcome::Outcome;
use world::{GameInput, World};

const CONFIG_PATH: &str = "assets/config/dasher.json";

/// Everything that exists once the window and GPU surface are up.
///
///  - **Core systems** (time, input, camera) -- updated every frame
///  - **Run state** (world, outcome, tuning) -- replaced on restart or reload
///  - **GPU resources** (textures, buffers, draw calls) -- mesh streamed per frame
struct GameState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    input: InputState,
    sprite_pipeline: SpritePipeline,
    debug_overlay: DebugOverlay,

    config_watcher: ConfigWatcher,
    config: GameConfig,
    world: World,
    outcome: Outcome,
    run_number: u32,
    paused: bool,
    single_step_requested: bool,

    textures: HashMap<TextureId, GpuSpriteTexture>,
    texture_sizes: TextureSizes,
    texture_bytes: usize,

    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
    draw_calls: Vec<DrawCall>,
    texture_binds: usize,
    sprite_count: usize,
}

impl GameState {
    fn new(window: Arc<Window>, config: GameConfig, config_path: PathBuf) -> Result<Self, String> {
        let gpu = GpuContext::new(window.clone())?;
        let time = TimeState::new(config.target_fps);
        let input = InputState::new();

        // The projection covers the logical play field; the surface may be
        // larger on high-DPI displays.
        let camera = Camera2D::new(config.window_width, config.window_height);
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let debug_overlay = DebugOverlay::new(&gpu.device, gpu.surface_format, &window);

        let loaded = load_all_textures(
            &gpu.device,
            &gpu.queue,
            &sprite_pipeline,
            Path::new(TEXTURE_ROOT),
        );
        let texture_bytes = loaded.total_bytes();

        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[camera.build_uniform()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group = sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);

        let mesh_vertex_capacity = 64;
        let mesh_index_capacity = 96;
        let vertex_buffer = create_vertex_buffer(&gpu.device, mesh_vertex_capacity);
        let index_buffer = create_index_buffer(&gpu.device, mesh_index_capacity);

        let world = World::new(config, &loaded.sizes);
        log::info!(
            "Run #1 started: {} obstacles, finish line at x={:.0}",
            world.obstacles.len(),
            world.finish_line
        );

        let mut state = Self {
            window,
            gpu,
            time,
            input,
            sprite_pipeline,
            debug_overlay,
            config_watcher: ConfigWatcher::new(config_path),
            config,
            world,
            outcome: Outcome::Running,
            run_number: 1,
            paused: false,
            single_step_requested: false,
            textures: loaded.textures,
            texture_sizes: loaded.sizes,
            texture_bytes,
            vertex_buffer,
            index_buffer,
            camera_bind_group,
            mesh_vertex_capacity,
            mesh_index_capacity,
            draw_calls: Vec::new(),
            texture_binds: 0,
            sprite_count: 0,
        };
        state.rebuild_mesh();
        Ok(state)
    }

    fn restart(&mut self, reason: &str) {
        self.world = World::new(self.config, &self.texture_sizes);
        self.outcome = Outcome::of(&self.world);
        self.run_number += 1;
        log::info!("Run #{} started ({})", self.run_number, reason);
    }

    fn reload_config(&mut self, reason: &str) {
        let path = self.config_watcher.path().to_path_buf();
        match load_config_from_path(&path) {
            Ok(mut config) => {
                if (config.window_width, config.window_height)
                    != (self.config.window_width, self.config.window_height)
                {
                    log::warn!(
                        "Window size change to {}x{} applies on next launch",
                        config.window_width,
                        config.window_height
                    );
                    config.window_width = self.config.window_width;
                    config.window_height = self.config.window_height;
                }
                self.config = config;
                self.time.fixed_dt = config.fixed_dt() as f64;
                log::info!("Reloaded tuning from '{}' ({})", path.display(), reason);
                self.restart("tuning reloaded");
            }
            Err(err) => {
                log::error!("{err}. Keeping previous tuning.");
            }
        }
    }

    fn step(&mut self, input: GameInput, dt: f32) {
        let before = self.outcome;
        self.world = self.world.update(input, dt);
        self.outcome = Outcome::of(&self.world);
        if self.outcome != before {
            log::info!(
                "Run #{}: {} -> {} (player y={:.1}, finish line x={:.1})",
                self.run_number,
                before,
                self.outcome,
                self.world.player.sprite.position.y,
                self.world.finish_line
            );
        }
    }

    fn estimate_memory_mb(&self) -> f32 {
        let mut bytes = self.texture_bytes;
        bytes += self.mesh_vertex_capacity * std::mem::size_of::<SpriteVertex>();
        bytes += self.mesh_index_capacity * std::mem::size_of::<u32>();
        bytes as f32 / (1024.0 * 1024.0)
    }

    fn overlay_stats(&self) -> OverlayStats {
        OverlayStats {
            draw_calls: self.draw_calls.len() as u32,
            texture_binds: self.texture_binds as u32,
            sprite_count: self.sprite_count as u32,
            memory_estimate_mb: self.estimate_memory_mb(),
            outcome_label: self.outcome.label().to_string(),
            player_y: self.world.player.sprite.position.y,
            player_velocity: self.world.player.velocity_y,
            airborne: self.world.player.airborne,
            finish_distance: self.world.finish_distance(),
            run_number: self.run_number,
            paused: self.paused,
        }
    }

    fn rebuild_mesh(&mut self) {
        let mesh = build_frame(&self.world, &self.texture_sizes);
        self.ensure_mesh_capacity(mesh.vertices.len(), mesh.indices.len());
        self.sprite_count = mesh.quad_count();
        self.texture_binds = mesh.texture_binds();

        if !mesh.vertices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&mesh.vertices));
        }
        if !mesh.indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&mesh.indices));
        }
        self.draw_calls = mesh.draw_calls;
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }

    /// Fixed-step simulation phase. Returns false when the player asked to quit.
    fn simulate(&mut self) -> bool {
        self.time.begin_frame();
        let mut world_changed = false;
        let mut jump_pending = self.input.is_just_pressed(Key::Space);
        let mut first_step = true;

        while self.time.should_step() {
            // Hotkeys are edge-triggered once per frame, however many steps run.
            if first_step {
                first_step = false;
                if self.input.is_just_pressed(Key::Escape) {
                    return false;
                }
                if self.input.is_just_pressed(Key::F3) {
                    self.debug_overlay.toggle();
                }
                if self.input.is_just_pressed(Key::R) {
                    self.restart("manual trigger (R)");
                    world_changed = true;
                } else if self.config_watcher.should_reload() {
                    self.reload_config("file watcher");
                    world_changed = true;
                }
            }

            if self.paused && !self.single_step_requested {
                break;
            }
            self.single_step_requested = false;

            let input = GameInput {
                jump_pressed: jump_pending,
            };
            jump_pending = false;
            let dt = self.time.fixed_dt as f32;
            self.step(input, dt);
            world_changed = true;
        }
        self.time.end_frame();

        if world_changed {
            self.rebuild_mesh();
        }
        true
    }

    fn render(&mut self) {
        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let stats = self.overlay_stats();
        let banner = self.outcome.banner(&self.config);
        let (egui_primitives, egui_textures_delta, overlay_actions) =
            self.debug_overlay
                .prepare(&self.window, &self.time, &stats, banner.as_ref());

        if overlay_actions.toggle_pause {
            self.paused = !self.paused;
            log::info!(
                "Simulation {}",
                if self.paused { "PAUSED" } else { "RESUMED" }
            );
        }
        if overlay_actions.single_step {
            self.single_step_requested = true;
        }
        if overlay_actions.restart {
            self.restart("overlay button");
            self.rebuild_mesh();
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut last_bound: Option<TextureId> = None;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            render_pass.set_pipeline(&self.sprite_pipeline.render_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            for draw in &self.draw_calls {
                if let Some(texture) = self.textures.get(&draw.texture) {
                    if last_bound != Some(draw.texture) {
                        render_pass.set_bind_group(1, &texture.bind_group, &[]);
                        last_bound = Some(draw.texture);
                    }
                    render_pass.draw_indexed(
                        draw.index_start..(draw.index_start + draw.index_count),
                        0,
                        0..1,
                    );
                }
            }
        }

        self.debug_overlay.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &egui_primitives,
            &egui_textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
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

            self.debug_overlay
                .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
        }

        self.debug_overlay.cleanup(&egui_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

struct App {
    config: GameConfig,
    config_path: PathBuf,
    platform: PlatformConfig,
    state: Option<GameState>,
}

impl App {
    fn new(config_path: PathBuf) -> Self {
        let config = load_config_or_default(&config_path);
        let platform = PlatformConfig {
            width: config.window_width,
            height: config.window_height,
            ..PlatformConfig::default()
        };
        Self {
            config,
            config_path,
            platform,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = match dasher_platform::create_window(event_loop, &self.platform) {
            Ok(window) => window,
            Err(err) => {
                log::error!("{err}");
                event_loop.exit();
                return;
            }
        };
        log::info!(
            "Window created: {}x{}",
            self.platform.width,
            self.platform.height
        );

        match GameState::new(window, self.config, self.config_path.clone()) {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                log::error!("Failed to initialise renderer: {err}");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state
            .debug_overlay
            .handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::Focused(false) => {
                state.input.release_all();
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(game_key),
                            ElementState::Released => state.input.key_up(game_key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                if !state.simulate() {
                    log::info!("Escape pressed, exiting.");
                    event_loop.exit();
                    return;
                }
                state.render();

                // Only clear edge-triggered input after at least one fixed step
                // consumed it, so a press on a zero-step frame is not lost.
                if state.time.steps_this_frame > 0 {
                    state.input.end_frame();
                }
            }

            _ => {}
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::Space => Some(Key::Space),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F3 => Some(Key::F3),
        KeyCode::KeyR => Some(Key::R),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Dapper Dasher starting...");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Failed to create event loop: {err}");
            return;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(PathBuf::from(CONFIG_PATH));
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {err}");
    }
}
