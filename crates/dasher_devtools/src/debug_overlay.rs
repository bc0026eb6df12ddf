//! egui layer drawn on top of the sprite pass: the end-state banner and the
//! F3 debug panel.
//!
//! egui needs a three-phase render split because `egui_wgpu::Renderer::render()`
//! wants a `RenderPass<'static>` while `begin_render_pass` borrows the encoder:
//!
//!   1. `prepare()` -- run UI logic, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers (borrows encoder mutably)
//!   3. `paint()`   -- render into a new render pass with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references
//!
//! The banner is painted every frame it is requested; the debug panel only
//! while `visible` is true.

use dasher_core::time::TimeState;
use winit::window::Window;

use crate::hud::{paint_banner, Banner};

#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    pub draw_calls: u32,
    pub texture_binds: u32,
    pub sprite_count: u32,
    /// Estimated GPU memory usage in megabytes
    pub memory_estimate_mb: f32,
    /// Outcome of the current run ("Running", "Game Over", "You Win")
    pub outcome_label: String,
    pub player_y: f32,
    pub player_velocity: f32,
    pub airborne: bool,
    /// Signed distance from the player to the finish line
    pub finish_distance: f32,
    /// Runs started since launch, including the current one
    pub run_number: u32,
    pub paused: bool,
}

#[derive(Debug, Clone, Default)]
pub struct OverlayActions {
    pub toggle_pause: bool,
    /// Advance one fixed step while paused
    pub single_step: bool,
    pub restart: bool,
}

pub struct DebugOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub visible: bool,
}

impl DebugOverlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            visible: false,
        }
    }

    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::info!("Debug overlay: {}", if self.visible { "ON" } else { "OFF" });
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        time: &TimeState,
        stats: &OverlayStats,
        banner: Option<&Banner>,
    ) -> (
        Vec<egui::ClippedPrimitive>,
        egui::TexturesDelta,
        OverlayActions,
    ) {
        let mut actions = OverlayActions::default();
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if let Some(banner) = banner {
                paint_banner(ctx, banner);
            }

            if self.visible {
                egui::Window::new("Debug")
                    .default_pos([10.0, 10.0])
                    .show(ctx, |ui| {
                        ui.label(format!("FPS: {:.1}", time.smoothed_fps));
                        ui.label(format!("Frame time: {:.2} ms", time.smoothed_frame_time_ms));
                        ui.label(format!("Steps this frame: {}", time.steps_this_frame));
                        ui.label(format!("Total steps: {}", time.fixed_step_count));

                        ui.separator();
                        ui.label(format!("Run #{}: {}", stats.run_number, stats.outcome_label));
                        ui.label(format!(
                            "Player y: {:.1}  vy: {:.1}{}",
                            stats.player_y,
                            stats.player_velocity,
                            if stats.airborne { "  (airborne)" } else { "" }
                        ));
                        ui.label(format!("Finish in: {:.1}", stats.finish_distance));

                        ui.separator();
                        ui.label(format!("Draw calls: {}", stats.draw_calls));
                        ui.label(format!("Texture binds: {}", stats.texture_binds));
                        ui.label(format!("Sprites: {}", stats.sprite_count));
                        ui.label(format!("Memory: {:.1} MB", stats.memory_estimate_mb));

                        ui.separator();
                        ui.horizontal(|ui| {
                            let pause_label = if stats.paused { "Resume" } else { "Pause" };
                            if ui.button(pause_label).clicked() {
                                actions.toggle_pause = true;
                            }
                            if stats.paused && ui.button("Step").clicked() {
                                actions.single_step = true;
                            }
                            if ui.button("Restart").clicked() {
                                actions.restart = true;
                            }
                        });
                        if stats.paused {
                            ui.label("\u{23f8} PAUSED");
                        }
                    });
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta, actions)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures that egui no longer needs. Call after rendering.
    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}
