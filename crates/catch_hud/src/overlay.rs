//! Heads-up display rendered via egui on top of the sprites.
//!
//! Score and tutorial text are always drawn. The debug window is toggled
//! with F3. egui needs a split render:
//!
//!   1. `prepare()` -- run UI logic, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers (borrows encoder mutably)
//!   3. `paint()`   -- render into a new render pass with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references

use catch_core::FrameClock;
use glam::Vec2;
use winit::window::Window;

use crate::text::TextSlot;

#[derive(Debug, Clone, Default)]
pub struct DebugStats {
    pub ticks: u64,
    pub score: u64,
    pub player_position: Vec2,
    pub player_velocity: Vec2,
    pub cosmetic_label: String,
    pub sprite_count: u32,
    pub draw_calls: u32,
}

pub struct HudOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub debug_visible: bool,
    score: TextSlot,
    tutorial: TextSlot,
}

impl HudOverlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
        score: TextSlot,
        tutorial: TextSlot,
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
            debug_visible: false,
            score,
            tutorial,
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

    pub fn toggle_debug(&mut self) {
        self.debug_visible = !self.debug_visible;
        log::info!(
            "Debug window: {}",
            if self.debug_visible { "ON" } else { "OFF" }
        );
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        clock: &FrameClock,
        stats: &DebugStats,
    ) -> (Vec<egui::ClippedPrimitive>, egui::TexturesDelta) {
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let score = self.score.get();
        let tutorial = self.tutorial.get();
        let debug_visible = self.debug_visible;

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            egui::Area::new(egui::Id::new("score"))
                .anchor(egui::Align2::LEFT_TOP, [16.0, 12.0])
                .interactable(false)
                .show(ctx, |ui| {
                    ui.label(
                        egui::RichText::new(&score)
                            .size(36.0)
                            .strong()
                            .color(egui::Color32::WHITE),
                    );
                });

            egui::Area::new(egui::Id::new("tutorial"))
                .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -24.0])
                .interactable(false)
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(
                            egui::RichText::new(&tutorial)
                                .size(22.0)
                                .color(egui::Color32::WHITE),
                        );
                    });
                });

            if debug_visible {
                egui::Window::new("Debug")
                    .default_pos([10.0, 80.0])
                    .show(ctx, |ui| {
                        for line in debug_lines(clock, stats) {
                            ui.label(line);
                        }
                    });
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta)
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

    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn debug_lines(clock: &FrameClock, stats: &DebugStats) -> Vec<String> {
    vec![
        format!("FPS: {:.1}", clock.smoothed_fps),
        format!("Frame time: {:.2} ms", clock.smoothed_frame_time_ms),
        format!("Ticks: {}", stats.ticks),
        format!(
            "Player: ({:.0}, {:.0})",
            stats.player_position.x, stats.player_position.y
        ),
        format!(
            "Velocity: ({:.1}, {:.1})",
            stats.player_velocity.x, stats.player_velocity.y
        ),
        format!("Score: {}", stats.score),
        format!("Mode: {}", stats.cosmetic_label),
        format!(
            "Sprites: {} / draw calls: {}",
            stats.sprite_count, stats.draw_calls
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_lines_report_session_state() {
        let clock = FrameClock::new();
        let stats = DebugStats {
            ticks: 120,
            score: 3,
            player_position: Vec2::new(640.0, 355.0),
            player_velocity: Vec2::new(0.0, -5.0),
            cosmetic_label: "egg".to_string(),
            sprite_count: 3,
            draw_calls: 3,
        };
        let lines = debug_lines(&clock, &stats);
        assert!(lines.contains(&"Ticks: 120".to_string()));
        assert!(lines.contains(&"Player: (640, 355)".to_string()));
        assert!(lines.contains(&"Velocity: (0.0, -5.0)".to_string()));
        assert!(lines.contains(&"Mode: egg".to_string()));
    }
}
