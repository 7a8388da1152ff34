// egui HUD layered over the scene: score, timer, catch messages, the
// start/win screens, and an F3 stats panel.
//
// The game core only hands this module plain data (counts, strings,
// positions); all screen placement lives here.

use egui::epaint::Shadow;

use super::session::Phase;

/// Per-frame diagnostics for the F3 panel.
pub struct GameStats {
    pub fps: u32,
    pub frame_time_avg_ms: f32,
    pub frame_time_min_ms: f32,
    pub frame_time_max_ms: f32,
    pub animal_count: usize,
    pub draw_calls: u32,
    pub resolution: (u32, u32),
    pub player_pos: (f32, f32),
    pub player_yaw_deg: f32,
}

/// Everything the HUD shows for one frame, snapshotted by the driver.
pub struct HudFrame<'a> {
    pub phase: Phase,
    pub caught: usize,
    pub total: usize,
    pub timer: String,
    pub glyph_trail: String,
    pub message: Option<&'a str>,
    /// Swing progress in [0, 1) while the net is in flight.
    pub swing_progress: Option<f32>,
    /// `None` = F3 panel hidden.
    pub stats: Option<GameStats>,
}

pub struct Hud {
    pub stats_visible: bool,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Hud {
    pub fn new(
        window: &winit::window::Window,
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let egui_ctx = egui::Context::default();

        // Style: dark, semi-transparent, small monospace white font
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = egui::Color32::from_rgba_premultiplied(0, 0, 0, 180);
        visuals.window_stroke = egui::Stroke::NONE;
        visuals.window_shadow = Shadow::NONE;
        visuals.override_text_color = Some(egui::Color32::WHITE);
        egui_ctx.set_visuals(visuals);

        let mut style = (*egui_ctx.style()).clone();
        style.override_font_id = Some(egui::FontId::monospace(13.0));
        egui_ctx.set_style(style);

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface_format,
            None,  // no depth
            1,     // msaa samples
            false, // no dithering
        );

        Self {
            stats_visible: false,
            egui_ctx,
            egui_state,
            egui_renderer,
        }
    }

    pub fn toggle_stats(&mut self) {
        self.stats_visible = !self.stats_visible;
    }

    pub fn handle_window_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> egui_winit::EventResponse {
        self.egui_state.on_window_event(window, event)
    }

    /// Render one egui frame over the already-drawn scene.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &winit::window::Window,
        view: &wgpu::TextureView,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
        frame: &HudFrame,
    ) {
        let raw_input = self.egui_state.take_egui_input(window);

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            let screen = ctx.screen_rect();

            // ── Score and timer, top-left ────────────────────────────────
            if frame.phase != Phase::Ready {
                egui::Area::new(egui::Id::new("score"))
                    .fixed_pos(egui::pos2(10.0, 10.0))
                    .show(ctx, |ui| {
                        hud_panel(ui, |ui| {
                            ui.label(
                                egui::RichText::new(format!(
                                    "Caught: {}/{}",
                                    frame.caught, frame.total
                                ))
                                .size(18.0),
                            );
                            ui.label(egui::RichText::new(format!("Time  {}", frame.timer)));
                            if !frame.glyph_trail.is_empty() {
                                ui.label(egui::RichText::new(&frame.glyph_trail).size(18.0));
                            }
                        });
                    });
            }

            // ── Crosshair + swing flash, screen center ───────────────────
            if frame.phase == Phase::Running {
                let painter = ctx.layer_painter(egui::LayerId::new(
                    egui::Order::Background,
                    egui::Id::new("crosshair"),
                ));
                let c = screen.center();
                // The cosmetic swing arc: the crosshair blooms and fades
                // over sin(progress * PI). No gameplay meaning.
                let bloom = frame
                    .swing_progress
                    .map(|p| (p * std::f32::consts::PI).sin())
                    .unwrap_or(0.0);
                let r = 3.0 + bloom * 10.0;
                painter.circle_stroke(
                    c,
                    r,
                    egui::Stroke::new(1.5, egui::Color32::from_rgba_unmultiplied(255, 255, 255, 200)),
                );
            }

            // ── Transient catch message, upper center ────────────────────
            if let Some(message) = frame.message {
                egui::Area::new(egui::Id::new("catch_message"))
                    .fixed_pos(egui::pos2(screen.center().x - 140.0, screen.height() * 0.2))
                    .show(ctx, |ui| {
                        hud_panel(ui, |ui| {
                            ui.label(
                                egui::RichText::new(message)
                                    .size(20.0)
                                    .color(egui::Color32::from_rgb(255, 230, 120)),
                            );
                        });
                    });
            }

            // ── Start / win screens, center ──────────────────────────────
            match frame.phase {
                Phase::Ready => {
                    centered_screen(ctx, "start_screen", |ui| {
                        ui.label(egui::RichText::new("FOX HOLLOW").size(28.0));
                        ui.label("Click to play");
                        ui.label("WASD move · Shift run · mouse look · click swings the net");
                        ui.label("Esc quits");
                    });
                }
                Phase::Won => {
                    centered_screen(ctx, "win_screen", |ui| {
                        ui.label(egui::RichText::new("You caught them all!").size(28.0));
                        ui.label(format!("Time: {}", frame.timer));
                        ui.label(egui::RichText::new(&frame.glyph_trail).size(22.0));
                    });
                }
                Phase::Running => {}
            }

            // ── F3: stats panel ──────────────────────────────────────────
            if let Some(stats) = &frame.stats {
                egui::Area::new(egui::Id::new("stats_panel"))
                    .fixed_pos(egui::pos2(10.0, screen.height() - 130.0))
                    .show(ctx, |ui| {
                        hud_panel(ui, |ui| {
                            ui.label(format!("FPS: {}", stats.fps));
                            ui.label(format!(
                                "Frame: {:.2} ms (min: {:.1} | max: {:.1})",
                                stats.frame_time_avg_ms,
                                stats.frame_time_min_ms,
                                stats.frame_time_max_ms
                            ));
                            ui.label(format!("Animals: {}", stats.animal_count));
                            ui.label(format!("Draw calls: {}", stats.draw_calls));
                            ui.label(format!(
                                "Resolution: {} x {}",
                                stats.resolution.0, stats.resolution.1
                            ));
                            ui.label(format!(
                                "Player: ({:.1}, {:.1})  yaw {:.0}°",
                                stats.player_pos.0, stats.player_pos.1, stats.player_yaw_deg
                            ));
                        });
                    });
            }
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, &tris, screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.egui_renderer
                .render(&mut render_pass.forget_lifetime(), &tris, screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

/// The standard translucent HUD frame around a block of labels.
fn hud_panel(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::none()
        .fill(egui::Color32::from_rgba_premultiplied(0, 0, 0, 180))
        .inner_margin(egui::Margin::same(8.0))
        .rounding(4.0)
        .show(ui, add_contents);
}

/// A centered panel for the start and win screens.
fn centered_screen(ctx: &egui::Context, id: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    let screen = ctx.screen_rect();
    egui::Area::new(egui::Id::new(id))
        .fixed_pos(egui::pos2(
            screen.center().x - 180.0,
            screen.height() * 0.35,
        ))
        .show(ctx, |ui| {
            hud_panel(ui, |ui| {
                ui.vertical_centered(|ui| add_contents(ui));
            });
        });
}
