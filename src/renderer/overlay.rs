//! egui overlay: intro title, anchor buttons, back button and debug window.

use crate::intro::IntroFrame;
use crate::text::SplitText;
use crate::tour::{ControlClass, ControlCommand, Tour};

const TITLE_SIZE: f32 = 56.0;
const BACK_MARGIN: f32 = 40.0;
const TITLE_COLOR: egui::Color32 = egui::Color32::from_rgb(32, 44, 56);

#[derive(Debug, Clone, Copy, Default)]
pub struct DebugStats {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub primitives: usize,
}

/// What the overlay shows this frame
#[derive(Debug, Clone, Copy)]
pub struct OverlayView<'a> {
    pub title: &'a SplitText,
    /// Intro pose, absent once the intro has finished
    pub intro: Option<&'a IntroFrame>,
    pub show_ui: bool,
    pub debug: Option<DebugStats>,
}

/// Lay out the overlay; returns the commands of buttons clicked this frame
pub fn draw_overlay(ctx: &egui::Context, tour: &Tour, view: &OverlayView<'_>) -> Vec<ControlCommand> {
    let mut commands = Vec::new();
    if !view.show_ui {
        return commands;
    }

    let ppp = ctx.pixels_per_point();
    let viewport = tour.viewport();
    let screen = egui::vec2(viewport.width as f32 / ppp, viewport.height as f32 / ppp);

    if let Some(frame) = view.intro {
        draw_title(ctx, view.title, frame, screen);
    }

    let classes = tour.classes();
    if tour.is_loaded() && classes.contains(ControlClass::Active) {
        for (index, placement) in tour.placements().iter().enumerate() {
            let pos = egui::pos2(placement.point.x / ppp, placement.point.y / ppp);
            egui::Area::new(egui::Id::new(("anchor_button", index)))
                .fixed_pos(pos)
                .order(egui::Order::Foreground)
                .show(ctx, |ui| {
                    if ui.button(placement.label.as_str()).clicked() {
                        commands.push(placement.control);
                    }
                });
        }

        if classes.contains(ControlClass::Forward) {
            egui::Area::new(egui::Id::new("back_button"))
                .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -BACK_MARGIN))
                .order(egui::Order::Foreground)
                .show(ctx, |ui| {
                    if ui.button("Back").clicked() {
                        commands.push(ControlCommand::Back);
                    }
                });
        }
    }

    if let Some(stats) = view.debug {
        draw_debug_window(ctx, tour, stats);
    }

    commands
}

/// Title centred on screen; each character is offset by a fraction of the
/// line height and clipped to the line, so it appears to slide out of a slot.
fn draw_title(ctx: &egui::Context, title: &SplitText, frame: &IntroFrame, screen: egui::Vec2) {
    if title.is_empty() || frame.title_opacity <= 0.0 {
        return;
    }

    let layer = egui::LayerId::new(egui::Order::Foreground, egui::Id::new("intro_title"));
    let painter = ctx.layer_painter(layer);
    let font = egui::FontId::proportional(TITLE_SIZE);
    let color = TITLE_COLOR.gamma_multiply(frame.title_opacity.clamp(0.0, 1.0));

    let galleys: Vec<_> = title
        .chars()
        .iter()
        .map(|span| painter.layout_no_wrap(span.ch.to_string(), font.clone(), color))
        .collect();
    let width: f32 = galleys.iter().map(|g| g.size().x).sum();
    let line_height = galleys.iter().map(|g| g.size().y).fold(0.0, f32::max);

    let origin = egui::pos2((screen.x - width) / 2.0, (screen.y - line_height) / 2.0);
    let line = egui::Rect::from_min_size(origin, egui::vec2(width, line_height));
    let painter = painter.with_clip_rect(line);

    let mut x = origin.x;
    for (galley, offset) in galleys.into_iter().zip(&frame.char_offsets) {
        let advance = galley.size().x;
        let pos = egui::pos2(x, origin.y + offset * line_height);
        painter.galley(pos, galley, color);
        x += advance;
    }
}

fn draw_debug_window(ctx: &egui::Context, tour: &Tour, stats: DebugStats) {
    egui::Window::new("Debug Info")
        .title_bar(true)
        .resizable(false)
        .fixed_pos(egui::pos2(10.0, 10.0))
        .default_width(250.0)
        .show(ctx, |ui| {
            ui.heading(
                egui::RichText::new(format!("{:.0} FPS", stats.fps))
                    .size(32.0)
                    .color(egui::Color32::from_rgb(74, 158, 255)),
            );
            ui.label(
                egui::RichText::new(format!("{:.2} ms", stats.frame_time_ms))
                    .size(14.0)
                    .color(egui::Color32::GRAY),
            );

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(5.0);

            ui.label(
                egui::RichText::new("Camera")
                    .size(16.0)
                    .color(egui::Color32::from_rgb(100, 200, 100)),
            );
            match tour.active_camera() {
                Some(index) => ui.monospace(format!("Active: {} of {}", index + 1, tour.camera_count())),
                None => ui.monospace("Active: fallback"),
            };
            let position = tour.camera_view().position;
            ui.monospace(format!(
                "Pos: ({:.2}, {:.2}, {:.2})",
                position.x, position.y, position.z
            ));
            ui.monospace(format!("Primitives: {}", stats.primitives));

            ui.add_space(5.0);
            ui.separator();
            ui.add_space(5.0);

            ui.label(
                egui::RichText::new("Animation")
                    .size(16.0)
                    .color(egui::Color32::from_rgb(200, 150, 100)),
            );
            match (tour.current_clip(), tour.current_action()) {
                (Some(clip), Some(action)) => {
                    ui.monospace(format!("Clip: {} of {}", clip + 1, tour.clip_count()));
                    ui.monospace(format!("Time: {:.2}s / {:.2}s", action.time(), action.duration()));
                    ui.monospace(format!("Scale: {:+.2}", action.time_scale));
                    ui.monospace(format!(
                        "State: {}",
                        if action.is_enabled() { "enabled" } else { "disabled" }
                    ));
                }
                _ => {
                    ui.monospace("Clip: none");
                }
            }
            let classes = tour.classes().to_string();
            ui.monospace(format!("Classes: {}", if classes.is_empty() { "-" } else { classes.as_str() }));
        });
}
