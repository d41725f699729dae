//! Header bar with link status and counters

use eframe::egui;

use crate::theme::{colors, status_color};
use crate::ws_state::WsState;

pub fn render_header(
    ui: &mut egui::Ui,
    state: &WsState,
    fps: f64,
    frames: usize,
    last_activity: Option<&str>,
) {
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new("Robot Arm")
                .color(colors::TEXT_PRIMARY)
                .strong(),
        );
        ui.add_space(10.0);
        if let Some(activity) = last_activity {
            ui.label(egui::RichText::new(activity).color(colors::TEXT_SECONDARY));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                egui::RichText::new(format!("{frames} frames"))
                    .color(colors::TEXT_MUTED)
                    .monospace(),
            );
            ui.label(egui::RichText::new("/").color(colors::TEXT_MUTED));
            ui.label(
                egui::RichText::new(format!("{fps:.0} fps"))
                    .color(colors::TEXT_SECONDARY)
                    .monospace(),
            );
            ui.add_space(10.0);

            let status = ui.colored_label(status_color(state), state.label());
            if let WsState::Error(reason) = state {
                status.on_hover_text(reason.as_str());
            }
        });
    });
}
