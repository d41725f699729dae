//! Live message log and chat input

use eframe::egui;

use crate::core::{outgoing_line, MessageLog};
use crate::theme::colors;

/// Frames shown in the feed panel
pub const FEED_ROWS: usize = 50;

/// Draws the recent frames and the chat box. Returns a line to send when the
/// user submits one.
pub fn render_feed(
    ui: &mut egui::Ui,
    log: &MessageLog,
    chat_input: &mut String,
    connected: bool,
) -> Option<String> {
    ui.label(
        egui::RichText::new(format!("Feed ({} frames)", log.len()))
            .color(colors::TEXT_MUTED)
            .size(12.0),
    );

    let mut submitted = None;
    egui::TopBottomPanel::bottom("chat")
        .frame(egui::Frame::new().inner_margin(4.0))
        .show_inside(ui, |ui| {
            ui.horizontal(|ui| {
                let edit_width = ui.available_width() - 56.0;
                let edit = ui.add_enabled(
                    connected,
                    egui::TextEdit::singleline(chat_input)
                        .hint_text(if connected { "Message" } else { "Offline" })
                        .desired_width(edit_width),
                );
                let enter = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let clicked = ui
                    .add_enabled(connected, egui::Button::new("Send"))
                    .clicked();
                if enter || clicked {
                    submitted = take_chat_line(chat_input);
                    edit.request_focus();
                }
            });
        });

    egui::ScrollArea::vertical()
        .stick_to_bottom(true)
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for frame in log.recent(FEED_ROWS) {
                ui.label(
                    egui::RichText::new(frame)
                        .monospace()
                        .size(11.0)
                        .color(colors::TEXT_SECONDARY),
                );
            }
        });

    submitted
}

/// Trimmed line to send, clearing the input; `None` for blank input
pub fn take_chat_line(input: &mut String) -> Option<String> {
    let line = outgoing_line(input).map(str::to_string);
    input.clear();
    line
}
