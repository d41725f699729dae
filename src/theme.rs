//! Dark dashboard theme with the arm's segment colors

use egui::Color32;

use crate::core::Joint;
use crate::ws_state::WsState;

pub mod colors {
    use super::Color32;

    // Backgrounds
    pub const BG_PRIMARY: Color32 = Color32::from_rgb(10, 10, 14);
    pub const BG_ELEVATED: Color32 = Color32::from_rgb(22, 22, 30);
    pub const BG_HOVER: Color32 = Color32::from_rgb(34, 34, 44);

    // Text
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(235, 235, 240);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 160, 170);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(90, 90, 100);

    pub const BORDER: Color32 = Color32::from_rgb(44, 44, 56);

    // Arm segments, from the base up
    pub const BASE: Color32 = Color32::from_rgb(0xff, 0x6b, 0x35);
    pub const UPPER_ARM: Color32 = Color32::from_rgb(0x34, 0x98, 0xdb);
    pub const FOREARM: Color32 = Color32::from_rgb(0x9b, 0x59, 0xb6);
    pub const JOINT: Color32 = Color32::from_rgb(220, 220, 230);
    pub const FLOOR_GRID: Color32 = Color32::from_rgb(0x5b, 0x67, 0xd8);

    // Connection status
    pub const STATUS_OK: Color32 = Color32::from_rgb(100, 200, 100);
    pub const STATUS_PENDING: Color32 = Color32::from_rgb(200, 200, 100);
    pub const STATUS_DOWN: Color32 = Color32::from_rgb(200, 100, 100);
}

pub fn status_color(state: &WsState) -> Color32 {
    match state {
        WsState::Connected => colors::STATUS_OK,
        WsState::Connecting => colors::STATUS_PENDING,
        WsState::Disconnected | WsState::Error(_) => colors::STATUS_DOWN,
    }
}

pub fn minimal_visuals() -> egui::Visuals {
    use colors::*;

    let mut visuals = egui::Visuals::dark();

    visuals.panel_fill = BG_PRIMARY;
    visuals.window_fill = BG_PRIMARY;
    visuals.extreme_bg_color = BG_ELEVATED;
    visuals.faint_bg_color = BG_ELEVATED;
    visuals.override_text_color = Some(TEXT_PRIMARY);

    visuals.widgets.noninteractive.bg_fill = BG_PRIMARY;
    visuals.widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, TEXT_MUTED);
    visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, BORDER);

    visuals.widgets.inactive.bg_fill = BG_ELEVATED;
    visuals.widgets.inactive.fg_stroke = egui::Stroke::new(1.0, TEXT_SECONDARY);
    visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.0, BORDER);
    visuals.widgets.inactive.weak_bg_fill = BG_ELEVATED;

    visuals.widgets.hovered.bg_fill = BG_HOVER;
    visuals.widgets.hovered.fg_stroke = egui::Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, colors::UPPER_ARM);
    visuals.widgets.hovered.weak_bg_fill = BG_HOVER;

    visuals.widgets.active.bg_fill = BG_HOVER;
    visuals.widgets.active.fg_stroke = egui::Stroke::new(1.0, TEXT_PRIMARY);
    visuals.widgets.active.bg_stroke = egui::Stroke::new(1.0, colors::UPPER_ARM);
    visuals.widgets.active.weak_bg_fill = BG_HOVER;

    visuals.selection.bg_fill = colors::UPPER_ARM.gamma_multiply(0.4);
    visuals.selection.stroke = egui::Stroke::new(1.0, TEXT_PRIMARY);
    visuals.hyperlink_color = colors::UPPER_ARM;

    visuals.window_shadow = egui::Shadow::NONE;
    visuals.popup_shadow = egui::Shadow::NONE;

    visuals
}

/// Trace and label color for a joint, matching the segment it drives
pub fn joint_color(joint: Joint) -> Color32 {
    match joint {
        Joint::Base => colors::BASE,
        Joint::Shoulder => colors::UPPER_ARM,
        Joint::Elbow => colors::FOREARM,
    }
}
