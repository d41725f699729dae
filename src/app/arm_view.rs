//! Arm view: the smoothed pose painted in a fixed three-quarter view

use eframe::egui;

use crate::core::{ArmGeometry, Camera, Point3, RobotPose};
use crate::theme::colors;

/// Half-extent of the floor grid, in model units
const GRID_HALF: i32 = 6;

pub fn render_arm(ui: &mut egui::Ui, pose: &RobotPose, geometry: &ArmGeometry, camera: &Camera) {
    let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::hover());
    let rect = response.rect;

    let reach = geometry.reach().max(f64::EPSILON);
    let scale = (rect.height() as f64 * 0.75 / reach).min(rect.width() as f64 * 0.4 / reach);
    let origin = egui::pos2(rect.center().x, rect.bottom() - rect.height() * 0.18);
    let to_screen = |p: Point3| {
        let [x, y] = camera.project(p);
        egui::pos2(origin.x + (x * scale) as f32, origin.y - (y * scale) as f32)
    };

    let grid = egui::Stroke::new(1.0, colors::FLOOR_GRID.gamma_multiply(0.35));
    let half = GRID_HALF as f64;
    for i in -GRID_HALF..=GRID_HALF {
        let i = i as f64;
        painter.line_segment([to_screen([-half, 0.0, i]), to_screen([half, 0.0, i])], grid);
        painter.line_segment([to_screen([i, 0.0, -half]), to_screen([i, 0.0, half])], grid);
    }

    let points = geometry.forward(&pose.transforms());
    let base = to_screen(points.base);
    let shoulder = to_screen(points.shoulder);
    let elbow = to_screen(points.elbow);
    let wrist = to_screen(points.wrist);

    painter.circle_filled(base, 18.0, colors::BASE.gamma_multiply(0.5));
    painter.line_segment([base, shoulder], egui::Stroke::new(16.0, colors::BASE));
    painter.line_segment([shoulder, elbow], egui::Stroke::new(10.0, colors::UPPER_ARM));
    painter.line_segment([elbow, wrist], egui::Stroke::new(7.0, colors::FOREARM));
    for (pos, radius) in [(shoulder, 7.0), (elbow, 6.0), (wrist, 4.0)] {
        painter.circle_filled(pos, radius, colors::JOINT);
    }

    painter.text(
        rect.left_top() + egui::vec2(8.0, 8.0),
        egui::Align2::LEFT_TOP,
        format!(
            "base {:6.1}°  shoulder {:6.1}°  elbow {:6.1}°",
            pose.base, pose.shoulder, pose.elbow
        ),
        egui::FontId::monospace(12.0),
        colors::TEXT_SECONDARY,
    );
}
