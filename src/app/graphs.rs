//! Joint trace plot: target and displayed angle per joint

use eframe::egui;
use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoints};

use crate::core::{Joint, JointTrace};
use crate::theme::{colors, joint_color};

pub fn render_joint_trace(ui: &mut egui::Ui, trace: &JointTrace) {
    ui.label(
        egui::RichText::new("Joint angles (dashed = target)")
            .color(colors::TEXT_MUTED)
            .size(12.0),
    );

    Plot::new("joint_trace")
        .show_axes([true, true])
        .show_grid(false)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show_background(false)
        .include_x(-trace.window())
        .include_x(0.0)
        .include_y(0.0)
        .include_y(180.0)
        .legend(Legend::default())
        .label_formatter(|name, value| format!("{name} t={:.1}s {:.1}°", value.x, value.y))
        .show(ui, |plot_ui| {
            if trace.len() < 2 {
                return;
            }
            for joint in Joint::ALL {
                let color = joint_color(joint);
                plot_ui.line(
                    Line::new(PlotPoints::from(trace.series(joint, true)))
                        .color(color.gamma_multiply(0.6))
                        .style(LineStyle::dashed_loose())
                        .width(1.0)
                        .name(format!("{} target", joint.label())),
                );
                plot_ui.line(
                    Line::new(PlotPoints::from(trace.series(joint, false)))
                        .color(color)
                        .width(2.0)
                        .name(joint.label()),
                );
            }
        });
}
