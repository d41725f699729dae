//! Browser dashboard for the robot arm
//!
//! Each frame drains the link, feeds the interpolator and redraws. The panel
//! helpers are plain functions over egui; only [`ArmApp`] needs the browser
//! transport.

pub mod arm_view;
pub mod feed;
pub mod graphs;
pub mod header;

#[cfg(target_arch = "wasm32")]
pub use self::web::ArmApp;

#[cfg(target_arch = "wasm32")]
mod web {
    use eframe::egui;
    use tracing::info;

    use super::{arm_view, feed, graphs, header};
    use crate::config::LinkConfig;
    use crate::core::{
        parse_frame, ArmGeometry, Camera, JointTrace, LinkUpdate, PoseInterpolator, RobotPose,
    };
    use crate::theme::{colors, minimal_visuals};
    use crate::time::{now_seconds, FpsCounter, FrameClock};
    use crate::websocket_wasm::WsClient;

    pub struct ArmApp {
        link: WsClient,
        interpolator: PoseInterpolator,
        geometry: ArmGeometry,
        camera: Camera,
        clock: FrameClock,
        fps_counter: FpsCounter,
        trace: JointTrace,
        /// Most recent non-pose feed event, shown in the header
        last_activity: Option<String>,
        chat_input: String,
    }

    impl ArmApp {
        pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
            cc.egui_ctx.set_visuals(minimal_visuals());

            let mut config = LinkConfig::default();
            if let Some(url) = js_sys::eval("window.__arm_ws_url")
                .ok()
                .and_then(|v| v.as_string())
            {
                config.url = url;
            }
            info!(url = %config.url, "Starting arm dashboard");

            let mut link = WsClient::new(&config);
            link.start();

            Self {
                link,
                interpolator: PoseInterpolator::new(RobotPose::default())
                    .with_smoothing_rate(config.smoothing_rate)
                    .with_lookback(config.lookback),
                geometry: ArmGeometry::default(),
                camera: Camera::default(),
                clock: FrameClock::new(),
                fps_counter: FpsCounter::new(),
                trace: JointTrace::default(),
                last_activity: None,
                chat_input: String::new(),
            }
        }

        fn process_updates(&mut self) {
            for update in self.link.pump() {
                match update {
                    LinkUpdate::Status(state) => info!(status = %state, "link"),
                    LinkUpdate::Frame(idx) => {
                        let event = self.link.log().get(idx).and_then(parse_frame);
                        if let Some(event) = event.filter(|e| e.pose_update().is_none()) {
                            info!(activity = %event.describe(), "feed");
                            self.last_activity = Some(event.describe());
                        }
                    }
                    LinkUpdate::Idle => {}
                }
            }
        }
    }

    impl eframe::App for ArmApp {
        fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
            ctx.request_repaint();

            self.process_updates();

            let now = now_seconds();
            let delta = self.clock.tick(now);
            self.interpolator.ingest(self.link.log());
            self.interpolator.tick(delta);
            self.trace
                .push(now, self.interpolator.target(), self.interpolator.display());
            self.fps_counter.tick();

            egui::TopBottomPanel::top("header")
                .frame(egui::Frame::new().fill(colors::BG_PRIMARY).inner_margin(6.0))
                .show(ctx, |ui| {
                    header::render_header(
                        ui,
                        self.link.state(),
                        self.fps_counter.fps(),
                        self.link.log().len(),
                        self.last_activity.as_deref(),
                    );
                });

            let outgoing = egui::SidePanel::right("feed")
                .default_width(ctx.screen_rect().width() * 0.3)
                .min_width(240.0)
                .resizable(true)
                .frame(egui::Frame::new().fill(colors::BG_PRIMARY).inner_margin(8.0))
                .show(ctx, |ui| {
                    feed::render_feed(
                        ui,
                        self.link.log(),
                        &mut self.chat_input,
                        self.link.state().is_connected(),
                    )
                })
                .inner;
            if let Some(line) = outgoing {
                self.link.send(line);
            }

            egui::CentralPanel::default()
                .frame(egui::Frame::new().fill(colors::BG_PRIMARY).inner_margin(8.0))
                .show(ctx, |ui| {
                    let available = ui.available_size();
                    let view_height = available.y * 0.62;
                    ui.allocate_ui(egui::vec2(available.x, view_height), |ui| {
                        arm_view::render_arm(
                            ui,
                            &self.interpolator.display(),
                            &self.geometry,
                            &self.camera,
                        );
                    });
                    ui.add_space(6.0);
                    graphs::render_joint_trace(ui, &self.trace);
                });
        }
    }
}
