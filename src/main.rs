//! Headless monitor for the robot-arm state feed
//!
//! Run with: cargo run --features cli --bin arm-cli
//!
//! Lines typed on stdin are sent over the link. Ctrl-C tears the link down.

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use arm_panel::config::LinkConfig;
    use arm_panel::core::{
        outgoing_line, parse_frame, FeedEvent, LinkUpdate, PoseInterpolator, RobotPose,
    };
    use arm_panel::time::{now_seconds, FrameClock};
    use arm_panel::websocket_native::NativeLink;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tracing::{debug, info, warn};
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,arm_panel=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let config = LinkConfig::from_env();
    info!(
        url = %config.url,
        reconnect_ms = config.reconnect.delay.as_millis() as u64,
        max_attempts = ?config.reconnect.max_attempts,
        "Starting arm monitor"
    );

    let mut link = NativeLink::new(&config);
    let mut interpolator = PoseInterpolator::new(RobotPose::default())
        .with_smoothing_rate(config.smoothing_rate)
        .with_lookback(config.lookback);
    debug!(
        url = link.manager().url(),
        smoothing_rate = interpolator.smoothing_rate(),
        lookback = config.lookback,
        "Link and interpolator ready"
    );
    let mut clock = FrameClock::new();

    let mut render_tick = tokio::time::interval(Duration::from_secs_f64(1.0 / 60.0));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut stats_interval = tokio::time::interval(Duration::from_secs(5));
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    link.start();

    loop {
        tokio::select! {
            update = link.next_update() => match update {
                LinkUpdate::Status(state) => info!(status = %state, "link"),
                LinkUpdate::Frame(idx) => {
                    let Some(frame) = link.log().get(idx) else { continue };
                    match parse_frame(frame) {
                        Some(FeedEvent::StateUpdate(_)) | None => {
                            debug!(idx, frame = %frame, "frame");
                        }
                        Some(event) => info!(activity = %event.describe(), "feed"),
                    }
                }
                LinkUpdate::Idle => {}
            },
            _ = render_tick.tick() => {
                let delta = clock.tick(now_seconds());
                interpolator.ingest(link.log());
                interpolator.tick(delta);
            }
            line = stdin.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    if let Some(line) = outgoing_line(&line) {
                        if !link.state().is_connected() {
                            warn!(status = %link.state(), "Not connected, message dropped");
                        }
                        link.send(line);
                    }
                }
                Ok(None) => stdin_open = false,
                Err(e) => {
                    warn!(error = %e, "stdin closed");
                    stdin_open = false;
                }
            },
            _ = stats_interval.tick() => {
                let pose = interpolator.display();
                info!(
                    status = %link.state(),
                    frames = link.log().len(),
                    pose = %pose_summary(&pose),
                    settled = interpolator.is_settled(0.05),
                    "stats"
                );
            }
            _ = &mut shutdown => {
                info!("Interrupted, shutting down");
                link.shutdown();
                break;
            }
        }
    }

    Ok(())
}

/// `base/shoulder/elbow` in degrees, one decimal
#[cfg(not(target_arch = "wasm32"))]
fn pose_summary(pose: &arm_panel::core::RobotPose) -> String {
    format!("{:.1}/{:.1}/{:.1}", pose.base, pose.shoulder, pose.elbow)
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use arm_panel::core::RobotPose;

    #[test]
    fn stats_pose_uses_one_decimal_per_joint() {
        let pose = RobotPose::new(90.0, 12.345, 179.96);
        assert_eq!(pose_summary(&pose), "90.0/12.3/180.0");
    }
}
