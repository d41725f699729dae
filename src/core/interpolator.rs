//! Smoothed pose for rendering
//!
//! The target pose follows decoded `STATE_UPDATE` frames; the display pose
//! chases it with exponential smoothing, one step per render tick.

use super::log::MessageLog;
use super::parser::{parse_frame, FeedEvent};
use super::pose::{PoseUpdate, RobotPose};
use tracing::{debug, trace};

/// Blend rate per second; at 4, a 0.25 s frame reaches the target in one tick
pub const DEFAULT_SMOOTHING_RATE: f64 = 4.0;

/// How many of the newest frames are decoded per ingest
pub const DEFAULT_LOOKBACK: usize = 10;

#[derive(Debug, Clone)]
pub struct PoseInterpolator {
    target: RobotPose,
    display: RobotPose,
    smoothing_rate: f64,
    lookback: usize,
    /// Log length at the previous ingest
    cursor: usize,
}

impl Default for PoseInterpolator {
    fn default() -> Self {
        Self::new(RobotPose::default())
    }
}

impl PoseInterpolator {
    /// Both poses start at `initial`
    pub fn new(initial: RobotPose) -> Self {
        Self {
            target: initial,
            display: initial,
            smoothing_rate: DEFAULT_SMOOTHING_RATE,
            lookback: DEFAULT_LOOKBACK,
            cursor: 0,
        }
    }

    pub fn with_smoothing_rate(mut self, rate: f64) -> Self {
        self.smoothing_rate = rate;
        self
    }

    pub fn with_lookback(mut self, lookback: usize) -> Self {
        self.lookback = lookback;
        self
    }

    pub fn target(&self) -> RobotPose {
        self.target
    }

    pub fn display(&self) -> RobotPose {
        self.display
    }

    pub fn smoothing_rate(&self) -> f64 {
        self.smoothing_rate
    }

    /// Apply a partial update to the target. Returns true if the target moved.
    pub fn apply(&mut self, update: &PoseUpdate) -> bool {
        update.apply_to(&mut self.target)
    }

    /// Decode frames appended since the last call, at most the newest `lookback`.
    ///
    /// Frames that do not decode to a state update are skipped. Returns the
    /// number of state updates applied.
    pub fn ingest(&mut self, log: &MessageLog) -> usize {
        if log.len() < self.cursor {
            // Fed a different log; start over from its suffix
            self.cursor = 0;
        }
        if log.len() == self.cursor {
            return 0;
        }

        let start = self.cursor.max(log.len().saturating_sub(self.lookback));
        let mut applied = 0;
        for frame in log.since(start) {
            if let Some(FeedEvent::StateUpdate(update)) = parse_frame(frame) {
                self.apply(&update);
                applied += 1;
            }
        }
        if start > self.cursor {
            debug!(skipped = start - self.cursor, "Older frames outside lookback skipped");
        }
        self.cursor = log.len();
        trace!(applied, target = ?self.target, "Ingested frames");
        applied
    }

    /// Advance the display pose by one render frame of `delta` seconds.
    ///
    /// Blend factor is `min(1, delta * rate)`; at 1 the display lands exactly
    /// on the target.
    pub fn tick(&mut self, delta: f64) {
        if !(delta.is_finite() && delta > 0.0) {
            return;
        }
        let blend = delta * self.smoothing_rate;
        if blend >= 1.0 {
            self.display = self.target;
        } else if blend > 0.0 {
            self.display = self.display.blend_toward(&self.target, blend);
        }
    }

    /// True once the display is within `epsilon` of the target on every joint
    pub fn is_settled(&self, epsilon: f64) -> bool {
        self.display.max_abs_diff(&self.target) <= epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_of(frames: &[&str]) -> MessageLog {
        let mut log = MessageLog::new();
        for f in frames {
            log.push(f.to_string());
        }
        log
    }

    #[test]
    fn full_update_then_one_second_ticks_snaps_to_target() {
        let log = log_of(&[r#"{"type":"STATE_UPDATE","payload":{"base":90,"hombro":0,"codo":180}}"#]);
        let mut interp = PoseInterpolator::default();
        assert_eq!(interp.ingest(&log), 1);
        interp.tick(1.0);
        assert_eq!(interp.display(), RobotPose::new(90.0, 0.0, 180.0));
        interp.tick(1.0);
        assert_eq!(interp.display(), RobotPose::new(90.0, 0.0, 180.0));
    }

    #[test]
    fn partial_payload_changes_only_base() {
        let mut interp = PoseInterpolator::new(RobotPose::new(10.0, 20.0, 30.0));
        let log = log_of(&[r#"{"type":"STATE_UPDATE","payload":{"base":45}}"#]);
        interp.ingest(&log);
        assert_eq!(interp.target(), RobotPose::new(45.0, 20.0, 30.0));
    }

    #[test]
    fn malformed_frames_leave_target_untouched() {
        let mut interp = PoseInterpolator::new(RobotPose::new(1.0, 2.0, 3.0));
        let log = log_of(&["not json", r#"{"type":"STATE_UPDATE","#, "Client disconnected"]);
        assert_eq!(interp.ingest(&log), 0);
        assert_eq!(interp.target(), RobotPose::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn malformed_frame_does_not_stop_later_frames() {
        let mut interp = PoseInterpolator::default();
        let log = log_of(&[
            "garbage",
            r#"{"type":"STATE_UPDATE","payload":{"codo":70}}"#,
        ]);
        assert_eq!(interp.ingest(&log), 1);
        assert_eq!(interp.target().elbow, 70.0);
    }

    #[test]
    fn ingest_only_processes_new_frames() {
        let mut interp = PoseInterpolator::default();
        let mut log = log_of(&[r#"{"type":"STATE_UPDATE","payload":{"base":5}}"#]);
        assert_eq!(interp.ingest(&log), 1);
        assert_eq!(interp.ingest(&log), 0);
        log.push(r#"{"type":"STATE_UPDATE","payload":{"hombro":6}}"#.to_string());
        assert_eq!(interp.ingest(&log), 1);
        assert_eq!(interp.target(), RobotPose::new(5.0, 6.0, 0.0));
    }

    #[test]
    fn backlog_beyond_lookback_is_skipped() {
        let mut interp = PoseInterpolator::default().with_lookback(2);
        let log = log_of(&[
            r#"{"type":"STATE_UPDATE","payload":{"base":1}}"#,
            r#"{"type":"STATE_UPDATE","payload":{"hombro":2}}"#,
            r#"{"type":"STATE_UPDATE","payload":{"codo":3}}"#,
        ]);
        assert_eq!(interp.ingest(&log), 2);
        assert_eq!(interp.target(), RobotPose::new(0.0, 2.0, 3.0));
    }

    #[test]
    fn latest_frame_wins_within_window() {
        let mut interp = PoseInterpolator::default();
        let log = log_of(&[
            r#"{"type":"STATE_UPDATE","payload":{"base":10,"hombro":10}}"#,
            r#"{"type":"STATE_UPDATE","payload":{"base":20}}"#,
        ]);
        interp.ingest(&log);
        assert_eq!(interp.target(), RobotPose::new(20.0, 10.0, 0.0));
    }

    #[test]
    fn converges_monotonically_without_overshoot() {
        let mut interp = PoseInterpolator::default();
        interp.apply(&RobotPose::new(180.0, 90.0, 45.0).into());
        let target = interp.target();

        let mut prev_gap = interp.display().max_abs_diff(&target);
        let mut ticks = 0;
        while !interp.is_settled(1e-6) {
            interp.tick(1.0 / 60.0);
            let display = interp.display();
            assert!(display.base <= target.base);
            assert!(display.shoulder <= target.shoulder);
            assert!(display.elbow <= target.elbow);
            let gap = display.max_abs_diff(&target);
            assert!(gap < prev_gap);
            prev_gap = gap;
            ticks += 1;
            assert!(ticks < 10_000, "did not converge");
        }
    }

    #[test]
    fn snap_has_no_overshoot() {
        let mut interp = PoseInterpolator::new(RobotPose::new(0.3, 0.1, 0.7));
        interp.apply(&RobotPose::new(179.9, 33.3, 0.2).into());
        interp.tick(0.25);
        assert_eq!(interp.display(), interp.target());
    }

    #[test]
    fn half_blend_moves_halfway() {
        let mut interp = PoseInterpolator::default().with_smoothing_rate(1.0);
        interp.apply(&RobotPose::new(100.0, 50.0, 10.0).into());
        interp.tick(0.5);
        assert_eq!(interp.display(), RobotPose::new(50.0, 25.0, 5.0));
    }

    #[test]
    fn new_target_continues_from_current_display() {
        let mut interp = PoseInterpolator::default().with_smoothing_rate(1.0);
        interp.apply(&RobotPose::new(100.0, 0.0, 0.0).into());
        interp.tick(0.5);
        interp.apply(&PoseUpdate { base: Some(0.0), ..Default::default() });
        interp.tick(0.5);
        assert_eq!(interp.display().base, 25.0);
    }

    #[test]
    fn non_positive_delta_is_noop() {
        let mut interp = PoseInterpolator::default();
        interp.apply(&RobotPose::new(10.0, 10.0, 10.0).into());
        interp.tick(0.0);
        interp.tick(-1.0);
        interp.tick(f64::NAN);
        assert_eq!(interp.display(), RobotPose::default());
    }

    #[test]
    fn reports_configured_rate() {
        let interp = PoseInterpolator::default();
        assert_eq!(interp.smoothing_rate(), DEFAULT_SMOOTHING_RATE);
        let interp = PoseInterpolator::default().with_smoothing_rate(8.0);
        assert_eq!(interp.smoothing_rate(), 8.0);
    }
}
