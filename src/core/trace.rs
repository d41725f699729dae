//! Time-windowed history of target and displayed poses

use std::collections::VecDeque;

use super::pose::{Joint, RobotPose};

/// Seconds of history kept on screen
pub const TRACE_WINDOW_SECS: f64 = 10.0;
const MAX_SAMPLES: usize = 2048;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceSample {
    pub t: f64,
    pub target: RobotPose,
    pub display: RobotPose,
}

/// Time-windowed buffer of pose samples
#[derive(Debug, Clone)]
pub struct JointTrace {
    samples: VecDeque<TraceSample>,
    window: f64,
}

impl Default for JointTrace {
    fn default() -> Self {
        Self::new(TRACE_WINDOW_SECS)
    }
}

impl JointTrace {
    pub fn new(window: f64) -> Self {
        Self {
            samples: VecDeque::with_capacity(MAX_SAMPLES),
            window,
        }
    }

    pub fn push(&mut self, t: f64, target: RobotPose, display: RobotPose) {
        self.samples.push_back(TraceSample { t, target, display });
        while self
            .samples
            .front()
            .is_some_and(|s| s.t < t - self.window)
            || self.samples.len() > MAX_SAMPLES
        {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `[seconds before newest, angle]` points; x runs from `-window` to 0
    pub fn series(&self, joint: Joint, target: bool) -> Vec<[f64; 2]> {
        let Some(newest) = self.samples.back().map(|s| s.t) else {
            return Vec::new();
        };
        self.samples
            .iter()
            .map(|s| {
                let pose = if target { &s.target } else { &s.display };
                [s.t - newest, pose.get(joint)]
            })
            .collect()
    }

    pub fn window(&self) -> f64 {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn old_samples_fall_out_of_window() {
        let mut trace = JointTrace::new(2.0);
        for i in 0..10 {
            let t = i as f64 * 0.5;
            trace.push(t, RobotPose::new(t, 0.0, 0.0), RobotPose::default());
        }
        // newest t = 4.5, window keeps t >= 2.5
        assert_eq!(trace.len(), 5);
        let series = trace.series(Joint::Base, true);
        assert_eq!(series.first(), Some(&[-2.0, 2.5]));
        assert_eq!(series.last(), Some(&[0.0, 4.5]));
    }

    #[test]
    fn series_picks_target_or_display() {
        let mut trace = JointTrace::default();
        trace.push(1.0, RobotPose::new(0.0, 90.0, 0.0), RobotPose::new(0.0, 30.0, 0.0));
        assert_eq!(trace.series(Joint::Shoulder, true), vec![[0.0, 90.0]]);
        assert_eq!(trace.series(Joint::Shoulder, false), vec![[0.0, 30.0]]);
    }

    #[test]
    fn empty_trace_has_no_series() {
        let trace = JointTrace::default();
        assert!(trace.is_empty());
        assert!(trace.series(Joint::Elbow, false).is_empty());
    }

    #[test]
    fn sample_count_is_capped() {
        let mut trace = JointTrace::new(f64::INFINITY);
        for i in 0..(MAX_SAMPLES + 10) {
            trace.push(i as f64, RobotPose::default(), RobotPose::default());
        }
        assert_eq!(trace.len(), MAX_SAMPLES);
    }
}
