//! Platform-agnostic time utilities
//!
//! `now_seconds` is app-relative on both targets; `FrameClock` turns it into
//! per-frame deltas for the render loop and `FpsCounter` into a frame rate.

#[cfg(target_arch = "wasm32")]
pub fn now_seconds() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now() / 1000.0)
        .unwrap_or(0.0)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_seconds() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64()
}

/// Elapsed seconds between consecutive render frames
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call; 0 on the first frame or if time went backwards
    pub fn tick(&mut self, now: f64) -> f64 {
        let delta = self.last.map_or(0.0, |last| (now - last).max(0.0));
        self.last = Some(now);
        delta
    }
}

/// Frame rate over the last 60 frames
pub struct FpsCounter {
    frames: Vec<f64>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frames: Vec::with_capacity(60),
        }
    }

    pub fn tick(&mut self) {
        self.tick_at(now_seconds() * 1000.0);
    }

    fn tick_at(&mut self, now_ms: f64) {
        self.frames.push(now_ms);
        if self.frames.len() > 60 {
            self.frames.remove(0);
        }
    }

    pub fn fps(&self) -> f64 {
        let (Some(first), Some(last)) = (self.frames.first(), self.frames.last()) else {
            return 0.0;
        };
        let elapsed = last - first;
        if self.frames.len() < 2 || elapsed <= 0.0 {
            return 0.0;
        }
        (self.frames.len() as f64 - 1.0) / (elapsed / 1000.0)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Browser timers take whole milliseconds as an `i32`; longer delays saturate
pub fn timer_millis(delay: std::time::Duration) -> i32 {
    i32::try_from(delay.as_millis()).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_has_zero_delta() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(5.0), 0.0);
        assert_eq!(clock.tick(5.5), 0.5);
        assert_eq!(clock.tick(5.25), 0.0);
        assert_eq!(clock.tick(6.25), 1.0);
    }

    #[test]
    fn fps_from_frame_spacing() {
        let mut fps = FpsCounter::new();
        assert_eq!(fps.fps(), 0.0);
        for i in 0..=30 {
            fps.tick_at(i as f64 * 20.0);
        }
        assert!((fps.fps() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn keeps_last_sixty_frames() {
        let mut fps = FpsCounter::new();
        for i in 0..100 {
            // slow start, then steady 10 ms frames
            let t = if i < 40 { i as f64 * 100.0 } else { 4000.0 + (i - 40) as f64 * 10.0 };
            fps.tick_at(t);
        }
        assert_eq!(fps.frames.len(), 60);
        assert!((fps.fps() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn timer_millis_saturates() {
        use std::time::Duration;
        assert_eq!(timer_millis(Duration::from_millis(1500)), 1500);
        assert_eq!(timer_millis(Duration::from_secs(u64::from(u32::MAX))), i32::MAX);
    }
}
