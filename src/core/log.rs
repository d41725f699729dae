//! Record of every text frame received over the live link
//!
//! Frames are kept in arrival order and never evicted; readers take a bounded
//! suffix or the range appended since their own cursor.

use tracing::trace;

#[derive(Debug, Default, Clone)]
pub struct MessageLog {
    frames: Vec<String>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame; returns its index
    pub fn push(&mut self, frame: String) -> usize {
        let idx = self.frames.len();
        trace!(idx, len = frame.len(), "Frame appended");
        self.frames.push(frame);
        idx
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.frames.get(idx).map(String::as_str)
    }

    /// The last `n` frames (fewer if the log is shorter), oldest first
    pub fn recent(&self, n: usize) -> &[String] {
        let start = self.frames.len().saturating_sub(n);
        &self.frames[start..]
    }

    /// Frames appended at or after `cursor`
    pub fn since(&self, cursor: usize) -> &[String] {
        let start = cursor.min(self.frames.len());
        &self.frames[start..]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(String::as_str)
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
    fn preserves_arrival_order_and_duplicates() {
        let log = log_of(&["a", "b", "a"]);
        assert_eq!(log.iter().collect::<Vec<_>>(), vec!["a", "b", "a"]);
        assert_eq!(log.get(2), Some("a"));
    }

    #[test]
    fn recent_is_bounded_suffix() {
        let log = log_of(&["1", "2", "3", "4"]);
        assert_eq!(log.recent(2), &["3".to_string(), "4".to_string()]);
        assert_eq!(log.recent(10).len(), 4);
        assert!(log.recent(0).is_empty());
    }

    #[test]
    fn since_clamps_cursor() {
        let log = log_of(&["1", "2"]);
        assert_eq!(log.since(1), &["2".to_string()]);
        assert!(log.since(5).is_empty());
    }
}
