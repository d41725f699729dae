//! Link connection status
//!
//! Driven by the connection manager, read by both front ends for status text.

use std::fmt;

/// WebSocket connection state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum WsState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    /// Transport reported a failure; a close normally follows
    Error(String),
}

impl WsState {
    pub fn is_connected(&self) -> bool {
        matches!(self, WsState::Connected)
    }

    /// Short status text for headers and logs
    pub fn label(&self) -> &'static str {
        match self {
            WsState::Disconnected => "Disconnected",
            WsState::Connecting => "Connecting...",
            WsState::Connected => "Connected",
            WsState::Error(_) => "Error",
        }
    }
}

impl fmt::Display for WsState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WsState::Error(reason) if !reason.is_empty() => write!(f, "Error ({reason})"),
            other => f.write_str(other.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disconnected() {
        assert_eq!(WsState::default(), WsState::Disconnected);
        assert!(!WsState::default().is_connected());
    }

    #[test]
    fn display_includes_error_reason() {
        assert_eq!(WsState::Error("refused".into()).to_string(), "Error (refused)");
        assert_eq!(WsState::Error(String::new()).to_string(), "Error");
        assert_eq!(WsState::Connected.to_string(), "Connected");
    }
}
