//! Connection manager for the robot-state link
//!
//! A transport-independent state machine. Transports report what happened as
//! [`LinkEvent`]s and carry out the [`LinkAction`]s the manager returns; the
//! manager owns status, the message log, the cancellation flag and the single
//! retry slot.

use super::log::MessageLog;
use crate::ws_state::WsState;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Fixed delay between a close and the next connect attempt
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(1500);

/// Identifies one opened socket so events from a replaced socket can be told apart
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// When and how often to reconnect after a close
#[derive(Clone, Debug, PartialEq)]
pub struct ReconnectPolicy {
    pub delay: Duration,
    /// Upper bound of a random extra delay; zero keeps the interval fixed
    pub jitter: Duration,
    /// Stop after this many consecutive closes without a successful open
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::fixed(DEFAULT_RECONNECT_DELAY)
    }
}

impl ReconnectPolicy {
    /// Retry forever at `delay`
    pub fn fixed(delay: Duration) -> Self {
        Self {
            delay,
            jitter: Duration::ZERO,
            max_attempts: None,
        }
    }

    pub fn next_delay(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.delay;
        }
        let mut buf = [0u8; 4];
        match getrandom::getrandom(&mut buf) {
            Ok(()) => {
                let fraction = u32::from_le_bytes(buf) as f64 / (u32::MAX as f64 + 1.0);
                self.delay + self.jitter.mul_f64(fraction)
            }
            Err(e) => {
                warn!(error = %e, "No randomness for reconnect jitter");
                self.delay
            }
        }
    }

    fn exhausted(&self, failures: u32) -> bool {
        self.max_attempts.is_some_and(|max| failures >= max)
    }
}

/// Something a transport observed
#[derive(Clone, Debug, PartialEq)]
pub enum LinkEvent {
    Opened(ConnectionId),
    Frame(ConnectionId, String),
    Failed(ConnectionId, String),
    Closed(ConnectionId),
    RetryElapsed,
}

/// Something the transport must do
#[derive(Clone, Debug, PartialEq)]
pub enum LinkAction {
    Open { id: ConnectionId, url: String },
    Send { id: ConnectionId, text: String },
    Close { id: ConnectionId },
    ScheduleRetry { delay: Duration },
    CancelRetry,
}

/// What an event changed, for front ends that log or redraw
#[derive(Clone, Debug, PartialEq)]
pub enum LinkUpdate {
    Status(WsState),
    /// A frame was appended at this log index
    Frame(usize),
    Idle,
}

/// A typed line as it goes on the wire: trimmed, `None` when blank
pub fn outgoing_line(input: &str) -> Option<&str> {
    let line = input.trim();
    (!line.is_empty()).then_some(line)
}

#[derive(Debug)]
pub struct ConnectionManager {
    url: String,
    policy: ReconnectPolicy,
    state: WsState,
    log: MessageLog,
    /// Socket whose events are honoured; set from `Open` until its close
    active: Option<ConnectionId>,
    /// Whether `active` reached the open state
    opened: bool,
    next_id: u64,
    retry_pending: bool,
    cancelled: bool,
    /// Consecutive closes without an open
    failures: u32,
}

impl ConnectionManager {
    pub fn new(url: impl Into<String>, policy: ReconnectPolicy) -> Self {
        Self {
            url: url.into(),
            policy,
            state: WsState::Disconnected,
            log: MessageLog::new(),
            active: None,
            opened: false,
            next_id: 0,
            retry_pending: false,
            cancelled: false,
            failures: 0,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> &WsState {
        &self.state
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn active(&self) -> Option<ConnectionId> {
        self.active
    }

    pub fn retry_pending(&self) -> bool {
        self.retry_pending
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Start a connection attempt, replacing any socket still active.
    pub fn connect(&mut self) -> Vec<LinkAction> {
        if self.cancelled {
            debug!("Connect after shutdown ignored");
            return Vec::new();
        }

        let mut actions = Vec::new();
        if self.retry_pending {
            self.retry_pending = false;
            actions.push(LinkAction::CancelRetry);
        }
        if let Some(old) = self.active.take() {
            debug!(id = %old, "Replacing active connection");
            actions.push(LinkAction::Close { id: old });
        }

        let id = ConnectionId(self.next_id);
        self.next_id += 1;
        self.active = Some(id);
        self.opened = false;
        self.set_state(WsState::Connecting);
        info!(url = %self.url, %id, "Connecting to WebSocket");
        actions.push(LinkAction::Open {
            id,
            url: self.url.clone(),
        });
        actions
    }

    /// Transmit only while connected; otherwise the message is dropped.
    pub fn send(&mut self, text: impl Into<String>) -> Option<LinkAction> {
        match (self.active, &self.state) {
            (Some(id), WsState::Connected) => Some(LinkAction::Send {
                id,
                text: text.into(),
            }),
            _ => {
                trace!(state = %self.state, "Send dropped, link not connected");
                None
            }
        }
    }

    /// Tear down: no more reconnects, cancel the pending retry, close the socket.
    ///
    /// A connect already in flight is not aborted; its close event is still
    /// processed but schedules nothing.
    pub fn shutdown(&mut self) -> Vec<LinkAction> {
        let mut actions = Vec::new();
        if !self.cancelled {
            info!(url = %self.url, "Link shutting down");
        }
        self.cancelled = true;
        if self.retry_pending {
            self.retry_pending = false;
            actions.push(LinkAction::CancelRetry);
        }
        if let Some(id) = self.active {
            actions.push(LinkAction::Close { id });
        }
        actions
    }

    /// Feed one transport event; returns what changed and what to do next.
    pub fn handle(&mut self, event: LinkEvent) -> (LinkUpdate, Vec<LinkAction>) {
        let before = self.state.clone();
        let (frame, actions) = match event {
            LinkEvent::Opened(id) => {
                self.on_open(id);
                (None, Vec::new())
            }
            LinkEvent::Frame(id, text) => (self.on_frame(id, text), Vec::new()),
            LinkEvent::Failed(id, reason) => {
                self.on_error(id, reason);
                (None, Vec::new())
            }
            LinkEvent::Closed(id) => (None, self.on_close(id)),
            LinkEvent::RetryElapsed => (None, self.on_retry_elapsed()),
        };

        let update = if let Some(idx) = frame {
            LinkUpdate::Frame(idx)
        } else if self.state != before {
            LinkUpdate::Status(self.state.clone())
        } else {
            LinkUpdate::Idle
        };
        (update, actions)
    }

    fn is_current(&self, id: ConnectionId) -> bool {
        if self.active == Some(id) {
            true
        } else {
            trace!(%id, "Event from inactive connection ignored");
            false
        }
    }

    fn on_open(&mut self, id: ConnectionId) {
        if !self.is_current(id) {
            return;
        }
        self.opened = true;
        self.failures = 0;
        self.set_state(WsState::Connected);
    }

    fn on_frame(&mut self, id: ConnectionId, text: String) -> Option<usize> {
        if !self.is_current(id) {
            return None;
        }
        Some(self.log.push(text))
    }

    fn on_error(&mut self, id: ConnectionId, reason: String) {
        if !self.is_current(id) {
            return;
        }
        self.set_state(WsState::Error(reason));
    }

    fn on_close(&mut self, id: ConnectionId) -> Vec<LinkAction> {
        if !self.is_current(id) {
            return Vec::new();
        }
        self.active = None;
        if !self.opened {
            self.failures += 1;
        }
        self.set_state(WsState::Disconnected);

        if self.cancelled || self.retry_pending {
            return Vec::new();
        }
        if self.policy.exhausted(self.failures) {
            warn!(failures = self.failures, "Reconnect attempts exhausted, giving up");
            return Vec::new();
        }

        let delay = self.policy.next_delay();
        self.retry_pending = true;
        debug!(delay_ms = delay.as_millis() as u64, "Reconnect scheduled");
        vec![LinkAction::ScheduleRetry { delay }]
    }

    fn on_retry_elapsed(&mut self) -> Vec<LinkAction> {
        if !self.retry_pending {
            trace!("Retry fired after being cancelled");
            return Vec::new();
        }
        self.retry_pending = false;
        self.connect()
    }

    fn set_state(&mut self, next: WsState) {
        if self.state != next {
            match &next {
                WsState::Error(reason) => warn!(reason = %reason, "Link error"),
                other => info!(state = %other, "Link status"),
            }
            self.state = next;
        }
    }
}
