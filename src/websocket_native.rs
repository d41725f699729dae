//! Native transport for the robot-state link
//!
//! Executes [`LinkAction`]s with tokio-tungstenite. Every socket and the retry
//! timer run as tasks on the caller's tokio runtime and report back through one
//! unbounded channel, so on a current-thread runtime the whole link stays on a
//! single thread.

use crate::config::LinkConfig;
use crate::core::{
    ConnectionId, ConnectionManager, LinkAction, LinkEvent, LinkUpdate, MessageLog,
};
use crate::ws_state::WsState;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, warn};

/// Outgoing half of a live socket task
struct SocketHandle {
    id: ConnectionId,
    outgoing: UnboundedSender<String>,
}

/// Native link client; must be driven from inside a tokio runtime
pub struct NativeLink {
    manager: ConnectionManager,
    events_tx: UnboundedSender<LinkEvent>,
    events_rx: UnboundedReceiver<LinkEvent>,
    socket: Option<SocketHandle>,
    retry: Option<JoinHandle<()>>,
}

impl NativeLink {
    pub fn new(config: &LinkConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            manager: ConnectionManager::new(config.url.clone(), config.reconnect.clone()),
            events_tx,
            events_rx,
            socket: None,
            retry: None,
        }
    }

    pub fn state(&self) -> &WsState {
        self.manager.state()
    }

    pub fn log(&self) -> &MessageLog {
        self.manager.log()
    }

    pub fn manager(&self) -> &ConnectionManager {
        &self.manager
    }

    /// Open the first connection
    pub fn start(&mut self) {
        let actions = self.manager.connect();
        self.execute(actions);
    }

    /// Send a text frame if connected; dropped otherwise
    pub fn send(&mut self, text: impl Into<String>) {
        if let Some(action) = self.manager.send(text) {
            self.execute(vec![action]);
        }
    }

    /// Stop reconnecting and close the live socket
    pub fn shutdown(&mut self) {
        let actions = self.manager.shutdown();
        self.execute(actions);
    }

    /// Wait for the next transport event and apply it.
    ///
    /// Cancel-safe: only the channel receive is awaited, so it can sit in a
    /// `tokio::select!` next to other branches.
    pub async fn next_update(&mut self) -> LinkUpdate {
        // The sender half lives in `self`, so the channel never closes
        let Some(event) = self.events_rx.recv().await else {
            return LinkUpdate::Idle;
        };
        self.apply(event)
    }

    fn apply(&mut self, event: LinkEvent) -> LinkUpdate {
        if let LinkEvent::Closed(id) = &event {
            if self.socket.as_ref().is_some_and(|s| s.id == *id) {
                self.socket = None;
            }
        }
        if matches!(event, LinkEvent::RetryElapsed) {
            self.retry = None;
        }
        let (update, actions) = self.manager.handle(event);
        self.execute(actions);
        update
    }

    fn execute(&mut self, actions: Vec<LinkAction>) {
        for action in actions {
            match action {
                LinkAction::Open { id, url } => {
                    let (outgoing, outgoing_rx) = mpsc::unbounded_channel();
                    self.socket = Some(SocketHandle { id, outgoing });
                    tokio::spawn(run_socket(id, url, self.events_tx.clone(), outgoing_rx));
                }
                LinkAction::Send { id, text } => match &self.socket {
                    Some(socket) if socket.id == id => {
                        if socket.outgoing.send(text).is_err() {
                            debug!(%id, "Socket task already gone, frame dropped");
                        }
                    }
                    _ => debug!(%id, "No socket for send"),
                },
                LinkAction::Close { id } => {
                    // Dropping the sender tells the task to close once it is able to
                    if self.socket.as_ref().is_some_and(|s| s.id == id) {
                        self.socket = None;
                    }
                }
                LinkAction::ScheduleRetry { delay } => {
                    let tx = self.events_tx.clone();
                    self.retry = Some(tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = tx.send(LinkEvent::RetryElapsed);
                    }));
                }
                LinkAction::CancelRetry => {
                    if let Some(retry) = self.retry.take() {
                        retry.abort();
                    }
                }
            }
        }
    }
}

impl Drop for NativeLink {
    fn drop(&mut self) {
        if let Some(retry) = self.retry.take() {
            retry.abort();
        }
    }
}

/// One socket's lifetime: connect, pump frames both ways, always end with `Closed`.
async fn run_socket(
    id: ConnectionId,
    url: String,
    events: UnboundedSender<LinkEvent>,
    mut outgoing: UnboundedReceiver<String>,
) {
    let ws_stream = match connect_async(url.as_str()).await {
        Ok((stream, _)) => {
            let _ = events.send(LinkEvent::Opened(id));
            stream
        }
        Err(e) => {
            error!(error = %e, %id, "Failed to connect");
            let _ = events.send(LinkEvent::Failed(id, e.to_string()));
            let _ = events.send(LinkEvent::Closed(id));
            return;
        }
    };

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            msg = read.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    if events.send(LinkEvent::Frame(id, text.to_string())).is_err() {
                        // Link dropped, exit
                        break;
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    warn!(%id, ?frame, "WebSocket closed by server");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    error!(error = %e, %id, "WebSocket error");
                    let _ = events.send(LinkEvent::Failed(id, e.to_string()));
                    break;
                }
                None => {
                    warn!(%id, "WebSocket stream ended");
                    break;
                }
            },
            out = outgoing.recv() => match out {
                Some(text) => {
                    if let Err(e) = write.send(Message::Text(text.into())).await {
                        error!(error = %e, %id, "Failed to send frame");
                        let _ = events.send(LinkEvent::Failed(id, e.to_string()));
                        break;
                    }
                }
                None => {
                    debug!(%id, "Closing WebSocket");
                    let _ = write.send(Message::Close(None)).await;
                    break;
                }
            },
        }
    }

    let _ = events.send(LinkEvent::Closed(id));
}
