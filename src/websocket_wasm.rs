//! Browser transport for the robot-state link
//!
//! Socket callbacks and the retry `setTimeout` push [`LinkEvent`]s into a
//! shared queue; the app drains it once per frame with [`WsClient::pump`].

use crate::config::LinkConfig;
use crate::core::{
    ConnectionId, ConnectionManager, LinkAction, LinkEvent, LinkUpdate, MessageLog,
};
use crate::time::timer_millis;
use crate::ws_state::WsState;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use tracing::{debug, error, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

/// Shared event queue: callbacks push, the app drains in update()
pub type EventQueue = Rc<RefCell<VecDeque<LinkEvent>>>;

/// Pending `setTimeout`; the closure must outlive the timer
struct RetryTimer {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

/// WASM link client
pub struct WsClient {
    manager: ConnectionManager,
    queue: EventQueue,
    socket: Option<(ConnectionId, WebSocket)>,
    retry: Option<RetryTimer>,
}

impl WsClient {
    pub fn new(config: &LinkConfig) -> Self {
        Self {
            manager: ConnectionManager::new(config.url.clone(), config.reconnect.clone()),
            queue: Rc::new(RefCell::new(VecDeque::new())),
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

    pub fn start(&mut self) {
        let actions = self.manager.connect();
        self.execute(actions);
    }

    pub fn send(&mut self, text: impl Into<String>) {
        if let Some(action) = self.manager.send(text) {
            self.execute(vec![action]);
        }
    }

    pub fn shutdown(&mut self) {
        let actions = self.manager.shutdown();
        self.execute(actions);
    }

    /// Apply every queued event, in arrival order
    pub fn pump(&mut self) -> Vec<LinkUpdate> {
        let mut updates = Vec::new();
        loop {
            // Release the borrow before handling: actions may enqueue synchronously
            let next = self.queue.borrow_mut().pop_front();
            let Some(event) = next else { break };

            match &event {
                LinkEvent::Closed(id) => {
                    if self.socket.as_ref().is_some_and(|(sid, _)| sid == id) {
                        self.socket = None;
                    }
                }
                LinkEvent::RetryElapsed => self.retry = None,
                _ => {}
            }
            let (update, actions) = self.manager.handle(event);
            self.execute(actions);
            if update != LinkUpdate::Idle {
                updates.push(update);
            }
        }
        updates
    }

    fn execute(&mut self, actions: Vec<LinkAction>) {
        for action in actions {
            match action {
                LinkAction::Open { id, url } => match open_socket(id, &url, &self.queue) {
                    Ok(ws) => self.socket = Some((id, ws)),
                    Err(e) => {
                        error!(?e, %id, "Failed to create WebSocket");
                        let mut queue = self.queue.borrow_mut();
                        queue.push_back(LinkEvent::Failed(id, format!("{e:?}")));
                        queue.push_back(LinkEvent::Closed(id));
                    }
                },
                LinkAction::Send { id, text } => match &self.socket {
                    Some((sid, ws)) if *sid == id => {
                        if let Err(e) = ws.send_with_str(&text) {
                            error!(?e, %id, "Failed to send frame");
                        }
                    }
                    _ => debug!(%id, "No socket for send"),
                },
                LinkAction::Close { id } => {
                    if let Some((sid, ws)) = &self.socket {
                        if *sid == id {
                            if let Err(e) = ws.close() {
                                warn!(?e, %id, "Failed to close WebSocket");
                            }
                        }
                    }
                }
                LinkAction::ScheduleRetry { delay } => self.schedule_retry(timer_millis(delay)),
                LinkAction::CancelRetry => {
                    if let Some(timer) = self.retry.take() {
                        if let Some(window) = web_sys::window() {
                            window.clear_timeout_with_handle(timer.handle);
                        }
                    }
                }
            }
        }
    }

    fn schedule_retry(&mut self, delay_ms: i32) {
        let Some(window) = web_sys::window() else {
            error!("No window, reconnect not scheduled");
            return;
        };
        let queue = self.queue.clone();
        let callback = Closure::wrap(Box::new(move || {
            queue.borrow_mut().push_back(LinkEvent::RetryElapsed);
        }) as Box<dyn FnMut()>);
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay_ms,
        ) {
            Ok(handle) => {
                self.retry = Some(RetryTimer {
                    handle,
                    _callback: callback,
                })
            }
            Err(e) => error!(?e, "Failed to schedule reconnect"),
        }
    }
}

impl Drop for WsClient {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Create the socket and wire its callbacks to the queue.
///
/// Callbacks are leaked so a socket that outlives its client can still fire
/// them safely; the connection id makes those late events inert.
fn open_socket(id: ConnectionId, url: &str, queue: &EventQueue) -> Result<WebSocket, JsValue> {
    let ws = WebSocket::new(url)?;

    let q = queue.clone();
    let on_open = Closure::wrap(Box::new(move |_| {
        q.borrow_mut().push_back(LinkEvent::Opened(id));
    }) as Box<dyn FnMut(JsValue)>);
    ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
    on_open.forget();

    let q = queue.clone();
    let on_msg = Closure::wrap(Box::new(move |e: MessageEvent| {
        if let Ok(txt) = e.data().dyn_into::<js_sys::JsString>() {
            q.borrow_mut().push_back(LinkEvent::Frame(id, txt.into()));
        }
    }) as Box<dyn FnMut(MessageEvent)>);
    ws.set_onmessage(Some(on_msg.as_ref().unchecked_ref()));
    on_msg.forget();

    // Browsers hand WebSocket errors over as a bare Event without detail
    let q = queue.clone();
    let on_err = Closure::wrap(Box::new(move |_: Event| {
        error!(%id, "WebSocket error");
        q.borrow_mut()
            .push_back(LinkEvent::Failed(id, "WebSocket error".to_string()));
    }) as Box<dyn FnMut(Event)>);
    ws.set_onerror(Some(on_err.as_ref().unchecked_ref()));
    on_err.forget();

    let q = queue.clone();
    let on_close = Closure::wrap(Box::new(move |e: CloseEvent| {
        warn!(%id, code = e.code(), reason = %e.reason(), "WebSocket closed");
        q.borrow_mut().push_back(LinkEvent::Closed(id));
    }) as Box<dyn FnMut(CloseEvent)>);
    ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));
    on_close.forget();

    Ok(ws)
}
