//! WebSocket connection lifecycle: a small state machine plus the async task that drives it.
//!
//! The driver owns the socket and forwards [`StreamEvent`]s over a channel to the app's
//! dispatch loop. Only one socket exists at a time; after a close the driver sleeps for the
//! reconnect delay and tries again, forever.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::error::StreamError;
use crate::types::MetricsSnapshot;

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Connecting,
    Connected,
    Snapshot(MetricsSnapshot),
    Disconnected,
}

/// Handle for one scheduled reconnection attempt. Only the most recently armed
/// timer is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectTimer {
    id: u64,
    pub delay: Duration,
}

#[derive(Debug)]
pub struct ConnectionManager {
    url: String,
    reconnect_delay: Duration,
    state: ConnState,
    armed: Option<u64>,
    next_timer_id: u64,
}

impl ConnectionManager {
    pub fn new(url: impl Into<String>, reconnect_delay: Duration) -> Self {
        Self {
            url: url.into(),
            reconnect_delay,
            state: ConnState::Disconnected,
            armed: None,
            next_timer_id: 0,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> ConnState {
        self.state
    }

    /// Start an attempt. Refused unless disconnected; disarms any pending timer.
    pub fn begin_connect(&mut self) -> bool {
        if self.state != ConnState::Disconnected {
            return false;
        }
        self.armed = None;
        self.state = ConnState::Connecting;
        true
    }

    pub fn on_open(&mut self) -> Option<StreamEvent> {
        if self.state != ConnState::Connecting {
            return None;
        }
        self.state = ConnState::Connected;
        Some(StreamEvent::Connected)
    }

    /// Decode one text frame. Bad payloads are logged and dropped; state is untouched.
    pub fn on_text(&self, text: &str) -> Option<StreamEvent> {
        if self.state != ConnState::Connected {
            debug!("dropping message received while {:?}", self.state);
            return None;
        }
        match parse_snapshot(text) {
            Ok(snap) => Some(StreamEvent::Snapshot(snap)),
            Err(e) => {
                warn!(error = %e, "dropping malformed message");
                None
            }
        }
    }

    /// Socket closed or failed. Returns the event to emit and the timer to wait on.
    pub fn on_close(&mut self) -> Option<(StreamEvent, ReconnectTimer)> {
        if self.state == ConnState::Disconnected {
            return None;
        }
        self.state = ConnState::Disconnected;
        self.next_timer_id += 1;
        self.armed = Some(self.next_timer_id);
        let timer = ReconnectTimer {
            id: self.next_timer_id,
            delay: self.reconnect_delay,
        };
        Some((StreamEvent::Disconnected, timer))
    }

    /// A reconnect timer elapsed. Stale timers are ignored.
    pub fn on_timer(&mut self, timer: ReconnectTimer) -> bool {
        if self.armed != Some(timer.id) {
            debug!(timer = timer.id, "ignoring stale reconnect timer");
            return false;
        }
        self.begin_connect()
    }
}

pub fn parse_snapshot(text: &str) -> Result<MetricsSnapshot, StreamError> {
    Ok(serde_json::from_str(text)?)
}

pub async fn connect(url: &str) -> Result<WsStream, tokio_tungstenite::tungstenite::Error> {
    let (ws, _) = connect_async(url).await?;
    Ok(ws)
}

/// Drive `mgr` until the receiving side of `tx` goes away.
pub async fn run_stream(mut mgr: ConnectionManager, tx: mpsc::Sender<StreamEvent>) {
    let mut pending: Option<ReconnectTimer> = None;
    loop {
        let start = match pending.take() {
            Some(timer) => {
                sleep(timer.delay).await;
                mgr.on_timer(timer)
            }
            None => mgr.begin_connect(),
        };
        if !start {
            debug!("connect suppressed in state {:?}", mgr.state());
            return;
        }
        if tx.send(StreamEvent::Connecting).await.is_err() {
            return;
        }

        info!(url = mgr.url(), "connecting");
        match connect(mgr.url()).await {
            Ok(mut ws) => {
                if let Some(ev) = mgr.on_open() {
                    info!(url = mgr.url(), "connected");
                    if tx.send(ev).await.is_err() {
                        return;
                    }
                }
                while let Some(frame) = ws.next().await {
                    let ev = match frame {
                        Ok(Message::Text(text)) => mgr.on_text(&text),
                        Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                            Ok(text) => mgr.on_text(&text),
                            Err(_) => {
                                warn!(error = %StreamError::NotText, "dropping message");
                                None
                            }
                        },
                        Ok(Message::Close(_)) => break,
                        Ok(_) => None,
                        Err(e) => {
                            warn!(error = %e, "websocket error");
                            break;
                        }
                    };
                    if let Some(ev) = ev {
                        if tx.send(ev).await.is_err() {
                            return;
                        }
                    }
                }
            }
            Err(e) => warn!(url = mgr.url(), error = %e, "connect failed"),
        }

        match mgr.on_close() {
            Some((ev, timer)) => {
                info!(delay_ms = timer.delay.as_millis() as u64, "disconnected, will retry");
                if tx.send(ev).await.is_err() {
                    return;
                }
                pending = Some(timer);
            }
            None => return,
        }
    }
}
