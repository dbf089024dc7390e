use std::fmt::Display;

use super::connection::Connection;
use super::dispatcher::Dispatcher;
use super::events::{self, peer_type, Event, PeerFrame, ServerFrame};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Transport handshake still in progress.
    Connecting,
    Unidentified,
    Bound(String),
    Closed,
}

/// Per-connection protocol logic, independent of the socket it runs on.
///
/// The socket task feeds it transport events in arrival order; every reply
/// goes out through the connection's own queue.
pub struct Session {
    connection: Connection,
    dispatcher: Dispatcher,
    relay_publish: bool,
    state: SessionState,
}

impl Session {
    pub fn new(connection: Connection, dispatcher: Dispatcher, relay_publish: bool) -> Self {
        Self {
            connection,
            dispatcher,
            relay_publish,
            state: SessionState::Connecting,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[cfg(test)]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn on_connect(&mut self) {
        if self.state != SessionState::Connecting {
            return;
        }
        self.state = SessionState::Unidentified;
        tracing::debug!("connection {} opened", self.connection.id());
        self.reply(&ServerFrame::Welcome {
            message: events::WELCOME_MESSAGE,
        });
    }

    pub fn on_message(&mut self, raw: &str) {
        if matches!(self.state, SessionState::Connecting | SessionState::Closed) {
            return;
        }

        let frame = match serde_json::from_str::<PeerFrame>(raw) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::debug!("malformed frame on {}: {e}", self.connection.id());
                self.reply_error(events::INVALID_FRAME_MESSAGE);
                return;
            }
        };

        match frame.kind.as_str() {
            peer_type::SUBSCRIBE | peer_type::IDENTIFY => self.identify(&frame),
            kind if self.relay_publish && events::is_publish_type(kind) => self.relay(&frame),
            kind => {
                tracing::debug!("ignoring {kind:?} frame on {}", self.connection.id());
            }
        }
    }

    /// Binary payloads are not part of the protocol.
    pub fn on_binary(&mut self) {
        if matches!(self.state, SessionState::Unidentified | SessionState::Bound(_)) {
            self.reply_error(events::INVALID_FRAME_MESSAGE);
        }
    }

    pub fn on_error(&mut self, err: impl Display) {
        tracing::warn!("transport error on connection {}: {err}", self.connection.id());
    }

    pub fn on_close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        if let Some(screen_id) = self.dispatcher.registry().unbind(&self.connection) {
            tracing::info!("screen {screen_id} disconnected");
        }
        tracing::debug!("connection {} closed", self.connection.id());
        self.state = SessionState::Closed;
    }

    fn identify(&mut self, frame: &PeerFrame) {
        let screen_id = frame
            .screen_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let Some(screen_id) = screen_id else {
            self.reply_error(events::MISSING_SCREEN_ID_MESSAGE);
            return;
        };

        if let Some(displaced) = self.dispatcher.registry().bind(screen_id, &self.connection) {
            tracing::info!(
                "screen {screen_id} moved from connection {} to {}",
                displaced.id(),
                self.connection.id()
            );
        }

        match &self.state {
            SessionState::Bound(previous) if previous == screen_id => {}
            SessionState::Bound(previous) => {
                tracing::info!(
                    "connection {} rebound from {previous} to {screen_id}",
                    self.connection.id()
                );
            }
            _ => tracing::info!("screen {screen_id} connected"),
        }
        self.state = SessionState::Bound(screen_id.to_string());
    }

    fn relay(&mut self, frame: &PeerFrame) {
        match Event::from_peer(frame) {
            Some(event) => {
                self.dispatcher.publish(&event);
            }
            None => self.reply_error(events::INVALID_FRAME_MESSAGE),
        }
    }

    fn reply_error(&self, message: &str) {
        self.reply(&ServerFrame::Error { message });
    }

    fn reply(&self, frame: &ServerFrame<'_>) {
        match frame.to_text() {
            Ok(text) => {
                if let Err(e) = self.connection.send(text) {
                    tracing::debug!("reply dropped: {e}");
                }
            }
            Err(e) => tracing::error!("failed to encode reply: {e}"),
        }
    }
}
