use super::connection::Connection;
use super::events::{Event, Target};
use super::registry::Registry;

/// Fans published events out to live connections.
///
/// Delivery is fire-and-forget: a closed or failing connection is skipped
/// and never stops delivery to the rest. Nothing is queued for screens that
/// are not connected.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Registry,
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Deliver `event` according to its kind. Returns how many connections
    /// the frame was handed to.
    pub fn publish(&self, event: &Event) -> usize {
        let delivered = match event.target() {
            Target::All => self.broadcast_all(event),
            Target::Screen(screen_id) => self.broadcast_to_screen(screen_id, event),
        };
        tracing::debug!("published {:?} to {} connection(s)", event.kind(), delivered);
        delivered
    }

    pub fn broadcast_all(&self, event: &Event) -> usize {
        let Some(frame) = encode(event) else {
            return 0;
        };
        self.registry
            .all()
            .iter()
            .filter(|conn| deliver(conn, &frame))
            .count()
    }

    pub fn broadcast_to_screen(&self, screen_id: &str, event: &Event) -> usize {
        let Some(conn) = self.registry.lookup(screen_id) else {
            tracing::debug!(
                "no live connection for screen {screen_id}, dropping {:?}",
                event.kind()
            );
            return 0;
        };
        match encode(event) {
            Some(frame) => usize::from(deliver(&conn, &frame)),
            None => 0,
        }
    }
}

fn encode(event: &Event) -> Option<String> {
    match event.to_frame().to_text() {
        Ok(frame) => Some(frame),
        Err(e) => {
            tracing::error!("failed to encode {:?}: {e}", event.kind());
            None
        }
    }
}

fn deliver(conn: &Connection, frame: &str) -> bool {
    if !conn.is_open() {
        tracing::debug!("skipping closed connection {}", conn.id());
        return false;
    }
    match conn.send(frame.to_string()) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("dispatch failed: {e}");
            false
        }
    }
}
