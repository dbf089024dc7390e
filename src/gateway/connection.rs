use std::fmt;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Identity of one accepted socket. Two handles are the same connection
/// iff their ids match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Open,
    Closed,
}

/// Work item for the task that owns the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Frame(String),
    Close,
}

/// Returned when the owning task has already gone away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendError {
    pub connection_id: ConnectionId,
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connection {} is closed", self.connection_id)
    }
}

impl std::error::Error for SendError {}

/// Handle to a live duplex channel.
///
/// Every send goes through a single-writer queue drained by the
/// connection's own task, so a dispatcher broadcast and the session's own
/// replies never write to the socket concurrently. The handle is cheap to
/// clone and is what the registry stores.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<Outbound>,
}

impl Connection {
    /// Create a handle plus the receiving half for the socket task. Dropping
    /// or closing the receiver moves the connection to `Closed`.
    pub fn open() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                id: ConnectionId::new(),
                tx,
            },
            rx,
        )
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn state(&self) -> ConnectionState {
        if self.tx.is_closed() {
            ConnectionState::Closed
        } else {
            ConnectionState::Open
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    pub fn send(&self, frame: String) -> Result<(), SendError> {
        self.tx.send(Outbound::Frame(frame)).map_err(|_| SendError {
            connection_id: self.id,
        })
    }

    /// Ask the owning task to close the socket. No-op once closed.
    pub fn close(&self) {
        let _ = self.tx.send(Outbound::Close);
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Connection {}
