use sqlx::SqlitePool;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::gateway::dispatcher::Dispatcher;
use crate::gateway::registry::Registry;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub registry: Registry,
    pub dispatcher: Dispatcher,
    /// Cancelled once on process shutdown. Sessions that start afterwards
    /// see it already cancelled and close straight away.
    pub shutdown: CancellationToken,
    /// Every socket task, so shutdown can wait for them to unbind.
    pub sessions: TaskTracker,
    pub peer_publish: bool,
}

impl AppState {
    pub fn new(db: SqlitePool, peer_publish: bool) -> Self {
        let registry = Registry::new();
        let dispatcher = Dispatcher::new(registry.clone());
        Self {
            db,
            registry,
            dispatcher,
            shutdown: CancellationToken::new(),
            sessions: TaskTracker::new(),
            peer_publish,
        }
    }

    /// Ask every live session to close its socket.
    pub fn begin_shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Wait for session tasks to finish, up to `limit`. Returns `false` if
    /// some were still running when the limit passed.
    pub async fn drain_sessions(&self, limit: Duration) -> bool {
        self.sessions.close();
        tokio::time::timeout(limit, self.sessions.wait()).await.is_ok()
    }
}
