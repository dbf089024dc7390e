use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::connection::{Connection, ConnectionId};

#[derive(Default)]
struct Bindings {
    /// screen id -> the connection currently representing it
    screens: HashMap<String, Connection>,
    /// reverse index; `owners[c] == s` iff `screens[s] == c`
    owners: HashMap<ConnectionId, String>,
}

/// Process-wide map from screen id to its current live connection.
///
/// The lock is only held for the map operation itself. Callers get clones
/// of the connection handles and do their sends after it is released.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<RwLock<Bindings>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Bindings> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Bindings> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bind `screen_id` to `connection`, replacing any earlier binding.
    ///
    /// If the connection was bound under a different id, that entry is
    /// released so a connection never occupies more than one screen id.
    /// Returns the different connection this bind displaced, if any; it is
    /// left open.
    pub fn bind(&self, screen_id: &str, connection: &Connection) -> Option<Connection> {
        let mut bindings = self.write();

        if let Some(previous_id) = bindings
            .owners
            .insert(connection.id(), screen_id.to_string())
        {
            if previous_id != screen_id {
                bindings.screens.remove(&previous_id);
            }
        }

        let previous = bindings
            .screens
            .insert(screen_id.to_string(), connection.clone());
        match previous {
            Some(displaced) if displaced.id() != connection.id() => {
                bindings.owners.remove(&displaced.id());
                Some(displaced)
            }
            _ => None,
        }
    }

    /// Remove whichever entry currently points at `connection`.
    ///
    /// A superseded connection holds no entry, so its unbind cannot remove a
    /// newer binding for the same screen id. Returns the released screen id.
    pub fn unbind(&self, connection: &Connection) -> Option<String> {
        let mut bindings = self.write();
        let screen_id = bindings.owners.remove(&connection.id())?;
        bindings.screens.remove(&screen_id);
        Some(screen_id)
    }

    pub fn lookup(&self, screen_id: &str) -> Option<Connection> {
        self.read().screens.get(screen_id).cloned()
    }

    /// Snapshot of every bound connection.
    pub fn all(&self) -> Vec<Connection> {
        self.read().screens.values().cloned().collect()
    }

    #[cfg(test)]
    pub fn screen_of(&self, connection: &Connection) -> Option<String> {
        self.read().owners.get(&connection.id()).cloned()
    }

    #[cfg(test)]
    pub fn screen_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.read().screens.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.read().screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().screens.is_empty()
    }
}
