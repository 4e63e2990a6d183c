//! Registry of live connections.

use std::collections::HashMap;
use std::net::TcpStream;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::connection::{Connection, ConnectionId};
use super::{LISTENER_TARGET, RequestHandler};

const DRAIN_POLL: Duration = Duration::from_millis(5);

/// Tracks live connections so they can all be closed at shutdown.
pub(crate) struct ConnectionManager {
    handler: Arc<dyn RequestHandler>,
    connections: Mutex<HashMap<ConnectionId, Arc<Connection>>>,
    next_id: AtomicU64,
}

impl ConnectionManager {
    pub(crate) fn new(handler: Arc<dyn RequestHandler>) -> Self {
        Self {
            handler,
            connections: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Wraps an accepted stream and starts serving it.
    pub(crate) fn accept(self: &Arc<Self>, stream: TcpStream) -> ConnectionId {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.track(Arc::new(Connection::new(id, stream)));
        id
    }

    /// Registers `connection` and serves it on its own thread.
    pub(crate) fn track(self: &Arc<Self>, connection: Arc<Connection>) {
        let id = connection.id();
        self.registry().insert(id, Arc::clone(&connection));
        debug!(
            target: LISTENER_TARGET,
            connection = %id,
            peer = ?connection.peer(),
            "connection opened"
        );

        let manager = Arc::clone(self);
        let spawned = thread::Builder::new()
            .name(format!("gifboxd-conn-{id}"))
            .spawn(move || {
                if let Err(error) = connection.serve(&*manager.handler) {
                    if connection.is_stopped() {
                        debug!(
                            target: LISTENER_TARGET,
                            connection = %id,
                            %error,
                            "connection cancelled"
                        );
                    } else {
                        warn!(
                            target: LISTENER_TARGET,
                            connection = %id,
                            %error,
                            "connection error"
                        );
                    }
                }
                manager.release(id);
            });
        if let Err(error) = spawned {
            warn!(
                target: LISTENER_TARGET,
                connection = %id,
                %error,
                "failed to spawn connection thread"
            );
            self.release(id);
        }
    }

    /// Deregisters and closes a connection. Unknown ids are ignored.
    pub(crate) fn release(&self, id: ConnectionId) {
        let removed = self.registry().remove(&id);
        if let Some(connection) = removed {
            connection.abort();
            debug!(target: LISTENER_TARGET, connection = %id, "connection released");
        }
    }

    /// Closes every connection that is not answering a request.
    ///
    /// Connections with a reply in flight stay registered and release
    /// themselves once written. Returns how many are still answering.
    pub(crate) fn stop_all(&self) -> usize {
        let mut registry = self.registry();
        let open = registry.len();
        registry.retain(|_, connection| !connection.stop());
        let answering = registry.len();
        drop(registry);
        if open > 0 {
            debug!(
                target: LISTENER_TARGET,
                closed = open - answering,
                answering,
                "closing open connections"
            );
        }
        answering
    }

    /// Stops every connection, giving those with a reply in flight up to
    /// `grace` to finish before their sockets are forced closed.
    pub(crate) fn drain(&self, grace: Duration) {
        if self.stop_all() == 0 {
            return;
        }
        let deadline = Instant::now() + grace;
        while self.len() > 0 && Instant::now() < deadline {
            thread::sleep(DRAIN_POLL);
        }
        let remaining: Vec<_> = self.registry().drain().collect();
        if !remaining.is_empty() {
            warn!(
                target: LISTENER_TARGET,
                count = remaining.len(),
                "replies still in flight after shutdown grace; closing"
            );
        }
        for (_, connection) in remaining {
            connection.abort();
        }
    }

    /// Number of tracked connections.
    pub(crate) fn len(&self) -> usize {
        self.registry().len()
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<ConnectionId, Arc<Connection>>> {
        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
