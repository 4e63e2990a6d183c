//! Accept loop for the HTTP control endpoint.

use std::io;
use std::net::{SocketAddr, TcpListener, ToSocketAddrs};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use gifbox_config::ListenEndpoint;

use super::manager::ConnectionManager;
use super::{LISTENER_TARGET, ListenerError, RequestHandler};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(25);
const ERROR_BACKOFF: Duration = Duration::from_millis(150);
/// How long shutdown waits for replies that are already being written.
const REPLY_GRACE: Duration = Duration::from_millis(500);

/// Listener bound to the control endpoint.
#[derive(Debug)]
pub struct HttpListener {
    endpoint: ListenEndpoint,
    local_addr: SocketAddr,
    listener: TcpListener,
}

impl HttpListener {
    /// Resolves and binds `endpoint`. Port `0` binds an ephemeral port.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError`] when resolution or binding fails.
    pub fn bind(endpoint: &ListenEndpoint) -> Result<Self, ListenerError> {
        let listener = bind_tcp(&endpoint.host, endpoint.port)?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ListenerError::LocalAddr { source })?;
        Ok(Self {
            endpoint: endpoint.clone(),
            local_addr,
            listener,
        })
    }

    /// Address the socket is bound to.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Starts accepting connections on a background thread.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError`] when the socket cannot be made non-blocking
    /// or the thread cannot be spawned.
    pub fn start(self, handler: Arc<dyn RequestHandler>) -> Result<ListenerHandle, ListenerError> {
        self.listener
            .set_nonblocking(true)
            .map_err(|source| ListenerError::NonBlocking { source })?;
        let shutdown = Arc::new(AtomicBool::new(false));
        let manager = Arc::new(ConnectionManager::new(handler));
        let local_addr = self.local_addr;

        let shutdown_flag = Arc::clone(&shutdown);
        let loop_manager = Arc::clone(&manager);
        let handle = thread::Builder::new()
            .name(String::from("gifboxd-accept"))
            .spawn(move || run_accept_loop(&self, &shutdown_flag, &loop_manager))
            .map_err(|source| ListenerError::Spawn { source })?;
        Ok(ListenerHandle {
            shutdown,
            manager,
            local_addr,
            handle: Some(handle),
        })
    }
}

/// Handle to the background accept thread.
pub struct ListenerHandle {
    shutdown: Arc<AtomicBool>,
    manager: Arc<ConnectionManager>,
    local_addr: SocketAddr,
    handle: Option<thread::JoinHandle<()>>,
}

impl ListenerHandle {
    /// Address the listener accepts on.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Asks the accept loop to exit; open connections are closed when it does.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Number of connections currently open.
    #[must_use]
    pub fn open_connections(&self) -> usize {
        self.manager.len()
    }

    /// Waits for the accept loop to finish, then closes open connections.
    ///
    /// Connections already answering a request get a short grace period to
    /// write their reply before they are forced closed.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::ThreadPanic`] if the accept thread panicked.
    pub fn join(mut self) -> Result<(), ListenerError> {
        let result = match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| ListenerError::ThreadPanic),
            None => Ok(()),
        };
        self.manager.drain(REPLY_GRACE);
        result
    }

    /// Shuts down and joins in one step.
    ///
    /// # Errors
    ///
    /// See [`ListenerHandle::join`].
    pub fn stop(self) -> Result<(), ListenerError> {
        self.shutdown();
        self.join()
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

fn run_accept_loop(
    listener: &HttpListener,
    shutdown: &AtomicBool,
    manager: &Arc<ConnectionManager>,
) {
    info!(
        target: LISTENER_TARGET,
        endpoint = %listener.endpoint,
        address = %listener.local_addr,
        "http listener active"
    );
    let mut last_error = None::<io::ErrorKind>;
    while !shutdown.load(Ordering::SeqCst) {
        match listener.listener.accept() {
            Ok((stream, _)) => {
                last_error = None;
                if let Err(error) = stream.set_nonblocking(false) {
                    warn!(
                        target: LISTENER_TARGET,
                        %error,
                        "failed to switch connection to blocking mode"
                    );
                    continue;
                }
                manager.accept(stream);
            }
            Err(error) if error.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_BACKOFF);
            }
            Err(error) => {
                let kind = error.kind();
                if last_error != Some(kind) {
                    warn!(
                        target: LISTENER_TARGET,
                        %error,
                        "socket accept error"
                    );
                }
                last_error = Some(kind);
                thread::sleep(ERROR_BACKOFF);
            }
        }
    }

    manager.stop_all();
    info!(target: LISTENER_TARGET, "http listener stopped");
}

fn bind_tcp(host: &str, port: u16) -> Result<TcpListener, ListenerError> {
    let mut addrs = (host, port)
        .to_socket_addrs()
        .map_err(|source| ListenerError::Resolve {
            host: host.to_owned(),
            port,
            source,
        })?;
    let addr = addrs.next().ok_or_else(|| ListenerError::ResolveEmpty {
        host: host.to_owned(),
        port,
    })?;
    TcpListener::bind(addr).map_err(|source| ListenerError::Bind { addr, source })
}
