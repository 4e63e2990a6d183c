//! A single accepted client connection.
//!
//! Each connection serves exactly one request: it reads until the parser
//! completes or rejects the request, writes one reply and closes. A
//! connection is shared between the [`ConnectionManager`] registry and the
//! thread serving it, so either may be the last owner.
//!
//! [`ConnectionManager`]: super::manager::ConnectionManager

use std::fmt;
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::http::{ParseStatus, Reply, Request, RequestParser, StatusCode};

use super::{LISTENER_TARGET, RequestHandler};

/// Size of the per-read receive buffer.
pub(crate) const READ_BUFFER_BYTES: usize = 8 * 1024;

/// Requests that have not completed within this many bytes are rejected.
pub(crate) const MAX_REQUEST_BYTES: usize = 64 * 1024;

/// Registry key of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ConnectionId(pub(crate) u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Lifecycle phase of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConnectionPhase {
    Idle,
    Reading,
    Parsing,
    Dispatching,
    ReplyingError,
    Writing,
    Closed,
}

enum Received {
    Request(Request),
    Rejected,
    Disconnected,
}

#[derive(Debug)]
pub(crate) struct Connection {
    id: ConnectionId,
    peer: Option<SocketAddr>,
    stream: TcpStream,
    phase: Mutex<ConnectionPhase>,
    stopped: AtomicBool,
}

impl Connection {
    pub(crate) fn new(id: ConnectionId, stream: TcpStream) -> Self {
        let peer = stream.peer_addr().ok();
        Self {
            id,
            peer,
            stream,
            phase: Mutex::new(ConnectionPhase::Idle),
            stopped: AtomicBool::new(false),
        }
    }

    pub(crate) const fn id(&self) -> ConnectionId {
        self.id
    }

    pub(crate) fn phase(&self) -> ConnectionPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether [`Connection::stop`] has been called.
    pub(crate) fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Runs the read, parse, dispatch and write cycle.
    ///
    /// A peer that disconnects before completing its request gets no reply.
    pub(crate) fn serve(&self, handler: &dyn RequestHandler) -> io::Result<()> {
        let reply = match self.receive()? {
            Received::Request(request) => {
                self.set_phase(ConnectionPhase::Dispatching);
                debug!(
                    target: LISTENER_TARGET,
                    connection = %self.id,
                    method = request.method(),
                    target_uri = request.target(),
                    "request received"
                );
                handler.handle_request(&request)
            }
            Received::Rejected => {
                self.set_phase(ConnectionPhase::ReplyingError);
                Reply::stock(StatusCode::BadRequest)
            }
            Received::Disconnected => {
                debug!(
                    target: LISTENER_TARGET,
                    connection = %self.id,
                    "peer closed before completing a request"
                );
                self.close();
                return Ok(());
            }
        };

        self.set_phase(ConnectionPhase::Writing);
        let mut writer = &self.stream;
        writer.write_all(&reply.to_bytes())?;
        writer.flush()?;
        debug!(
            target: LISTENER_TARGET,
            connection = %self.id,
            status = reply.status().code(),
            "reply written"
        );
        self.close();
        Ok(())
    }

    fn receive(&self) -> io::Result<Received> {
        let mut parser = RequestParser::new();
        let mut request = Request::default();
        let mut buffer = [0_u8; READ_BUFFER_BYTES];
        let mut total = 0_usize;
        loop {
            self.set_phase(ConnectionPhase::Reading);
            let read = match (&self.stream).read(&mut buffer) {
                Ok(0) => return Ok(Received::Disconnected),
                Ok(read) => read,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => return Err(error),
            };
            total += read;

            self.set_phase(ConnectionPhase::Parsing);
            match parser.parse(&mut request, &buffer[..read]) {
                (ParseStatus::Complete, _) => return Ok(Received::Request(request)),
                (ParseStatus::Malformed, _) => return Ok(Received::Rejected),
                (ParseStatus::Incomplete, _) if total >= MAX_REQUEST_BYTES => {
                    debug!(
                        target: LISTENER_TARGET,
                        connection = %self.id,
                        bytes = total,
                        "request exceeds maximum size"
                    );
                    return Ok(Received::Rejected);
                }
                (ParseStatus::Incomplete, _) => {}
            }
        }
    }

    /// Closes the socket unless a request is already being answered.
    ///
    /// Returns `false` when the connection is dispatching or writing a
    /// reply; it then closes itself once the reply is written.
    pub(crate) fn stop(&self) -> bool {
        let phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        self.stopped.store(true, Ordering::SeqCst);
        let answering = matches!(
            *phase,
            ConnectionPhase::Dispatching | ConnectionPhase::ReplyingError | ConnectionPhase::Writing
        );
        drop(phase);
        if answering {
            return false;
        }
        self.close();
        true
    }

    /// Forces the socket closed, unblocking any pending read or write.
    pub(crate) fn abort(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.close();
    }

    fn close(&self) {
        if let Err(error) = self.stream.shutdown(Shutdown::Both)
            && error.kind() != io::ErrorKind::NotConnected
        {
            debug!(
                target: LISTENER_TARGET,
                connection = %self.id,
                %error,
                "socket shutdown failed"
            );
        }
        self.set_phase(ConnectionPhase::Closed);
    }

    fn set_phase(&self, phase: ConnectionPhase) {
        let mut current = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        if *current != ConnectionPhase::Closed {
            *current = phase;
        }
    }

    pub(crate) const fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::test_utils::{BlockingHandler, FixedReplyHandler};
    use std::net::TcpListener;
    use std::thread;

    fn connected_pair() -> (TcpStream, TcpStream) {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind listener");
        let addr = listener.local_addr().expect("listener address");
        let client = TcpStream::connect(addr).expect("connect client");
        let (server, _) = listener.accept().expect("accept connection");
        (client, server)
    }

    fn read_all(mut client: TcpStream) -> String {
        let mut response = String::new();
        client.read_to_string(&mut response).expect("read reply");
        response
    }

    #[test]
    fn serves_one_request_then_closes() {
        let (mut client, server) = connected_pair();
        let connection = Connection::new(ConnectionId(1), server);
        client
            .write_all(b"GET /start HTTP/1.0\r\nHost: test\r\n\r\n")
            .expect("write request");

        connection
            .serve(&FixedReplyHandler::ok("served"))
            .expect("serve request");

        assert_eq!(connection.phase(), ConnectionPhase::Closed);
        assert!(read_all(client).ends_with("\r\n\r\nserved "));
    }

    #[test]
    fn malformed_request_gets_bad_request() {
        let (mut client, server) = connected_pair();
        let connection = Connection::new(ConnectionId(2), server);
        client
            .write_all(b"GET /start HTTX/1.0\r\n\r\n")
            .expect("write request");

        connection
            .serve(&FixedReplyHandler::ok("unused"))
            .expect("serve request");

        assert!(read_all(client).starts_with("HTTP/1.0 400 Bad Request\r\n"));
    }

    #[test]
    fn request_split_across_writes_is_reassembled() {
        let (mut client, server) = connected_pair();
        let connection = Connection::new(ConnectionId(3), server);
        let writer = thread::spawn(move || {
            client.write_all(b"GET /isRec").expect("first half");
            thread::sleep(std::time::Duration::from_millis(20));
            client.write_all(b"ording HTTP/1.0\r\n\r\n").expect("second half");
            client
        });

        let handler = FixedReplyHandler::ok("ok");
        connection.serve(&handler).expect("serve request");
        let client = writer.join().expect("writer thread");
        assert!(read_all(client).starts_with("HTTP/1.0 200 OK\r\n"));
        assert_eq!(handler.targets(), vec![String::from("/isRecording")]);
    }

    #[test]
    fn oversized_request_is_rejected() {
        let (mut client, server) = connected_pair();
        let connection = Connection::new(ConnectionId(4), server);
        let writer = thread::spawn(move || {
            let mut request = b"GET /".to_vec();
            request.resize(MAX_REQUEST_BYTES, b'a');
            client.write_all(&request).expect("write oversized request");
            client
        });

        connection
            .serve(&FixedReplyHandler::ok("unused"))
            .expect("serve request");
        let client = writer.join().expect("writer thread");
        assert!(read_all(client).starts_with("HTTP/1.0 400 Bad Request\r\n"));
    }

    #[test]
    fn disconnect_before_request_sends_nothing() {
        let (client, server) = connected_pair();
        let connection = Connection::new(ConnectionId(5), server);
        drop(client);

        let handler = FixedReplyHandler::ok("unused");
        connection.serve(&handler).expect("serve request");
        assert!(handler.targets().is_empty());
        assert_eq!(connection.phase(), ConnectionPhase::Closed);
    }

    #[test]
    fn stop_unblocks_a_pending_read() {
        let (_client, server) = connected_pair();
        let connection = std::sync::Arc::new(Connection::new(ConnectionId(6), server));
        let serving = std::sync::Arc::clone(&connection);
        let worker = thread::spawn(move || serving.serve(&FixedReplyHandler::ok("unused")));

        thread::sleep(std::time::Duration::from_millis(20));
        assert!(connection.stop());

        let result = worker.join().expect("worker thread");
        assert!(result.is_ok());
        assert!(connection.is_stopped());
        assert_eq!(connection.phase(), ConnectionPhase::Closed);
    }

    #[test]
    fn stop_lets_a_dispatched_request_finish_its_reply() {
        let (mut client, server) = connected_pair();
        let connection = std::sync::Arc::new(Connection::new(ConnectionId(7), server));
        let serving = std::sync::Arc::clone(&connection);
        let worker = thread::spawn(move || {
            serving.serve(&BlockingHandler::new(std::time::Duration::from_millis(100)))
        });
        client
            .write_all(b"GET /quit HTTP/1.0\r\n\r\n")
            .expect("write request");

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
        while connection.phase() != ConnectionPhase::Dispatching
            && std::time::Instant::now() < deadline
        {
            thread::sleep(std::time::Duration::from_millis(2));
        }
        assert!(!connection.stop());

        assert!(read_all(client).ends_with("\r\n\r\n/quit "));
        worker.join().expect("worker thread").expect("reply written");
        assert_eq!(connection.phase(), ConnectionPhase::Closed);
    }

    #[test]
    fn abort_closes_even_while_dispatching() {
        let (_client, server) = connected_pair();
        let connection = Connection::new(ConnectionId(8), server);
        connection.set_phase(ConnectionPhase::Dispatching);

        connection.abort();
        assert!(connection.is_stopped());
        assert_eq!(connection.phase(), ConnectionPhase::Closed);
    }
}
