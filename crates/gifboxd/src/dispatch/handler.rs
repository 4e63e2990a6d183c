//! Request handler bridging the transport and the command queue.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::http::{Reply, Request, StatusCode};
use crate::queue::CommandQueue;
use crate::transport::RequestHandler;

use super::DISPATCH_TARGET;
use super::decode::decode_target;

/// Decodes requests into commands and waits for the application loop.
///
/// Rejected targets are answered with a 400 without touching the queue.
/// A command that fails or times out is answered with a 500.
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    queue: Arc<CommandQueue>,
    timeout: Duration,
}

impl CommandDispatcher {
    /// Creates a dispatcher submitting to `queue` with the given reply timeout.
    #[must_use]
    pub const fn new(queue: Arc<CommandQueue>, timeout: Duration) -> Self {
        Self { queue, timeout }
    }
}

impl RequestHandler for CommandDispatcher {
    fn handle_request(&self, request: &Request) -> Reply {
        let command = match decode_target(request.target()) {
            Ok(command) => command,
            Err(error) => {
                warn!(
                    target: DISPATCH_TARGET,
                    method = request.method(),
                    path = request.path(),
                    query = request.query().unwrap_or_default(),
                    %error,
                    "rejected request"
                );
                return Reply::stock(StatusCode::BadRequest);
            }
        };

        let id = command.id();
        debug!(
            target: DISPATCH_TARGET,
            command = %id,
            path = request.path(),
            arguments = command.args().len(),
            "dispatching command"
        );
        let outcome = self.queue.submit_and_wait(command, self.timeout);
        if outcome.success {
            Reply::text(&outcome.values)
        } else {
            debug!(target: DISPATCH_TARGET, command = %id, "command failed");
            Reply::stock(StatusCode::InternalServerError)
        }
    }
}
