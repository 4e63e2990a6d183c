//! Request handling seam between the transport and dispatch layers.

use crate::http::{Reply, Request};

/// Produces the reply for one parsed request.
///
/// Implementations run on the connection's own thread and may block; other
/// connections are unaffected.
pub trait RequestHandler: Send + Sync + 'static {
    /// Handles a single request. Implementations should avoid panicking.
    fn handle_request(&self, request: &Request) -> Reply;
}

impl<T> RequestHandler for std::sync::Arc<T>
where
    T: RequestHandler,
{
    fn handle_request(&self, request: &Request) -> Reply {
        (**self).handle_request(request)
    }
}
