//! Test helpers for the transport module.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use gifbox_types::Value;

use super::RequestHandler;
use crate::http::{Reply, Request};

/// Answers every request with the same text reply and records targets.
pub(crate) struct FixedReplyHandler {
    text: String,
    targets: Mutex<Vec<String>>,
}

impl FixedReplyHandler {
    pub(crate) fn ok(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            targets: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn targets(&self) -> Vec<String> {
        self.targets.lock().expect("targets mutex poisoned").clone()
    }
}

impl RequestHandler for FixedReplyHandler {
    fn handle_request(&self, request: &Request) -> Reply {
        self.targets
            .lock()
            .expect("targets mutex poisoned")
            .push(request.target().to_owned());
        Reply::text(&[Value::from(self.text.as_str())])
    }
}

/// Counts requests handled.
pub(crate) struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    pub(crate) fn new() -> (Arc<AtomicUsize>, Arc<Self>) {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = Arc::new(Self {
            count: Arc::clone(&count),
        });
        (count, handler)
    }
}

impl RequestHandler for CountingHandler {
    fn handle_request(&self, request: &Request) -> Reply {
        self.count.fetch_add(1, Ordering::SeqCst);
        Reply::text(&[Value::from(request.path())])
    }
}

/// Sleeps before answering, standing in for a stalled application loop.
pub(crate) struct BlockingHandler {
    delay: Duration,
}

impl BlockingHandler {
    pub(crate) const fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl RequestHandler for BlockingHandler {
    fn handle_request(&self, request: &Request) -> Reply {
        thread::sleep(self.delay);
        Reply::text(&[Value::from(request.path())])
    }
}
