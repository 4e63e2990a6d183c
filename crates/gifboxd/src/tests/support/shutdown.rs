//! Shutdown signal a scenario can raise by hand.

use std::sync::{Arc, Condvar, Mutex};

use crate::process::{ShutdownError, ShutdownSignal};

#[derive(Debug, Default)]
struct Latch {
    raised: Mutex<bool>,
    wake: Condvar,
}

/// Cloneable trigger; every clone observes the same latch.
#[derive(Debug, Default, Clone)]
pub struct TestShutdownSignal {
    latch: Arc<Latch>,
}

impl TestShutdownSignal {
    /// Releases every pending and future wait.
    pub fn trigger(&self) {
        let mut raised = self.latch.raised.lock().expect("shutdown latch poisoned");
        *raised = true;
        self.latch.wake.notify_all();
    }
}

impl ShutdownSignal for TestShutdownSignal {
    fn wait(&self) -> Result<(), ShutdownError> {
        let mut raised = self.latch.raised.lock().expect("shutdown latch poisoned");
        while !*raised {
            raised = self.latch.wake.wait(raised).expect("shutdown latch poisoned");
        }
        Ok(())
    }

    fn release(&self) {
        self.trigger();
    }
}
