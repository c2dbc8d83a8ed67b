//! Cooperative stop signal for the control loop.
//!
//! [`StopHandle::new`] returns a handle/signal pair backed by a
//! [`tokio::sync::watch`] channel.  The handle can be cloned and moved into a
//! signal handler; the loop awaits [`StopSignal::stopped`] alongside its
//! ticker.  Dropping every handle also counts as a stop request, so a loop
//! can never outlive the code that owns it.
//!
//! # Example
//!
//! ```rust
//! use pursuit_runtime::stop::StopHandle;
//!
//! let (handle, signal) = StopHandle::new();
//! assert!(!signal.is_stopped());
//! handle.stop();
//! assert!(signal.is_stopped());
//! ```

use std::sync::Arc;

use tokio::sync::watch;

/// Requests a stop.  Clones share the same channel.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

/// Observes stop requests.
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopHandle {
    pub fn new() -> (StopHandle, StopSignal) {
        let (tx, rx) = watch::channel(false);
        (StopHandle { tx: Arc::new(tx) }, StopSignal { rx })
    }

    /// Ask the loop to stop.  Idempotent.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

impl StopSignal {
    /// `true` once a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once a stop is requested or every [`StopHandle`] is gone.
    pub async fn stopped(&mut self) {
        // Err means all senders dropped.
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}
