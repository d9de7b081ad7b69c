//! Cooperative cancellation for handler invocations.
//!
//! A [`CancellationSignal`] is threaded through every dispatch call an
//! operation issues. The handler checks it before each dispatch and races
//! each pending dispatch against it; executors receive the same signal and
//! may observe it themselves.
//!
//! ```rust
//! use resource_dispatch::cancellation::cancellation;
//!
//! let (handle, signal) = cancellation();
//! assert!(!signal.is_cancelled());
//! handle.cancel();
//! assert!(signal.is_cancelled());
//! ```

use std::sync::Arc;
use tokio::sync::watch;

/// Create a connected handle/signal pair.
pub fn cancellation() -> (CancellationHandle, CancellationSignal) {
    let (sender, receiver) = watch::channel(false);
    (
        CancellationHandle {
            sender: Arc::new(sender),
        },
        CancellationSignal {
            receiver: Some(receiver),
        },
    )
}

/// The triggering side of a cancellation pair.
#[derive(Debug, Clone)]
pub struct CancellationHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl CancellationHandle {
    /// Fire the signal. Every connected [`CancellationSignal`] observes it.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Create another signal observing this handle.
    pub fn signal(&self) -> CancellationSignal {
        CancellationSignal {
            receiver: Some(self.sender.subscribe()),
        }
    }
}

/// The observing side of a cancellation pair.
///
/// A signal whose handle is dropped without cancelling never fires.
#[derive(Debug, Clone, Default)]
pub struct CancellationSignal {
    receiver: Option<watch::Receiver<bool>>,
}

impl CancellationSignal {
    /// A signal that never fires.
    pub fn none() -> Self {
        Self { receiver: None }
    }

    /// Returns true if the connected handle has fired.
    pub fn is_cancelled(&self) -> bool {
        self.receiver
            .as_ref()
            .is_some_and(|receiver| *receiver.borrow())
    }

    /// Resolves once the signal fires. Pends forever for [`none`](Self::none)
    /// or when the handle is dropped without cancelling.
    pub async fn cancelled(&self) {
        let Some(receiver) = &self.receiver else {
            return std::future::pending().await;
        };

        let mut receiver = receiver.clone();
        let fired = receiver.wait_for(|cancelled| *cancelled).await.is_ok();
        if !fired {
            std::future::pending::<()>().await;
        }
    }
}
