//! Executor decorators.
//!
//! The handler core performs no logging and keeps no call history. Both are
//! layered on by wrapping the executor: a decorator implements [`Dispatch`]
//! for every envelope its inner executor supports and forwards the call.
//!
//! ```rust
//! use resource_dispatch::dispatch::{LoggingDispatcher, RecordingDispatcher};
//! use resource_dispatch::storage::InMemoryStore;
//! # #[derive(Clone, serde::Serialize)]
//! # struct Widget { id: uuid::Uuid }
//! # impl resource_dispatch::Identified for Widget {
//! #     type Id = uuid::Uuid;
//! #     fn id(&self) -> &uuid::Uuid { &self.id }
//! # }
//!
//! let store: InMemoryStore<Widget> = InMemoryStore::new("Widget");
//! let executor = RecordingDispatcher::new(LoggingDispatcher::new(store, "Widget"));
//! assert!(executor.calls().is_empty());
//! ```

use super::{Dispatch, DispatchExecutor, Request, RequestKind};
use crate::cancellation::CancellationSignal;
use log::{Level, log, trace, warn};
use std::sync::{Arc, Mutex, MutexGuard};

/// Logs every dispatch through the `log` facade.
///
/// Each dispatch gets a generated correlation id so the send, completion and
/// failure lines of one call can be matched up.
#[derive(Debug, Clone)]
pub struct LoggingDispatcher<D> {
    inner: D,
    resource_type: String,
}

impl<D> LoggingDispatcher<D> {
    pub fn new(inner: D, resource_type: impl Into<String>) -> Self {
        Self {
            inner,
            resource_type: resource_type.into(),
        }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<D: DispatchExecutor> DispatchExecutor for LoggingDispatcher<D> {
    type Error = D::Error;
}

impl<R, D> Dispatch<R> for LoggingDispatcher<D>
where
    R: Request,
    D: Dispatch<R>,
{
    async fn send(
        &self,
        request: R,
        cancel: &CancellationSignal,
    ) -> Result<R::Response, D::Error> {
        let dispatch_id = uuid::Uuid::new_v4();
        // reads are noisy, mutations and commits are not
        let level = if R::KIND.is_mutation() || R::KIND == RequestKind::Persist {
            Level::Debug
        } else {
            Level::Trace
        };
        log!(
            level,
            "Dispatching {} for {} (dispatch: '{}')",
            R::KIND,
            self.resource_type,
            dispatch_id
        );

        let result = self.inner.send(request, cancel).await;

        match &result {
            Ok(_) => trace!(
                "{} for {} completed (dispatch: '{}')",
                R::KIND, self.resource_type, dispatch_id
            ),
            Err(e) => warn!(
                "{} for {} failed: {} (dispatch: '{}')",
                R::KIND, self.resource_type, e, dispatch_id
            ),
        }

        result
    }
}

/// Records the kind of every dispatch, in call order.
///
/// Clones share one call log, so a clone kept by the caller observes the
/// dispatches made through the clone handed to a handler.
#[derive(Debug, Clone)]
pub struct RecordingDispatcher<D> {
    inner: D,
    calls: Arc<Mutex<Vec<RequestKind>>>,
}

impl<D> RecordingDispatcher<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// Snapshot of the dispatch log.
    pub fn calls(&self) -> Vec<RequestKind> {
        self.log().clone()
    }

    /// Number of dispatches of `kind` so far.
    pub fn count(&self, kind: RequestKind) -> usize {
        self.log().iter().filter(|k| **k == kind).count()
    }

    pub fn clear(&self) {
        self.log().clear();
    }

    fn log(&self) -> MutexGuard<'_, Vec<RequestKind>> {
        // the log holds plain values, so a poisoned lock is still consistent
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<D: DispatchExecutor> DispatchExecutor for RecordingDispatcher<D> {
    type Error = D::Error;
}

impl<R, D> Dispatch<R> for RecordingDispatcher<D>
where
    R: Request,
    D: Dispatch<R>,
{
    async fn send(
        &self,
        request: R,
        cancel: &CancellationSignal,
    ) -> Result<R::Response, D::Error> {
        self.log().push(R::KIND);
        self.inner.send(request, cancel).await
    }
}
