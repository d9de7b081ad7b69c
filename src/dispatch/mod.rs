//! Dispatch executor contract.
//!
//! The handler never talks to storage or business logic directly. It builds
//! a typed envelope per step (see [`envelope`]) and hands it to an executor
//! implementing [`Dispatch`] for that envelope type. The executor is opaque:
//! it may route to in-process handlers, a message bus or a remote service.
//!
//! # Key Types
//!
//! - [`Request`] - implemented by every envelope; fixes the response type
//! - [`DispatchExecutor`] - the executor's shared error type
//! - [`Dispatch`] - "this executor can execute envelope `R`"
//! - [`middleware`] - executor decorators for logging and call recording

pub mod envelope;
pub mod middleware;

pub use envelope::{Create, Delete, IdLookup, List, Patch, Persist, Update};
pub use middleware::{LoggingDispatcher, RecordingDispatcher};

use crate::cancellation::CancellationSignal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

/// The seven envelope shapes the handler dispatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    List,
    IdLookup,
    Create,
    Update,
    Patch,
    Delete,
    Persist,
}

impl RequestKind {
    /// Returns true for envelopes that stage a change awaiting [`Persist`].
    pub fn is_mutation(self) -> bool {
        matches!(
            self,
            Self::Create | Self::Update | Self::Patch | Self::Delete
        )
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::List => "List",
            Self::IdLookup => "IdLookup",
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Patch => "Patch",
            Self::Delete => "Delete",
            Self::Persist => "Persist",
        };
        f.write_str(name)
    }
}

/// A dispatchable envelope with a fixed response type.
pub trait Request: Send {
    /// What the executor returns for this envelope
    type Response: Send;

    /// Routing tag for this envelope shape
    const KIND: RequestKind;
}

/// Shared error type of a dispatch executor.
pub trait DispatchExecutor: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;
}

/// Executes envelopes of type `R`.
///
/// An executor implements this once per envelope shape it supports. The
/// cancellation signal is the caller's; executors may use it to abandon
/// work early but are not required to.
pub trait Dispatch<R: Request>: DispatchExecutor {
    fn send(
        &self,
        request: R,
        cancel: &CancellationSignal,
    ) -> impl Future<Output = Result<R::Response, Self::Error>> + Send;
}

impl<D: DispatchExecutor> DispatchExecutor for std::sync::Arc<D> {
    type Error = D::Error;
}

impl<R, D> Dispatch<R> for std::sync::Arc<D>
where
    R: Request,
    D: Dispatch<R>,
{
    fn send(
        &self,
        request: R,
        cancel: &CancellationSignal,
    ) -> impl Future<Output = Result<R::Response, Self::Error>> + Send {
        (**self).send(request, cancel)
    }
}
