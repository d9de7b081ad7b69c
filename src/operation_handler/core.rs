//! Core operation handler infrastructure
//!
//! This module contains the handler struct and the guarded dispatch step that
//! every operation in [`handlers`](super::handlers) is built from.

use crate::{
    cancellation::CancellationSignal,
    config::HandlerConfig,
    dispatch::{Dispatch, DispatchExecutor, IdLookup, Request},
    error::{HandlerError, HandlerResult},
    resource::IdentifierLookup,
};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Generic handler for the six resource operations.
///
/// - `E` is the entity type the executor operates on
/// - `O` is the output representation returned to callers
/// - `L` is the identifier lookup request used by id-based operations
/// - `D` is the dispatch executor
/// - `M` is the structural mapper turning `E` into `O`
///
/// The handler keeps no per-invocation state. Its collaborators are fixed at
/// construction, so a single instance can serve concurrent callers. To change
/// how an operation behaves, wrap the handler or wrap its executor.
pub struct ResourceHandler<E, O, L, D, M> {
    pub(super) dispatcher: Arc<D>,
    pub(super) mapper: Arc<M>,
    pub(super) config: HandlerConfig,
    _marker: PhantomData<fn() -> (E, O, L)>,
}

impl<E, O, L, D, M> ResourceHandler<E, O, L, D, M>
where
    D: DispatchExecutor,
{
    /// Create a handler with the default configuration.
    pub fn new(dispatcher: Arc<D>, mapper: Arc<M>) -> Self {
        Self {
            dispatcher,
            mapper,
            config: HandlerConfig::default(),
            _marker: PhantomData,
        }
    }

    pub fn with_config(mut self, config: HandlerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Arc<D> {
        &self.dispatcher
    }

    pub fn mapper(&self) -> &Arc<M> {
        &self.mapper
    }

    /// Send one envelope, honouring the cancellation signal.
    ///
    /// The signal is checked before sending and raced against the pending
    /// dispatch; cancellation wins ties.
    pub(super) async fn dispatch<R>(
        &self,
        request: R,
        cancel: &CancellationSignal,
    ) -> HandlerResult<R::Response, D::Error>
    where
        R: Request,
        D: Dispatch<R>,
    {
        if cancel.is_cancelled() {
            return Err(HandlerError::Cancelled { stage: R::KIND });
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(HandlerError::Cancelled { stage: R::KIND }),
            result = Dispatch::<R>::send(&*self.dispatcher, request, cancel) => {
                result.map_err(HandlerError::Dispatch)
            }
        }
    }

    /// Dispatch the lookup step shared by every id-based operation.
    pub(super) async fn lookup(
        &self,
        lookup: L,
        cancel: &CancellationSignal,
    ) -> HandlerResult<Option<E>, D::Error>
    where
        E: Send,
        L: IdentifierLookup,
        D: Dispatch<IdLookup<E, L>>,
    {
        self.dispatch(IdLookup::<E, L>::new(lookup), cancel).await
    }
}

impl<E, O, L, D, M> Clone for ResourceHandler<E, O, L, D, M> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
            mapper: Arc::clone(&self.mapper),
            config: self.config.clone(),
            _marker: PhantomData,
        }
    }
}

impl<E, O, L, D, M> fmt::Debug for ResourceHandler<E, O, L, D, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHandler")
            .field("resource_type", &self.config.resource_type)
            .finish_non_exhaustive()
    }
}
