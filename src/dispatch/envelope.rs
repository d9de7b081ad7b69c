//! Dispatch envelopes, one per operation step.
//!
//! Each envelope pairs the caller's opaque request (and, for mutations, the
//! entity loaded by the preceding lookup) with enough type information for an
//! executor to route it. The entity type parameter is carried even where no
//! entity value is present so that routing is by `(envelope, entity)` pair.

use super::{Request, RequestKind};
use std::fmt;
use std::marker::PhantomData;

/// Fetch every entity matching `filter`.
pub struct List<E, F> {
    pub filter: F,
    entity: PhantomData<fn() -> E>,
}

impl<E, F> List<E, F> {
    pub fn new(filter: F) -> Self {
        Self {
            filter,
            entity: PhantomData,
        }
    }
}

impl<E: Send, F: Send> Request for List<E, F> {
    type Response = Vec<E>;
    const KIND: RequestKind = RequestKind::List;
}

/// Fetch the entity identified by `lookup`, if it exists.
pub struct IdLookup<E, L> {
    pub lookup: L,
    entity: PhantomData<fn() -> E>,
}

impl<E, L> IdLookup<E, L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            entity: PhantomData,
        }
    }
}

impl<E: Send, L: Send> Request for IdLookup<E, L> {
    type Response = Option<E>;
    const KIND: RequestKind = RequestKind::IdLookup;
}

/// Build a new entity from `payload`. The executor assigns its identifier.
pub struct Create<E, P> {
    pub payload: P,
    entity: PhantomData<fn() -> E>,
}

impl<E, P> Create<E, P> {
    pub fn new(payload: P) -> Self {
        Self {
            payload,
            entity: PhantomData,
        }
    }
}

impl<E: Send, P: Send> Request for Create<E, P> {
    type Response = E;
    const KIND: RequestKind = RequestKind::Create;
}

/// Apply a full update `payload` to a previously loaded entity.
#[derive(Debug)]
pub struct Update<E, P> {
    pub entity: E,
    pub payload: P,
}

impl<E, P> Update<E, P> {
    pub fn new(entity: E, payload: P) -> Self {
        Self { entity, payload }
    }

    pub fn into_parts(self) -> (E, P) {
        (self.entity, self.payload)
    }
}

impl<E: Send, P: Send> Request for Update<E, P> {
    type Response = E;
    const KIND: RequestKind = RequestKind::Update;
}

/// Apply a sparse patch payload to a previously loaded entity.
#[derive(Debug)]
pub struct Patch<E, P> {
    pub entity: E,
    pub payload: P,
}

impl<E, P> Patch<E, P> {
    pub fn new(entity: E, payload: P) -> Self {
        Self { entity, payload }
    }

    pub fn into_parts(self) -> (E, P) {
        (self.entity, self.payload)
    }
}

impl<E: Send, P: Send> Request for Patch<E, P> {
    type Response = E;
    const KIND: RequestKind = RequestKind::Patch;
}

/// Remove a previously loaded entity. `payload` typically carries a reason.
#[derive(Debug)]
pub struct Delete<E, P> {
    pub entity: E,
    pub payload: P,
}

impl<E, P> Delete<E, P> {
    pub fn new(entity: E, payload: P) -> Self {
        Self { entity, payload }
    }

    pub fn into_parts(self) -> (E, P) {
        (self.entity, self.payload)
    }
}

impl<E: Send, P: Send> Request for Delete<E, P> {
    type Response = ();
    const KIND: RequestKind = RequestKind::Delete;
}

/// Commit every change staged since the last persist.
///
/// Responds with the number of changes committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Persist;

impl Request for Persist {
    type Response = usize;
    const KIND: RequestKind = RequestKind::Persist;
}

impl<E, F: fmt::Debug> fmt::Debug for List<E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List").field("filter", &self.filter).finish()
    }
}

impl<E, L: fmt::Debug> fmt::Debug for IdLookup<E, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdLookup")
            .field("lookup", &self.lookup)
            .finish()
    }
}

impl<E, P: fmt::Debug> fmt::Debug for Create<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Create")
            .field("payload", &self.payload)
            .finish()
    }
}
