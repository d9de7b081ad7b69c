//! Reference dispatch executor.
//!
//! [`InMemoryStore`] executes every envelope the handler emits. Mutations are
//! staged and only become visible once a `Persist` envelope commits them,
//! which is the contract the handler's lookup/mutate/persist sequence is
//! built around.
//!
//! The store knows nothing about a particular entity. Entity behaviour is
//! supplied through three small traits:
//!
//! - [`FromPayload`] builds a new entity (with a fresh identifier) for `Create`
//! - [`ApplyPayload`] applies an update or patch payload for `Update`/`Patch`
//! - [`EntityFilter`] selects entities for `List`

pub mod errors;
pub mod in_memory;

pub use errors::StoreError;
pub use in_memory::InMemoryStore;

use crate::resource::Identified;

/// Entities the in-memory store can hold.
pub trait StoredEntity: Identified<Id: Ord> + Clone + Send + Sync + 'static {}

impl<T> StoredEntity for T where T: Identified<Id: Ord> + Clone + Send + Sync + 'static {}

/// Build a new entity from a create payload.
///
/// Implementations assign the identifier, typically with
/// [`generate_id`](crate::resource::generate_id).
pub trait FromPayload<P>: Sized {
    fn from_payload(payload: P) -> Result<Self, StoreError>;
}

/// Apply an update or patch payload to an existing entity.
pub trait ApplyPayload<P> {
    fn apply_payload(&mut self, payload: P) -> Result<(), StoreError>;
}

/// Selects entities for a list request.
pub trait EntityFilter<E>: Send {
    fn matches(&self, entity: &E) -> bool;
}

/// The unit filter matches every entity.
impl<E> EntityFilter<E> for () {
    fn matches(&self, _entity: &E) -> bool {
        true
    }
}

/// Filter backed by a predicate.
pub struct Matching<F>(pub F);

impl<E, F> EntityFilter<E> for Matching<F>
where
    F: Fn(&E) -> bool + Send,
{
    fn matches(&self, entity: &E) -> bool {
        (self.0)(entity)
    }
}
