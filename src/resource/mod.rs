//! Resource identity and operation outcomes.
//!
//! The handler is generic over the entity it operates on. It only requires
//! that the entity expose a stable identifier ([`Identified`]) and that the
//! lookup request for that entity can carry one ([`IdentifierLookup`]).

pub mod mapper;
mod outcome;

pub use mapper::{FnMapper, SerdeMapper, StructuralMapper};
pub use outcome::Outcome;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use uuid::Uuid;

/// A value with a stable, unique identifier.
pub trait Identified {
    type Id: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;
}

/// Generate a fresh opaque 128-bit identifier.
pub fn generate_id() -> Uuid {
    Uuid::new_v4()
}

/// A lookup request that locates one entity by identifier.
///
/// Implementations may carry additional caller-supplied fields (for example
/// which related records to load); the handler only ever sets the identifier.
pub trait IdentifierLookup: Default + Send {
    type Id;

    fn identifier(&self) -> &Self::Id;

    fn set_identifier(&mut self, id: Self::Id);

    /// Build a default lookup request targeting `id`.
    fn for_identifier(id: Self::Id) -> Self {
        let mut lookup = Self::default();
        lookup.set_identifier(id);
        lookup
    }
}

/// Lookup request carrying nothing but the identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ByIdentifier<I> {
    pub id: I,
}

impl<I> ByIdentifier<I> {
    pub fn new(id: I) -> Self {
        Self { id }
    }
}

impl<I: Default + Send> IdentifierLookup for ByIdentifier<I> {
    type Id = I;

    fn identifier(&self) -> &I {
        &self.id
    }

    fn set_identifier(&mut self, id: I) {
        self.id = id;
    }
}
