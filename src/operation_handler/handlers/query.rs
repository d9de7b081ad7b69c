//! Read operations
//!
//! List and get-by-id. Neither issues a mutation or a persist.

use crate::{
    cancellation::CancellationSignal,
    dispatch::{Dispatch, DispatchExecutor, IdLookup, List},
    error::HandlerResult,
    operation_handler::core::ResourceHandler,
    resource::{IdentifierLookup, Identified, Outcome, StructuralMapper},
};

impl<E, O, L, D, M> ResourceHandler<E, O, L, D, M>
where
    E: Identified + Send,
    L: IdentifierLookup<Id = E::Id>,
    D: DispatchExecutor,
    M: StructuralMapper<E, O>,
{
    /// List every entity matching `filter`.
    ///
    /// An empty result is an empty vector, never `NotFound`.
    pub async fn list<F>(
        &self,
        filter: F,
        cancel: &CancellationSignal,
    ) -> HandlerResult<Vec<O>, D::Error>
    where
        F: Send,
        D: Dispatch<List<E, F>>,
    {
        let entities = self.dispatch(List::<E, F>::new(filter), cancel).await?;
        Ok(self.mapper.map_all(&entities)?)
    }

    /// Fetch one entity using a caller-supplied lookup request.
    ///
    /// The lookup's identifier is overwritten with `id`; any other fields it
    /// carries are forwarded untouched.
    pub async fn get_by_id(
        &self,
        id: E::Id,
        mut lookup: L,
        cancel: &CancellationSignal,
    ) -> HandlerResult<Outcome<O, E::Id>, D::Error>
    where
        D: Dispatch<IdLookup<E, L>>,
    {
        lookup.set_identifier(id);

        match self.lookup(lookup, cancel).await? {
            Some(entity) => Ok(Outcome::Found(self.mapper.map(&entity)?)),
            None => Ok(Outcome::NotFound),
        }
    }

    /// Fetch one entity with a default lookup request.
    pub async fn get(
        &self,
        id: E::Id,
        cancel: &CancellationSignal,
    ) -> HandlerResult<Outcome<O, E::Id>, D::Error>
    where
        D: Dispatch<IdLookup<E, L>>,
    {
        self.get_by_id(id, L::default(), cancel).await
    }
}
