//! Mutating operations
//!
//! Create, update, patch and delete. Each mutation is followed by exactly one
//! persist dispatch in the same call. The id-based operations look the entity
//! up first and stop with `NotFound` before mutating anything.

use crate::{
    cancellation::CancellationSignal,
    dispatch::{Create, Delete, Dispatch, DispatchExecutor, IdLookup, Patch, Persist, Update},
    error::HandlerResult,
    operation_handler::core::ResourceHandler,
    patch::{PatchDocument, Patchable},
    resource::{IdentifierLookup, Identified, Outcome, StructuralMapper},
};

impl<E, O, L, D, M> ResourceHandler<E, O, L, D, M>
where
    E: Identified + Send,
    L: IdentifierLookup<Id = E::Id>,
    D: DispatchExecutor + Dispatch<Persist>,
    M: StructuralMapper<E, O>,
{
    /// Create a resource from `payload` and persist it.
    ///
    /// Never looks anything up. The outcome carries the new identifier and,
    /// if configured, its location reference.
    pub async fn create<P>(
        &self,
        payload: P,
        cancel: &CancellationSignal,
    ) -> HandlerResult<Outcome<O, E::Id>, D::Error>
    where
        P: Send,
        D: Dispatch<Create<E, P>>,
    {
        let entity = self.dispatch(Create::<E, P>::new(payload), cancel).await?;
        self.dispatch(Persist, cancel).await?;

        let id = entity.id().clone();
        Ok(Outcome::Created {
            location: self.config.location_for(&id),
            resource: self.mapper.map(&entity)?,
            id,
        })
    }

    /// Replace a resource's state with `payload` and persist it.
    pub async fn update<P>(
        &self,
        id: E::Id,
        payload: P,
        cancel: &CancellationSignal,
    ) -> HandlerResult<Outcome<O, E::Id>, D::Error>
    where
        P: Send,
        D: Dispatch<IdLookup<E, L>> + Dispatch<Update<E, P>>,
    {
        let Some(entity) = self.lookup(L::for_identifier(id), cancel).await? else {
            return Ok(Outcome::NotFound);
        };

        let entity = self.dispatch(Update::new(entity, payload), cancel).await?;
        self.dispatch(Persist, cancel).await?;

        Ok(Outcome::Updated(self.mapper.map(&entity)?))
    }

    /// Apply a patch document to a resource and persist it.
    ///
    /// The document is applied to a fresh `P::default()` only once the entity
    /// is known to exist; the resulting sparse payload travels in the patch
    /// envelope alongside the loaded entity.
    pub async fn patch<P>(
        &self,
        id: E::Id,
        document: PatchDocument,
        cancel: &CancellationSignal,
    ) -> HandlerResult<Outcome<O, E::Id>, D::Error>
    where
        P: Patchable + Default + Send,
        D: Dispatch<IdLookup<E, L>> + Dispatch<Patch<E, P>>,
    {
        let Some(entity) = self.lookup(L::for_identifier(id), cancel).await? else {
            return Ok(Outcome::NotFound);
        };

        let payload: P = document.materialize(&self.config.readonly_paths)?;
        let entity = self.dispatch(Patch::new(entity, payload), cancel).await?;
        self.dispatch(Persist, cancel).await?;

        Ok(Outcome::Updated(self.mapper.map(&entity)?))
    }

    /// Delete a resource and persist the deletion.
    ///
    /// `payload` is forwarded to the executor (typically a reason or audit note).
    pub async fn delete<P>(
        &self,
        id: E::Id,
        payload: P,
        cancel: &CancellationSignal,
    ) -> HandlerResult<Outcome<O, E::Id>, D::Error>
    where
        P: Send,
        D: Dispatch<IdLookup<E, L>> + Dispatch<Delete<E, P>>,
    {
        let Some(entity) = self.lookup(L::for_identifier(id), cancel).await? else {
            return Ok(Outcome::NotFound);
        };

        self.dispatch(Delete::new(entity, payload), cancel).await?;
        self.dispatch(Persist, cancel).await?;

        Ok(Outcome::Deleted)
    }
}
