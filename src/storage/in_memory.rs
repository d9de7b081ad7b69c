//! In-memory dispatch executor with staged commits.
//!
//! This module provides a thread-safe executor holding entities in a
//! `BTreeMap` behind tokio's `RwLock`. It's designed for testing, development
//! and as a worked example of an executor for the handler's envelopes.
//!
//! # Semantics
//!
//! * `List` and `IdLookup` read committed state only
//! * `Create`, `Update`, `Patch` and `Delete` stage a change and return
//! * `Persist` commits every staged change at once and reports how many
//! * A `Persist` whose cancellation signal has fired commits nothing and
//!   leaves every staged change pending for the next commit or [`rollback`]
//!
//! Staged changes belong to the store, not to a caller: a `Persist` commits
//! whatever has been staged by anyone since the previous commit.
//!
//! [`rollback`]: InMemoryStore::rollback

use super::{ApplyPayload, EntityFilter, FromPayload, StoreError, StoredEntity};
use crate::{
    cancellation::CancellationSignal,
    dispatch::{Create, Delete, Dispatch, DispatchExecutor, IdLookup, List, Patch, Persist, Update},
    resource::{IdentifierLookup, Identified},
};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

enum StagedChange<E: Identified> {
    Upsert(E),
    Remove(E::Id),
}

/// Thread-safe in-memory store.
///
/// Clones share the same committed and staged state.
pub struct InMemoryStore<E: Identified> {
    resource_type: String,
    committed: Arc<RwLock<BTreeMap<E::Id, E>>>,
    staged: Arc<Mutex<Vec<StagedChange<E>>>>,
}

impl<E: StoredEntity> InMemoryStore<E> {
    /// Create an empty store for the named resource type.
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self::with_entities(resource_type, std::iter::empty())
    }

    /// Create a store whose committed state already holds `entities`.
    pub fn with_entities(
        resource_type: impl Into<String>,
        entities: impl IntoIterator<Item = E>,
    ) -> Self {
        let committed = entities
            .into_iter()
            .map(|entity| (entity.id().clone(), entity))
            .collect();

        Self {
            resource_type: resource_type.into(),
            committed: Arc::new(RwLock::new(committed)),
            staged: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Number of committed entities.
    pub async fn len(&self) -> usize {
        self.committed.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.committed.read().await.is_empty()
    }

    /// Number of changes staged since the last commit.
    pub async fn pending_changes(&self) -> usize {
        self.staged.lock().await.len()
    }

    /// Committed copy of one entity.
    pub async fn committed(&self, id: &E::Id) -> Option<E> {
        self.committed.read().await.get(id).cloned()
    }

    /// Discard every staged change. Returns how many were discarded.
    pub async fn rollback(&self) -> usize {
        let mut staged = self.staged.lock().await;
        let discarded = staged.len();
        staged.clear();
        if discarded > 0 {
            debug!(
                "Rolled back {} staged change(s) for {}",
                discarded, self.resource_type
            );
        }
        discarded
    }

    /// Remove all committed and staged state (useful for testing).
    pub async fn clear(&self) {
        self.staged.lock().await.clear();
        self.committed.write().await.clear();
    }

    async fn stage(&self, change: StagedChange<E>) {
        let mut staged = self.staged.lock().await;
        match &change {
            StagedChange::Upsert(entity) => {
                debug!("Staged upsert of {} '{}'", self.resource_type, entity.id())
            }
            StagedChange::Remove(id) => {
                debug!("Staged removal of {} '{}'", self.resource_type, id)
            }
        }
        staged.push(change);
    }
}

impl<E: Identified> Clone for InMemoryStore<E> {
    fn clone(&self) -> Self {
        Self {
            resource_type: self.resource_type.clone(),
            committed: Arc::clone(&self.committed),
            staged: Arc::clone(&self.staged),
        }
    }
}

impl<E: Identified> fmt::Debug for InMemoryStore<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("resource_type", &self.resource_type)
            .finish_non_exhaustive()
    }
}

impl<E: StoredEntity> DispatchExecutor for InMemoryStore<E> {
    type Error = StoreError;
}

impl<E, F> Dispatch<List<E, F>> for InMemoryStore<E>
where
    E: StoredEntity,
    F: EntityFilter<E>,
{
    async fn send(
        &self,
        request: List<E, F>,
        _cancel: &CancellationSignal,
    ) -> Result<Vec<E>, StoreError> {
        let committed = self.committed.read().await;
        Ok(committed
            .values()
            .filter(|entity| request.filter.matches(entity))
            .cloned()
            .collect())
    }
}

impl<E, L> Dispatch<IdLookup<E, L>> for InMemoryStore<E>
where
    E: StoredEntity,
    L: IdentifierLookup<Id = E::Id>,
{
    async fn send(
        &self,
        request: IdLookup<E, L>,
        _cancel: &CancellationSignal,
    ) -> Result<Option<E>, StoreError> {
        let committed = self.committed.read().await;
        Ok(committed.get(request.lookup.identifier()).cloned())
    }
}

impl<E, P> Dispatch<Create<E, P>> for InMemoryStore<E>
where
    E: StoredEntity + FromPayload<P>,
    P: Send,
{
    async fn send(
        &self,
        request: Create<E, P>,
        _cancel: &CancellationSignal,
    ) -> Result<E, StoreError> {
        let entity = E::from_payload(request.payload)?;

        if self.committed.read().await.contains_key(entity.id()) {
            return Err(StoreError::Duplicate {
                resource_type: self.resource_type.clone(),
                id: entity.id().to_string(),
            });
        }

        self.stage(StagedChange::Upsert(entity.clone())).await;
        Ok(entity)
    }
}

impl<E, P> Dispatch<Update<E, P>> for InMemoryStore<E>
where
    E: StoredEntity + ApplyPayload<P>,
    P: Send,
{
    async fn send(
        &self,
        request: Update<E, P>,
        _cancel: &CancellationSignal,
    ) -> Result<E, StoreError> {
        let (mut entity, payload) = request.into_parts();
        entity.apply_payload(payload)?;

        self.stage(StagedChange::Upsert(entity.clone())).await;
        Ok(entity)
    }
}

impl<E, P> Dispatch<Patch<E, P>> for InMemoryStore<E>
where
    E: StoredEntity + ApplyPayload<P>,
    P: Send,
{
    async fn send(
        &self,
        request: Patch<E, P>,
        _cancel: &CancellationSignal,
    ) -> Result<E, StoreError> {
        let (mut entity, payload) = request.into_parts();
        entity.apply_payload(payload)?;

        self.stage(StagedChange::Upsert(entity.clone())).await;
        Ok(entity)
    }
}

impl<E, P> Dispatch<Delete<E, P>> for InMemoryStore<E>
where
    E: StoredEntity,
    P: fmt::Debug + Send,
{
    async fn send(
        &self,
        request: Delete<E, P>,
        _cancel: &CancellationSignal,
    ) -> Result<(), StoreError> {
        let (entity, reason) = request.into_parts();
        debug!(
            "Deleting {} '{}' ({:?})",
            self.resource_type,
            entity.id(),
            reason
        );

        self.stage(StagedChange::Remove(entity.id().clone())).await;
        Ok(())
    }
}

impl<E: StoredEntity> Dispatch<Persist> for InMemoryStore<E> {
    async fn send(
        &self,
        _request: Persist,
        cancel: &CancellationSignal,
    ) -> Result<usize, StoreError> {
        let mut staged = self.staged.lock().await;

        // other callers' changes share the queue, so nothing is dropped here
        if cancel.is_cancelled() {
            let pending = staged.len();
            warn!(
                "Persist for {} cancelled, {} staged change(s) left pending",
                self.resource_type, pending
            );
            return Err(StoreError::Cancelled { pending });
        }

        let mut committed = self.committed.write().await;
        let count = staged.len();
        for change in staged.drain(..) {
            match change {
                StagedChange::Upsert(entity) => {
                    committed.insert(entity.id().clone(), entity);
                }
                StagedChange::Remove(id) => {
                    committed.remove(&id);
                }
            }
        }

        info!("Committed {} change(s) for {}", count, self.resource_type);
        Ok(count)
    }
}
