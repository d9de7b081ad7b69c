//! Shared fixtures for the integration tests.
//!
//! - `Widget` entity with its payloads and view
//! - executor wrappers that stall or fail on one envelope kind
//! - handler constructors wired to a recording in-memory store

#![allow(dead_code)]

use resource_dispatch::dispatch::{
    Dispatch, DispatchExecutor, RecordingDispatcher, Request, RequestKind,
};
use resource_dispatch::patch::{Field, PatchOperation, Patchable};
use resource_dispatch::resource::generate_id;
use resource_dispatch::storage::{ApplyPayload, FromPayload, InMemoryStore, StoreError};
use resource_dispatch::{
    ByIdentifier, CancellationSignal, HandlerConfig, Identified, PatchError, ResourceHandler,
    SerdeMapper,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub const LOCATION_BASE: &str = "https://example.com/v1/widgets/";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Widget {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
}

impl Widget {
    pub fn new(name: &str, color: Option<&str>) -> Self {
        Self {
            id: generate_id(),
            name: name.to_string(),
            color: color.map(str::to_string),
        }
    }
}

impl Identified for Widget {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WidgetView {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewWidget {
    pub name: String,
    pub color: Option<String>,
}

impl NewWidget {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            color: None,
        }
    }
}

impl FromPayload<NewWidget> for Widget {
    fn from_payload(payload: NewWidget) -> Result<Self, StoreError> {
        if payload.name.trim().is_empty() {
            return Err(StoreError::invalid_data("name must not be empty"));
        }
        Ok(Widget {
            id: generate_id(),
            name: payload.name,
            color: payload.color,
        })
    }
}

/// Full replacement of a widget's mutable state.
#[derive(Debug, Clone)]
pub struct ReplaceWidget {
    pub name: String,
    pub color: Option<String>,
}

impl ApplyPayload<ReplaceWidget> for Widget {
    fn apply_payload(&mut self, payload: ReplaceWidget) -> Result<(), StoreError> {
        self.name = payload.name;
        self.color = payload.color;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct WidgetPatch {
    pub name: Field<String>,
    pub color: Field<String>,
}

impl Patchable for WidgetPatch {
    fn apply_operation(&mut self, operation: &PatchOperation) -> Result<(), PatchError> {
        if operation.targets("name") {
            self.name = Field::from_operation(operation)?;
        } else if operation.targets("color") {
            self.color = Field::from_operation(operation)?;
        } else {
            return Err(operation.unknown_path());
        }
        Ok(())
    }
}

impl ApplyPayload<WidgetPatch> for Widget {
    fn apply_payload(&mut self, payload: WidgetPatch) -> Result<(), StoreError> {
        match payload.name {
            Field::Unset => {}
            Field::Cleared => return Err(StoreError::invalid_data("name is required")),
            Field::Set(name) => self.name = name,
        }
        payload.color.apply_to(&mut self.color);
        Ok(())
    }
}

/// Delete payload.
#[derive(Debug, Clone)]
pub struct RetireWidget {
    pub reason: String,
}

impl RetireWidget {
    pub fn because(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

/// Never completes envelopes of one kind; forwards everything else.
#[derive(Debug, Clone)]
pub struct StallOn<D> {
    pub inner: D,
    pub kind: RequestKind,
}

impl<D: DispatchExecutor> DispatchExecutor for StallOn<D> {
    type Error = D::Error;
}

impl<R, D> Dispatch<R> for StallOn<D>
where
    R: Request,
    D: Dispatch<R>,
{
    async fn send(
        &self,
        request: R,
        cancel: &CancellationSignal,
    ) -> Result<R::Response, D::Error> {
        if R::KIND == self.kind {
            return std::future::pending().await;
        }
        self.inner.send(request, cancel).await
    }
}

/// Fails envelopes of one kind with `StoreError::Unavailable`.
#[derive(Debug, Clone)]
pub struct FailOn<D> {
    pub inner: D,
    pub kind: RequestKind,
}

impl<D: DispatchExecutor<Error = StoreError>> DispatchExecutor for FailOn<D> {
    type Error = StoreError;
}

impl<R, D> Dispatch<R> for FailOn<D>
where
    R: Request,
    D: Dispatch<R> + DispatchExecutor<Error = StoreError>,
{
    async fn send(
        &self,
        request: R,
        cancel: &CancellationSignal,
    ) -> Result<R::Response, StoreError> {
        if R::KIND == self.kind {
            return Err(StoreError::unavailable(format!("{} rejected", R::KIND)));
        }
        self.inner.send(request, cancel).await
    }
}

pub type RecordingStore = RecordingDispatcher<InMemoryStore<Widget>>;

pub type WidgetHandler<D> = ResourceHandler<Widget, WidgetView, ByIdentifier<Uuid>, D, SerdeMapper>;

pub fn widget_config() -> HandlerConfig {
    HandlerConfig::new("Widget").with_location_base(LOCATION_BASE)
}

pub fn widget_handler<D: DispatchExecutor>(executor: D) -> WidgetHandler<D> {
    ResourceHandler::new(Arc::new(executor), Arc::new(SerdeMapper::new()))
        .with_config(widget_config())
}

pub fn recording_store(widgets: impl IntoIterator<Item = Widget>) -> RecordingStore {
    RecordingDispatcher::new(InMemoryStore::with_entities("Widget", widgets))
}

/// Handler over a recording store seeded with `widgets`. The returned store
/// shares its call log and state with the one inside the handler.
pub fn seeded_handler(
    widgets: impl IntoIterator<Item = Widget>,
) -> (WidgetHandler<RecordingStore>, RecordingStore) {
    let store = recording_store(widgets);
    (widget_handler(store.clone()), store)
}
