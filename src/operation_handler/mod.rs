//! Generic resource operation handler.
//!
//! [`ResourceHandler`] implements list, get-by-id, create, update, patch and
//! delete for any entity type by composing typed dispatch envelopes:
//!
//! | Operation | Dispatch sequence |
//! |---|---|
//! | list | `List` |
//! | get_by_id | `IdLookup` |
//! | create | `Create`, `Persist` |
//! | update | `IdLookup`, then `Update`, `Persist` if found |
//! | patch | `IdLookup`, then `Patch`, `Persist` if found |
//! | delete | `IdLookup`, then `Delete`, `Persist` if found |
//!
//! A missing entity ends an id-based operation with
//! [`Outcome::NotFound`](crate::resource::Outcome::NotFound) right after the
//! lookup. Every other failure is returned as a
//! [`HandlerError`](crate::HandlerError), with executor errors unchanged.
//!
//! # Examples
//!
//! ```rust
//! use resource_dispatch::{
//!     ByIdentifier, CancellationSignal, HandlerConfig, Identified, Outcome, ResourceHandler,
//!     resource::SerdeMapper,
//!     storage::{FromPayload, InMemoryStore, StoreError},
//! };
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//! use uuid::Uuid;
//!
//! #[derive(Clone, Serialize)]
//! struct Note { id: Uuid, text: String }
//!
//! #[derive(Deserialize)]
//! struct NoteView { id: Uuid, text: String }
//!
//! struct NewNote { text: String }
//!
//! impl Identified for Note {
//!     type Id = Uuid;
//!     fn id(&self) -> &Uuid { &self.id }
//! }
//!
//! impl FromPayload<NewNote> for Note {
//!     fn from_payload(payload: NewNote) -> Result<Self, StoreError> {
//!         Ok(Note { id: resource_dispatch::resource::generate_id(), text: payload.text })
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryStore::<Note>::new("Note"));
//! let handler: ResourceHandler<Note, NoteView, ByIdentifier<Uuid>, _, _> =
//!     ResourceHandler::new(store, Arc::new(SerdeMapper::new()))
//!         .with_config(HandlerConfig::new("Note").with_location_base("/notes"));
//!
//! let cancel = CancellationSignal::none();
//! let created = handler.create(NewNote { text: "hello".into() }, &cancel).await?;
//! let id = *created.created_id().unwrap();
//! assert_eq!(created.location(), Some(format!("/notes/{}", id).as_str()));
//!
//! let found = handler.get(id, &cancel).await?;
//! assert!(matches!(&found, Outcome::Found(view) if view.text == "hello"));
//! assert!(handler.get(Uuid::new_v4(), &cancel).await?.is_not_found());
//! # Ok(())
//! # }
//! ```

mod core;
mod handlers;

pub use self::core::ResourceHandler;
