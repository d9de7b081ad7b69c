//! Generic resource operation handler for Rust.
//!
//! Implements list, get-by-id, create, update, patch and delete for any
//! entity type by composing typed dispatch envelopes and handing them to a
//! pluggable executor.
//!
//! # Core Components
//!
//! - [`ResourceHandler`] - The six operations, generic over entity, output,
//!   lookup, executor and mapper
//! - [`Dispatch`] - Trait for implementing executors, one impl per envelope
//! - [`StructuralMapper`] - Entity to output conversion
//! - [`PatchDocument`] - Sparse patch documents merged into typed payloads
//! - [`CancellationSignal`] - Cooperative cancellation shared by every step
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use resource_dispatch::{ByIdentifier, CancellationSignal, ResourceHandler, SerdeMapper};
//! use resource_dispatch::storage::InMemoryStore;
//! use std::sync::Arc;
//! # #[derive(Clone, serde::Serialize, serde::Deserialize)]
//! # struct Widget { id: u64 }
//! # impl resource_dispatch::Identified for Widget {
//! #     type Id = u64;
//! #     fn id(&self) -> &u64 { &self.id }
//! # }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryStore::<Widget>::new("Widget"));
//! let handler: ResourceHandler<Widget, Widget, ByIdentifier<u64>, _, _> =
//!     ResourceHandler::new(store, Arc::new(SerdeMapper::new()));
//!
//! let widgets = handler.list((), &CancellationSignal::none()).await?;
//! # Ok(())
//! # }
//! ```

pub mod cancellation;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod operation_handler;
pub mod patch;
pub mod resource;
pub mod storage;

// Re-export commonly used types for convenience
pub use cancellation::{CancellationHandle, CancellationSignal, cancellation};
pub use config::HandlerConfig;
pub use dispatch::{Dispatch, DispatchExecutor, Request, RequestKind};
pub use error::{HandlerError, HandlerResult, MappingError, PatchError};
pub use operation_handler::ResourceHandler;
pub use patch::{Field, PatchDocument, PatchOp, PatchOperation, Patchable};
pub use resource::{
    ByIdentifier, FnMapper, Identified, IdentifierLookup, Outcome, SerdeMapper, StructuralMapper,
};
