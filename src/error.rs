//! Error types for resource operation handling.
//!
//! The handler recovers exactly one condition itself: an absent lookup result
//! becomes [`Outcome::NotFound`](crate::resource::Outcome::NotFound). Every
//! other failure is surfaced through [`HandlerError`], with dispatch failures
//! carried through unchanged so the transport layer can translate them.

use crate::dispatch::RequestKind;
use crate::patch::PatchOp;

/// Result type returned by [`ResourceHandler`](crate::ResourceHandler) operations.
pub type HandlerResult<T, E> = Result<T, HandlerError<E>>;

/// Main error type for resource handler operations.
///
/// `E` is the error type of the dispatch executor the handler was built on.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError<E>
where
    E: std::error::Error + 'static,
{
    /// Failure raised by the dispatch executor, passed through as-is
    #[error(transparent)]
    Dispatch(E),

    /// The patch document could not be applied to a fresh payload
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// The entity could not be mapped to its output representation
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// The cancellation signal fired while `stage` was pending
    #[error("operation cancelled while awaiting {stage} dispatch")]
    Cancelled { stage: RequestKind },
}

impl<E> HandlerError<E>
where
    E: std::error::Error + 'static,
{
    /// Returns true if the invocation was aborted by its cancellation signal.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Recover the executor's original error, if this is a dispatch failure.
    pub fn into_dispatch(self) -> Option<E> {
        match self {
            Self::Dispatch(e) => Some(e),
            _ => None,
        }
    }

    /// Borrow the executor's original error, if this is a dispatch failure.
    pub fn as_dispatch(&self) -> Option<&E> {
        match self {
            Self::Dispatch(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors raised while parsing or applying a patch document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatchError {
    /// Operation name outside add/remove/replace
    #[error("Unsupported PATCH operation: {op}")]
    UnsupportedOperation { op: String },

    /// An add or replace operation without a value
    #[error("{op} operation on '{path}' requires a value")]
    MissingValue { op: PatchOp, path: String },

    /// A single operation object is missing a required member
    #[error("PATCH operation must have '{member}' field")]
    MalformedOperation { member: &'static str },

    /// The document is neither an operation array nor an `Operations` wrapper
    #[error("Malformed PATCH document: {message}")]
    MalformedDocument { message: String },

    /// The value cannot be converted to the field's type
    #[error("Value for '{path}' has an incompatible type: {message}")]
    TypeMismatch { path: String, message: String },

    /// The path is not a dotted sequence of attribute names
    #[error("Invalid PATCH path: {path}")]
    InvalidPath { path: String },

    /// The payload has no field at this path
    #[error("Unknown PATCH path: {path}")]
    UnknownPath { path: String },

    /// The path is configured as readonly
    #[error("Cannot modify readonly attribute: {path}")]
    ReadOnly { path: String },
}

/// Errors raised by a [`StructuralMapper`](crate::resource::StructuralMapper).
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// The source value could not be turned into a structural form
    #[error("Failed to serialize mapping source: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The source shape does not fit the target type
    #[error("Source is not structurally compatible with target: {0}")]
    Incompatible(#[source] serde_json::Error),

    /// Mapping rejected by a custom mapper
    #[error("Mapping failed: {message}")]
    Custom { message: String },
}

impl MappingError {
    /// Create a custom mapping error.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }
}
