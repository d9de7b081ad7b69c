//! Storage-specific error types.
//!
//! These errors come from the reference executor and reach callers of the
//! handler unchanged, inside `HandlerError::Dispatch`.

/// Errors that can occur while executing envelopes against a store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A created entity's identifier is already committed
    #[error("{resource_type} with id '{id}' already exists")]
    Duplicate { resource_type: String, id: String },

    /// The payload could not be turned into or applied to an entity
    #[error("Invalid resource data: {message}")]
    InvalidData { message: String },

    /// Persist observed a fired cancellation signal and committed nothing
    #[error("Commit cancelled; {pending} staged change(s) left pending")]
    Cancelled { pending: usize },

    /// The backing store cannot serve requests
    #[error("Store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    /// Create an invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
