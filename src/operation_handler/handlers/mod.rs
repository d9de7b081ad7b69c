//! Operation implementations, grouped by functionality:
//! - Query operations (list, get by id)
//! - CRUD operations (create, update, patch, delete)
//!
//! Each module adds an `impl` block to
//! [`ResourceHandler`](crate::operation_handler::ResourceHandler).

pub mod crud;
pub mod query;
