//! Typed results of handler operations.

/// Result of a single-resource operation.
///
/// `NotFound` is an expected outcome, not an error: it is produced only when
/// the identifier lookup finds nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T, I> {
    /// The lookup found the resource
    Found(T),
    /// A new resource was created and persisted
    Created {
        id: I,
        /// `{location_base}/{id}` when the handler has a location base configured
        location: Option<String>,
        resource: T,
    },
    /// An existing resource was updated or patched and persisted
    Updated(T),
    /// An existing resource was deleted and the deletion persisted
    Deleted,
    /// No resource exists with the requested identifier
    NotFound,
}

impl<T, I> Outcome<T, I> {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Borrow the output representation carried by this outcome, if any.
    pub fn resource(&self) -> Option<&T> {
        match self {
            Self::Found(resource) | Self::Updated(resource) => Some(resource),
            Self::Created { resource, .. } => Some(resource),
            Self::Deleted | Self::NotFound => None,
        }
    }

    pub fn into_resource(self) -> Option<T> {
        match self {
            Self::Found(resource) | Self::Updated(resource) => Some(resource),
            Self::Created { resource, .. } => Some(resource),
            Self::Deleted | Self::NotFound => None,
        }
    }

    /// Identifier of a newly created resource.
    pub fn created_id(&self) -> Option<&I> {
        match self {
            Self::Created { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Location reference of a newly created resource.
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Created { location, .. } => location.as_deref(),
            _ => None,
        }
    }
}
