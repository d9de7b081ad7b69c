//! Handler configuration.
//!
//! Configuration is plain serde data so it can be embedded in whatever
//! settings file the hosting service loads.
//!
//! ```rust
//! use resource_dispatch::HandlerConfig;
//!
//! let config =
//!     HandlerConfig::from_json(r#"{"resourceType": "Widget", "locationBase": "/widgets"}"#)?;
//! assert_eq!(config.resource_type, "Widget");
//! assert_eq!(config.readonly_paths, vec!["id".to_string()]);
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for a [`ResourceHandler`](crate::ResourceHandler).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HandlerConfig {
    /// Resource type name used in logs and diagnostics
    pub resource_type: String,
    /// Base path for location references of created resources
    pub location_base: Option<String>,
    /// Patch paths that may never be modified
    pub readonly_paths: Vec<String>,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            resource_type: "Resource".to_string(),
            location_base: None,
            readonly_paths: vec!["id".to_string()],
        }
    }
}

impl HandlerConfig {
    /// Default configuration for the named resource type.
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            ..Self::default()
        }
    }

    pub fn with_location_base(mut self, base: impl Into<String>) -> Self {
        self.location_base = Some(base.into());
        self
    }

    pub fn with_readonly_path(mut self, path: impl Into<String>) -> Self {
        self.readonly_paths.push(path.into());
        self
    }

    /// Parse configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Location reference for a resource, if a base is configured.
    pub fn location_for(&self, id: &impl fmt::Display) -> Option<String> {
        self.location_base
            .as_ref()
            .map(|base| format!("{}/{}", base.trim_end_matches('/'), id))
    }
}
