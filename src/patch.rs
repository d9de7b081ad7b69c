//! Partial-update (PATCH) documents and typed application.
//!
//! A [`PatchDocument`] is an ordered list of field-level operations. It is
//! applied to a fresh, empty payload whose fields are [`Field`]s, producing a
//! sparse payload that records only what the caller touched. Each payload
//! type merges operations explicitly through [`Patchable`], so every field's
//! behaviour is visible in code rather than discovered by reflection.
//!
//! # Supported operations
//!
//! - `add` (alias `set`): set the field at `path`
//! - `replace`: set the field at `path`
//! - `remove`: clear the field at `path`
//!
//! Operation names are case-insensitive. `add` and `replace` without a path
//! take an object value and apply one operation per member. Paths may be
//! written as `name`, `/name` or `name.given` / `/name/given`.
//!
//! # Usage
//!
//! ```rust
//! use resource_dispatch::patch::{Field, PatchDocument, PatchOperation, Patchable};
//! use resource_dispatch::PatchError;
//! use serde_json::json;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct WidgetPatch {
//!     name: Field<String>,
//!     color: Field<String>,
//! }
//!
//! impl Patchable for WidgetPatch {
//!     fn apply_operation(&mut self, operation: &PatchOperation) -> Result<(), PatchError> {
//!         if operation.targets("name") {
//!             self.name = Field::from_operation(operation)?;
//!         } else if operation.targets("color") {
//!             self.color = Field::from_operation(operation)?;
//!         } else {
//!             return Err(operation.unknown_path());
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let document = PatchDocument::from_value(&json!([
//!     {"op": "replace", "path": "/name", "value": "gear"},
//!     {"op": "remove", "path": "color"}
//! ]))?;
//! let payload: WidgetPatch = document.materialize(&[])?;
//! assert_eq!(payload.name, Field::Set("gear".to_string()));
//! assert_eq!(payload.color, Field::Cleared);
//! # Ok::<(), PatchError>(())
//! ```

use crate::error::PatchError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A single patch operation name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
}

impl FromStr for PatchOp {
    type Err = PatchError;

    fn from_str(op: &str) -> Result<Self, Self::Err> {
        match op.to_lowercase().as_str() {
            "add" | "set" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            "replace" => Ok(Self::Replace),
            _ => Err(PatchError::UnsupportedOperation { op: op.to_string() }),
        }
    }
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Replace => "replace",
        })
    }
}

/// One field-level operation.
///
/// Paths are stored normalized: no leading slash, segments joined by `.`.
/// An empty path is only meaningful for `add`/`replace` with an object value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct PatchOperation {
    op: PatchOp,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
}

impl PatchOperation {
    pub fn new(op: PatchOp, path: impl AsRef<str>, value: Option<Value>) -> Self {
        Self {
            op,
            path: normalize_path(path.as_ref()),
            value,
        }
    }

    pub fn add(path: impl AsRef<str>, value: Value) -> Self {
        Self::new(PatchOp::Add, path, Some(value))
    }

    pub fn replace(path: impl AsRef<str>, value: Value) -> Self {
        Self::new(PatchOp::Replace, path, Some(value))
    }

    pub fn remove(path: impl AsRef<str>) -> Self {
        Self::new(PatchOp::Remove, path, None)
    }

    /// Parse one operation object (`{"op": .., "path": .., "value": ..}`).
    pub fn from_value(operation: &Value) -> Result<Self, PatchError> {
        let op = operation
            .get("op")
            .and_then(|v| v.as_str())
            .ok_or(PatchError::MalformedOperation { member: "op" })?
            .parse::<PatchOp>()?;

        let path = match operation.get("path") {
            None | Some(Value::Null) => "",
            Some(Value::String(path)) => path.as_str(),
            Some(_) => return Err(PatchError::MalformedOperation { member: "path" }),
        };

        Ok(Self::new(op, path, operation.get("value").cloned()))
    }

    pub fn op(&self) -> PatchOp {
        self.op
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Returns true if this operation addresses `field` (case-insensitive).
    pub fn targets(&self, field: &str) -> bool {
        self.path.eq_ignore_ascii_case(field)
    }

    /// Decode the operation's value as `T`.
    pub fn value_as<T: DeserializeOwned>(&self) -> Result<T, PatchError> {
        let value = self.value.as_ref().ok_or_else(|| PatchError::MissingValue {
            op: self.op,
            path: self.path.clone(),
        })?;

        serde_json::from_value(value.clone()).map_err(|e| PatchError::TypeMismatch {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Error for a path the payload does not recognise.
    pub fn unknown_path(&self) -> PatchError {
        PatchError::UnknownPath {
            path: self.path.clone(),
        }
    }

    fn is_readonly(&self, readonly_paths: &[String]) -> bool {
        readonly_paths.iter().any(|readonly| {
            let readonly = normalize_path(readonly);
            self.path.eq_ignore_ascii_case(&readonly)
                || self
                    .path
                    .to_lowercase()
                    .starts_with(&format!("{}.", readonly.to_lowercase()))
        })
    }
}

impl TryFrom<Value> for PatchOperation {
    type Error = PatchError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

/// Payload types that a patch document can be applied to.
pub trait Patchable {
    /// Merge one operation into `self`.
    ///
    /// Called once per operation, in document order, with a non-empty path.
    /// Return [`PatchOperation::unknown_path`] for paths the payload lacks.
    fn apply_operation(&mut self, operation: &PatchOperation) -> Result<(), PatchError>;
}

/// A sparse payload field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Field<T> {
    /// Not mentioned by the patch document
    #[default]
    Unset,
    /// Removed by the patch document
    Cleared,
    /// Set by the patch document
    Set(T),
}

impl<T: DeserializeOwned> Field<T> {
    /// Build the field state an operation describes.
    pub fn from_operation(operation: &PatchOperation) -> Result<Self, PatchError> {
        match operation.op() {
            PatchOp::Remove => Ok(Self::Cleared),
            PatchOp::Add | PatchOp::Replace => Ok(Self::Set(operation.value_as()?)),
        }
    }
}

impl<T> Field<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            _ => None,
        }
    }

    /// `None` if untouched, `Some(None)` if cleared, `Some(Some(v))` if set.
    pub fn into_option(self) -> Option<Option<T>> {
        match self {
            Self::Unset => None,
            Self::Cleared => Some(None),
            Self::Set(value) => Some(Some(value)),
        }
    }

    /// Merge into an optional entity field.
    pub fn apply_to(self, target: &mut Option<T>) {
        if let Some(value) = self.into_option() {
            *target = value;
        }
    }
}

/// An ordered list of patch operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct PatchDocument {
    operations: Vec<PatchOperation>,
}

impl PatchDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operation(mut self, operation: PatchOperation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn push(&mut self, operation: PatchOperation) {
        self.operations.push(operation);
    }

    pub fn operations(&self) -> &[PatchOperation] {
        &self.operations
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Parse a document: either an array of operations or an object with an
    /// `Operations` array (the SCIM PatchOp message shape).
    pub fn from_value(document: &Value) -> Result<Self, PatchError> {
        let operations = match document {
            Value::Array(operations) => operations,
            Value::Object(fields) => fields
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case("operations"))
                .and_then(|(_, operations)| operations.as_array())
                .ok_or_else(|| PatchError::MalformedDocument {
                    message: "expected an 'Operations' array".to_string(),
                })?,
            _ => {
                return Err(PatchError::MalformedDocument {
                    message: "expected an array of operations".to_string(),
                });
            }
        };

        operations
            .iter()
            .map(PatchOperation::from_value)
            .collect::<Result<Vec<_>, _>>()
            .map(|operations| Self { operations })
    }

    /// Apply every operation to `target`, in order.
    ///
    /// Stops at the first failing operation; `target` may then hold the
    /// effects of the operations before it.
    pub fn apply_to<P: Patchable>(
        &self,
        target: &mut P,
        readonly_paths: &[String],
    ) -> Result<(), PatchError> {
        for operation in &self.operations {
            apply_one(operation, target, readonly_paths)?;
        }
        Ok(())
    }

    /// Apply the document to a fresh `P::default()`.
    pub fn materialize<P: Patchable + Default>(
        &self,
        readonly_paths: &[String],
    ) -> Result<P, PatchError> {
        let mut payload = P::default();
        self.apply_to(&mut payload, readonly_paths)?;
        Ok(payload)
    }
}

impl From<Vec<PatchOperation>> for PatchDocument {
    fn from(operations: Vec<PatchOperation>) -> Self {
        Self { operations }
    }
}

impl FromIterator<PatchOperation> for PatchDocument {
    fn from_iter<I: IntoIterator<Item = PatchOperation>>(iter: I) -> Self {
        Self {
            operations: iter.into_iter().collect(),
        }
    }
}

impl TryFrom<Value> for PatchDocument {
    type Error = PatchError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

fn apply_one<P: Patchable>(
    operation: &PatchOperation,
    target: &mut P,
    readonly_paths: &[String],
) -> Result<(), PatchError> {
    if operation.path.is_empty() {
        return apply_without_path(operation, target, readonly_paths);
    }

    if !is_valid_path(&operation.path) {
        return Err(PatchError::InvalidPath {
            path: operation.path.clone(),
        });
    }

    if operation.is_readonly(readonly_paths) {
        return Err(PatchError::ReadOnly {
            path: operation.path.clone(),
        });
    }

    target.apply_operation(operation)
}

// No path means the value's members are applied to the root one by one.
fn apply_without_path<P: Patchable>(
    operation: &PatchOperation,
    target: &mut P,
    readonly_paths: &[String],
) -> Result<(), PatchError> {
    if operation.op == PatchOp::Remove {
        return Err(PatchError::MalformedOperation { member: "path" });
    }

    let members = match &operation.value {
        Some(Value::Object(members)) => members,
        Some(_) => {
            return Err(PatchError::TypeMismatch {
                path: String::new(),
                message: "operation without a path requires an object value".to_string(),
            });
        }
        None => {
            return Err(PatchError::MissingValue {
                op: operation.op,
                path: String::new(),
            });
        }
    };

    for (name, value) in members {
        let member = PatchOperation::new(operation.op, name, Some(value.clone()));
        if member.path.is_empty() {
            return Err(PatchError::InvalidPath { path: name.clone() });
        }
        apply_one(&member, target, readonly_paths)?;
    }
    Ok(())
}

fn normalize_path(path: &str) -> String {
    path.trim().trim_start_matches('/').replace('/', ".")
}

fn is_valid_path(path: &str) -> bool {
    path.split('.').all(|segment| {
        !segment.is_empty() && segment.chars().all(|c| c.is_alphanumeric() || c == '_')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq)]
    struct ProfilePatch {
        display_name: Field<String>,
        age: Field<u32>,
        city: Field<String>,
    }

    impl Patchable for ProfilePatch {
        fn apply_operation(&mut self, operation: &PatchOperation) -> Result<(), PatchError> {
            if operation.targets("displayName") {
                self.display_name = Field::from_operation(operation)?;
            } else if operation.targets("age") {
                self.age = Field::from_operation(operation)?;
            } else if operation.targets("address.city") {
                self.city = Field::from_operation(operation)?;
            } else {
                return Err(operation.unknown_path());
            }
            Ok(())
        }
    }

    fn readonly() -> Vec<String> {
        vec!["id".to_string(), "meta".to_string()]
    }

    #[test]
    fn test_op_parsing_is_case_insensitive() {
        assert_eq!("ADD".parse::<PatchOp>().unwrap(), PatchOp::Add);
        assert_eq!("set".parse::<PatchOp>().unwrap(), PatchOp::Add);
        assert_eq!("Replace".parse::<PatchOp>().unwrap(), PatchOp::Replace);
        assert_eq!("remove".parse::<PatchOp>().unwrap(), PatchOp::Remove);
        assert_eq!(
            "move".parse::<PatchOp>(),
            Err(PatchError::UnsupportedOperation {
                op: "move".to_string()
            })
        );
    }

    #[test]
    fn test_paths_are_normalized() {
        assert_eq!(PatchOperation::remove("/address/city").path(), "address.city");
        assert_eq!(PatchOperation::remove("displayName").path(), "displayName");
        assert!(PatchOperation::remove("/DISPLAYNAME").targets("displayName"));
    }

    #[test]
    fn test_apply_in_order() {
        let document = PatchDocument::new()
            .with_operation(PatchOperation::add("displayName", json!("first")))
            .with_operation(PatchOperation::replace("/displayName", json!("second")))
            .with_operation(PatchOperation::remove("age"));

        let payload: ProfilePatch = document.materialize(&readonly()).unwrap();
        assert_eq!(payload.display_name, Field::Set("second".to_string()));
        assert_eq!(payload.age, Field::Cleared);
        assert!(payload.city.is_unset());
    }

    #[test]
    fn test_nested_path() {
        let document = PatchDocument::from(vec![PatchOperation::add(
            "/address/city",
            json!("Wellington"),
        )]);
        let payload: ProfilePatch = document.materialize(&[]).unwrap();
        assert_eq!(payload.city.as_set().map(String::as_str), Some("Wellington"));
    }

    #[test]
    fn test_empty_document_leaves_fresh_payload() {
        let payload: ProfilePatch = PatchDocument::new().materialize(&readonly()).unwrap();
        assert_eq!(payload, ProfilePatch::default());
    }

    #[test]
    fn test_type_mismatch_fails() {
        let document = PatchDocument::new()
            .with_operation(PatchOperation::replace("age", json!("forty")));
        let result: Result<ProfilePatch, _> = document.materialize(&[]);
        assert!(matches!(result, Err(PatchError::TypeMismatch { path, .. }) if path == "age"));
    }

    #[test]
    fn test_missing_value_fails() {
        let document = PatchDocument::from_value(&json!([{"op": "add", "path": "age"}])).unwrap();
        let result: Result<ProfilePatch, _> = document.materialize(&[]);
        assert!(matches!(result, Err(PatchError::MissingValue { op: PatchOp::Add, .. })));
    }

    #[test]
    fn test_unknown_path_fails() {
        let document = PatchDocument::new()
            .with_operation(PatchOperation::replace("nickname", json!("x")));
        let result: Result<ProfilePatch, _> = document.materialize(&[]);
        assert_eq!(
            result,
            Err(PatchError::UnknownPath {
                path: "nickname".to_string()
            })
        );
    }

    #[test]
    fn test_readonly_paths_rejected() {
        for path in ["id", "/ID", "meta.created", "/meta/location"] {
            let document =
                PatchDocument::new().with_operation(PatchOperation::replace(path, json!("x")));
            let result: Result<ProfilePatch, _> = document.materialize(&readonly());
            assert!(
                matches!(result, Err(PatchError::ReadOnly { .. })),
                "{} should be readonly",
                path
            );
        }
    }

    #[test]
    fn test_invalid_path_rejected() {
        let document = PatchDocument::new()
            .with_operation(PatchOperation::replace("emails[type eq \"work\"]", json!("x")));
        let result: Result<ProfilePatch, _> = document.materialize(&[]);
        assert!(matches!(result, Err(PatchError::InvalidPath { .. })));
    }

    #[test]
    fn test_pathless_add_applies_members() {
        let document = PatchDocument::from_value(&json!({
            "schemas": ["urn:ietf:params:scim:api:messages:2.0:PatchOp"],
            "Operations": [{"op": "add", "value": {"displayName": "Kim", "age": 40}}]
        }))
        .unwrap();

        let payload: ProfilePatch = document.materialize(&readonly()).unwrap();
        assert_eq!(payload.display_name, Field::Set("Kim".to_string()));
        assert_eq!(payload.age, Field::Set(40));
    }

    #[test]
    fn test_pathless_remove_rejected() {
        let document = PatchDocument::from_value(&json!([{"op": "remove"}])).unwrap();
        let result: Result<ProfilePatch, _> = document.materialize(&[]);
        assert_eq!(result, Err(PatchError::MalformedOperation { member: "path" }));
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(
            PatchDocument::from_value(&json!("replace")),
            Err(PatchError::MalformedDocument { .. })
        ));
        assert!(matches!(
            PatchDocument::from_value(&json!({"ops": []})),
            Err(PatchError::MalformedDocument { .. })
        ));
        assert_eq!(
            PatchDocument::from_value(&json!([{"path": "age"}])),
            Err(PatchError::MalformedOperation { member: "op" })
        );
        assert_eq!(
            PatchDocument::from_value(&json!([{"op": "add", "path": 3}])),
            Err(PatchError::MalformedOperation { member: "path" })
        );
    }

    #[test]
    fn test_deserialize_document() {
        let document: PatchDocument =
            serde_json::from_value(json!([{"op": "replace", "path": "/age", "value": 7}]))
                .unwrap();
        assert_eq!(document.len(), 1);
        assert_eq!(document.operations()[0].op(), PatchOp::Replace);
        assert_eq!(document.operations()[0].path(), "age");

        let error = serde_json::from_value::<PatchDocument>(json!([{"op": "copy", "path": "a"}]))
            .unwrap_err();
        assert!(error.to_string().contains("Unsupported PATCH operation"));
    }

    #[test]
    fn test_field_apply_to_option() {
        let mut city = Some("Auckland".to_string());
        Field::<String>::Unset.apply_to(&mut city);
        assert_eq!(city.as_deref(), Some("Auckland"));

        Field::Set("Dunedin".to_string()).apply_to(&mut city);
        assert_eq!(city.as_deref(), Some("Dunedin"));

        Field::Cleared.apply_to(&mut city);
        assert!(city.is_none());
    }
}
