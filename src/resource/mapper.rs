//! Structural mapping between entity and output shapes.
//!
//! This module provides the trait the handler uses to turn entities into
//! output representations, and a serde-based implementation that maps by
//! field name, optionally renaming fields on the way.

use crate::error::MappingError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

/// Converts a value of shape `S` into shape `T`.
pub trait StructuralMapper<S, T>: Send + Sync {
    fn map(&self, source: &S) -> Result<T, MappingError>;

    fn map_all(&self, sources: &[S]) -> Result<Vec<T>, MappingError> {
        sources.iter().map(|source| self.map(source)).collect()
    }
}

/// Field-based mapper going through `serde_json::Value`.
///
/// Fields present in the target but absent from the source must be optional
/// (or defaulted) on the target; fields present only in the source are
/// dropped unless the target denies unknown fields.
///
/// ```rust
/// use resource_dispatch::resource::mapper::{SerdeMapper, StructuralMapper};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize)]
/// struct Row { id: u32, display_name: String, password_hash: String }
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct View { id: u32, name: String }
///
/// let mapper = SerdeMapper::new().with_rename("display_name", "name");
/// let row = Row { id: 1, display_name: "a".into(), password_hash: "x".into() };
/// let view: View = mapper.map(&row)?;
/// assert_eq!(view, View { id: 1, name: "a".into() });
/// # Ok::<(), resource_dispatch::MappingError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SerdeMapper {
    renames: HashMap<String, String>, // source field -> target field
}

impl SerdeMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map the top-level source field `from` onto target field `to`.
    pub fn with_rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.insert(from.into(), to.into());
        self
    }

    fn rename_fields(&self, value: Value) -> Value {
        if self.renames.is_empty() {
            return value;
        }

        match value {
            Value::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(name, field)| match self.renames.get(&name) {
                        Some(renamed) => (renamed.clone(), field),
                        None => (name, field),
                    })
                    .collect(),
            ),
            other => other,
        }
    }
}

impl<S, T> StructuralMapper<S, T> for SerdeMapper
where
    S: Serialize,
    T: DeserializeOwned,
{
    fn map(&self, source: &S) -> Result<T, MappingError> {
        let value = serde_json::to_value(source).map_err(MappingError::Serialize)?;
        serde_json::from_value(self.rename_fields(value)).map_err(MappingError::Incompatible)
    }
}

/// Mapper backed by a fallible function or closure.
///
/// The closure rejects a source by returning an error, typically
/// [`MappingError::custom`].
pub struct FnMapper<F>(pub F);

impl<S, T, F> StructuralMapper<S, T> for FnMapper<F>
where
    F: Fn(&S) -> Result<T, MappingError> + Send + Sync,
{
    fn map(&self, source: &S) -> Result<T, MappingError> {
        (self.0)(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize)]
    struct Account {
        id: u64,
        email: String,
        balance_cents: i64,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct AccountView {
        id: u64,
        email: String,
        nickname: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct NeedsOwner {
        id: u64,
        owner: String,
    }

    fn account(id: u64) -> Account {
        Account {
            id,
            email: format!("user{}@example.com", id),
            balance_cents: 100,
        }
    }

    #[test]
    fn test_maps_shared_fields() {
        let view: AccountView = SerdeMapper::new().map(&account(3)).unwrap();
        assert_eq!(
            view,
            AccountView {
                id: 3,
                email: "user3@example.com".to_string(),
                nickname: None,
            }
        );
    }

    #[test]
    fn test_rename_fills_target_field() {
        let mapper = SerdeMapper::new().with_rename("email", "nickname");
        let result: Result<AccountView, _> = mapper.map(&account(3));
        // email was moved, so the required target field is now missing
        assert!(matches!(result, Err(MappingError::Incompatible(_))));
    }

    #[test]
    fn test_incompatible_shape() {
        let result: Result<NeedsOwner, _> = SerdeMapper::new().map(&account(1));
        assert!(matches!(result, Err(MappingError::Incompatible(_))));
    }

    #[test]
    fn test_map_all_preserves_order() {
        let views: Vec<AccountView> = SerdeMapper::new()
            .map_all(&[account(1), account(2), account(3)])
            .unwrap();
        let ids: Vec<u64> = views.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_fn_mapper() {
        let mapper = FnMapper(|a: &Account| Ok(a.id * 10));
        assert_eq!(
            StructuralMapper::<Account, u64>::map(&mapper, &account(4)).unwrap(),
            40
        );
    }

    #[test]
    fn test_fn_mapper_rejects_source() {
        let mapper = FnMapper(|a: &Account| {
            if a.balance_cents < 0 {
                Err(MappingError::custom("account is overdrawn"))
            } else {
                Ok(a.id)
            }
        });

        let mut overdrawn = account(5);
        overdrawn.balance_cents = -1;
        let result: Result<Vec<u64>, _> = mapper.map_all(&[account(4), overdrawn]);

        let err = result.unwrap_err();
        assert!(matches!(err, MappingError::Custom { .. }));
        assert_eq!(err.to_string(), "Mapping failed: account is overdrawn");
    }
}
