//! Field values and the per-entity field registry
//!
//! Listing requests name fields as plain strings ("likes", "Title", ...).
//! Instead of reflecting over the entity at runtime, every entity type
//! declares its sortable/searchable fields once in a [`FieldRegistry`],
//! mapping a name to an accessor that extracts a comparable [`FieldValue`].

use crate::core::error::QueryError;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A polymorphic field value that can hold different types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Render the value as text for free-text matching
    ///
    /// `Null` has no textual form and never matches a search.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::String(s) => Some(s.clone()),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::Boolean(b) => Some(b.to_string()),
            FieldValue::Uuid(u) => Some(u.to_string()),
            FieldValue::DateTime(dt) => Some(dt.to_rfc3339()),
            FieldValue::Null => None,
        }
    }

    /// Total order over field values
    ///
    /// `Null` sorts first. Integers and floats compare numerically with each
    /// other. Values of unrelated variants are ordered by variant rank so the
    /// result is always a total order, even for heterogeneous columns.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        use FieldValue::*;

        match (self, other) {
            (String(a), String(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Integer(a), Float(b)) => (*a as f64).total_cmp(b),
            (Float(a), Integer(b)) => a.total_cmp(&(*b as f64)),
            (Boolean(a), Boolean(b)) => a.cmp(b),
            (Uuid(a), Uuid(b)) => a.cmp(b),
            (DateTime(a), DateTime(b)) => a.cmp(b),
            (Null, Null) => Ordering::Equal,
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Boolean(_) => 1,
            FieldValue::Integer(_) | FieldValue::Float(_) => 2,
            FieldValue::String(_) => 3,
            FieldValue::Uuid(_) => 4,
            FieldValue::DateTime(_) => 5,
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<usize> for FieldValue {
    fn from(value: usize) -> Self {
        FieldValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        FieldValue::Uuid(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// Extracts one field of an entity as a comparable value
pub type FieldAccessor<E> = Arc<dyn Fn(&E) -> FieldValue + Send + Sync>;

/// Named field accessors for one entity type
///
/// Built once per entity type (usually through `impl_entity!`) and shared
/// behind an `Arc`. Lookups try the exact name first and then fall back to
/// an ASCII case-insensitive match, so a grid column called `"title"`
/// resolves a field declared as `"Title"` and vice versa.
pub struct FieldRegistry<E> {
    entity: String,
    fields: IndexMap<String, FieldAccessor<E>>,
}

impl<E> FieldRegistry<E> {
    /// Create an empty registry for the named entity
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            fields: IndexMap::new(),
        }
    }

    /// Register a field (builder style)
    pub fn with_field<F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&E) -> FieldValue + Send + Sync + 'static,
    {
        self.register(name, accessor);
        self
    }

    /// Register a field, replacing any accessor previously bound to `name`
    pub fn register<F>(&mut self, name: impl Into<String>, accessor: F)
    where
        F: Fn(&E) -> FieldValue + Send + Sync + 'static,
    {
        self.fields.insert(name.into(), Arc::new(accessor));
    }

    /// Name of the entity this registry describes
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Declared field names, in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check whether `name` resolves to a declared field
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Resolve a field name to its declared spelling and accessor
    pub fn resolve(&self, name: &str) -> Result<(&str, &FieldAccessor<E>), QueryError> {
        self.lookup(name)
            .map(|(key, accessor)| (key.as_str(), accessor))
            .ok_or_else(|| QueryError::UnknownField {
                entity: self.entity.clone(),
                field: name.to_string(),
            })
    }

    /// Read a single field of an entity
    pub fn value(&self, entity: &E, name: &str) -> Result<FieldValue, QueryError> {
        let (_, accessor) = self.resolve(name)?;
        Ok(accessor(entity))
    }

    fn lookup(&self, name: &str) -> Option<(&String, &FieldAccessor<E>)> {
        self.fields.get_key_value(name).or_else(|| {
            self.fields
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
        })
    }
}

impl<E> Clone for FieldRegistry<E> {
    fn clone(&self) -> Self {
        Self {
            entity: self.entity.clone(),
            fields: self.fields.clone(),
        }
    }
}

impl<E> fmt::Debug for FieldRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("entity", &self.entity)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Post {
        title: String,
        likes: i64,
        rating: Option<f64>,
    }

    fn registry() -> FieldRegistry<Post> {
        FieldRegistry::new("post")
            .with_field("Title", |p: &Post| p.title.clone().into())
            .with_field("likes", |p: &Post| p.likes.into())
            .with_field("rating", |p: &Post| p.rating.into())
    }

    #[test]
    fn test_field_value_accessors() {
        let value = FieldValue::String("test".to_string());
        assert_eq!(value.as_string(), Some("test"));
        assert_eq!(value.as_integer(), None);
        assert!(!value.is_null());

        assert_eq!(FieldValue::Integer(42).as_integer(), Some(42));
        assert!(FieldValue::Null.is_null());
    }

    #[test]
    fn test_compare_same_variant() {
        assert_eq!(
            FieldValue::from(1).compare(&FieldValue::from(2)),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::from("b").compare(&FieldValue::from("a")),
            Ordering::Greater
        );
        assert_eq!(
            FieldValue::from(false).compare(&FieldValue::from(true)),
            Ordering::Less
        );
    }

    #[test]
    fn test_compare_mixed_numbers() {
        assert_eq!(
            FieldValue::Integer(2).compare(&FieldValue::Float(2.5)),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::Float(3.0).compare(&FieldValue::Integer(3)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_null_sorts_first() {
        assert_eq!(
            FieldValue::Null.compare(&FieldValue::Integer(i64::MIN)),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::from("").compare(&FieldValue::Null),
            Ordering::Greater
        );
        assert_eq!(FieldValue::Null.compare(&FieldValue::Null), Ordering::Equal);
    }

    #[test]
    fn test_as_text() {
        assert_eq!(FieldValue::from(7).as_text().as_deref(), Some("7"));
        assert_eq!(FieldValue::from(true).as_text().as_deref(), Some("true"));
        assert_eq!(FieldValue::Null.as_text(), None);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(FieldValue::from(None::<i64>), FieldValue::Null);
        assert_eq!(FieldValue::from(Some(1.5)), FieldValue::Float(1.5));
    }

    #[test]
    fn test_registry_exact_and_case_insensitive_lookup() {
        let registry = registry();
        let post = Post {
            title: "Hello".to_string(),
            likes: 3,
            rating: None,
        };

        let (name, _) = registry.resolve("title").expect("case-insensitive match");
        assert_eq!(name, "Title");
        assert_eq!(
            registry.value(&post, "LIKES").expect("field exists"),
            FieldValue::Integer(3)
        );
        assert_eq!(
            registry.value(&post, "rating").expect("field exists"),
            FieldValue::Null
        );
    }

    #[test]
    fn test_registry_unknown_field() {
        let registry = registry();
        let err = registry.resolve("Zzz").err().expect("should fail");
        assert_eq!(
            err,
            QueryError::UnknownField {
                entity: "post".to_string(),
                field: "Zzz".to_string(),
            }
        );
        assert!(!registry.contains("Zzz"));
    }

    #[test]
    fn test_registry_preserves_declaration_order() {
        let binding = registry();
        let names: Vec<&str> = binding.field_names().collect();
        assert_eq!(names, vec!["Title", "likes", "rating"]);
    }
}
