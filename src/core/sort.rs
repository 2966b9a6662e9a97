//! Sort directions and sort criteria

use crate::core::error::QueryError;
use crate::core::field::{FieldAccessor, FieldRegistry, FieldValue};
use crate::core::orderer::{DynamicFieldOrderer, OrderedSequence, ResolvedKey};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// Parse a request-supplied direction
    ///
    /// `"desc"` in any letter case is descending. Anything else, including
    /// garbage and the empty string, is ascending.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    /// Orient an ascending comparison result in this direction
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a criterion sorts by
pub enum SortKey<E> {
    /// A field declared in the entity's registry, resolved when applied
    Field(String),

    /// A caller-supplied key function, for orderings no single field expresses
    Custom {
        name: String,
        accessor: FieldAccessor<E>,
    },
}

impl<E> Clone for SortKey<E> {
    fn clone(&self) -> Self {
        match self {
            SortKey::Field(name) => SortKey::Field(name.clone()),
            SortKey::Custom { name, accessor } => SortKey::Custom {
                name: name.clone(),
                accessor: Arc::clone(accessor),
            },
        }
    }
}

/// One ordering instruction: a key plus a direction
///
/// The first criterion of a query is applied as the primary key, every
/// following one as a stable tie-breaker (see [`SortCriterion::apply`]).
pub struct SortCriterion<E> {
    pub key: SortKey<E>,
    pub direction: SortDirection,
}

impl<E> SortCriterion<E> {
    /// Sort by a named field
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: SortKey::Field(field.into()),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Descending)
    }

    /// Sort by a computed key
    ///
    /// ```rust,ignore
    /// let by_title_len = SortCriterion::by_key("title_len", |p: &Post| p.title.len().into(), SortDirection::Descending);
    /// ```
    pub fn by_key<F>(name: impl Into<String>, accessor: F, direction: SortDirection) -> Self
    where
        F: Fn(&E) -> FieldValue + Send + Sync + 'static,
    {
        Self {
            key: SortKey::Custom {
                name: name.into(),
                accessor: Arc::new(accessor),
            },
            direction,
        }
    }

    /// Name of the key, as given by the caller
    pub fn name(&self) -> &str {
        match &self.key {
            SortKey::Field(name) => name,
            SortKey::Custom { name, .. } => name,
        }
    }

    /// Bind this criterion to an accessor, failing on undeclared fields
    pub fn resolve(&self, registry: &FieldRegistry<E>) -> Result<ResolvedKey<E>, QueryError> {
        match &self.key {
            SortKey::Field(field) => {
                let (name, accessor) = registry.resolve(field)?;
                Ok(ResolvedKey::new(name, Arc::clone(accessor), self.direction))
            }
            SortKey::Custom { name, accessor } => Ok(ResolvedKey::new(
                name.clone(),
                Arc::clone(accessor),
                self.direction,
            )),
        }
    }

    /// Order a sequence by this criterion
    ///
    /// `chained = false` starts a fresh ordering. `chained = true` adds this
    /// key after the keys already applied to `sequence`; elements those keys
    /// consider equal are reordered by this key only, everything else keeps
    /// its position relative to other groups.
    pub fn apply(
        &self,
        sequence: OrderedSequence<E>,
        registry: &FieldRegistry<E>,
        chained: bool,
    ) -> Result<OrderedSequence<E>, QueryError> {
        let key = self.resolve(registry)?;
        Ok(DynamicFieldOrderer::order_by_key(sequence, key, !chained))
    }
}

impl<E> Clone for SortCriterion<E> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            direction: self.direction,
        }
    }
}

impl<E> fmt::Debug for SortCriterion<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortCriterion")
            .field("key", &self.name())
            .field("direction", &self.direction)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Comment {
        author: &'static str,
        likes: i64,
    }

    fn registry() -> FieldRegistry<Comment> {
        FieldRegistry::new("comment")
            .with_field("author", |c: &Comment| c.author.into())
            .with_field("likes", |c: &Comment| c.likes.into())
    }

    fn comments() -> Vec<Comment> {
        vec![
            Comment { author: "bob", likes: 1 },
            Comment { author: "amy", likes: 5 },
            Comment { author: "bob", likes: 3 },
            Comment { author: "amy", likes: 2 },
        ]
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!(SortDirection::parse("desc"), SortDirection::Descending);
        assert_eq!(SortDirection::parse("DESC"), SortDirection::Descending);
        assert_eq!(SortDirection::parse("Desc"), SortDirection::Descending);
        assert_eq!(SortDirection::parse("asc"), SortDirection::Ascending);
        assert_eq!(SortDirection::parse("sideways"), SortDirection::Ascending);
        assert_eq!(SortDirection::parse(""), SortDirection::Ascending);
    }

    #[test]
    fn test_direction_serde() {
        let json = serde_json::to_string(&SortDirection::Descending).expect("serialize");
        assert_eq!(json, "\"desc\"");
        let parsed: SortDirection = serde_json::from_str("\"asc\"").expect("deserialize");
        assert_eq!(parsed, SortDirection::Ascending);
    }

    #[test]
    fn test_primary_then_chained() {
        let registry = registry();
        let sequence = OrderedSequence::from(comments());

        let sequence = SortCriterion::asc("author")
            .apply(sequence, &registry, false)
            .expect("author is declared");
        let sequence = SortCriterion::desc("likes")
            .apply(sequence, &registry, true)
            .expect("likes is declared");

        let ordered: Vec<(&str, i64)> = sequence
            .into_vec()
            .into_iter()
            .map(|c| (c.author, c.likes))
            .collect();
        assert_eq!(
            ordered,
            vec![("amy", 5), ("amy", 2), ("bob", 3), ("bob", 1)]
        );
    }

    #[test]
    fn test_custom_key() {
        let registry = registry();
        let criterion = SortCriterion::by_key(
            "likes_mod_3",
            |c: &Comment| (c.likes % 3).into(),
            SortDirection::Ascending,
        );
        assert_eq!(criterion.name(), "likes_mod_3");

        let ordered = criterion
            .apply(OrderedSequence::from(comments()), &registry, false)
            .expect("custom keys always resolve")
            .into_vec();
        let likes: Vec<i64> = ordered.iter().map(|c| c.likes).collect();
        assert_eq!(likes, vec![3, 1, 5, 2]);
    }

    #[test]
    fn test_unknown_field_fails() {
        let err = SortCriterion::<Comment>::asc("Zzz")
            .apply(OrderedSequence::from(comments()), &registry(), false)
            .err()
            .expect("unknown field must fail");
        assert!(matches!(err, QueryError::UnknownField { .. }));
    }
}
