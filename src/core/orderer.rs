//! Runtime field-name-driven ordering
//!
//! [`DynamicFieldOrderer`] orders a sequence of entities by a field whose
//! name is only known once the request arrives. Field names are resolved
//! through the entity's [`FieldRegistry`]; an undeclared name is rejected
//! before a single element is compared.
//!
//! Ordering is cumulative. An [`OrderedSequence`] remembers the keys it was
//! ordered by, so a secondary key can break ties without disturbing the
//! groups formed by earlier keys, giving lexicographic `(k1, k2, ...)`
//! ordering with input order preserved for complete ties.

use crate::core::error::QueryError;
use crate::core::field::{FieldAccessor, FieldRegistry, FieldValue};
use crate::core::sort::SortDirection;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A sort key bound to its accessor
pub struct ResolvedKey<E> {
    name: String,
    accessor: FieldAccessor<E>,
    direction: SortDirection,
}

impl<E> ResolvedKey<E> {
    pub fn new(
        name: impl Into<String>,
        accessor: FieldAccessor<E>,
        direction: SortDirection,
    ) -> Self {
        Self {
            name: name.into(),
            accessor,
            direction,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}

impl<E> Clone for ResolvedKey<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            accessor: Arc::clone(&self.accessor),
            direction: self.direction,
        }
    }
}

impl<E> fmt::Debug for ResolvedKey<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedKey")
            .field("name", &self.name)
            .field("direction", &self.direction)
            .finish()
    }
}

/// A sequence together with the keys it is currently ordered by
pub struct OrderedSequence<E> {
    items: Vec<E>,
    keys: Vec<ResolvedKey<E>>,
}

impl<E> OrderedSequence<E> {
    /// Wrap a sequence that has not been ordered yet
    pub fn new(items: Vec<E>) -> Self {
        Self {
            items,
            keys: Vec::new(),
        }
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<E> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Keys applied so far, primary first
    pub fn keys(&self) -> &[ResolvedKey<E>] {
        &self.keys
    }
}

impl<E> From<Vec<E>> for OrderedSequence<E> {
    fn from(items: Vec<E>) -> Self {
        Self::new(items)
    }
}

impl<E: fmt::Debug> fmt::Debug for OrderedSequence<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedSequence")
            .field("items", &self.items)
            .field("keys", &self.keys)
            .finish()
    }
}

/// Orders entity sequences by request-supplied field names
pub struct DynamicFieldOrderer;

impl DynamicFieldOrderer {
    /// Order `sequence` by `field_name`
    ///
    /// With `is_primary` the previous ordering is discarded and `field_name`
    /// becomes the only key. Otherwise it is appended as the next tie-breaker.
    ///
    /// # Errors
    ///
    /// [`QueryError::UnknownField`] when the registry does not declare
    /// `field_name`. The sequence is not touched in that case.
    pub fn order<E>(
        sequence: OrderedSequence<E>,
        registry: &FieldRegistry<E>,
        field_name: &str,
        direction: SortDirection,
        is_primary: bool,
    ) -> Result<OrderedSequence<E>, QueryError> {
        let (name, accessor) = registry.resolve(field_name)?;
        let key = ResolvedKey::new(name, Arc::clone(accessor), direction);
        Ok(Self::order_by_key(sequence, key, is_primary))
    }

    /// Same as [`order`](Self::order), with the direction given as request text
    ///
    /// `"desc"` in any case is descending, anything else ascending.
    pub fn order_by_str<E>(
        sequence: OrderedSequence<E>,
        registry: &FieldRegistry<E>,
        field_name: &str,
        direction: &str,
        is_primary: bool,
    ) -> Result<OrderedSequence<E>, QueryError> {
        Self::order(
            sequence,
            registry,
            field_name,
            SortDirection::parse(direction),
            is_primary,
        )
    }

    /// Order by an already resolved key
    pub fn order_by_key<E>(
        sequence: OrderedSequence<E>,
        key: ResolvedKey<E>,
        is_primary: bool,
    ) -> OrderedSequence<E> {
        tracing::trace!(
            field = %key.name,
            direction = %key.direction,
            primary = is_primary,
            len = sequence.items.len(),
            "ordering sequence"
        );

        let OrderedSequence { items, mut keys } = sequence;
        if is_primary {
            keys.clear();
        }
        keys.push(key);

        // One extracted value per key per element.
        let mut decorated: Vec<(Vec<FieldValue>, E)> = items
            .into_iter()
            .map(|item| {
                let values = keys.iter().map(|k| (k.accessor)(&item)).collect();
                (values, item)
            })
            .collect();

        // `sort_by` is stable: complete ties keep their input order.
        decorated.sort_by(|(a, _), (b, _)| compare_keys(&keys, a, b));

        OrderedSequence {
            items: decorated.into_iter().map(|(_, item)| item).collect(),
            keys,
        }
    }
}

fn compare_keys<E>(keys: &[ResolvedKey<E>], a: &[FieldValue], b: &[FieldValue]) -> Ordering {
    keys.iter()
        .zip(a.iter().zip(b.iter()))
        .map(|(key, (left, right))| key.direction.apply(left.compare(right)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
