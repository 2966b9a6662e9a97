//! The canonical, store-agnostic listing plan

use crate::core::error::QueryError;
use crate::core::field::FieldRegistry;
use crate::core::orderer::OrderedSequence;
use crate::core::sort::SortCriterion;
use std::fmt;
use std::sync::Arc;

/// A predicate an entity must satisfy to be listed
pub type Filter<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Filters, sort criteria and paging counts for one listing request
///
/// A query only describes intent. Executing it is the job of a storage
/// collaborator (see [`Repository::search`](crate::core::service::Repository::search)):
/// apply every filter (AND), apply the sort criteria in order, slice
/// `[skip, skip + take)`, and wrap the slice with the pre-slice count.
///
/// # Example
/// ```rust,ignore
/// let query = SearchQuery::<Post>::new()
///     .with_filter(|p| p.published)
///     .with_sort(SortCriterion::desc("likes"))
///     .with_sort(SortCriterion::asc("title"))
///     .with_paging(20, Some(10));
/// let page = repository.search(query).await?;
/// ```
pub struct SearchQuery<E> {
    /// Predicates, logically ANDed
    pub filters: Vec<Filter<E>>,

    /// Sort criteria, primary first
    pub sort_criteria: Vec<SortCriterion<E>>,

    /// Related data to fetch alongside the entities (opaque to the engine)
    pub include_properties: Option<String>,

    /// Rows to discard from the front of the ordered result
    pub skip: usize,

    /// Maximum rows to return; `None` returns everything after `skip`
    pub take: Option<usize>,
}

impl<E> SearchQuery<E> {
    /// Create an empty query: no filters, no ordering, no paging
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            sort_criteria: Vec::new(),
            include_properties: None,
            skip: 0,
            take: None,
        }
    }

    /// Append a filter
    pub fn add_filter<F>(&mut self, predicate: F)
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.filters.push(Arc::new(predicate));
    }

    /// Append a sort criterion; the first one added is the primary key
    pub fn add_sort_criteria(&mut self, criterion: SortCriterion<E>) {
        self.sort_criteria.push(criterion);
    }

    pub fn with_filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.add_filter(predicate);
        self
    }

    pub fn with_sort(mut self, criterion: SortCriterion<E>) -> Self {
        self.add_sort_criteria(criterion);
        self
    }

    pub fn with_include(mut self, include_properties: impl Into<String>) -> Self {
        self.include_properties = Some(include_properties.into());
        self
    }

    pub fn with_paging(mut self, skip: usize, take: Option<usize>) -> Self {
        self.skip = skip;
        self.take = take;
        self
    }

    /// Check whether an entity passes every filter
    pub fn matches(&self, entity: &E) -> bool {
        self.filters.iter().all(|filter| filter(entity))
    }

    /// Resolve every field-based sort criterion against the registry
    ///
    /// Run this before touching data so an unknown field fails the request
    /// up front.
    pub fn validate(&self, registry: &FieldRegistry<E>) -> Result<(), QueryError> {
        for criterion in &self.sort_criteria {
            criterion.resolve(registry)?;
        }
        Ok(())
    }

    /// Apply the sort criteria to already filtered candidates
    ///
    /// The first criterion is applied as the primary key, the rest are
    /// chained. Without criteria the candidates keep their order.
    pub fn order(
        &self,
        candidates: Vec<E>,
        registry: &FieldRegistry<E>,
    ) -> Result<Vec<E>, QueryError> {
        let mut sequence = OrderedSequence::new(candidates);
        for (index, criterion) in self.sort_criteria.iter().enumerate() {
            sequence = criterion.apply(sequence, registry, index > 0)?;
        }
        Ok(sequence.into_vec())
    }
}

impl<E> Default for SearchQuery<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for SearchQuery<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchQuery")
            .field("filters", &self.filters.len())
            .field("sort_criteria", &self.sort_criteria)
            .field("include_properties", &self.include_properties)
            .field("skip", &self.skip)
            .field("take", &self.take)
            .finish()
    }
}
