//! In-memory implementation of Repository for testing and development

use crate::core::entity::Entity;
use crate::core::error::{FolioResult, StorageError};
use crate::core::field::FieldRegistry;
use crate::core::query::Filter;
use crate::core::service::Repository;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory repository
///
/// Entities are kept in insertion order, which is also the order listings
/// return when a request carries no sort criteria. Uses RwLock for
/// thread-safe access.
pub struct InMemoryRepository<E: Entity> {
    entities: Arc<RwLock<IndexMap<Uuid, E>>>,
    registry: Arc<FieldRegistry<E>>,
}

impl<E: Entity> InMemoryRepository<E> {
    /// Create an empty repository using the entity's own field registry
    pub fn new() -> Self {
        Self::with_registry(Arc::new(E::field_registry()))
    }

    /// Create an empty repository with a custom field registry
    pub fn with_registry(registry: Arc<FieldRegistry<E>>) -> Self {
        Self {
            entities: Arc::new(RwLock::new(IndexMap::new())),
            registry,
        }
    }

    /// Store an entity, replacing any entity with the same id
    pub fn insert(&self, entity: E) -> FolioResult<E> {
        let mut entities = self.entities.write().map_err(|e| StorageError::LockPoisoned {
            message: e.to_string(),
        })?;

        entities.insert(entity.id(), entity.clone());

        Ok(entity)
    }

    /// Store several entities at once
    pub fn extend(&self, items: impl IntoIterator<Item = E>) -> FolioResult<()> {
        let mut entities = self.entities.write().map_err(|e| StorageError::LockPoisoned {
            message: e.to_string(),
        })?;

        entities.extend(items.into_iter().map(|entity| (entity.id(), entity)));

        Ok(())
    }

    pub fn get(&self, id: &Uuid) -> FolioResult<Option<E>> {
        let entities = self.entities.read().map_err(|e| StorageError::LockPoisoned {
            message: e.to_string(),
        })?;

        Ok(entities.get(id).cloned())
    }

    pub fn remove(&self, id: &Uuid) -> FolioResult<Option<E>> {
        let mut entities = self.entities.write().map_err(|e| StorageError::LockPoisoned {
            message: e.to_string(),
        })?;

        Ok(entities.shift_remove(id))
    }
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Clone for InMemoryRepository<E> {
    fn clone(&self) -> Self {
        Self {
            entities: Arc::clone(&self.entities),
            registry: Arc::clone(&self.registry),
        }
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    fn registry(&self) -> Arc<FieldRegistry<E>> {
        Arc::clone(&self.registry)
    }

    async fn fetch_candidates(
        &self,
        filters: &[Filter<E>],
        include_properties: Option<&str>,
    ) -> FolioResult<Vec<E>> {
        if let Some(include) = include_properties {
            tracing::trace!(include, "in-memory entities carry their related data already");
        }

        let entities = self.entities.read().map_err(|e| StorageError::LockPoisoned {
            message: e.to_string(),
        })?;

        Ok(entities
            .values()
            .filter(|entity| filters.iter().all(|filter| filter(entity)))
            .cloned()
            .collect())
    }

    async fn count_all(&self) -> FolioResult<usize> {
        let entities = self.entities.read().map_err(|e| StorageError::LockPoisoned {
            message: e.to_string(),
        })?;

        Ok(entities.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{FolioError, QueryError};
    use crate::core::query::SearchQuery;
    use crate::core::sort::SortCriterion;

    #[derive(Clone, Debug, PartialEq)]
    struct Note {
        id: Uuid,
        title: String,
        likes: i64,
    }

    impl Entity for Note {
        fn resource_name() -> &'static str {
            "notes"
        }

        fn resource_name_singular() -> &'static str {
            "note"
        }

        fn id(&self) -> Uuid {
            self.id
        }

        fn field_registry() -> FieldRegistry<Self> {
            FieldRegistry::new("note")
                .with_field("Title", |n: &Note| n.title.clone().into())
                .with_field("Likes", |n: &Note| n.likes.into())
        }
    }

    fn note(title: &str, likes: i64) -> Note {
        Note {
            id: Uuid::new_v4(),
            title: title.to_string(),
            likes,
        }
    }

    fn seeded(count: i64) -> InMemoryRepository<Note> {
        let repository = InMemoryRepository::new();
        repository
            .extend((0..count).map(|i| note(&format!("note {i}"), i)))
            .expect("lock is healthy");
        repository
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repository = InMemoryRepository::new();
        let created = repository.insert(note("first", 1)).expect("insert");

        let fetched = repository.get(&created.id).expect("get");
        assert_eq!(fetched, Some(created.clone()));
        assert_eq!(repository.count_all().await.expect("count"), 1);

        let removed = repository.remove(&created.id).expect("remove");
        assert_eq!(removed, Some(created));
        assert_eq!(repository.count_all().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn test_fetch_candidates_applies_filters() {
        let repository = seeded(10);
        let even: Filter<Note> = Arc::new(|n: &Note| n.likes % 2 == 0);
        let large: Filter<Note> = Arc::new(|n: &Note| n.likes > 4);

        let candidates = repository
            .fetch_candidates(&[even, large], None)
            .await
            .expect("fetch");
        let likes: Vec<i64> = candidates.iter().map(|n| n.likes).collect();
        assert_eq!(likes, vec![6, 8]);
    }

    #[tokio::test]
    async fn test_unsorted_listing_keeps_insertion_order() {
        let repository = seeded(4);
        let page = repository
            .search(SearchQuery::new())
            .await
            .expect("search");
        let likes: Vec<i64> = page.entities.iter().map(|n| n.likes).collect();
        assert_eq!(likes, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_search_sorts_and_pages() {
        let repository = seeded(10);
        let page = repository
            .search(
                SearchQuery::new()
                    .with_sort(SortCriterion::desc("Likes"))
                    .with_paging(0, Some(5)),
            )
            .await
            .expect("search");

        let likes: Vec<i64> = page.entities.iter().map(|n| n.likes).collect();
        assert_eq!(likes, vec![9, 8, 7, 6, 5]);
        assert_eq!(page.count, 10);
        assert!(page.has_next);
        assert!(!page.has_previous);
    }

    #[tokio::test]
    async fn test_search_unknown_field_fails() {
        let repository = seeded(3);
        let err = repository
            .search(SearchQuery::new().with_sort(SortCriterion::asc("Zzz")))
            .await
            .err()
            .expect("unknown field");
        assert!(matches!(
            err,
            FolioError::Query(QueryError::UnknownField { .. })
        ));
    }

    #[tokio::test]
    async fn test_grid_page_counts_total_and_filtered() {
        let repository = seeded(10);
        let query = SearchQuery::new()
            .with_filter(|n: &Note| n.likes >= 6)
            .with_sort(SortCriterion::asc("Likes"))
            .with_paging(1, Some(2));

        let page = repository.grid_page(4, query).await.expect("grid page");

        assert_eq!(page.draw, 4);
        assert_eq!(page.records_total, 10);
        assert_eq!(page.records_filtered, 4);
        let likes: Vec<i64> = page.data.iter().map(|n| n.likes).collect();
        assert_eq!(likes, vec![7, 8]);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let repository = seeded(2);
        let clone = repository.clone();
        clone.insert(note("shared", 99)).expect("insert");
        assert_eq!(repository.count_all().await.expect("count"), 3);
    }
}
