//! HTTP handlers for entity listings

use crate::config::ListingDefaults;
use crate::core::entity::Entity;
use crate::core::error::FolioError;
use crate::core::field::FieldRegistry;
use crate::core::grid::GridFilter;
use crate::core::paged::{GridPage, PagedResult};
use crate::core::query::SearchQuery;
use crate::core::service::Repository;
use crate::core::sort_filter::SortFilter;
use axum::{
    Json,
    extract::{Query, State},
};
use serde::Serialize;
use std::sync::Arc;

/// Shared state for the listing routes of one entity type
pub struct ListingState<E: Entity> {
    pub repository: Arc<dyn Repository<E>>,

    /// Configured defaults for this entity, if any
    pub defaults: Option<ListingDefaults>,

    pub max_page_size: Option<usize>,
}

impl<E: Entity> ListingState<E> {
    /// Fill in the configured default sort and cap the page size
    ///
    /// With a `max_page_size`, a request that asks for no paging gets the
    /// first `max_page_size` entities.
    pub fn apply_defaults(&self, query: &mut SearchQuery<E>) {
        if query.sort_criteria.is_empty() {
            if let Some(criterion) = self
                .defaults
                .as_ref()
                .and_then(|defaults| defaults.default_criterion())
            {
                query.add_sort_criteria(criterion);
            }
        }

        if let Some(max) = self.max_page_size {
            query.take = Some(query.take.map_or(max, |take| take.min(max)));
        }
    }

    /// Fields the grid's search value is matched against
    ///
    /// Configured fields win, then the entity's declared searchable fields,
    /// then the grid's own searchable columns that name known fields.
    pub fn searchable_fields(&self, grid: &GridFilter, registry: &FieldRegistry<E>) -> Vec<String> {
        if let Some(defaults) = &self.defaults {
            if !defaults.searchable_fields.is_empty() {
                return defaults.searchable_fields.clone();
            }
        }

        let declared = E::searchable_fields();
        if !declared.is_empty() {
            return declared.iter().map(|field| field.to_string()).collect();
        }

        grid.searchable_columns()
            .into_iter()
            .filter(|column| registry.contains(column))
            .map(str::to_string)
            .collect()
    }
}

/// List entities
///
/// GET /{plural}?sortBy=likes&orderBy=desc&currentPage=1&pageSize=10
///
/// With `max_page_size` configured, a request without `currentPage` and
/// `pageSize` is not returned whole: it gets the first `max_page_size`
/// entities, and `count` still reports every candidate.
pub async fn list_entities<E>(
    State(state): State<Arc<ListingState<E>>>,
    Query(filter): Query<SortFilter>,
) -> Result<Json<PagedResult<E>>, FolioError>
where
    E: Entity + Serialize,
{
    let mut query = filter.to_search_query();
    state.apply_defaults(&mut query);

    let page = state
        .repository
        .search(query)
        .await
        .inspect_err(|e| log_rejected::<E>(e))?;

    Ok(Json(page))
}

/// Answer a grid widget request
///
/// POST /{plural}/grid
pub async fn grid_entities<E>(
    State(state): State<Arc<ListingState<E>>>,
    Json(grid): Json<GridFilter>,
) -> Result<Json<GridPage<E>>, FolioError>
where
    E: Entity + Serialize,
{
    let registry = state.repository.registry();
    let searchable = state.searchable_fields(&grid, &registry);

    let result: Result<GridPage<E>, FolioError> = async {
        let mut query = grid.to_search_query(&registry, searchable.as_slice())?;
        state.apply_defaults(&mut query);

        state.repository.grid_page(grid.draw, query).await
    }
    .await;

    result
        .map(Json)
        .inspect_err(|e| log_rejected::<E>(e))
}

fn log_rejected<E: Entity>(err: &FolioError) {
    if err.is_query_error() {
        tracing::warn!(
            entity = E::resource_name_singular(),
            code = err.error_code(),
            error = %err,
            "listing request rejected"
        );
    } else {
        tracing::error!(
            entity = E::resource_name_singular(),
            code = err.error_code(),
            error = %err,
            "listing request failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ListingConfig;
    use crate::core::sort::SortDirection;
    use crate::storage::InMemoryRepository;

    crate::impl_entity!(
        Note,
        "note",
        "notes",
        search: [],
        {
            title: String,
            likes: i64,
        }
    );

    fn listing_state(config: &ListingConfig) -> ListingState<Note> {
        ListingState {
            repository: Arc::new(InMemoryRepository::<Note>::new()),
            defaults: config.listing("note").cloned(),
            max_page_size: config.max_page_size,
        }
    }

    fn config() -> ListingConfig {
        ListingConfig::from_yaml_str(
            r#"
max_page_size: 20
listings:
  - entity: note
    default_sort: likes
    default_direction: desc
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_default_sort_applies_when_request_has_none() {
        let state = listing_state(&config());
        let mut query = SearchQuery::new();
        state.apply_defaults(&mut query);

        assert_eq!(query.sort_criteria.len(), 1);
        assert_eq!(query.sort_criteria[0].name(), "likes");
        assert_eq!(query.sort_criteria[0].direction, SortDirection::Descending);
    }

    #[test]
    fn test_request_sort_wins_over_default() {
        let state = listing_state(&config());
        let mut query = SortFilter {
            sort_by: Some("title".to_string()),
            ..Default::default()
        }
        .to_search_query();
        state.apply_defaults(&mut query);

        assert_eq!(query.sort_criteria.len(), 1);
        assert_eq!(query.sort_criteria[0].name(), "title");
    }

    #[test]
    fn test_page_size_is_capped() {
        let state = listing_state(&config());

        let mut query = SearchQuery::<Note>::new().with_paging(0, Some(500));
        state.apply_defaults(&mut query);
        assert_eq!(query.take, Some(20));

        let mut query = SearchQuery::<Note>::new();
        state.apply_defaults(&mut query);
        assert_eq!(query.take, Some(20));

        let unbounded = listing_state(&ListingConfig::default());
        let mut query = SearchQuery::<Note>::new();
        unbounded.apply_defaults(&mut query);
        assert_eq!(query.take, None);
    }

    #[test]
    fn test_searchable_fields_fall_back_to_grid_columns() {
        let state = listing_state(&config());
        let grid: GridFilter = serde_json::from_value(serde_json::json!({
            "columns": [
                { "data": "title" },
                { "data": "likes", "searchable": false },
                { "data": "unknown" }
            ]
        }))
        .unwrap();

        let fields = state.searchable_fields(&grid, &Note::field_registry());
        assert_eq!(fields, vec!["title".to_string()]);
    }

    #[test]
    fn test_configured_searchable_fields_win() {
        let config = ListingConfig::from_yaml_str(
            r#"
listings:
  - entity: note
    searchable_fields: [likes]
"#,
        )
        .unwrap();
        let state = listing_state(&config);

        let fields = state.searchable_fields(&GridFilter::default(), &Note::field_registry());
        assert_eq!(fields, vec!["likes".to_string()]);
    }
}
