//! Storage collaborator contract and the listing pipeline

use crate::core::entity::Entity;
use crate::core::error::FolioResult;
use crate::core::field::FieldRegistry;
use crate::core::grid::GridFilter;
use crate::core::paged::{GridPage, PagedResult};
use crate::core::query::{Filter, SearchQuery};
use async_trait::async_trait;
use std::sync::Arc;

/// Storage collaborator for one entity type
///
/// Implementations only need to produce the filtered candidates; ordering
/// and paging are done by the provided [`search`](Repository::search)
/// method, so every backend lists entities the same way.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Field registry used to resolve sort and search fields
    fn registry(&self) -> Arc<FieldRegistry<E>>;

    /// Every stored entity satisfying all `filters`
    ///
    /// `include_properties` names related data to load with the entities.
    /// Backends without related data ignore it.
    async fn fetch_candidates(
        &self,
        filters: &[Filter<E>],
        include_properties: Option<&str>,
    ) -> FolioResult<Vec<E>>;

    /// Number of stored entities, ignoring any filter
    async fn count_all(&self) -> FolioResult<usize>;

    /// Run a listing plan
    ///
    /// 1. resolve every sort field (unknown fields fail before data is read)
    /// 2. fetch the filtered candidates
    /// 3. order them, first criterion primary, the rest chained
    /// 4. cut the `[skip, skip + take)` window and count the candidates
    async fn search(&self, query: SearchQuery<E>) -> FolioResult<PagedResult<E>> {
        let registry = self.registry();
        query.validate(&registry)?;

        let candidates = self
            .fetch_candidates(&query.filters, query.include_properties.as_deref())
            .await?;
        let ordered = query.order(candidates, &registry)?;
        let page = PagedResult::paginate(ordered, query.skip, query.take);

        tracing::debug!(
            entity = E::resource_name_singular(),
            filters = query.filters.len(),
            sorts = query.sort_criteria.len(),
            skip = query.skip,
            take = ?query.take,
            count = page.count,
            returned = page.entities.len(),
            "listing executed"
        );

        Ok(page)
    }

    /// Run a planned grid query and wrap it in the grid envelope
    ///
    /// `recordsTotal` counts every stored entity, `recordsFiltered` the
    /// candidates left by the query's filters.
    async fn grid_page(&self, draw: i64, query: SearchQuery<E>) -> FolioResult<GridPage<E>> {
        let records_total = self.count_all().await?;
        let page = self.search(query).await?;
        Ok(GridPage::from_paged(draw, records_total, page))
    }

    /// Answer a grid widget request
    ///
    /// Library entry point for callers without configured listing defaults.
    /// Uses the first order entry only, like the grid's derived accessors.
    /// The REST grid route plans the query itself so it can add the
    /// configured default sort and page cap, then shares
    /// [`grid_page`](Repository::grid_page) with this method.
    async fn search_grid(
        &self,
        grid: &GridFilter,
        searchable_fields: &[String],
    ) -> FolioResult<GridPage<E>> {
        let query = grid.to_search_query(&self.registry(), searchable_fields)?;
        self.grid_page(grid.draw, query).await
    }
}
