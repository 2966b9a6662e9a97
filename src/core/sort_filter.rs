//! Flat "sort by field + page" request DTO

use crate::core::query::SearchQuery;
use crate::core::sort::{SortCriterion, SortDirection};
use serde::{Deserialize, Serialize};

/// Simple listing request, usually taken from the query string
///
/// ```text
/// GET /posts?sortBy=likes&orderBy=desc&currentPage=2&pageSize=10
/// ```
///
/// Every field is optional. Without `sortBy` the listing is not ordered;
/// without both `currentPage` and `pageSize` it is not paged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SortFilter {
    /// `"desc"` (any case) for descending, anything else ascending
    pub order_by: Option<String>,

    /// Name of the field to sort by
    pub sort_by: Option<String>,

    /// 1-based page number
    pub current_page: Option<i64>,

    pub page_size: Option<i64>,

    /// Presentation hint for the front end, passed through untouched
    pub display_type: Option<String>,
}

impl SortFilter {
    pub fn direction(&self) -> SortDirection {
        self.order_by
            .as_deref()
            .map(SortDirection::parse)
            .unwrap_or_default()
    }

    /// The single criterion this request asks for, if any
    pub fn sort_criterion<E>(&self) -> Option<SortCriterion<E>> {
        self.sort_by
            .as_deref()
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(|field| SortCriterion::new(field, self.direction()))
    }

    /// `(skip, take)` when both page number and page size are present
    ///
    /// Values are not validated: a page number below 1 skips nothing and a
    /// page size of zero or less takes nothing.
    pub fn paging(&self) -> Option<(usize, usize)> {
        let (page, size) = (self.current_page?, self.page_size?);
        let skip = page.saturating_sub(1).saturating_mul(size);
        Some((clamp_to_usize(skip), clamp_to_usize(size)))
    }

    /// Reduce this request to the canonical plan
    pub fn to_search_query<E>(&self) -> SearchQuery<E> {
        let mut query = SearchQuery::new();
        if let Some(criterion) = self.sort_criterion() {
            query.add_sort_criteria(criterion);
        }
        if let Some((skip, take)) = self.paging() {
            query.skip = skip;
            query.take = Some(take);
        }
        query
    }
}

fn clamp_to_usize(value: i64) -> usize {
    if value <= 0 {
        0
    } else {
        usize::try_from(value).unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Post;

    fn filter(json: serde_json::Value) -> SortFilter {
        serde_json::from_value(json).expect("valid sort filter")
    }

    #[test]
    fn test_full_request() {
        let request = filter(serde_json::json!({
            "orderBy": "DESC",
            "sortBy": "likes",
            "currentPage": 3,
            "pageSize": 10,
            "displayType": "grid"
        }));
        let query = request.to_search_query::<Post>();

        assert_eq!(query.sort_criteria.len(), 1);
        assert_eq!(query.sort_criteria[0].name(), "likes");
        assert_eq!(query.sort_criteria[0].direction, SortDirection::Descending);
        assert_eq!(query.skip, 20);
        assert_eq!(query.take, Some(10));
        assert_eq!(request.display_type.as_deref(), Some("grid"));
    }

    #[test]
    fn test_unrecognized_order_defaults_to_ascending() {
        let request = filter(serde_json::json!({ "orderBy": "newest", "sortBy": "title" }));
        assert_eq!(request.direction(), SortDirection::Ascending);

        let request = filter(serde_json::json!({ "sortBy": "title" }));
        assert_eq!(request.direction(), SortDirection::Ascending);
    }

    #[test]
    fn test_missing_page_size_disables_paging() {
        let request = filter(serde_json::json!({ "sortBy": "title", "currentPage": 2 }));
        assert_eq!(request.paging(), None);

        let query = request.to_search_query::<Post>();
        assert_eq!(query.skip, 0);
        assert_eq!(query.take, None);
    }

    #[test]
    fn test_empty_request() {
        let query = SortFilter::default().to_search_query::<Post>();
        assert!(query.sort_criteria.is_empty());
        assert_eq!(query.take, None);
    }

    #[test]
    fn test_blank_sort_by_adds_no_criterion() {
        let request = filter(serde_json::json!({ "sortBy": "  ", "orderBy": "desc" }));
        assert!(request.sort_criterion::<Post>().is_none());
    }

    #[test]
    fn test_non_positive_values_saturate() {
        let request = filter(serde_json::json!({ "currentPage": 0, "pageSize": 10 }));
        assert_eq!(request.paging(), Some((0, 10)));

        let request = filter(serde_json::json!({ "currentPage": 2, "pageSize": -5 }));
        assert_eq!(request.paging(), Some((0, 0)));
    }
}
