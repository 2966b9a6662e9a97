//! Paged result envelopes

use serde::{Deserialize, Serialize};

/// One page of a listing plus the information needed to navigate it
///
/// `count` is always the number of entities that matched the filters
/// *before* the page was cut, so clients can compute the number of pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<E> {
    /// Whether entities exist after this page
    pub has_next: bool,

    /// Whether entities exist before this page
    pub has_previous: bool,

    /// Total number of matching entities (after filters, before paging)
    pub count: usize,

    /// The entities of this page, in order
    pub entities: Vec<E>,
}

impl<E> PagedResult<E> {
    /// Cut a page out of a filtered and ordered sequence
    ///
    /// - `take == Some(0)` is a count-only probe: no entities, full `count`.
    /// - `take == None` returns everything after `skip`.
    /// - `skip` past the end yields an empty page, not an error.
    pub fn paginate(ordered: Vec<E>, skip: usize, take: Option<usize>) -> Self {
        let count = ordered.len();

        let entities = match take {
            Some(0) => Vec::new(),
            Some(take) => ordered.into_iter().skip(skip).take(take).collect(),
            None => ordered.into_iter().skip(skip).collect(),
        };

        let has_next = take.is_some_and(|take| skip.saturating_add(take) < count);

        Self {
            has_next,
            has_previous: skip > 0,
            count,
            entities,
        }
    }

    /// An empty result (nothing matched)
    pub fn empty() -> Self {
        Self {
            has_next: false,
            has_previous: false,
            count: 0,
            entities: Vec::new(),
        }
    }

    /// Number of pages of `page_size` needed to show every match
    ///
    /// Returns `None` for a zero page size.
    pub fn total_pages(&self, page_size: usize) -> Option<usize> {
        if page_size == 0 {
            None
        } else {
            Some(self.count.div_ceil(page_size))
        }
    }

    /// Project the entities (e.g. into response DTOs), keeping the paging data
    pub fn map<U, F>(self, f: F) -> PagedResult<U>
    where
        F: FnMut(E) -> U,
    {
        PagedResult {
            has_next: self.has_next,
            has_previous: self.has_previous,
            count: self.count,
            entities: self.entities.into_iter().map(f).collect(),
        }
    }
}

/// Response envelope expected by DataTables-style grid widgets
///
/// `draw` is echoed from the request so the widget can discard stale
/// responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPage<E> {
    pub draw: i64,

    /// Entities before any filtering
    pub records_total: usize,

    /// Entities left after filtering, before paging
    pub records_filtered: usize,

    pub data: Vec<E>,
}

impl<E> GridPage<E> {
    pub fn from_paged(draw: i64, records_total: usize, page: PagedResult<E>) -> Self {
        Self {
            draw,
            records_total,
            records_filtered: page.count,
            data: page.entities,
        }
    }
}
