//! DataTables-style grid request adapter
//!
//! Grid widgets describe the rows they want as a window (`start`, `length`),
//! a free-text search box, per-column ordering directives and the list of
//! columns. [`GridFilter`] decodes that wire shape and translates it into the
//! same vocabulary [`SearchQuery`] uses.
//!
//! The derived accessors deliberately keep the historical behaviour: only
//! the first `order` entry is honoured, and a missing or unrecognised
//! direction means *descending*. Grids that need true multi-column ordering
//! opt in through [`GridFilter::order_specs`] and
//! [`GridFilter::to_search_query_multi`].

use crate::core::error::QueryError;
use crate::core::field::FieldRegistry;
use crate::core::query::SearchQuery;
use crate::core::search::TextSearch;
use crate::core::sort::{SortCriterion, SortDirection};
use serde::{Deserialize, Deserializer, Serialize};

/// A grid widget's request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridFilter {
    /// Request counter, echoed back in the response
    pub draw: i64,

    /// 0-based offset of the first row
    pub start: i64,

    /// Page size; a negative value asks for every row
    pub length: i64,

    pub search: GridSearch,

    pub order: Vec<GridOrder>,

    pub columns: Vec<GridColumn>,
}

/// The grid's global search box
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSearch {
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,

    #[serde(deserialize_with = "null_as_default")]
    pub regex: bool,
}

/// One ordering directive: a column index and `"asc"`/`"desc"`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOrder {
    /// Index into `columns`; out-of-range values, negative ones included,
    /// are reported when the request is planned
    pub column: i64,

    #[serde(deserialize_with = "null_as_default")]
    pub dir: String,
}

/// A grid column and the field it displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridColumn {
    /// Field name shown in this column
    #[serde(deserialize_with = "null_as_default")]
    pub data: String,

    #[serde(deserialize_with = "null_as_default")]
    pub name: String,

    /// Missing or `null` means searchable
    #[serde(deserialize_with = "null_as_true")]
    pub searchable: bool,

    #[serde(deserialize_with = "null_as_true")]
    pub orderable: bool,
}

impl Default for GridColumn {
    fn default() -> Self {
        Self {
            data: String::new(),
            name: String::new(),
            searchable: true,
            orderable: true,
        }
    }
}

impl GridColumn {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }
}

/// The (field, direction, skip, take) tuple a grid request reduces to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Empty when the request carries no ordering
    pub field_name: String,
    pub direction: SortDirection,
    pub skip: usize,
    pub take: Option<usize>,
}

impl GridFilter {
    /// 1-based page number of the requested window
    ///
    /// A zero or negative `length` has no pages to count and reports page 1.
    pub fn page_count(&self) -> i64 {
        if self.length <= 0 {
            1
        } else {
            self.start / self.length + 1
        }
    }

    pub fn page_size(&self) -> i64 {
        self.length
    }

    /// Direction of the first order entry
    ///
    /// Only an exact `"asc"` is ascending. Any other text, and an empty
    /// `order` list, is descending.
    pub fn order_type(&self) -> SortDirection {
        self.order
            .first()
            .map_or(SortDirection::Descending, |order| grid_direction(&order.dir))
    }

    /// Field name of the column the first order entry points at
    ///
    /// Empty when the request carries no ordering.
    ///
    /// # Errors
    ///
    /// [`QueryError::ColumnOutOfRange`] when the first order entry names a
    /// column index that `columns` does not have.
    pub fn column_name(&self) -> Result<String, QueryError> {
        match self.order.first() {
            Some(order) => self.column_data(order.column).map(str::to_string),
            None => Ok(String::new()),
        }
    }

    /// Reduce the request to a single sort key plus a row window
    pub fn to_sort_spec(&self) -> Result<SortSpec, QueryError> {
        Ok(SortSpec {
            field_name: self.column_name()?,
            direction: self.order_type(),
            skip: self.skip(),
            take: self.take(),
        })
    }

    /// Every order entry as `(field, direction)`, in request order
    ///
    /// Unlike [`column_name`](Self::column_name) and
    /// [`order_type`](Self::order_type) this honours the whole list.
    pub fn order_specs(&self) -> Result<Vec<(String, SortDirection)>, QueryError> {
        self.order
            .iter()
            .map(|order| {
                self.column_data(order.column)
                    .map(|field| (field.to_string(), grid_direction(&order.dir)))
            })
            .collect()
    }

    /// Field names of the columns flagged searchable
    pub fn searchable_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|column| column.searchable && !column.data.is_empty())
            .map(|column| column.data.as_str())
            .collect()
    }

    pub fn text_search(&self) -> TextSearch {
        TextSearch::new(self.search.value.clone(), self.search.regex)
    }

    /// Build the listing plan using the first order entry only
    ///
    /// A non-empty search value becomes a filter over `searchable_fields`.
    /// Field names are checked against `registry` so a bad column fails
    /// here, before any data is read.
    pub fn to_search_query<E, S>(
        &self,
        registry: &FieldRegistry<E>,
        searchable_fields: &[S],
    ) -> Result<SearchQuery<E>, QueryError>
    where
        E: 'static,
        S: AsRef<str>,
    {
        let spec = self.to_sort_spec()?;
        let mut query = self.base_query(registry, searchable_fields)?;

        if !spec.field_name.is_empty() {
            query.add_sort_criteria(SortCriterion::new(spec.field_name, spec.direction));
        }

        query.validate(registry)?;
        Ok(query)
    }

    /// Build the listing plan honouring every order entry
    pub fn to_search_query_multi<E, S>(
        &self,
        registry: &FieldRegistry<E>,
        searchable_fields: &[S],
    ) -> Result<SearchQuery<E>, QueryError>
    where
        E: 'static,
        S: AsRef<str>,
    {
        let specs = self.order_specs()?;
        let mut query = self.base_query(registry, searchable_fields)?;

        for (field, direction) in specs {
            if !field.is_empty() {
                query.add_sort_criteria(SortCriterion::new(field, direction));
            }
        }

        query.validate(registry)?;
        Ok(query)
    }

    fn base_query<E, S>(
        &self,
        registry: &FieldRegistry<E>,
        searchable_fields: &[S],
    ) -> Result<SearchQuery<E>, QueryError>
    where
        E: 'static,
        S: AsRef<str>,
    {
        let mut query = SearchQuery::new().with_paging(self.skip(), self.take());
        if let Some(filter) = self.text_search().into_filter(registry, searchable_fields)? {
            query.filters.push(filter);
        }
        Ok(query)
    }

    fn skip(&self) -> usize {
        usize::try_from(self.start).unwrap_or(0)
    }

    fn take(&self) -> Option<usize> {
        usize::try_from(self.length).ok()
    }

    fn column_data(&self, column: i64) -> Result<&str, QueryError> {
        usize::try_from(column)
            .ok()
            .and_then(|index| self.columns.get(index))
            .map(|c| c.data.as_str())
            .ok_or(QueryError::ColumnOutOfRange {
                column,
                columns: self.columns.len(),
            })
    }
}

fn grid_direction(dir: &str) -> SortDirection {
    if dir == "asc" {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}
