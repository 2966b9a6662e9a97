//! Core module containing the listing engine: field access, ordering,
//! query plans, request adapters and paged results

pub mod entity;
pub mod error;
pub mod field;
pub mod grid;
pub mod orderer;
pub mod paged;
pub mod query;
pub mod search;
pub mod service;
pub mod sort;
pub mod sort_filter;

pub use entity::Entity;
pub use error::{ConfigError, FolioError, FolioResult, QueryError, StorageError};
pub use field::{FieldAccessor, FieldRegistry, FieldValue};
pub use grid::{GridColumn, GridFilter, GridOrder, GridSearch, SortSpec};
pub use orderer::{DynamicFieldOrderer, OrderedSequence, ResolvedKey};
pub use paged::{GridPage, PagedResult};
pub use query::{Filter, SearchQuery};
pub use search::TextSearch;
pub use service::Repository;
pub use sort::{SortCriterion, SortDirection, SortKey};
pub use sort_filter::SortFilter;
