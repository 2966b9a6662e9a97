//! # Folio
//!
//! A generic search, sort and paginate engine for listing entities over a
//! REST API in Rust.
//!
//! ## Features
//!
//! - **Runtime Field Ordering**: Sort by field names that arrive as text,
//!   resolved against a per-entity field registry
//! - **Multi-Key Sorting**: Chained sort criteria keep earlier keys as
//!   tie-breakers
//! - **Two Request Shapes**: A flat `sortBy`/`pageSize` query string and a
//!   DataTables-style grid request, reduced to one query plan
//! - **Paged Results**: `hasNext`, `hasPrevious` and the total count in a
//!   single envelope
//! - **Configuration-Based**: Default sorts, searchable fields and page-size
//!   limits via YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use folio::prelude::*;
//!
//! impl_entity!(
//!     Post,
//!     "post",
//!     "posts",
//!     search: ["title"],
//!     {
//!         title: String,
//!         likes: i64,
//!     }
//! );
//!
//! let posts = InMemoryRepository::<Post>::new();
//! posts.insert(Post::new("Hello".to_string(), 3))?;
//!
//! let page = posts
//!     .search(
//!         SearchQuery::new()
//!             .with_sort(SortCriterion::desc("likes"))
//!             .with_sort(SortCriterion::asc("title"))
//!             .with_paging(0, Some(10)),
//!     )
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        entity::Entity,
        error::{ConfigError, FolioError, FolioResult, QueryError, StorageError},
        field::{FieldRegistry, FieldValue},
        grid::{GridColumn, GridFilter, GridOrder, GridSearch, SortSpec},
        orderer::{DynamicFieldOrderer, OrderedSequence},
        paged::{GridPage, PagedResult},
        query::{Filter, SearchQuery},
        search::TextSearch,
        service::Repository,
        sort::{SortCriterion, SortDirection, SortKey},
        sort_filter::SortFilter,
    };

    // === Macros ===
    pub use crate::impl_entity;

    // === Storage ===
    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryRepository;

    // === Config ===
    pub use crate::config::{ListingConfig, ListingDefaults};

    // === Server ===
    pub use crate::server::{ListingDescriptor, ListingRegistry, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;

    // === Axum ===
    pub use axum::{
        Router,
        routing::{get, post},
    };
}
