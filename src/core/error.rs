//! Typed error handling for folio
//!
//! Listing requests can fail in a small number of well-defined ways. Each
//! category gets its own enum so callers can match on the precise failure
//! instead of inspecting an opaque `anyhow::Error`.
//!
//! # Error Categories
//!
//! - [`QueryError`]: the request does not fit the entity's shape (unknown
//!   sort field, grid column index out of range, bad search pattern). These
//!   are client/server contract mismatches and map to `400 Bad Request`.
//! - [`StorageError`]: the storage collaborator could not produce candidates.
//! - [`ConfigError`]: listing configuration could not be loaded or is
//!   inconsistent with the registered entities.
//!
//! # Example
//!
//! ```rust,ignore
//! match repository.search(query).await {
//!     Ok(page) => println!("{} matches", page.count),
//!     Err(FolioError::Query(QueryError::UnknownField { field, .. })) => {
//!         println!("cannot sort by {}", field);
//!     }
//!     Err(e) => eprintln!("listing failed: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type for folio
#[derive(Debug)]
pub enum FolioError {
    /// The listing request is inconsistent with the entity shape
    Query(QueryError),

    /// Storage collaborator errors
    Storage(StorageError),

    /// Configuration errors
    Config(ConfigError),
}

impl fmt::Display for FolioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FolioError::Query(e) => write!(f, "{}", e),
            FolioError::Storage(e) => write!(f, "{}", e),
            FolioError::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for FolioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FolioError::Query(e) => Some(e),
            FolioError::Storage(e) => Some(e),
            FolioError::Config(e) => Some(e),
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl FolioError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            FolioError::Query(e) => e.status_code(),
            FolioError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FolioError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            FolioError::Query(e) => e.error_code(),
            FolioError::Storage(e) => e.error_code(),
            FolioError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether this error is a configuration mismatch between client and server
    pub fn is_query_error(&self) -> bool {
        matches!(self, FolioError::Query(_))
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            FolioError::Query(QueryError::UnknownField { entity, field }) => {
                Some(serde_json::json!({
                    "entity": entity,
                    "field": field
                }))
            }
            FolioError::Query(QueryError::ColumnOutOfRange { column, columns }) => {
                Some(serde_json::json!({
                    "column": column,
                    "columns": columns
                }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for FolioError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Query Errors
// =============================================================================

/// Errors raised while turning a listing request into a plan
///
/// All of these are raised before any entity is compared or sliced.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    /// The field name is not declared on the entity
    UnknownField { entity: String, field: String },

    /// A grid order entry points at a column that does not exist
    ///
    /// `column` is the index as sent, so negative indexes are reported too.
    ColumnOutOfRange { column: i64, columns: usize },

    /// The free-text search value is not a valid regular expression
    InvalidSearchPattern { pattern: String, message: String },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::UnknownField { entity, field } => {
                write!(f, "Unknown field '{}' on {}", field, entity)
            }
            QueryError::ColumnOutOfRange { column, columns } => {
                write!(
                    f,
                    "Order column {} is out of range ({} columns declared)",
                    column, columns
                )
            }
            QueryError::InvalidSearchPattern { pattern, message } => {
                write!(f, "Invalid search pattern '{}': {}", pattern, message)
            }
        }
    }
}

impl std::error::Error for QueryError {}

impl QueryError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::UnknownField { .. } => "UNKNOWN_FIELD",
            QueryError::ColumnOutOfRange { .. } => "COLUMN_OUT_OF_RANGE",
            QueryError::InvalidSearchPattern { .. } => "INVALID_SEARCH_PATTERN",
        }
    }
}

impl From<QueryError> for FolioError {
    fn from(err: QueryError) -> Self {
        FolioError::Query(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to the storage collaborator
#[derive(Debug)]
pub enum StorageError {
    /// A lock guarding in-process state was poisoned
    LockPoisoned { message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::LockPoisoned { message } => {
                write!(f, "Storage lock poisoned: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl StorageError {
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::LockPoisoned { .. } => "STORAGE_ERROR",
        }
    }
}

impl From<StorageError> for FolioError {
    fn from(err: StorageError) -> Self {
        FolioError::Storage(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to listing configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },

    /// A listing refers to an entity that was never registered
    UnknownEntity { entity: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::UnknownEntity { entity } => {
                write!(f, "Listing configured for unknown entity '{}'", entity)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for FolioError {
    fn from(err: ConfigError) -> Self {
        FolioError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_yaml::Error> for FolioError {
    fn from(err: serde_yaml::Error) -> Self {
        FolioError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for FolioError {
    fn from(err: std::io::Error) -> Self {
        FolioError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

/// A specialized Result type for folio operations
pub type FolioResult<T> = Result<T, FolioError>;
