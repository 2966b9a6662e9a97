//! Listing configuration loading and management

use crate::core::error::{ConfigError, FolioError, FolioResult};
use crate::core::sort::{SortCriterion, SortDirection};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Listing defaults for one entity type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingDefaults {
    /// Singular entity name (e.g., "post")
    pub entity: String,

    /// Field to sort by when a request names none
    #[serde(default)]
    pub default_sort: Option<String>,

    /// Direction for `default_sort` ("asc" or "desc")
    #[serde(default)]
    pub default_direction: Option<String>,

    /// Fields matched by free-text search
    ///
    /// When empty, the entity's own searchable fields are used.
    #[serde(default)]
    pub searchable_fields: Vec<String>,
}

impl ListingDefaults {
    /// The default sort criterion, if one is configured
    pub fn default_criterion<E>(&self) -> Option<SortCriterion<E>> {
        let field = self.default_sort.as_deref()?;
        let direction = self
            .default_direction
            .as_deref()
            .map(SortDirection::parse)
            .unwrap_or_default();
        Some(SortCriterion::new(field, direction))
    }
}

/// Complete configuration for the listing endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Upper bound applied to page sizes at the HTTP edge
    #[serde(default)]
    pub max_page_size: Option<usize>,

    /// Per-entity defaults
    #[serde(default)]
    pub listings: Vec<ListingDefaults>,
}

impl ListingConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> FolioResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FolioError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                e.into()
            }
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            FolioError::Config(ConfigError::ParseError {
                file: Some(path.display().to_string()),
                message: e.to_string(),
            })
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> FolioResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Find the defaults for an entity
    pub fn listing(&self, entity: &str) -> Option<&ListingDefaults> {
        self.listings.iter().find(|l| l.entity == entity)
    }

    /// Clamp a requested page size to `max_page_size`
    pub fn clamp_page_size(&self, requested: usize) -> usize {
        match self.max_page_size {
            Some(max) => requested.min(max),
            None => requested,
        }
    }

    /// Check that every configured listing names a known entity
    pub fn validate_entities<'a>(
        &self,
        known: impl IntoIterator<Item = &'a str> + Clone,
    ) -> Result<(), ConfigError> {
        match self
            .listings
            .iter()
            .find(|l| !known.clone().into_iter().any(|k| k == l.entity))
        {
            Some(listing) => Err(ConfigError::UnknownEntity {
                entity: listing.entity.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Create a default configuration for the blog entities
    pub fn default_config() -> Self {
        Self {
            max_page_size: Some(100),
            listings: vec![
                ListingDefaults {
                    entity: "post".to_string(),
                    default_sort: Some("created_at".to_string()),
                    default_direction: Some("desc".to_string()),
                    searchable_fields: vec!["title".to_string(), "body".to_string()],
                },
                ListingDefaults {
                    entity: "tag".to_string(),
                    default_sort: Some("name".to_string()),
                    default_direction: Some("asc".to_string()),
                    searchable_fields: Vec::new(),
                },
                ListingDefaults {
                    entity: "comment".to_string(),
                    default_sort: Some("created_at".to_string()),
                    default_direction: Some("asc".to_string()),
                    searchable_fields: vec!["body".to_string()],
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ListingConfig::default_config();

        assert_eq!(config.listings.len(), 3);
        assert_eq!(config.max_page_size, Some(100));
        assert!(config.listing("post").is_some());
        assert!(config.listing("user").is_none());
    }

    #[test]
    fn test_yaml_serialization() {
        let config = ListingConfig::default_config();
        let yaml = serde_yaml::to_string(&config).unwrap();

        let parsed = ListingConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_minimal_yaml() {
        let config = ListingConfig::from_yaml_str(
            r#"
listings:
  - entity: tag
"#,
        )
        .unwrap();

        assert_eq!(config.max_page_size, None);
        let tag = config.listing("tag").unwrap();
        assert!(tag.default_sort.is_none());
        assert!(tag.searchable_fields.is_empty());
        assert!(tag.default_criterion::<()>().is_none());
    }

    #[test]
    fn test_default_criterion_direction() {
        let config = ListingConfig::default_config();
        let criterion = config
            .listing("post")
            .and_then(|l| l.default_criterion::<()>())
            .unwrap();
        assert_eq!(criterion.name(), "created_at");
        assert_eq!(criterion.direction, SortDirection::Descending);
    }

    #[test]
    fn test_clamp_page_size() {
        let config = ListingConfig::default_config();
        assert_eq!(config.clamp_page_size(500), 100);
        assert_eq!(config.clamp_page_size(10), 10);
        assert_eq!(ListingConfig::default().clamp_page_size(500), 500);
    }

    #[test]
    fn test_validate_entities() {
        let config = ListingConfig::default_config();
        assert!(config.validate_entities(["post", "tag", "comment"]).is_ok());

        let err = config.validate_entities(["post", "tag"]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownEntity { entity } if entity == "comment"));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = ListingConfig::from_yaml_str("listings: [ {entity: ").unwrap_err();
        assert!(matches!(err, FolioError::Config(ConfigError::ParseError { .. })));
    }
}
