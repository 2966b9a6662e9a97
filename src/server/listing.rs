//! Listing registry for managing listing descriptors and generating their routes

use super::handlers::{ListingState, grid_entities, list_entities};
use crate::config::ListingConfig;
use crate::core::entity::Entity;
use crate::core::service::Repository;
use axum::{
    Router,
    routing::{get, post},
};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

/// Trait that describes how to build the listing routes for an entity
pub trait ListingDescriptor: Send + Sync {
    /// The entity type name (singular, e.g., "post")
    fn entity_type(&self) -> &str;

    /// The plural form (e.g., "posts")
    fn plural(&self) -> &str;

    /// Build the listing routes for this entity
    ///
    /// Should return a Router with:
    /// - GET /{plural}
    /// - POST /{plural}/grid
    fn build_routes(&self, config: &ListingConfig) -> Router;
}

/// Descriptor serving the listings of one entity type from a repository
pub struct EntityListing<E: Entity> {
    repository: Arc<dyn Repository<E>>,
}

impl<E: Entity> EntityListing<E> {
    pub fn new(repository: Arc<dyn Repository<E>>) -> Self {
        Self { repository }
    }
}

impl<E> ListingDescriptor for EntityListing<E>
where
    E: Entity + Serialize,
{
    fn entity_type(&self) -> &str {
        E::resource_name_singular()
    }

    fn plural(&self) -> &str {
        E::resource_name()
    }

    fn build_routes(&self, config: &ListingConfig) -> Router {
        let state = Arc::new(ListingState {
            repository: Arc::clone(&self.repository),
            defaults: config.listing(E::resource_name_singular()).cloned(),
            max_page_size: config.max_page_size,
        });

        Router::new()
            .route(&format!("/{}", E::resource_name()), get(list_entities::<E>))
            .route(
                &format!("/{}/grid", E::resource_name()),
                post(grid_entities::<E>),
            )
            .with_state(state)
    }
}

/// Registry for every listable entity in the application
///
/// Descriptors are kept in registration order.
#[derive(Default)]
pub struct ListingRegistry {
    descriptors: IndexMap<String, Box<dyn ListingDescriptor>>,
}

impl ListingRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            descriptors: IndexMap::new(),
        }
    }

    /// Register a listing descriptor
    ///
    /// The entity type name is used as the key, so registering the same
    /// entity twice keeps the latest descriptor.
    pub fn register(&mut self, descriptor: Box<dyn ListingDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Build a router with every registered listing route
    pub fn build_routes(&self, config: &ListingConfig) -> Router {
        let mut router = Router::new();

        for descriptor in self.descriptors.values() {
            router = router.merge(descriptor.build_routes(config));
        }

        router
    }

    /// Get all registered entity types
    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }

    /// Get all registered route prefixes
    pub fn plurals(&self) -> Vec<&str> {
        self.descriptors.values().map(|d| d.plural()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockDescriptor {
        entity_type: String,
        plural: String,
    }

    impl MockDescriptor {
        fn new(entity_type: &str, plural: &str) -> Self {
            Self {
                entity_type: entity_type.to_string(),
                plural: plural.to_string(),
            }
        }
    }

    impl ListingDescriptor for MockDescriptor {
        fn entity_type(&self) -> &str {
            &self.entity_type
        }

        fn plural(&self) -> &str {
            &self.plural
        }

        fn build_routes(&self, _config: &ListingConfig) -> Router {
            Router::new()
        }
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = ListingRegistry::new();
        assert!(registry.entity_types().is_empty());
        assert!(ListingRegistry::default().plurals().is_empty());
    }

    #[test]
    fn test_register_keeps_order() {
        let mut registry = ListingRegistry::new();
        registry.register(Box::new(MockDescriptor::new("post", "posts")));
        registry.register(Box::new(MockDescriptor::new("tag", "tags")));
        registry.register(Box::new(MockDescriptor::new("comment", "comments")));

        assert_eq!(registry.entity_types(), vec!["post", "tag", "comment"]);
        assert_eq!(registry.plurals(), vec!["posts", "tags", "comments"]);
    }

    #[test]
    fn test_register_duplicate_replaces() {
        let mut registry = ListingRegistry::new();
        registry.register(Box::new(MockDescriptor::new("post", "posts")));
        registry.register(Box::new(MockDescriptor::new("post", "articles")));

        assert_eq!(registry.entity_types().len(), 1);
        assert_eq!(registry.plurals(), vec!["articles"]);
    }

    #[test]
    fn test_build_routes_empty_registry() {
        let registry = ListingRegistry::new();
        let _router = registry.build_routes(&ListingConfig::default());
    }
}
