//! Entity trait describing anything that can be listed

use crate::core::field::FieldRegistry;
use uuid::Uuid;

/// Base trait for all listable entities (posts, tags, comments, users...).
///
/// The listing engine never inspects an entity directly. Everything it needs
/// to filter and order is exposed through the field registry, which maps
/// request-supplied field names onto accessors.
///
/// Implementations are usually generated with [`impl_entity!`](crate::impl_entity).
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs (e.g., "posts", "tags")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "post", "tag")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;

    /// Build the registry of sortable/searchable fields for this type
    ///
    /// Called once per entity type when a repository is created; the result
    /// is shared, so this does not need to be cheap.
    fn field_registry() -> FieldRegistry<Self>;

    /// Fields matched by free-text search when the request does not say otherwise
    fn searchable_fields() -> &'static [&'static str] {
        &[]
    }
}
