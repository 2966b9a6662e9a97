//! Server module for building HTTP servers with listing routes
//!
//! This module provides a `ServerBuilder` that registers, for every listable
//! entity:
//! - `GET /{plural}` answering the flat sort/page request
//! - `POST /{plural}/grid` answering grid widget requests

pub mod builder;
pub mod exposure;
pub mod handlers;
pub mod listing;

pub use builder::ServerBuilder;
pub use exposure::RestExposure;
pub use handlers::ListingState;
pub use listing::{EntityListing, ListingDescriptor, ListingRegistry};
