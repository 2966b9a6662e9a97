//! REST API exposure
//!
//! Turns the listing registry into an Axum `Router`: one list route and one
//! grid route per entity, plus health checks.

use crate::config::ListingConfig;
use crate::server::listing::ListingRegistry;
use anyhow::Result;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router
    ///
    /// Returns a router with:
    /// - Health check routes
    /// - Listing routes for every registered entity
    /// - Custom routes
    pub fn build_router(
        registry: &ListingRegistry,
        config: &ListingConfig,
        custom_routes: Vec<Router>,
    ) -> Result<Router> {
        let health_routes = Self::health_routes();
        let listing_routes = registry.build_routes(config);

        let mut app = health_routes.merge(listing_routes);

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        Ok(app.layer(TraceLayer::new_for_http()))
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "folio"
        }))
    }
}
