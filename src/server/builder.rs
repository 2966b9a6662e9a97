//! ServerBuilder for fluent API to build HTTP servers

use super::exposure::RestExposure;
use super::listing::{EntityListing, ListingRegistry};
use crate::config::ListingConfig;
use crate::core::entity::Entity;
use crate::core::service::Repository;
use anyhow::Result;
use axum::Router;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for creating HTTP servers with listing routes
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(ListingConfig::default_config())
///     .register_listing::<Post>(InMemoryRepository::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    registry: ListingRegistry,
    config: ListingConfig,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            registry: ListingRegistry::new(),
            config: ListingConfig::default(),
            custom_routes: Vec::new(),
        }
    }

    /// Set the listing configuration
    pub fn with_config(mut self, config: ListingConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the listing configuration from a YAML file
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let config = ListingConfig::from_yaml_file(path)?;
        Ok(self.with_config(config))
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Serve the listings of `E` from a repository
    ///
    /// Exposes `GET /{plural}` and `POST /{plural}/grid`.
    pub fn register_listing<E>(mut self, repository: impl Repository<E> + 'static) -> Self
    where
        E: Entity + Serialize,
    {
        let repository: Arc<dyn Repository<E>> = Arc::new(repository);
        self.registry
            .register(Box::new(EntityListing::new(repository)));
        self
    }

    /// Build the final REST router
    ///
    /// Fails when the configuration names an entity that was never
    /// registered.
    pub fn build(self) -> Result<Router> {
        self.config
            .validate_entities(self.registry.entity_types())?;

        tracing::debug!(
            entities = ?self.registry.plurals(),
            max_page_size = ?self.config.max_page_size,
            "building listing routes"
        );

        RestExposure::build_router(&self.registry, &self.config, self.custom_routes)
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Build the router
    /// - Bind to the specified address
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    ///
    /// # Example
    ///
    /// ```ignore
    /// ServerBuilder::new()
    ///     .register_listing::<Post>(posts)
    ///     .serve("127.0.0.1:3000").await?;
    /// ```
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
