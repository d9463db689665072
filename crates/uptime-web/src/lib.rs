//! HTTP binding for the uptime node.
//!
//! This crate provides:
//! - The uptime resource at its configured path, with `Accept` negotiation
//! - CoRE resource discovery at `/.well-known/core`
//! - Health check and Prometheus metrics endpoints
//!
//! # Usage
//!
//! ```ignore
//! use uptime_web::UptimeServer;
//!
//! let server = UptimeServer::new(config.web.clone(), resource, config.resource.chunk_size);
//! server.serve(shutdown_signal()).await?;
//! ```

mod api;
mod metrics;

pub use api::*;
pub use metrics::*;

use axum::{
    routing::{get, Router},
    Extension,
};
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use uptime_common::config::WebConfig;
use uptime_core::resource::UptimeResource;

/// HTTP server exposing the uptime resource.
pub struct UptimeServer {
    config: WebConfig,
    state: Arc<AppState>,
    metrics: Arc<UptimeMetrics>,
}

impl UptimeServer {
    /// Create a server for `resource`, handing it a `chunk_size` buffer per request.
    pub fn new(config: WebConfig, resource: UptimeResource, chunk_size: usize) -> Self {
        Self {
            config,
            state: Arc::new(AppState {
                resource,
                chunk_size,
            }),
            metrics: Arc::new(UptimeMetrics::new()),
        }
    }

    /// Get a reference to the Prometheus metrics.
    pub fn metrics(&self) -> Arc<UptimeMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Serve until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_addr;
        info!(addr = %bind_addr, "Starting uptime HTTP server");

        let app = self.router();

        let listener = tokio::net::TcpListener::bind(bind_addr).await?;
        info!(addr = %bind_addr, "Uptime HTTP server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Uptime HTTP server stopped");
        Ok(())
    }

    /// Build the axum router with all routes.
    pub fn router(&self) -> Router {
        let resource_path = format!("/{}", self.state.resource.info().path);
        info!(path = %resource_path, "Registering uptime resource");

        let mut app = Router::new()
            // Uptime resource (GET only)
            .route(&resource_path, get(api::get_uptime))
            // Resource discovery
            .route("/.well-known/core", get(api::well_known_core))
            // Health check
            .route("/health", get(api::health_check))
            // Prometheus metrics endpoint
            .route("/metrics", get(metrics::metrics_handler))
            // Extensions
            .layer(Extension(Arc::clone(&self.state)))
            .layer(Extension(Arc::clone(&self.metrics)));

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        app
    }
}
