//! # HTTP Server
//!
//! Main HTTP server combining the health and object routers.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::config::HttpServerConfig;
use super::object_routes::{object_routes, ObjectState};
use super::observability_routes::health_routes;
use crate::api::ObjectApi;

/// HTTP server for the object registry
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with default configuration
    pub fn new(api: ObjectApi) -> Self {
        Self::with_config(HttpServerConfig::default(), api)
    }

    /// Create a new HTTP server with custom configuration
    pub fn with_config(config: HttpServerConfig, api: ObjectApi) -> Self {
        let router = Self::build_router(&config, api);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, api: ObjectApi) -> Router {
        let registry = Arc::clone(api.registry());
        let objects = object_routes(Arc::new(ObjectState::new(api)));

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            use tower_http::cors::AllowOrigin;
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        // Nesting at "/" is not allowed, mount at the root instead.
        let prefix = config.api_prefix.trim_end_matches('/');
        let router = Router::new().merge(health_routes(registry));
        let router = if prefix.is_empty() {
            router.merge(objects)
        } else {
            router.nest(prefix, objects)
        };

        router.layer(TraceLayer::new_for_http()).layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        info!(
            addr = %addr,
            api_prefix = %self.config.api_prefix,
            "manifold API listening"
        );

        axum::serve(listener, self.router).await?;

        Ok(())
    }
}
