//! # manifold HTTP Server Module
//!
//! Binds the object API to HTTP with axum.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `{api_prefix}/object-kinds` - Registered kinds
//! - `{api_prefix}/objects[/{name}]` - Object lifecycle
//! - `{api_prefix}/status/objects[/{name}]` - Observed status

pub mod config;
pub mod object_routes;
pub mod observability_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use server::HttpServer;
