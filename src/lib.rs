//! manifold - A control-plane object registry
//!
//! Stores named, typed configuration objects behind an HTTP API, bumps a
//! monotonic configuration version on every accepted mutation, and serves
//! an independently maintained status view of those objects.

pub mod api;
pub mod cli;
pub mod http_server;
pub mod registry;
pub mod spec;
pub mod status;
