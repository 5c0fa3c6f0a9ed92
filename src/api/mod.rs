//! API Layer for manifold
//!
//! Transport-independent handlers for the object and status resources.
//! The HTTP server only extracts path and body and shapes the response;
//! every identity, kind and versioning rule lives here.
//!
//! # Design Principles
//!
//! - Mutations run their whole check-then-act sequence under the registry
//!   write lock and bump the configuration version exactly once
//! - Reads (objects and statuses) never take the lock
//! - Serialization happens after the lock is released
//!
//! # Supported Operations
//!
//! - create / update / delete
//! - get / list objects
//! - list kinds
//! - get / list statuses

mod errors;
mod handler;
mod response;

pub use errors::{ApiError, ApiResult};
pub use handler::{Mutation, ObjectApi};
pub use response::{ErrorResponse, CONFIG_VERSION_HEADER, YAML_CONTENT_TYPE};
