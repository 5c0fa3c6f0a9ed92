//! API response conventions

use serde::{Deserialize, Serialize};

use super::errors::ApiError;

/// Carries the post-mutation configuration version
pub const CONFIG_VERSION_HEADER: &str = "x-config-version";

/// Media type for specs, lists and statuses
pub const YAML_CONTENT_TYPE: &str = "text/vnd.yaml";

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    /// Create from an API error
    pub fn from_error(err: &ApiError) -> Self {
        Self {
            status: "error".to_string(),
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}
