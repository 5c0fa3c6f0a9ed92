//! API error types
//!
//! Client errors are answered locally with a status code and message.
//! `Serialization` and `Registry` mean the stored state is not
//! representable or a writer died mid-mutation; they are fatal for the
//! request that hit them.

use thiserror::Error;

use crate::registry::RegistryError;
use crate::spec::SpecError;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    MalformedInput(#[from] SpecError),

    #[error("inconsistent name in url and spec: {path} != {spec}")]
    NameMismatch { path: String, spec: String },

    #[error("conflict name: {0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("different kinds: {existing}, {requested}")]
    KindMismatch { existing: String, requested: String },

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ApiError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MalformedInput(err) => err.code(),
            ApiError::NameMismatch { .. } => "MANIFOLD_NAME_MISMATCH",
            ApiError::Conflict(_) => "MANIFOLD_CONFLICT",
            ApiError::NotFound(_) => "MANIFOLD_NOT_FOUND",
            ApiError::KindMismatch { .. } => "MANIFOLD_KIND_MISMATCH",
            ApiError::Serialization(_) => "MANIFOLD_SERIALIZATION",
            ApiError::Registry(err) => err.code(),
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::MalformedInput(_) => 400,
            ApiError::NameMismatch { .. } => 400,
            ApiError::Conflict(_) => 409,
            ApiError::NotFound(_) => 404,
            ApiError::KindMismatch { .. } => 400,
            ApiError::Serialization(_) => 500,
            ApiError::Registry(_) => 500,
        }
    }

    /// Whether the error points at a bug or corrupted state rather than
    /// a bad request
    pub fn is_fatal(&self) -> bool {
        matches!(self, ApiError::Serialization(_) | ApiError::Registry(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Conflict("svc1".into()).status_code(), 409);
        assert_eq!(ApiError::NotFound("svc1".into()).status_code(), 404);
        assert_eq!(
            ApiError::KindMismatch {
                existing: "Pipeline".into(),
                requested: "Other".into()
            }
            .status_code(),
            400
        );
        assert_eq!(ApiError::from(SpecError::NotAMapping).status_code(), 400);
        assert_eq!(ApiError::from(RegistryError::LockPoisoned).status_code(), 500);
    }

    #[test]
    fn test_malformed_input_keeps_spec_code() {
        let err = ApiError::from(SpecError::UnknownKind("Gadget".into()));
        assert_eq!(err.code(), "MANIFOLD_SPEC_UNKNOWN_KIND");
        assert!(err.to_string().contains("Gadget"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_fatal_errors() {
        assert!(ApiError::Serialization("bad".into()).is_fatal());
        assert!(ApiError::from(RegistryError::LockPoisoned).is_fatal());
        assert!(!ApiError::Conflict("svc1".into()).is_fatal());
    }
}
