//! # Spec Errors

use thiserror::Error;

use super::object::NAME_PATTERN;

/// Result type for spec parsing
pub type SpecResult<T> = Result<T, SpecError>;

/// Reasons a submitted document cannot become a [`super::Spec`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("spec is not valid UTF-8")]
    InvalidEncoding,

    #[error("invalid yaml: {0}")]
    InvalidYaml(String),

    #[error("spec must be a yaml mapping")]
    NotAMapping,

    #[error("missing or non-string field: {0}")]
    MissingField(&'static str),

    #[error("invalid name {0:?}: must match {}", NAME_PATTERN)]
    InvalidName(String),

    #[error("unknown kind: {0}")]
    UnknownKind(String),

    #[error("invalid {kind} spec: {reason}")]
    Validation { kind: String, reason: String },
}

impl SpecError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SpecError::InvalidEncoding => "MANIFOLD_SPEC_ENCODING",
            SpecError::InvalidYaml(_) => "MANIFOLD_SPEC_YAML",
            SpecError::NotAMapping => "MANIFOLD_SPEC_NOT_MAPPING",
            SpecError::MissingField(_) => "MANIFOLD_SPEC_MISSING_FIELD",
            SpecError::InvalidName(_) => "MANIFOLD_SPEC_INVALID_NAME",
            SpecError::UnknownKind(_) => "MANIFOLD_SPEC_UNKNOWN_KIND",
            SpecError::Validation { .. } => "MANIFOLD_SPEC_VALIDATION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_name_mentions_pattern() {
        let err = SpecError::InvalidName("a/b".into());
        assert!(err.to_string().contains(NAME_PATTERN));
        assert_eq!(err.code(), "MANIFOLD_SPEC_INVALID_NAME");
    }
}
