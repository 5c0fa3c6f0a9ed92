//! # Registry Errors

use thiserror::Error;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A writer panicked while holding the registry lock
    #[error("registry lock poisoned")]
    LockPoisoned,
}

impl RegistryError {
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::LockPoisoned => "MANIFOLD_REGISTRY_POISONED",
        }
    }
}
