//! # Registry Events
//!
//! One event per accepted mutation, consumed by whatever turns the
//! declared configuration into running components.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What an accepted mutation did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RegistryChange {
    /// Object created or replaced
    Put { name: String, kind: String },
    /// Object removed
    Delete { name: String },
}

impl RegistryChange {
    pub fn name(&self) -> &str {
        match self {
            RegistryChange::Put { name, .. } | RegistryChange::Delete { name } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryEvent {
    /// Configuration version produced by this change
    pub version: u64,
    pub change: RegistryChange,
    pub at: DateTime<Utc>,
}

impl RegistryEvent {
    pub fn new(version: u64, change: RegistryChange) -> Self {
        Self {
            version,
            change,
            at: Utc::now(),
        }
    }
}
