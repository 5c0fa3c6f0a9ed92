//! # Kind Registry
//!
//! The set of object kinds the server accepts. Each kind carries a
//! validator that sees the parsed document before it reaches the object
//! registry.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_yaml::Mapping;

use super::errors::{SpecError, SpecResult};

/// Kind-specific validation of a parsed document
pub trait KindValidator: Send + Sync {
    /// Returns a human readable reason on rejection
    fn validate(&self, document: &Mapping) -> Result<(), String>;
}

impl<F> KindValidator for F
where
    F: Fn(&Mapping) -> Result<(), String> + Send + Sync,
{
    fn validate(&self, document: &Mapping) -> Result<(), String> {
        self(document)
    }
}

/// Requires a fixed list of top-level keys
#[derive(Debug, Clone, Default)]
pub struct RequiredFields {
    fields: Vec<String>,
}

impl RequiredFields {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Accepts any document
    pub fn none() -> Self {
        Self::default()
    }
}

impl KindValidator for RequiredFields {
    fn validate(&self, document: &Mapping) -> Result<(), String> {
        for field in &self.fields {
            if !document.contains_key(field.as_str()) {
                return Err(format!("missing required field '{}'", field));
            }
        }
        Ok(())
    }
}

/// Registered kinds, keyed by tag
#[derive(Clone, Default)]
pub struct KindRegistry {
    validators: BTreeMap<String, Arc<dyn KindValidator>>,
}

impl KindRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Kinds available when the configuration names none
    pub fn builtin() -> Self {
        Self::new()
            .with_kind("HTTPServer", RequiredFields::new(["port"]))
            .with_kind("Pipeline", RequiredFields::none())
    }

    /// Register (or replace) a kind
    pub fn register(
        &mut self,
        kind: impl Into<String>,
        validator: impl KindValidator + 'static,
    ) -> &mut Self {
        self.validators.insert(kind.into(), Arc::new(validator));
        self
    }

    /// Builder form of [`KindRegistry::register`]
    pub fn with_kind(
        mut self,
        kind: impl Into<String>,
        validator: impl KindValidator + 'static,
    ) -> Self {
        self.register(kind, validator);
        self
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.validators.contains_key(kind)
    }

    /// Registered kind names, sorted
    pub fn kinds(&self) -> Vec<String> {
        self.validators.keys().cloned().collect()
    }

    /// Run the validator registered for `kind`
    pub fn validate(&self, kind: &str, document: &Mapping) -> SpecResult<()> {
        let validator = self
            .validators
            .get(kind)
            .ok_or_else(|| SpecError::UnknownKind(kind.to_string()))?;

        validator.validate(document).map_err(|reason| SpecError::Validation {
            kind: kind.to_string(),
            reason,
        })
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl fmt::Debug for KindRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindRegistry")
            .field("kinds", &self.validators.keys().collect::<Vec<_>>())
            .finish()
    }
}
