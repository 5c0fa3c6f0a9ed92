//! # Spec

use std::sync::OnceLock;

use regex::Regex;
use serde_yaml::{Mapping, Value};

use super::errors::{SpecError, SpecResult};
use super::kind::KindRegistry;

/// Object names end up as URL path segments, so only unreserved characters
/// are accepted.
pub const NAME_PATTERN: &str = r"^[A-Za-z0-9._~-]{1,253}$";

fn name_regex() -> &'static Regex {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE.get_or_init(|| Regex::new(NAME_PATTERN).expect("name pattern is a valid regex"))
}

/// A parsed, immutable configuration object
///
/// `canonical` is the document exactly as submitted, so reading an object
/// back returns the caller's own formatting and comments.
#[derive(Debug, Clone, PartialEq)]
pub struct Spec {
    name: String,
    kind: String,
    canonical: String,
    document: Mapping,
}

impl Spec {
    /// Parse a raw request body
    pub fn parse(raw: &[u8], kinds: &KindRegistry) -> SpecResult<Self> {
        let text = std::str::from_utf8(raw).map_err(|_| SpecError::InvalidEncoding)?;
        Self::parse_str(text, kinds)
    }

    /// Parse a YAML document and validate it against its kind
    pub fn parse_str(text: &str, kinds: &KindRegistry) -> SpecResult<Self> {
        let value: Value =
            serde_yaml::from_str(text).map_err(|e| SpecError::InvalidYaml(e.to_string()))?;

        let document = match value {
            Value::Mapping(document) => document,
            _ => return Err(SpecError::NotAMapping),
        };

        let name = string_field(&document, "name")?;
        if !name_regex().is_match(&name) {
            return Err(SpecError::InvalidName(name));
        }

        let kind = string_field(&document, "kind")?;
        kinds.validate(&kind, &document)?;

        Ok(Self {
            name,
            kind,
            canonical: text.to_string(),
            document,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The submitted YAML text
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// The parsed top-level mapping, key order preserved
    pub fn document(&self) -> &Mapping {
        &self.document
    }
}

fn string_field(document: &Mapping, field: &'static str) -> SpecResult<String> {
    match document.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(SpecError::MissingField(field)),
    }
}
