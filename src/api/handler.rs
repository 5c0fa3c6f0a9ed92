//! Object API handler
//!
//! Lifecycle per object name: absent → present → absent. The kind is fixed
//! while the object is present.

use std::sync::Arc;

use serde::Serialize;
use serde_yaml::Mapping;
use tracing::{error, info, warn};

use crate::registry::ObjectRegistry;
use crate::spec::{KindRegistry, Spec};
use crate::status::StatusSource;

use super::errors::{ApiError, ApiResult};

/// Outcome of an accepted create, update or delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub name: String,
    /// Configuration version produced by this mutation
    pub version: u64,
}

/// Stateless request handlers over the registry and status view
#[derive(Clone)]
pub struct ObjectApi {
    registry: Arc<ObjectRegistry>,
    kinds: Arc<KindRegistry>,
    status: Arc<dyn StatusSource>,
}

impl ObjectApi {
    pub fn new(
        registry: Arc<ObjectRegistry>,
        kinds: Arc<KindRegistry>,
        status: Arc<dyn StatusSource>,
    ) -> Self {
        Self {
            registry,
            kinds,
            status,
        }
    }

    pub fn registry(&self) -> &Arc<ObjectRegistry> {
        &self.registry
    }

    pub fn kinds(&self) -> &Arc<KindRegistry> {
        &self.kinds
    }

    /// Parse a request body, checking it against the name in the path
    fn read_spec(&self, body: &[u8], path_name: Option<&str>) -> ApiResult<Spec> {
        let spec = Spec::parse(body, &self.kinds)?;

        match path_name {
            Some(path) if !path.is_empty() && path != spec.name() => Err(ApiError::NameMismatch {
                path: path.to_string(),
                spec: spec.name().to_string(),
            }),
            _ => Ok(spec),
        }
    }

    /// Create a new object
    ///
    /// Flow:
    /// 1. Parse and check the path name (no lock)
    /// 2. Under the lock: reject an existing name, put, bump version
    pub fn create(&self, body: &[u8], path_name: Option<&str>) -> ApiResult<Mutation> {
        let spec = self.read_spec(body, path_name)?;
        let name = spec.name().to_string();
        let kind = spec.kind().to_string();

        let version = {
            let mut guard = self.registry.lock()?;

            if guard.get(&name).is_some() {
                warn!(name = %name, "create rejected, name already exists");
                return Err(ApiError::Conflict(name));
            }

            guard.put(spec);
            guard.bump_version()
        };

        info!(name = %name, kind = %kind, version, "object created");
        Ok(Mutation { name, version })
    }

    /// Replace an existing object of the same kind
    pub fn update(&self, name: &str, body: &[u8]) -> ApiResult<Mutation> {
        let spec = self.read_spec(body, Some(name))?;
        let name = spec.name().to_string();

        let version = {
            let mut guard = self.registry.lock()?;

            let existing = guard
                .get(&name)
                .ok_or_else(|| ApiError::NotFound(name.clone()))?;

            if existing.kind() != spec.kind() {
                warn!(
                    name = %name,
                    existing = existing.kind(),
                    requested = spec.kind(),
                    "update rejected, kind cannot change"
                );
                return Err(ApiError::KindMismatch {
                    existing: existing.kind().to_string(),
                    requested: spec.kind().to_string(),
                });
            }

            guard.put(spec);
            guard.bump_version()
        };

        info!(name = %name, version, "object updated");
        Ok(Mutation { name, version })
    }

    /// Remove an object
    pub fn delete(&self, name: &str) -> ApiResult<Mutation> {
        let version = {
            let mut guard = self.registry.lock()?;

            if guard.delete(name).is_none() {
                return Err(ApiError::NotFound(name.to_string()));
            }

            guard.bump_version()
        };

        info!(name = %name, version, "object deleted");
        Ok(Mutation {
            name: name.to_string(),
            version,
        })
    }

    /// Current spec of one object. No lock.
    pub fn get(&self, name: &str) -> ApiResult<Arc<Spec>> {
        self.registry
            .get(name)
            .ok_or_else(|| ApiError::NotFound(name.to_string()))
    }

    /// Every object as a YAML sequence, sorted by name. No lock.
    pub fn list(&self) -> ApiResult<String> {
        let mut specs = self.registry.list();
        // Keep output stable across runs.
        specs.sort_by(|a, b| a.name().cmp(b.name()));

        let documents: Vec<&Mapping> = specs.iter().map(|spec| spec.document()).collect();
        to_yaml(&documents)
    }

    /// Registered kinds as a YAML sequence
    pub fn list_kinds(&self) -> ApiResult<String> {
        to_yaml(&self.kinds.kinds())
    }

    /// Last observed status of an existing object
    ///
    /// The object may be deleted between the existence check and the
    /// status read; the stale status is returned anyway.
    pub fn get_status(&self, name: &str) -> ApiResult<String> {
        if self.registry.get(name).is_none() {
            return Err(ApiError::NotFound(name.to_string()));
        }

        let status = self.status.status_of(name);
        to_yaml(&status)
    }

    /// Every known status, unfiltered by the registry
    pub fn list_statuses(&self) -> ApiResult<String> {
        to_yaml(&self.status.all_statuses())
    }
}

fn to_yaml<T: Serialize + ?Sized>(value: &T) -> ApiResult<String> {
    serde_yaml::to_string(value).map_err(|e| {
        error!(error = %e, "failed to marshal response to yaml");
        ApiError::Serialization(e.to_string())
    })
}
