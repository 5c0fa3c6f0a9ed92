//! # Object Store
//!
//! Copy-on-write map behind an `ArcSwap`. Writers clone the current map,
//! modify the clone and publish it; readers pin whichever map was current
//! when they loaded it.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use arc_swap::ArcSwap;
use tokio::sync::broadcast;

use super::errors::{RegistryError, RegistryResult};
use super::events::{RegistryChange, RegistryEvent};
use crate::spec::Spec;

/// Change feed capacity when none is configured
pub const DEFAULT_EVENT_BUFFER: usize = 256;

type Objects = HashMap<String, Arc<Spec>>;

/// Registry of configuration objects with a monotonic version
pub struct ObjectRegistry {
    objects: ArcSwap<Objects>,

    /// The configuration version. Holding this mutex is holding the
    /// registry write lock.
    write_lock: Mutex<u64>,

    /// Last version handed out, readable without the lock
    published_version: AtomicU64,

    events: broadcast::Sender<RegistryEvent>,
}

impl ObjectRegistry {
    /// Create an empty registry at version 0
    pub fn new() -> Self {
        Self::with_event_buffer(DEFAULT_EVENT_BUFFER)
    }

    /// Create a registry whose change feed buffers `capacity` events
    pub fn with_event_buffer(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            objects: ArcSwap::from_pointee(Objects::new()),
            write_lock: Mutex::new(0),
            published_version: AtomicU64::new(0),
            events,
        }
    }

    /// Lock-free lookup
    pub fn get(&self, name: &str) -> Option<Arc<Spec>> {
        self.objects.load().get(name).cloned()
    }

    /// Lock-free snapshot of every object, in no particular order
    pub fn list(&self) -> Vec<Arc<Spec>> {
        self.objects.load().values().cloned().collect()
    }

    /// Current configuration version
    pub fn version(&self) -> u64 {
        self.published_version.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.objects.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Acquire the exclusive write lock
    ///
    /// Every mutation and its version bump must happen through the
    /// returned guard. Do not hold it across an `.await`.
    pub fn lock(&self) -> RegistryResult<RegistryWriteGuard<'_>> {
        let version = self
            .write_lock
            .lock()
            .map_err(|_| RegistryError::LockPoisoned)?;

        Ok(RegistryWriteGuard {
            version,
            registry: self,
            pending: None,
        })
    }

    /// Subscribe to accepted mutations
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObjectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRegistry")
            .field("objects", &self.len())
            .field("version", &self.version())
            .finish()
    }
}

/// Exclusive access to the registry
///
/// Dropping the guard releases the lock.
pub struct RegistryWriteGuard<'a> {
    version: MutexGuard<'a, u64>,
    registry: &'a ObjectRegistry,
    pending: Option<RegistryChange>,
}

impl RegistryWriteGuard<'_> {
    /// Authoritative lookup; no writer can race it while the guard is held
    pub fn get(&self, name: &str) -> Option<Arc<Spec>> {
        self.registry.get(name)
    }

    /// Insert or replace `spec` under its own name
    pub fn put(&mut self, spec: Spec) -> Option<Arc<Spec>> {
        let name = spec.name().to_string();
        let kind = spec.kind().to_string();

        let mut next: Objects = (**self.registry.objects.load()).clone();
        let previous = next.insert(name.clone(), Arc::new(spec));
        self.registry.objects.store(Arc::new(next));

        self.pending = Some(RegistryChange::Put { name, kind });
        previous
    }

    /// Remove `name` if present
    pub fn delete(&mut self, name: &str) -> Option<Arc<Spec>> {
        let current = self.registry.objects.load_full();
        if !current.contains_key(name) {
            return None;
        }

        let mut next: Objects = (*current).clone();
        let removed = next.remove(name);
        self.registry.objects.store(Arc::new(next));

        self.pending = Some(RegistryChange::Delete {
            name: name.to_string(),
        });
        removed
    }

    /// Advance the configuration version and announce the pending change
    pub fn bump_version(&mut self) -> u64 {
        *self.version += 1;
        let version = *self.version;
        self.registry
            .published_version
            .store(version, Ordering::Release);

        if let Some(change) = self.pending.take() {
            // Err only means nobody is subscribed.
            let _ = self.registry.events.send(RegistryEvent::new(version, change));
        }

        version
    }

    /// Version as of the last bump
    pub fn version(&self) -> u64 {
        *self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{KindRegistry, RequiredFields};
    use std::thread;

    fn spec(name: &str, kind: &str) -> Spec {
        let kinds = KindRegistry::builtin().with_kind("Other", RequiredFields::none());
        let text = format!("name: {}\nkind: {}\nport: 80\n", name, kind);
        Spec::parse_str(&text, &kinds).unwrap()
    }

    #[test]
    fn test_put_get_delete() {
        let registry = ObjectRegistry::new();
        assert!(registry.is_empty());

        {
            let mut guard = registry.lock().unwrap();
            assert!(guard.put(spec("svc1", "Pipeline")).is_none());
            assert_eq!(guard.bump_version(), 1);
        }

        assert_eq!(registry.get("svc1").unwrap().kind(), "Pipeline");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.version(), 1);

        {
            let mut guard = registry.lock().unwrap();
            assert!(guard.delete("svc1").is_some());
            assert!(guard.delete("svc1").is_none());
            assert_eq!(guard.bump_version(), 2);
        }

        assert!(registry.get("svc1").is_none());
        assert_eq!(registry.version(), 2);
    }

    #[test]
    fn test_put_replaces() {
        let registry = ObjectRegistry::new();
        let mut guard = registry.lock().unwrap();
        guard.put(spec("svc1", "Pipeline"));
        let previous = guard.put(spec("svc1", "Other")).unwrap();

        assert_eq!(previous.kind(), "Pipeline");
        assert_eq!(guard.get("svc1").unwrap().kind(), "Other");
    }

    #[test]
    fn test_reader_keeps_old_snapshot() {
        let registry = ObjectRegistry::new();
        {
            let mut guard = registry.lock().unwrap();
            guard.put(spec("svc1", "Pipeline"));
            guard.bump_version();
        }

        let held = registry.get("svc1").unwrap();
        {
            let mut guard = registry.lock().unwrap();
            guard.delete("svc1");
            guard.bump_version();
        }

        assert_eq!(held.name(), "svc1");
        assert!(registry.get("svc1").is_none());
    }

    #[test]
    fn test_events_follow_versions() {
        let registry = ObjectRegistry::new();
        let mut rx = registry.subscribe();

        {
            let mut guard = registry.lock().unwrap();
            guard.put(spec("a", "Pipeline"));
            guard.bump_version();
            guard.delete("a");
            guard.bump_version();
        }

        let first = rx.try_recv().unwrap();
        assert_eq!(first.version, 1);
        assert_eq!(
            first.change,
            RegistryChange::Put {
                name: "a".into(),
                kind: "Pipeline".into()
            }
        );

        let second = rx.try_recv().unwrap();
        assert_eq!(second.version, 2);
        assert_eq!(second.change, RegistryChange::Delete { name: "a".into() });
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_concurrent_bumps_are_unique() {
        let registry = Arc::new(ObjectRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    let mut versions = Vec::new();
                    for j in 0..25 {
                        let mut guard = registry.lock().unwrap();
                        guard.put(spec(&format!("obj-{}-{}", i, j), "Pipeline"));
                        versions.push(guard.bump_version());
                    }
                    versions
                })
            })
            .collect();

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();

        assert_eq!(all, (1..=200).collect::<Vec<u64>>());
        assert_eq!(registry.len(), 200);
        assert_eq!(registry.version(), 200);
    }

    #[test]
    fn test_poisoned_lock() {
        let registry = Arc::new(ObjectRegistry::new());
        let poisoner = Arc::clone(&registry);

        let result = thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("writer died");
        })
        .join();
        assert!(result.is_err());

        assert_eq!(registry.lock().err(), Some(RegistryError::LockPoisoned));
    }
}
