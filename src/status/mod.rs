//! Status view
//!
//! Last observed runtime status per object, written by whatever runs the
//! objects and read by the API without touching the registry lock. The
//! view is allowed to lag the registry in both directions: a status can
//! outlive its object and an object can exist before it has a status.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

/// Opaque status payload, never interpreted here
pub type StatusValue = serde_yaml::Value;

/// Source of runtime status snapshots
pub trait StatusSource: Send + Sync {
    /// Last observed status of `name`, if any
    fn status_of(&self, name: &str) -> Option<StatusValue>;

    /// Every known status, sorted by name
    fn all_statuses(&self) -> BTreeMap<String, StatusValue>;
}

/// In-memory status view with copy-on-write publication
#[derive(Default)]
pub struct StatusView {
    statuses: ArcSwap<BTreeMap<String, StatusValue>>,
}

impl StatusView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the latest status of one object
    pub fn publish(&self, name: impl Into<String>, status: StatusValue) {
        let name = name.into();
        self.statuses.rcu(|current| {
            let mut next = BTreeMap::clone(current);
            next.insert(name.clone(), status.clone());
            next
        });
    }

    /// Forget the status of one object
    pub fn remove(&self, name: &str) -> Option<StatusValue> {
        let previous = self.statuses.rcu(|current| {
            let mut next = BTreeMap::clone(current);
            next.remove(name);
            next
        });
        previous.get(name).cloned()
    }

    /// Swap in a complete snapshot
    pub fn replace_all(&self, statuses: BTreeMap<String, StatusValue>) {
        self.statuses.store(Arc::new(statuses));
    }

    pub fn len(&self) -> usize {
        self.statuses.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StatusSource for StatusView {
    fn status_of(&self, name: &str) -> Option<StatusValue> {
        self.statuses.load().get(name).cloned()
    }

    fn all_statuses(&self) -> BTreeMap<String, StatusValue> {
        BTreeMap::clone(&self.statuses.load())
    }
}

impl fmt::Debug for StatusView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusView")
            .field("statuses", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(yaml: &str) -> StatusValue {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_publish_and_read() {
        let view = StatusView::new();
        assert!(view.is_empty());

        view.publish("svc1", status("health: ok\n"));
        assert_eq!(view.status_of("svc1"), Some(status("health: ok\n")));
        assert_eq!(view.status_of("svc2"), None);
    }

    #[test]
    fn test_publish_overwrites() {
        let view = StatusView::new();
        view.publish("svc1", status("health: starting\n"));
        view.publish("svc1", status("health: ok\n"));

        assert_eq!(view.len(), 1);
        assert_eq!(view.status_of("svc1"), Some(status("health: ok\n")));
    }

    #[test]
    fn test_remove() {
        let view = StatusView::new();
        view.publish("svc1", status("health: ok\n"));

        assert_eq!(view.remove("svc1"), Some(status("health: ok\n")));
        assert_eq!(view.remove("svc1"), None);
        assert!(view.is_empty());
    }

    #[test]
    fn test_all_statuses_sorted() {
        let view = StatusView::new();
        view.publish("c", status("n: 3\n"));
        view.publish("a", status("n: 1\n"));
        view.publish("b", status("n: 2\n"));

        let names: Vec<_> = view.all_statuses().into_keys().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_replace_all() {
        let view = StatusView::new();
        view.publish("old", status("n: 0\n"));

        let mut fresh = BTreeMap::new();
        fresh.insert("new".to_string(), status("n: 1\n"));
        view.replace_all(fresh);

        assert_eq!(view.status_of("old"), None);
        assert!(view.status_of("new").is_some());
    }
}
