use std::sync::Arc;

use anyhow::Result;

use crate::storage::StoragePort;

/// Key prefix for per-property view flags.
const VIEWED_KEY_PREFIX: &str = "viewed_property_";

/// Sentinel value; presence of the key is what matters.
const VIEWED_SENTINEL: &str = "true";

/// Idempotent "view already counted" flags, one per property, backed by
/// durable storage with no expiry. Guarantees at most one view-increment
/// call per property per installation.
#[derive(Clone)]
pub struct ViewTracker {
    storage: Arc<dyn StoragePort>,
}

impl ViewTracker {
    pub fn new(storage: Arc<dyn StoragePort>) -> Self {
        Self { storage }
    }

    pub fn has_recorded(&self, property_id: &str) -> bool {
        self.storage.get(&Self::key(property_id)).is_some()
    }

    pub fn mark_recorded(&self, property_id: &str) -> Result<()> {
        self.storage.set(&Self::key(property_id), VIEWED_SENTINEL)
    }

    fn key(property_id: &str) -> String {
        format!("{}{}", VIEWED_KEY_PREFIX, property_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn mark_then_has_recorded() {
        let storage: Arc<dyn StoragePort> = Arc::new(MemoryStorage::new());
        let tracker = ViewTracker::new(Arc::clone(&storage));

        assert!(!tracker.has_recorded("p1"));
        tracker.mark_recorded("p1").expect("mark");
        assert!(tracker.has_recorded("p1"));
        assert!(!tracker.has_recorded("p2"));
    }

    #[test]
    fn flags_survive_a_new_tracker_over_the_same_storage() {
        let storage: Arc<dyn StoragePort> = Arc::new(MemoryStorage::new());

        ViewTracker::new(Arc::clone(&storage))
            .mark_recorded("p42")
            .expect("mark");

        // A later session builds a new tracker over the same durable storage
        let later = ViewTracker::new(storage);
        assert!(later.has_recorded("p42"));
    }

    #[test]
    fn marking_twice_is_idempotent() {
        let storage: Arc<dyn StoragePort> = Arc::new(MemoryStorage::new());
        let tracker = ViewTracker::new(storage);

        tracker.mark_recorded("p9").expect("first");
        tracker.mark_recorded("p9").expect("second");
        assert!(tracker.has_recorded("p9"));
    }
}
