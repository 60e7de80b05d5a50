//! Stored form snapshots.

use std::collections::HashMap;

/// Immutable copy of a form's XML definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSnapshot {
    pub uid: String,
    pub xml: String,
}

/// Snapshot lookup by uid.
pub trait SnapshotStore {
    fn get(&self, uid: &str) -> Option<AssetSnapshot>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotStore {
    snapshots: HashMap<String, AssetSnapshot>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, snapshot: AssetSnapshot) {
        self.snapshots.insert(snapshot.uid.clone(), snapshot);
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn get(&self, uid: &str) -> Option<AssetSnapshot> {
        self.snapshots.get(uid).cloned()
    }
}
