use std::sync::{Arc, Mutex, PoisonError};

use crate::cookies::store::SnapshotStore;

#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    /// Last saved snapshot
    bytes: Mutex<Option<Vec<u8>>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates a store that already holds `snapshot`.
    pub fn with_snapshot(snapshot: impl Into<Vec<u8>>) -> Arc<Self> {
        Arc::new(Self {
            bytes: Mutex::new(Some(snapshot.into())),
        })
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.bytes.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, snapshot: &[u8]) -> anyhow::Result<()> {
        *self.bytes.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.to_vec());
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner).take();
        Ok(())
    }
}
