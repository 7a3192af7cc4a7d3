//! Versioned data snapshots.
//!
//! Requests read the current snapshot once, at their start, and use it for
//! every query they issue. Installing a new snapshot only affects requests
//! that start afterwards.

use std::sync::Arc;

use parking_lot::RwLock;

use super::DbPool;
use crate::observability::metrics;

/// A data version and the pool serving it.
pub struct DbSnapshot {
    version: String,
    db: DbPool,
}

impl DbSnapshot {
    pub fn new(version: impl Into<String>, db: DbPool) -> Self {
        Self {
            version: version.into(),
            db,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn db(&self) -> &DbPool {
        &self.db
    }
}

impl std::fmt::Debug for DbSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbSnapshot")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// Shared handle to the current snapshot.
///
/// The lock is held only while the `Arc` is cloned or replaced, never
/// across a query.
#[derive(Clone)]
pub struct SnapshotHandle {
    current: Arc<RwLock<Arc<DbSnapshot>>>,
}

impl SnapshotHandle {
    pub fn new(snapshot: DbSnapshot) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    /// The snapshot new requests should use.
    pub fn current(&self) -> Arc<DbSnapshot> {
        self.current.read().clone()
    }

    /// Make `snapshot` current and return the one it replaces. Requests
    /// already holding the previous snapshot keep using it.
    pub fn install(&self, snapshot: DbSnapshot) -> Arc<DbSnapshot> {
        let version = snapshot.version().to_string();
        let previous = std::mem::replace(&mut *self.current.write(), Arc::new(snapshot));
        tracing::info!(
            previous = %previous.version(),
            current = %version,
            "Installed data snapshot"
        );
        metrics::record_snapshot_install(&version);
        previous
    }
}

impl std::fmt::Debug for SnapshotHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotHandle")
            .field("version", &self.current.read().version())
            .finish()
    }
}
