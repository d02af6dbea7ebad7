use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::db::{Config, GraphBackend};

/// Clonable handle to a [`GraphBackend`] behind a reader-writer lock.
///
/// Mutations serialize through the write guard; queries share the read
/// guard, so a reader never observes a half-applied mutation.
#[derive(Clone, Default)]
pub struct SharedGraph {
    inner: Arc<RwLock<GraphBackend>>,
}

impl SharedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            inner: Arc::new(RwLock::new(GraphBackend::with_config(config))),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, GraphBackend> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, GraphBackend> {
        self.inner.write()
    }
}
