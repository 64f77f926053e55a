//! Fact persistence between units.
//!
//! The engine only needs two operations: publish a unit's bundle once, and
//! read back the bundle of an already analyzed unit. Hosts with their own
//! persistence implement [`FactStore`]; [`MemoryFactStore`] covers a single
//! process run.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{EnumcheckError, EnumcheckResult};
use crate::facts::FactBundle;

pub trait FactStore: Send + Sync {
    /// Publishes the frozen bundle of `unit`.
    fn export(&self, unit: &str, bundle: FactBundle) -> EnumcheckResult<Arc<FactBundle>>;

    /// Bundle exported by `unit`, if it declared any closed type.
    fn import(&self, unit: &str) -> EnumcheckResult<Option<Arc<FactBundle>>>;
}

/// Process-local store shared by all workers of a run.
#[derive(Debug, Default)]
pub struct MemoryFactStore {
    bundles: RwLock<HashMap<String, Arc<FactBundle>>>,
}

impl MemoryFactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every exported bundle, sorted by unit path.
    pub fn bundles(&self) -> EnumcheckResult<Vec<Arc<FactBundle>>> {
        let guard = self
            .bundles
            .read()
            .map_err(|_| EnumcheckError::internal("fact store lock poisoned"))?;
        let mut all: Vec<Arc<FactBundle>> = guard.values().cloned().collect();
        all.sort_by(|a, b| a.unit().cmp(b.unit()));
        Ok(all)
    }

    pub fn len(&self) -> usize {
        self.bundles.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FactStore for MemoryFactStore {
    fn export(&self, unit: &str, bundle: FactBundle) -> EnumcheckResult<Arc<FactBundle>> {
        let mut guard = self
            .bundles
            .write()
            .map_err(|_| EnumcheckError::internal("fact store lock poisoned"))?;
        if guard.contains_key(unit) {
            return Err(EnumcheckError::DuplicateExport {
                unit: unit.to_string(),
            });
        }
        let bundle = Arc::new(bundle);
        guard.insert(unit.to_string(), Arc::clone(&bundle));
        Ok(bundle)
    }

    fn import(&self, unit: &str) -> EnumcheckResult<Option<Arc<FactBundle>>> {
        let guard = self
            .bundles
            .read()
            .map_err(|_| EnumcheckError::internal("fact store lock poisoned"))?;
        Ok(guard.get(unit).cloned())
    }
}
