use super::table::EnrichedTable;
use crate::workflows::ingest::{IngestError, SchoolDatasetLoader};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

/// Memoizes `load -> clean -> enrich` per dataset path until invalidated.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: RwLock<HashMap<PathBuf, Arc<EnrichedTable>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&self, path: &Path) -> Result<Arc<EnrichedTable>, IngestError> {
        self.get_or_load_with(path, |path| {
            SchoolDatasetLoader::from_path(path).map(EnrichedTable::from_dataset)
        })
    }

    /// Same as [`DatasetCache::get_or_load`] with a caller-supplied loader.
    /// The loader runs at most once per key while the entry stays cached.
    pub fn get_or_load_with<F, E>(&self, path: &Path, load: F) -> Result<Arc<EnrichedTable>, E>
    where
        F: FnOnce(&Path) -> Result<EnrichedTable, E>,
    {
        if let Some(table) = self.cached(path) {
            debug!(source = %path.display(), "dataset cache hit");
            return Ok(table);
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = entries.get(path) {
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(load(path)?);
        info!(
            source = %path.display(),
            schools = table.len(),
            dropped = table.dropped_rows(),
            rejected = table.rejected().len(),
            "enriched table cached"
        );
        entries.insert(path.to_path_buf(), Arc::clone(&table));
        Ok(table)
    }

    pub fn cached(&self, path: &Path) -> Option<Arc<EnrichedTable>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    /// Returns true when an entry was evicted.
    pub fn invalidate(&self, path: &Path) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path)
            .is_some()
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
