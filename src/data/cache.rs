use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use super::error::LoadError;
use super::loader::load_file;
use super::model::JobTable;

/// Write-once holder for the normalized table of one source file.
///
/// The first successful [`DatasetCache::get_or_load`] reads the file; every
/// later call hands out the same `Arc` without touching the source again.
/// A failed load leaves the cache empty so the next call retries.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    table: OnceLock<Arc<JobTable>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the table has already been loaded.
    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    pub fn get_or_load(&self) -> Result<Arc<JobTable>, LoadError> {
        if let Some(table) = self.table.get() {
            return Ok(Arc::clone(table));
        }
        let loaded = Arc::new(load_file(&self.path)?);
        // A concurrent initializer may have won; either way hand out the stored one.
        Ok(Arc::clone(self.table.get_or_init(|| loaded)))
    }
}
