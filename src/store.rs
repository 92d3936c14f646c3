//! Load-once dataset store.
//!
//! The store owns the path of the sales file and reads it on first use.
//! Later calls hand out the same shared `Arc<Dataset>`; a failed load is not
//! remembered, so the next call tries again.

use crate::dataset::Dataset;
use crate::error::LoadError;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub struct DatasetStore {
    path: PathBuf,
    loaded: Mutex<Option<Arc<Dataset>>>,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DatasetStore {
            path: path.into(),
            loaded: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true once a load has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.slot().is_some()
    }

    /// Return the dataset, reading the file on the first call only.
    pub fn load(&self) -> Result<Arc<Dataset>, LoadError> {
        let mut slot = self.slot();
        if let Some(dataset) = slot.as_ref() {
            debug!("Serving cached dataset for {}", self.path.display());
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(Dataset::from_path(&self.path)?);
        *slot = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Arc<Dataset>>> {
        // The guarded value is only ever replaced whole, so a poisoned lock
        // still holds a consistent state.
        self.loaded.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for DatasetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DatasetStore {{ path: '{}', loaded: {} }}",
            self.path.display(),
            self.is_loaded()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "salesboard-store-{}-{}.csv",
            name,
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_once() {
        let path = temp_csv(
            "once",
            "title,console,genre,publisher,year,total_sales,na_sales,pal_sales,jp_sales\n\
             Halo 3,X360,Shooter,Microsoft Studios,2007,8.09,4.8,2.59,0.13\n",
        );
        let store = DatasetStore::new(&path);
        assert!(!store.is_loaded());

        let first = store.load().unwrap();
        assert!(store.is_loaded());
        assert_eq!(first.len(), 1);

        // The file is gone, but the cached table is still served.
        fs::remove_file(&path).unwrap();
        let second = store.load().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let path = std::env::temp_dir().join(format!(
            "salesboard-store-retry-{}.csv",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        let store = DatasetStore::new(&path);

        assert!(matches!(store.load(), Err(LoadError::Io { .. })));
        assert!(!store.is_loaded());

        fs::write(
            &path,
            "title,console,genre,publisher,year,total_sales,na_sales,pal_sales,jp_sales\n\
             Tetris,GB,Puzzle,Nintendo,1989,30.26,23.2,2.26,4.22\n",
        )
        .unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_columns_fail_whole_load() {
        let path = temp_csv("columns", "title,console\nHalo 3,X360\n");
        let store = DatasetStore::new(&path);
        assert!(matches!(store.load(), Err(LoadError::MissingColumns(_))));
        fs::remove_file(&path).unwrap();
    }
}
