use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;
use tracing::debug;

/// Identity of a file's content as far as the cache is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

impl Fingerprint {
    fn of(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        Ok(Self {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

/// Read-through cache keyed by path and file fingerprint (mtime + size).
///
/// A changed file is reloaded on the next access; unchanged files are served
/// from memory.
pub struct ReadThroughCache<T> {
    entries: Mutex<HashMap<PathBuf, (Fingerprint, Arc<T>)>>,
}

impl<T> Default for ReadThroughCache<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> ReadThroughCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load<F, E>(&self, path: &Path, load: F) -> Result<Arc<T>, E>
    where
        F: FnOnce(&Path) -> Result<T, E>,
        E: From<std::io::Error>,
    {
        let fingerprint = Fingerprint::of(path)?;

        {
            let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some((cached, value)) = entries.get(path) {
                if *cached == fingerprint {
                    debug!(path = %path.display(), "cache hit");
                    return Ok(Arc::clone(value));
                }
            }
        }

        let value = Arc::new(load(path)?);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(path.to_path_buf(), (fingerprint, Arc::clone(&value)));
        debug!(path = %path.display(), "cache refreshed");
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("nmt-advisor-cache-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("scratch dir");
        let path = dir.join(name);
        std::fs::write(&path, contents).expect("scratch file");
        path
    }

    #[test]
    fn serves_unchanged_files_from_memory() {
        let path = scratch_file("unchanged.txt", "alpha");
        let cache: ReadThroughCache<String> = ReadThroughCache::new();
        let loads = Cell::new(0);
        let load = |path: &Path| {
            loads.set(loads.get() + 1);
            std::fs::read_to_string(path)
        };

        let first = cache.get_or_load(&path, load).expect("first load");
        let second = cache.get_or_load(&path, load).expect("second load");

        assert_eq!(loads.get(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn reloads_after_content_changes() {
        let path = scratch_file("changing.txt", "short");
        let cache: ReadThroughCache<String> = ReadThroughCache::new();

        let before = cache
            .get_or_load(&path, |path| std::fs::read_to_string(path))
            .expect("initial load");
        std::fs::write(&path, "considerably longer").expect("rewrite");
        let after = cache
            .get_or_load(&path, |path| std::fs::read_to_string(path))
            .expect("reload");

        assert_eq!(before.as_str(), "short");
        assert_eq!(after.as_str(), "considerably longer");
    }

    #[test]
    fn missing_files_surface_io_errors() {
        let cache: ReadThroughCache<String> = ReadThroughCache::new();
        let result: Result<_, std::io::Error> = cache.get_or_load(
            Path::new("/definitely/not/here.csv"),
            |path| std::fs::read_to_string(path),
        );
        assert!(result.is_err());
        assert!(cache.is_empty());
    }
}
