//! In-memory runtime.

use async_trait::async_trait;
use parking_lot::RwLock;
use path_clean::PathClean;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

/// Runtime that keeps every file in memory
///
/// Directories are implicit: a path is a directory when some file lives
/// below it, or when it was created with [`Runtime::create_dir`].
#[derive(Debug, Clone)]
pub struct MemoryRuntime {
    files: Arc<RwLock<FxHashMap<PathBuf, Vec<u8>>>>,
    dirs: Arc<RwLock<BTreeSet<PathBuf>>>,
    /// Current working directory for resolving relative paths
    cwd: PathBuf,
}

impl MemoryRuntime {
    /// Create an empty runtime rooted at `/`
    pub fn new() -> Self {
        Self::with_cwd("/")
    }

    pub fn with_cwd(cwd: impl Into<PathBuf>) -> Self {
        Self {
            files: Arc::new(RwLock::new(FxHashMap::default())),
            dirs: Arc::new(RwLock::new(BTreeSet::new())),
            cwd: cwd.into(),
        }
    }

    /// Add a file
    ///
    /// The path is normalized before storage to ensure consistent lookup.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let normalized = self.normalize(path.as_ref());
        self.files.write().insert(normalized, content.into());
    }

    /// Normalize a path for lookup
    ///
    /// This ensures that paths like "/foo/bar.css" and "./bar.css" (when cwd is /foo)
    /// are treated consistently.
    fn normalize(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.clean()
        } else {
            self.cwd.join(path).clean()
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        if self.dirs.read().contains(path) {
            return true;
        }
        self.files
            .read()
            .keys()
            .any(|file| file != path && file.starts_with(path))
    }
}

impl Default for MemoryRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Runtime for MemoryRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        let normalized = self.normalize(path);
        self.files
            .read()
            .get(&normalized)
            .cloned()
            .ok_or(RuntimeError::FileNotFound(normalized))
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()> {
        let normalized = self.normalize(path);
        self.files.write().insert(normalized, content.to_vec());
        Ok(())
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        let normalized = self.normalize(path);
        if let Some(content) = self.files.read().get(&normalized) {
            return Ok(FileMetadata {
                size: content.len() as u64,
                is_dir: false,
                is_file: true,
                modified: None,
            });
        }

        if self.is_dir(&normalized) {
            return Ok(FileMetadata {
                size: 0,
                is_dir: true,
                is_file: false,
                modified: None,
            });
        }

        Err(RuntimeError::FileNotFound(normalized))
    }

    fn exists(&self, path: &Path) -> bool {
        let normalized = self.normalize(path);
        self.files.read().contains_key(&normalized) || self.is_dir(&normalized)
    }

    async fn create_dir(&self, path: &Path, _recursive: bool) -> RuntimeResult<()> {
        let normalized = self.normalize(path);
        self.dirs.write().insert(normalized);
        Ok(())
    }

    async fn read_dir(&self, path: &Path) -> RuntimeResult<Vec<String>> {
        let normalized = self.normalize(path);
        if !self.is_dir(&normalized) {
            return Err(RuntimeError::FileNotFound(normalized));
        }

        let mut names = BTreeSet::new();
        let files = self.files.read();
        let dirs = self.dirs.read();
        for entry in files.keys().chain(dirs.iter()) {
            if let Ok(rest) = entry.strip_prefix(&normalized) {
                if let Some(first) = rest.components().next() {
                    names.insert(first.as_os_str().to_string_lossy().into_owned());
                }
            }
        }

        Ok(names.into_iter().collect())
    }

    fn get_cwd(&self) -> RuntimeResult<PathBuf> {
        Ok(self.cwd.clone())
    }
}
