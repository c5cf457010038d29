//! Filesystem-backed runtime.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::task;

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

/// Runtime that reads and writes the real filesystem.
///
/// Blocking `std::fs` calls run on tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct NativeRuntime {
    /// Current working directory for resolving relative paths
    cwd: PathBuf,
}

impl NativeRuntime {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    /// Resolve a path relative to the current working directory
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

fn io_error(action: &str, path: &Path, err: std::io::Error) -> RuntimeError {
    if err.kind() == std::io::ErrorKind::NotFound {
        RuntimeError::FileNotFound(path.to_path_buf())
    } else {
        RuntimeError::Io(format!("Failed to {} {}: {}", action, path.display(), err))
    }
}

fn join_error(err: task::JoinError) -> RuntimeError {
    RuntimeError::Other(format!("Task join error: {}", err))
}

#[async_trait]
impl Runtime for NativeRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        let path = self.resolve_path(path);
        task::spawn_blocking(move || std::fs::read(&path).map_err(|e| io_error("read", &path, e)))
            .await
            .map_err(join_error)?
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> RuntimeResult<()> {
        let path = self.resolve_path(path);
        let content = content.to_vec();
        task::spawn_blocking(move || {
            std::fs::write(&path, content).map_err(|e| io_error("write", &path, e))
        })
        .await
        .map_err(join_error)?
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        let path = self.resolve_path(path);
        task::spawn_blocking(move || {
            let metadata =
                std::fs::metadata(&path).map_err(|e| io_error("get metadata for", &path, e))?;

            let modified = metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_millis() as u64);

            Ok(FileMetadata {
                size: metadata.len(),
                is_dir: metadata.is_dir(),
                is_file: metadata.is_file(),
                modified,
            })
        })
        .await
        .map_err(join_error)?
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve_path(path).exists()
    }

    async fn create_dir(&self, path: &Path, recursive: bool) -> RuntimeResult<()> {
        let path = self.resolve_path(path);
        task::spawn_blocking(move || {
            let result = if recursive {
                std::fs::create_dir_all(&path)
            } else {
                std::fs::create_dir(&path)
            };
            result.map_err(|e| io_error("create directory", &path, e))
        })
        .await
        .map_err(join_error)?
    }

    async fn read_dir(&self, path: &Path) -> RuntimeResult<Vec<String>> {
        let path = self.resolve_path(path);
        task::spawn_blocking(move || {
            let entries =
                std::fs::read_dir(&path).map_err(|e| io_error("read directory", &path, e))?;

            let mut result = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|e| {
                    RuntimeError::Io(format!("Failed to read directory entry: {}", e))
                })?;

                if let Some(name) = entry.file_name().to_str() {
                    result.push(name.to_string());
                }
            }
            result.sort();

            Ok(result)
        })
        .await
        .map_err(join_error)?
    }

    fn get_cwd(&self) -> RuntimeResult<PathBuf> {
        Ok(self.cwd.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn reads_relative_to_cwd() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("test.txt"), b"filesystem content").unwrap();

        let runtime = NativeRuntime::new(temp_dir.path());
        let content = runtime.read_file(Path::new("test.txt")).await.unwrap();
        assert_eq!(content, b"filesystem content");
    }

    #[tokio::test]
    async fn missing_file_maps_to_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let runtime = NativeRuntime::new(temp_dir.path());

        let err = runtime.read_file(Path::new("nope.css")).await.unwrap_err();
        assert!(matches!(err, RuntimeError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn read_dir_is_sorted() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b.css", "a.css", "c.css"] {
            std::fs::write(temp_dir.path().join(name), b"").unwrap();
        }

        let runtime = NativeRuntime::new(temp_dir.path());
        let names = runtime.read_dir(Path::new(".")).await.unwrap();
        assert_eq!(names, vec!["a.css", "b.css", "c.css"]);
    }

    #[tokio::test]
    async fn write_then_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let runtime = NativeRuntime::new(temp_dir.path());

        runtime.create_dir(Path::new("out/assets"), true).await.unwrap();
        runtime
            .write_file(Path::new("out/assets/a.css"), b"a{}")
            .await
            .unwrap();

        let meta = runtime.metadata(Path::new("out/assets/a.css")).await.unwrap();
        assert!(meta.is_file);
        assert_eq!(meta.size, 3);
        assert!(runtime.exists(Path::new("out/assets")));
    }
}
