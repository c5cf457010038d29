//! Secure file writing for built snapshots.
//!
//! - **Path Validation**: output paths may not escape the target directory
//! - **Atomic Writes**: files go to `.tmp` siblings first and are renamed once all succeed
//! - **Automatic Rollback**: if any write fails, the temp files are deleted

use std::fs;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::snapshot::Snapshot;
use crate::{Result, TreeError};

/// Writes a snapshot below `dir`.
///
/// # Errors
///
/// - a path escapes `dir`
/// - a file exists and `overwrite` is `false`
/// - any I/O operation fails
pub fn write_snapshot_to(snapshot: &Snapshot, dir: &Path, overwrite: bool) -> Result<()> {
    let dir = validate_and_normalize_dir(dir)?;

    fs::create_dir_all(&dir).map_err(|e| {
        TreeError::WriteFailure(format!(
            "Failed to create output directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    let mut operations = Vec::with_capacity(snapshot.len());
    for (path, contents) in snapshot.iter() {
        let target_path = validate_output_path(&dir, path)?;

        if !overwrite && target_path.exists() {
            return Err(TreeError::OutputExists(format!(
                "File already exists: '{}'. Use overwrite=true to replace.",
                target_path.display()
            )));
        }

        operations.push((target_path, &contents[..]));
    }

    write_files_atomic(&operations)?;
    tracing::debug!(dir = %dir.display(), files = operations.len(), "wrote snapshot");

    Ok(())
}

/// Cleans `dir` and makes it absolute.
fn validate_and_normalize_dir(dir: &Path) -> Result<PathBuf> {
    let cleaned = dir.clean();

    let absolute = if cleaned.is_absolute() {
        cleaned
    } else {
        std::env::current_dir()
            .map_err(|e| {
                TreeError::InvalidOutputPath(format!("Failed to get current directory: {}", e))
            })?
            .join(&cleaned)
            .clean()
    };

    Ok(absolute)
}

/// Joins `filename` onto `base_dir`, rejecting anything that resolves outside it.
fn validate_output_path(base_dir: &Path, filename: &str) -> Result<PathBuf> {
    if filename.contains('\0') {
        return Err(TreeError::InvalidOutputPath(
            "Filename contains null byte".to_string(),
        ));
    }

    if Path::new(filename).is_absolute() {
        return Err(TreeError::InvalidOutputPath(format!(
            "Path '{}' is absolute",
            filename
        )));
    }

    let full_path = base_dir.join(Path::new(filename).clean()).clean();

    if !full_path.starts_with(base_dir) || full_path == base_dir {
        return Err(TreeError::InvalidOutputPath(format!(
            "Path '{}' escapes output directory '{}' (resolved to '{}')",
            filename,
            base_dir.display(),
            full_path.display()
        )));
    }

    Ok(full_path)
}

/// Two-phase write: temp files first, then renames.
fn write_files_atomic(operations: &[(PathBuf, &[u8])]) -> Result<()> {
    let mut temp_files = Vec::new();

    for (target_path, content) in operations {
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                cleanup_temp_files(&temp_files);
                TreeError::WriteFailure(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let temp_path = temp_path_for(target_path);
        fs::write(&temp_path, content).map_err(|e| {
            cleanup_temp_files(&temp_files);
            TreeError::WriteFailure(format!(
                "Failed to write temporary file '{}': {}",
                temp_path.display(),
                e
            ))
        })?;

        temp_files.push((temp_path, target_path.clone()));
    }

    for (temp_path, target_path) in &temp_files {
        fs::rename(temp_path, target_path).map_err(|e| {
            cleanup_temp_files(&temp_files);
            TreeError::WriteFailure(format!(
                "Failed to rename '{}' to '{}': {}",
                temp_path.display(),
                target_path.display(),
                e
            ))
        })?;
    }

    Ok(())
}

/// `vendor.css` -> `vendor.css.tmp`, so `a.css` and `a.js` never share a temp file.
fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Best-effort cleanup; we are already failing.
fn cleanup_temp_files(temp_files: &[(PathBuf, PathBuf)]) {
    for (temp_path, _) in temp_files {
        if temp_path.exists() {
            if let Err(e) = fs::remove_file(temp_path) {
                tracing::warn!(
                    "Failed to clean up temporary file '{}': {}",
                    temp_path.display(),
                    e
                );
            }
        }
    }
}
