//! Atomic writing of build artifacts.
//!
//! Every artifact path is validated to stay inside the output directory.
//! Contents go to temporary files first and are renamed into place only
//! after all of them were written; on failure the temporaries are removed
//! and files already renamed are rolled back.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

use super::Artifact;
use crate::{Error, Result};

const TEMP_SUFFIX: &str = ".libpack-tmp";

/// Write `artifacts` into `dir`.
///
/// With `overwrite` off, an existing target file fails the whole write
/// before anything touches the disk.
pub fn write_artifacts(artifacts: &[Artifact], dir: &Path, overwrite: bool) -> Result<()> {
    let dir = validate_and_normalize_dir(dir)?;

    fs::create_dir_all(&dir).map_err(|e| {
        Error::WriteFailure(format!(
            "Failed to create output directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    let mut seen = BTreeSet::new();
    let mut operations = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let target_path = validate_output_path(&dir, &artifact.file_name)?;

        if !seen.insert(target_path.clone()) {
            return Err(Error::InvalidOutputPath(format!(
                "More than one artifact is named '{}'",
                artifact.file_name
            )));
        }

        if !overwrite && target_path.exists() {
            return Err(Error::OutputExists(format!(
                "File already exists: '{}'. Use overwrite=true to replace.",
                target_path.display()
            )));
        }

        operations.push((target_path, artifact.contents.as_slice()));
    }

    write_files_atomic(&operations)?;

    tracing::debug!(
        dir = %dir.display(),
        files = operations.len(),
        "wrote library artifacts"
    );

    Ok(())
}

/// Normalize `dir` into a clean absolute path.
pub(crate) fn validate_and_normalize_dir(dir: &Path) -> Result<PathBuf> {
    if dir.as_os_str().is_empty() {
        return Err(Error::InvalidOutputPath(
            "Output directory cannot be empty".to_string(),
        ));
    }

    let cleaned = dir.clean();
    if cleaned.is_absolute() {
        return Ok(cleaned);
    }

    let cwd = std::env::current_dir().map_err(|e| {
        Error::InvalidOutputPath(format!("Failed to get current directory: {}", e))
    })?;
    Ok(cwd.join(&cleaned).clean())
}

/// Resolve `filename` below `base_dir`, rejecting anything that escapes it.
fn validate_output_path(base_dir: &Path, filename: &str) -> Result<PathBuf> {
    if filename.contains('\0') {
        return Err(Error::InvalidOutputPath(
            "Filename contains null byte".to_string(),
        ));
    }

    let full_path = base_dir.join(Path::new(filename).clean()).clean();

    if !full_path.starts_with(base_dir) || full_path == base_dir {
        return Err(Error::InvalidOutputPath(format!(
            "Path '{}' escapes output directory '{}' (resolved to '{}')",
            filename,
            base_dir.display(),
            full_path.display()
        )));
    }

    Ok(full_path)
}

fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

fn write_files_atomic(operations: &[(PathBuf, &[u8])]) -> Result<()> {
    let mut temp_files = Vec::with_capacity(operations.len());

    // Phase 1: temporaries
    for (target_path, content) in operations {
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                cleanup_temp_files(&temp_files);
                Error::WriteFailure(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let temp_path = temp_path_for(target_path);
        fs::write(&temp_path, content).map_err(|e| {
            cleanup_temp_files(&temp_files);
            Error::WriteFailure(format!(
                "Failed to write temporary file '{}': {}",
                temp_path.display(),
                e
            ))
        })?;

        temp_files.push((temp_path, target_path.clone()));
    }

    // Phase 2: rename into place
    let mut renamed: Vec<&Path> = Vec::with_capacity(temp_files.len());
    for (temp_path, target_path) in &temp_files {
        let existed = target_path.exists();
        if let Err(e) = fs::rename(temp_path, target_path) {
            cleanup_temp_files(&temp_files);
            rollback_renamed(&renamed);
            return Err(Error::WriteFailure(format!(
                "Failed to rename '{}' to '{}': {}",
                temp_path.display(),
                target_path.display(),
                e
            )));
        }
        if !existed {
            renamed.push(target_path);
        }
    }

    Ok(())
}

fn cleanup_temp_files(temp_files: &[(PathBuf, PathBuf)]) {
    for (temp_path, _) in temp_files {
        if temp_path.exists() {
            if let Err(e) = fs::remove_file(temp_path) {
                tracing::warn!(
                    path = %temp_path.display(),
                    error = %e,
                    "failed to clean up temporary file"
                );
            }
        }
    }
}

/// Remove files this write created. Files that existed before were
/// replaced and cannot be restored.
fn rollback_renamed(created: &[&Path]) {
    for path in created {
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "failed to roll back artifact");
        }
    }
}
