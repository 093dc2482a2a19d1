//! Shared helpers for command implementations.

use crate::error::{BuildError, CliError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve `path` against `cwd` unless it is absolute.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Directory the command runs in: `--cwd` resolved against the process
/// directory, or the process directory itself.
pub fn base_dir(cwd: Option<&Path>) -> Result<PathBuf> {
    let current = std::env::current_dir()?;
    let dir = match cwd {
        Some(cwd) => resolve_path(cwd, &current),
        None => current,
    };

    if !dir.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "Working directory does not exist: {}",
            dir.display()
        )));
    }

    Ok(dir)
}

/// Validate that the entry module exists and is a file.
pub fn validate_entry(entry: &Path) -> Result<()> {
    if !entry.exists() {
        return Err(BuildError::EntryNotFound(entry.to_path_buf()).into());
    }

    if !entry.is_file() {
        return Err(CliError::InvalidArgument(format!(
            "Entry point is not a file: {}",
            entry.display()
        )));
    }

    Ok(())
}

/// Refuse output directories outside the project or equal to it.
///
/// Writing into the project root would mix artifacts with sources, and
/// `clean` would delete them.
pub fn validate_output_dir(out_dir: &Path, project_dir: &Path) -> Result<()> {
    let project = project_dir.canonicalize()?;

    let mut existing = out_dir.to_path_buf();
    let mut missing = Vec::new();
    while !existing.exists() {
        let Some(name) = existing.file_name() else {
            return Err(BuildError::OutputNotWritable(out_dir.to_path_buf()).into());
        };
        missing.push(name.to_os_string());
        if !existing.pop() {
            return Err(BuildError::OutputNotWritable(out_dir.to_path_buf()).into());
        }
    }

    let mut canonical = existing.canonicalize()?;
    for name in missing.into_iter().rev() {
        canonical.push(name);
    }

    if canonical == project || !canonical.starts_with(&project) {
        return Err(BuildError::OutputNotWritable(out_dir.to_path_buf()).into());
    }

    Ok(())
}

/// Remove everything inside `out_dir`, keeping the directory.
pub fn clean_output_dir(out_dir: &Path) -> Result<()> {
    if !out_dir.exists() {
        return Ok(());
    }

    if !out_dir.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "Output path exists but is not a directory: {}",
            out_dir.display()
        )));
    }

    for entry in fs::read_dir(out_dir)? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }

    Ok(())
}
