//! Error types for the libpack CLI.
//!
//! - [`CliError`] is returned by every command
//! - [`ConfigError`] covers config discovery, loading and validation
//! - [`BuildError`] covers the CLI's own build steps (entry, output directory)
//!
//! Library build failures keep their [`libpack_bundler::Error`] so `main`
//! can render them with their diagnostic code and help text.

mod report;

pub use report::cli_error_to_miette;

use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Errors from the library packager
    #[error(transparent)]
    Bundler(#[from] libpack_bundler::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Explicit config file doesn't exist
    #[error("Config file not found: {}\n\nHint: Create libpack.toml or libpack.config.json, or check the --config path", .0.display())]
    NotFound(PathBuf),

    /// A layer could not be read or did not match the config shape
    #[error("Failed to load {source_name}: {message}\n\nHint: Run 'libpack check --schema' to see the accepted fields")]
    Load {
        /// Config file, or "configuration" when no file was involved
        source_name: String,
        message: String,
    },

    #[error("Missing required field: {field}\n\nHint: {hint}")]
    MissingField { field: String, hint: String },

    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        field: String,
        value: String,
        hint: String,
    },

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Build step errors raised by the CLI itself.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Entry point not found: {}\n\nHint: Check the 'entry' field in your config or the ENTRY argument", .0.display())]
    EntryNotFound(PathBuf),

    #[error("Output directory is not writable: {}\n\nHint: Use an output directory inside the project", .0.display())]
    OutputNotWritable(PathBuf),
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;
