//! libpack CLI.
//!
//! Command-line front end for [`libpack_bundler`]: loads a layered
//! configuration, packages the library in every requested format and writes
//! the artifacts.
//!
//! - [`cli`] - argument definitions
//! - [`config`] - `libpack.toml` / `libpack.config.json` / `LIBPACK_*` loading
//! - [`commands`] - `build` and `check`
//! - [`error`] - error types and miette rendering
//! - [`logger`] - tracing setup
//! - [`ui`] - terminal output
//!
//! # Example
//!
//! ```rust
//! use libpack_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(logger::LogLevel::Info, true);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{BuildError, CliError, ConfigError, Result};
