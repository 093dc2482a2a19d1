//! Command-line interface definition.
//!
//! - `libpack build` - package the library
//! - `libpack check` - validate configuration without building

mod commands;
pub mod enums;
mod tests;
mod validation;

use clap::Parser;

use crate::logger::LogLevel;

pub use commands::{BuildArgs, CheckArgs, Command};
pub use enums::*;
pub use validation::{parse_format, parse_global};

/// libpack - package a component library as es, umd and cjs builds
#[derive(Parser, Debug)]
#[command(
    name = "libpack",
    version,
    about = "Package a component library for npm and the browser",
    long_about = "libpack bundles a library entry once per module format (es, umd, cjs, iife),\n\
                  keeps peer dependencies such as Vue external, and extracts or injects\n\
                  component styles."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (silent, error, warn, info, debug)
    ///
    /// Ignored when --verbose or --quiet is given. Without it, RUST_LOG is
    /// honored before falling back to info.
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Effective log level from the global flags.
    pub fn log_level(&self) -> Option<LogLevel> {
        if self.verbose {
            Some(LogLevel::Debug)
        } else if self.quiet {
            Some(LogLevel::Error)
        } else {
            self.log_level
        }
    }
}
