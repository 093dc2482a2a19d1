//! Logging setup for the libpack CLI.
//!
//! Events from the bundler, the Vue plugin and the CLI go through `tracing`.
//! The level is chosen in this order:
//! 1. `--verbose` / `--quiet` / `--log-level`
//! 2. `RUST_LOG`
//! 3. info for libpack crates

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use tracing_subscriber::{EnvFilter, fmt as layer_fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LIBPACK_TARGETS: &[&str] = &["libpack_bundler", "libpack_plugin_vue", "libpack_cli", "libpack"];

/// Verbosity of libpack's own log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    Silent,
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Silent => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }

    /// Filter directives applying this level to every libpack crate.
    pub fn directives(self) -> String {
        LIBPACK_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, self.as_str()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Silent => f.write_str("silent"),
            other => f.write_str(other.as_str()),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "silent" | "off" => Ok(LogLevel::Silent),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "trace" => Ok(LogLevel::Debug),
            other => Err(format!(
                "Unknown log level '{}' (expected silent, error, warn, info or debug)",
                other
            )),
        }
    }
}

/// Build the filter for an explicit level, or from `RUST_LOG` when none is given.
pub fn build_filter(level: Option<LogLevel>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::new(level.directives()),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(LogLevel::Info.directives())),
    }
}

/// Install the global subscriber.
///
/// Call once, before anything logs. Later calls are ignored.
pub fn init_logger(level: impl Into<Option<LogLevel>>, no_color: bool) {
    let fmt_layer = layer_fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(build_filter(level.into()))
        .with(fmt_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels() {
        assert_eq!("silent".parse::<LogLevel>(), Ok(LogLevel::Silent));
        assert_eq!("ERROR".parse::<LogLevel>(), Ok(LogLevel::Error));
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!(" info ".parse::<LogLevel>(), Ok(LogLevel::Info));
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_directives_cover_every_crate() {
        let directives = LogLevel::Debug.directives();
        assert!(directives.contains("libpack_bundler=debug"));
        assert!(directives.contains("libpack_plugin_vue=debug"));
        assert!(directives.contains("libpack_cli=debug"));

        assert!(LogLevel::Silent.directives().contains("libpack_bundler=off"));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for level in [
            LogLevel::Silent,
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
        ] {
            assert_eq!(level.to_string().parse::<LogLevel>(), Ok(level));
        }
    }

    #[test]
    fn test_init_logger_twice_does_not_panic() {
        init_logger(LogLevel::Error, true);
        init_logger(None, true);
    }
}
