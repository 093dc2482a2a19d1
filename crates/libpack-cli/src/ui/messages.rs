//! Status lines on stderr.

use owo_colors::OwoColorize;

use super::{colors_enabled, is_quiet};

fn print(symbol: &str, styled_symbol: String, message: &str, styled_message: Option<String>) {
    if colors_enabled() {
        eprintln!("{} {}", styled_symbol, styled_message.as_deref().unwrap_or(message));
    } else {
        eprintln!("{} {}", symbol, message);
    }
}

/// Print a success message.
///
/// ```no_run
/// libpack_cli::ui::success("Build completed");
/// ```
pub fn success(message: &str) {
    if is_quiet() {
        return;
    }
    print("✓", "✓".green().bold().to_string(), message, None);
}

/// Print an info message.
pub fn info(message: &str) {
    if is_quiet() {
        return;
    }
    print("ℹ", "ℹ".blue().bold().to_string(), message, None);
}

/// Print a warning.
pub fn warning(message: &str) {
    if is_quiet() {
        return;
    }
    print(
        "⚠",
        "⚠".yellow().bold().to_string(),
        message,
        Some(message.yellow().to_string()),
    );
}

/// Print an error. Shown even in quiet mode.
pub fn error(message: &str) {
    print(
        "✗",
        "✗".red().bold().to_string(),
        message,
        Some(message.red().to_string()),
    );
}
