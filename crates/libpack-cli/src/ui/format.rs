//! Formatting utilities for sizes, durations and the artifact summary.

use console::Term;
use owo_colors::OwoColorize;
use std::time::Duration;

use super::{colors_enabled, is_quiet};

/// Format file size in human-readable format.
///
/// ```
/// use libpack_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// assert_eq!(format_size(1_048_576), "1.00 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Format duration in human-readable format.
///
/// ```
/// use std::time::Duration;
/// use libpack_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print the written artifacts with their sizes, then the total.
///
/// `entries` are `(file name, size in bytes)` pairs in output order.
pub fn print_build_summary(entries: &[(String, u64)], duration: Duration) {
    if is_quiet() {
        return;
    }

    let width = (Term::stderr().size().1 as usize).clamp(20, 80);
    let name_width = entries
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0);
    let rule = "─".repeat(width);
    let colors = colors_enabled();

    if colors {
        eprintln!("\n{}", "Artifacts".bold().underline());
    } else {
        eprintln!("\nArtifacts");
    }
    eprintln!("{}", rule);

    for (name, size) in entries {
        let padded = format!("{:<name_width$}", name);
        let size = format_size(*size);
        if colors {
            eprintln!("  {} {}  {}", "▸".blue(), padded.bright_white().bold(), size.dimmed());
        } else {
            eprintln!("  ▸ {}  {}", padded, size);
        }
    }

    eprintln!("{}", rule);

    let total_size: u64 = entries.iter().map(|(_, s)| s).sum();
    let total = format!(
        "{} in {} file(s), {}",
        format_size(total_size),
        entries.len(),
        format_duration(duration)
    );
    if colors {
        eprintln!("  {} {}", "Total:".bold(), total.green());
    } else {
        eprintln!("  Total: {}", total);
    }
}
