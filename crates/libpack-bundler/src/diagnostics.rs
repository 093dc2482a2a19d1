//! Diagnostic extraction from Rolldown errors and warnings.
//!
//! Rolldown reports build problems as `BuildDiagnostic`s. The packager keeps
//! the parts it acts on: the kind, the file, the position and, for
//! unresolved imports, the specifier.

use rolldown_error::{BatchedBuildDiagnostic, BuildDiagnostic, EventKind, Severity};
use serde::{Deserialize, Serialize};

/// Extracted diagnostic information from Rolldown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDiagnostic {
    pub kind: DiagnosticKind,
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub help: Option<String>,
    /// Structured context for the diagnostic (if available)
    pub context: Option<DiagnosticContext>,
}

/// Structured context for the diagnostic kinds the packager reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DiagnosticContext {
    MissingExport {
        export_name: String,
        module_id: String,
    },
    CircularDependency {
        cycle_path: Vec<String>,
    },
    Plugin {
        plugin_name: String,
    },
    UnresolvedEntry {
        entry_path: String,
    },
    UnresolvedImport {
        /// Import specifier that couldn't be resolved
        specifier: String,
        /// File that tried to import, when Rolldown reports it
        from_file: Option<String>,
    },
}

/// Diagnostic kind (mirrors Rolldown's EventKind).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    MissingExport,
    ParseError,
    CircularDependency,
    UnresolvedEntry,
    UnresolvedImport,
    MissingGlobalName,
    InvalidOption,
    Plugin,
    Other(String),
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::MissingExport => write!(f, "MissingExport"),
            DiagnosticKind::ParseError => write!(f, "ParseError"),
            DiagnosticKind::CircularDependency => write!(f, "CircularDependency"),
            DiagnosticKind::UnresolvedEntry => write!(f, "UnresolvedEntry"),
            DiagnosticKind::UnresolvedImport => write!(f, "UnresolvedImport"),
            DiagnosticKind::MissingGlobalName => write!(f, "MissingGlobalName"),
            DiagnosticKind::InvalidOption => write!(f, "InvalidOption"),
            DiagnosticKind::Plugin => write!(f, "Plugin"),
            DiagnosticKind::Other(_) => write!(f, "Other"),
        }
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// Extract diagnostics from a failed Rolldown build.
pub fn extract_from_batch(batch: BatchedBuildDiagnostic) -> Vec<ExtractedDiagnostic> {
    batch
        .into_vec()
        .iter()
        .map(extract_from_build_diagnostic)
        .collect()
}

/// Extract a diagnostic from a Rolldown error or warning.
///
/// The kind comes from Rolldown's event kind. File, specifier and position
/// come from the diagnostic's importer and exporter when Rolldown reports
/// them, and from the rendered message otherwise.
pub fn extract_from_build_diagnostic(diag: &BuildDiagnostic) -> ExtractedDiagnostic {
    let severity = match diag.severity() {
        Severity::Error => DiagnosticSeverity::Error,
        Severity::Warning => DiagnosticSeverity::Warning,
    };
    let message = diag.to_string();
    let mut extracted = extract_single(kind_from_event(diag.kind()), &message, severity);

    if let Some(importer) = diag.id() {
        extracted.file = Some(importer);
    }
    if extracted.kind == DiagnosticKind::UnresolvedImport {
        extracted.context = Some(DiagnosticContext::UnresolvedImport {
            specifier: diag
                .exporter()
                .or_else(|| extract_specifier(&message))
                .unwrap_or_else(|| "unknown".to_string()),
            from_file: extracted.file.clone(),
        });
    }

    extracted
}

fn kind_from_event(kind: EventKind) -> DiagnosticKind {
    match kind {
        EventKind::UnresolvedImport => DiagnosticKind::UnresolvedImport,
        EventKind::UnresolvedEntry => DiagnosticKind::UnresolvedEntry,
        EventKind::MissingGlobalName => DiagnosticKind::MissingGlobalName,
        EventKind::MissingExportError => DiagnosticKind::MissingExport,
        EventKind::ParseError | EventKind::JsonParseError => DiagnosticKind::ParseError,
        EventKind::CircularDependency => DiagnosticKind::CircularDependency,
        EventKind::InvalidOptionError | EventKind::InvalidExportOptionError => {
            DiagnosticKind::InvalidOption
        }
        EventKind::PluginError => DiagnosticKind::Plugin,
        other => DiagnosticKind::Other(other.to_string()),
    }
}

fn extract_single(
    kind: DiagnosticKind,
    text: &str,
    severity: DiagnosticSeverity,
) -> ExtractedDiagnostic {
    let file = extract_file_path(text);
    let help = extract_help_text(text);

    let context = match &kind {
        DiagnosticKind::UnresolvedImport => Some(DiagnosticContext::UnresolvedImport {
            specifier: extract_specifier(text).unwrap_or_else(|| "unknown".to_string()),
            from_file: file.clone(),
        }),
        DiagnosticKind::UnresolvedEntry => {
            file.as_ref().map(|f| DiagnosticContext::UnresolvedEntry {
                entry_path: f.clone(),
            })
        }
        DiagnosticKind::MissingExport => Some(DiagnosticContext::MissingExport {
            export_name: extract_quoted_string_after(text, "export")
                .unwrap_or_else(|| "unknown".to_string()),
            module_id: file.clone().unwrap_or_else(|| "unknown".to_string()),
        }),
        DiagnosticKind::CircularDependency => extract_cycle(text),
        DiagnosticKind::Plugin => Some(DiagnosticContext::Plugin {
            plugin_name: extract_quoted_string_after(text, "plugin")
                .or_else(|| extract_quoted_string_after(text, "Plugin"))
                .unwrap_or_else(|| "unknown".to_string()),
        }),
        _ => None,
    };

    ExtractedDiagnostic {
        kind,
        severity,
        message: text.trim().to_string(),
        line: extract_number_after(text, &["line ", "line: "]),
        column: extract_number_after(text, &["column ", "column: ", "col "]),
        file,
        help,
        context,
    }
}

/// Pull the import specifier out of an unresolved-import message.
fn extract_specifier(text: &str) -> Option<String> {
    for keyword in ["Could not resolve", "Cannot resolve", "specifier"] {
        if let Some(specifier) = extract_quoted_string_after(text, keyword) {
            if !specifier.is_empty() {
                return Some(specifier);
            }
        }
    }
    None
}

/// Extract a source file path from an error message.
fn extract_file_path(text: &str) -> Option<String> {
    const EXTENSIONS: &[&str] = &[".vue", ".tsx", ".jsx", ".mjs", ".cjs", ".ts", ".js", ".css"];

    for keyword in ["importer: ", "from ", "in ", "module ", "file: ", "path: "] {
        for (pos, _) in text.match_indices(keyword) {
            let after = text[pos + keyword.len()..].trim_start();
            let candidate = if after.starts_with(['"', '\'', '`']) {
                extract_quoted_string(after)
            } else {
                after.split_whitespace().next().map(|token| {
                    token
                        .trim_start_matches(['"', '\''])
                        .trim_end_matches(|c| matches!(c, '.' | ',' | ')' | '}' | '"' | '\'' | '\\'))
                        .to_string()
                })
            };
            if let Some(candidate) = candidate {
                if EXTENSIONS.iter().any(|ext| candidate.ends_with(ext)) {
                    return Some(candidate);
                }
            }
        }
    }
    None
}

fn extract_number_after(text: &str, patterns: &[&str]) -> Option<u32> {
    patterns.iter().find_map(|pattern| {
        let pos = text.find(pattern)?;
        let digits: String = text[pos + pattern.len()..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    })
}

fn extract_help_text(text: &str) -> Option<String> {
    for indicator in ["help: ", "Help: ", "hint: ", "Hint: "] {
        if let Some(pos) = text.find(indicator) {
            let help = text[pos + indicator.len()..]
                .lines()
                .next()
                .unwrap_or("")
                .trim()
                .trim_end_matches(['"', ',', ')', '}'])
                .to_string();
            if !help.is_empty() && !help.starts_with("None") {
                return Some(help);
            }
        }
    }
    None
}

fn extract_cycle(text: &str) -> Option<DiagnosticContext> {
    let start = text.find("->")?;
    let head = text[..start]
        .rsplit(|c: char| c.is_whitespace() || c == '"' || c == '[')
        .find(|s| !s.is_empty())
        .map(str::to_string);
    let mut cycle_path: Vec<String> = head.into_iter().collect();
    cycle_path.extend(
        text[start..]
            .split("->")
            .filter_map(|s| s.split_whitespace().next())
            .map(|s| s.trim_matches('"').trim_end_matches('.').to_string())
            .filter(|s| !s.is_empty()),
    );
    (!cycle_path.is_empty()).then_some(DiagnosticContext::CircularDependency { cycle_path })
}

fn extract_quoted_string_after(text: &str, keyword: &str) -> Option<String> {
    let pos = text.find(keyword)?;
    extract_quoted_string(&text[pos + keyword.len()..])
}

/// Extract the first quoted string (single, double, or backtick).
fn extract_quoted_string(text: &str) -> Option<String> {
    let (start, quote) = text
        .char_indices()
        .find(|(_, c)| matches!(c, '"' | '\'' | '`'))?;
    let after = &text[start + 1..];
    let end = after.find(quote)?;
    Some(after[..end].trim_matches('\\').to_string())
}
