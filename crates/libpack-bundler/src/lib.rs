//! # libpack-bundler
//!
//! Package a component library into distributable artifacts, one per module
//! format, on top of Rolldown.
//!
//! ## Quick Start
//!
//! ```no_run
//! use libpack_bundler::{LibraryFormat, LibraryOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let build = LibraryOptions::new("src/index.js")
//!     .name("VuePolygonDrawer")
//!     .file_name_with(|format, _| format!("vue-polygon-drawer.{format}.js"))
//!     .formats([LibraryFormat::Es, LibraryFormat::Umd, LibraryFormat::Cjs])
//!     .global("vue", "Vue")
//!     .css_code_split(true)
//!     .build()
//!     .await?;
//!
//! build.write_to("dist", true)?;
//! # Ok(()) }
//! ```
//!
//! Every format is bundled from the same entry. Dependencies listed as
//! external stay out of the artifacts: ES output imports them, CommonJS
//! output requires them, and UMD/IIFE output reads the declared global.

pub mod diagnostics;
pub mod library;
pub mod output;
pub mod plugins;
pub mod styles;

// Re-export core Rolldown types for library users
pub use rolldown::{BundleOutput, BundlerOptions, OutputFormat, Platform, SourceMapType};

// Re-export common types (CRITICAL: ModuleType for plugins)
pub use rolldown_common::{ModuleType, Output, OutputAsset, OutputChunk};

// Re-export plugin types (CRITICAL for plugin authors)
pub use rolldown_plugin::{
    __inner::SharedPluginable, HookLoadArgs, HookLoadOutput, HookLoadReturn, HookUsage, Plugin,
    PluginContext,
};

pub use library::{FileNaming, LibraryFormat, LibraryOptions, is_valid_identifier_path};
pub use output::{Artifact, ArtifactKind, LibraryBuild};
pub use plugins::{IntoPlugin, PluginFactory, PluginPhase, plugin};
pub use styles::{StyleCollector, StyleMode, StylePlugin, StyleSink};

/// Error types for libpack-bundler operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or missing configuration, including an unresolvable entry.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An import is neither bundled nor declared external.
    #[error("{}", format_unresolved(.specifier, .importer.as_deref()))]
    DependencyResolution {
        specifier: String,
        importer: Option<String>,
    },

    /// Error from Rolldown bundler.
    #[error("Rolldown bundler error: {}", format_bundler_error(.0))]
    Bundler(Vec<diagnostics::ExtractedDiagnostic>),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid output path (e.g., directory traversal attempt).
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    /// File write operation failed.
    #[error("Write failure: {0}")]
    WriteFailure(String),

    /// Output file already exists and overwrite is disabled.
    #[error("Output exists: {0}")]
    OutputExists(String),
}

/// Result type alias for libpack-bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error from a Rolldown failure.
    ///
    /// Unresolved imports become [`Error::DependencyResolution`] and an
    /// unresolved entry becomes [`Error::Configuration`]; anything else keeps
    /// the structured diagnostics.
    pub fn from_rolldown_batch(batch: rolldown_error::BatchedBuildDiagnostic) -> Self {
        Self::from_diagnostics(diagnostics::extract_from_batch(batch))
    }

    pub(crate) fn from_diagnostics(diags: Vec<diagnostics::ExtractedDiagnostic>) -> Self {
        use diagnostics::{DiagnosticContext, DiagnosticKind};

        for diag in &diags {
            match (&diag.kind, &diag.context) {
                (
                    DiagnosticKind::UnresolvedImport,
                    Some(DiagnosticContext::UnresolvedImport {
                        specifier,
                        from_file,
                    }),
                ) => {
                    return Error::DependencyResolution {
                        specifier: specifier.clone(),
                        importer: from_file.clone(),
                    };
                }
                (DiagnosticKind::UnresolvedImport, _) => {
                    return Error::DependencyResolution {
                        specifier: "unknown".to_string(),
                        importer: diag.file.clone(),
                    };
                }
                (DiagnosticKind::UnresolvedEntry, _) => {
                    return Error::Configuration(format!(
                        "entry module could not be resolved: {}",
                        diag.file.as_deref().unwrap_or("unknown")
                    ));
                }
                _ => {}
            }
        }

        Error::Bundler(diags)
    }

    /// True for errors the caller can fix by editing the library options.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// True when an import could not be bundled or externalized.
    pub fn is_dependency_resolution(&self) -> bool {
        matches!(self, Error::DependencyResolution { .. })
    }
}

fn format_unresolved(specifier: &str, importer: Option<&str>) -> String {
    match importer {
        Some(importer) => format!(
            "Dependency resolution error: could not resolve '{}' imported from {}",
            specifier, importer
        ),
        None => format!(
            "Dependency resolution error: could not resolve '{}'",
            specifier
        ),
    }
}

/// Format bundler error diagnostics for display.
fn format_bundler_error(diagnostics: &[diagnostics::ExtractedDiagnostic]) -> String {
    if diagnostics.is_empty() {
        return "Unknown bundler error".to_string();
    }

    if diagnostics.len() == 1 {
        let diag = &diagnostics[0];
        format!("{}: {}", diag.kind, diag.message)
    } else {
        format!(
            "{} errors: {}",
            diagnostics.len(),
            diagnostics
                .iter()
                .map(|d| format!("{}: {}", d.kind, d.message))
                .collect::<Vec<_>>()
                .join("; ")
        )
    }
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::Configuration(_) => "CONFIGURATION_ERROR",
            Error::DependencyResolution { .. } => "DEPENDENCY_RESOLUTION_ERROR",
            Error::Bundler(_) => "BUNDLER_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::InvalidOutputPath(_) => "INVALID_OUTPUT_PATH",
            Error::WriteFailure(_) => "WRITE_FAILURE",
            Error::OutputExists(_) => "OUTPUT_EXISTS",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::Configuration(_) => Some(Box::new(
                "Check the entry path, formats, file naming and globals in your library options.",
            )),
            Error::DependencyResolution { specifier, .. } => Some(Box::new(format!(
                "Install '{}' so it can be bundled, or add it to `external` (with a global for umd/iife builds).",
                specifier
            ))),
            Error::InvalidOutputPath(path) => Some(Box::new(format!(
                "The output path '{}' is invalid. Ensure it stays inside the output directory.",
                path
            ))),
            Error::WriteFailure(msg) => Some(Box::new(format!(
                "Failed to write file. Check disk space and permissions.\nError: {}",
                msg
            ))),
            Error::OutputExists(msg) => Some(Box::new(format!(
                "Output file already exists: {}\nEnable overwriting to replace existing files.",
                msg
            ))),
            Error::Bundler(diagnostics) => {
                if diagnostics.len() == 1 {
                    diagnostics[0]
                        .help
                        .as_ref()
                        .map(|h| Box::new(h.clone()) as Box<dyn std::fmt::Display>)
                } else {
                    Some(Box::new(
                        "Multiple bundler errors occurred. See details below.".to_string(),
                    ))
                }
            }
            Error::Io(_) => None,
        }
    }
}
