//! Build results: in-memory artifacts and writing them out.

pub mod writer;

use std::path::Path;

use crate::diagnostics::ExtractedDiagnostic;
use crate::{LibraryFormat, Result};

/// What an artifact contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// The bundled library in one format.
    Script(LibraryFormat),
    /// Source map of the script in the same format.
    SourceMap(LibraryFormat),
    /// Styles extracted from every format run.
    Stylesheet,
    /// Any other file emitted by a plugin.
    Asset(LibraryFormat),
}

/// One output file, held in memory until written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path relative to the output directory.
    pub file_name: String,
    pub kind: ArtifactKind,
    pub contents: Vec<u8>,
}

impl Artifact {
    pub fn new(
        file_name: impl Into<String>,
        kind: ArtifactKind,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            kind,
            contents: contents.into(),
        }
    }

    /// Contents as UTF-8 text, if they are.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.contents).ok()
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

/// Result of a library build.
///
/// Artifacts are ordered by requested format (each script followed by its
/// source map and plugin assets), then the stylesheet.
#[derive(Debug, Clone, Default)]
pub struct LibraryBuild {
    pub artifacts: Vec<Artifact>,
    /// Non-fatal diagnostics collected across every format run.
    pub warnings: Vec<ExtractedDiagnostic>,
}

impl LibraryBuild {
    /// Script artifact of `format`.
    pub fn artifact(&self, format: LibraryFormat) -> Option<&Artifact> {
        self.artifacts
            .iter()
            .find(|a| a.kind == ArtifactKind::Script(format))
    }

    /// Source map of the `format` script, when source maps were requested.
    pub fn source_map(&self, format: LibraryFormat) -> Option<&Artifact> {
        self.artifacts
            .iter()
            .find(|a| a.kind == ArtifactKind::SourceMap(format))
    }

    /// The extracted stylesheet, present only when styles were split out.
    pub fn stylesheet(&self) -> Option<&Artifact> {
        self.artifacts
            .iter()
            .find(|a| a.kind == ArtifactKind::Stylesheet)
    }

    /// Script artifacts in requested format order.
    pub fn scripts(&self) -> impl Iterator<Item = (LibraryFormat, &Artifact)> {
        self.artifacts.iter().filter_map(|a| match a.kind {
            ArtifactKind::Script(format) => Some((format, a)),
            _ => None,
        })
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.artifacts.iter().map(|a| a.file_name.as_str()).collect()
    }

    pub fn total_size(&self) -> usize {
        self.artifacts.iter().map(Artifact::len).sum()
    }

    /// Write every artifact into `dir`, all or nothing.
    pub fn write_to(&self, dir: impl AsRef<Path>, overwrite: bool) -> Result<()> {
        writer::write_artifacts(&self.artifacts, dir.as_ref(), overwrite)
    }
}
