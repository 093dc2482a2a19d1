use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, OutputFormat};

/// Module format of a library artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryFormat {
    /// ECMAScript module: externals stay as `import` statements.
    Es,
    /// Universal module definition: AMD, CommonJS or a browser global.
    Umd,
    /// CommonJS module: externals stay as `require()` calls.
    Cjs,
    /// Self-executing browser script assigning the library to a global.
    Iife,
}

impl LibraryFormat {
    pub const ALL: [LibraryFormat; 4] = [
        LibraryFormat::Es,
        LibraryFormat::Umd,
        LibraryFormat::Cjs,
        LibraryFormat::Iife,
    ];

    /// Formats built when none are requested explicitly.
    pub fn defaults() -> Vec<LibraryFormat> {
        vec![LibraryFormat::Es, LibraryFormat::Umd]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LibraryFormat::Es => "es",
            LibraryFormat::Umd => "umd",
            LibraryFormat::Cjs => "cjs",
            LibraryFormat::Iife => "iife",
        }
    }

    /// Whether the format reads externals from global variables, which
    /// requires a library name and a global for every external.
    pub fn uses_globals(self) -> bool {
        matches!(self, LibraryFormat::Umd | LibraryFormat::Iife)
    }

    pub(crate) fn to_rolldown(self) -> OutputFormat {
        match self {
            LibraryFormat::Es => OutputFormat::Esm,
            LibraryFormat::Umd => OutputFormat::Umd,
            LibraryFormat::Cjs => OutputFormat::Cjs,
            LibraryFormat::Iife => OutputFormat::Iife,
        }
    }
}

impl fmt::Display for LibraryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LibraryFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "es" | "esm" | "module" => Ok(LibraryFormat::Es),
            "umd" => Ok(LibraryFormat::Umd),
            "cjs" | "commonjs" => Ok(LibraryFormat::Cjs),
            "iife" => Ok(LibraryFormat::Iife),
            other => Err(Error::Configuration(format!(
                "unknown library format '{}' (expected one of: es, umd, cjs, iife)",
                other
            ))),
        }
    }
}
