use std::fmt;
use std::sync::Arc;

use super::LibraryFormat;

/// Pattern used when no file naming is configured.
pub const DEFAULT_FILE_NAME_PATTERN: &str = "[name].[format].js";

type NamingFn = dyn Fn(LibraryFormat, &str) -> String + Send + Sync;

/// Maps an output format to the artifact's file name.
///
/// The second argument handed to the naming function is the entry file
/// stem (`index` for `src/index.js`).
#[derive(Clone)]
pub enum FileNaming {
    /// Pattern with `[format]` and `[name]` placeholders.
    Pattern(String),
    /// Arbitrary function of format and entry stem.
    Custom(Arc<NamingFn>),
}

impl FileNaming {
    pub fn pattern(pattern: impl Into<String>) -> Self {
        FileNaming::Pattern(pattern.into())
    }

    pub fn custom<F>(naming: F) -> Self
    where
        F: Fn(LibraryFormat, &str) -> String + Send + Sync + 'static,
    {
        FileNaming::Custom(Arc::new(naming))
    }

    /// File name for `format`, given the entry stem `name`.
    pub fn file_name(&self, format: LibraryFormat, name: &str) -> String {
        match self {
            FileNaming::Pattern(pattern) => pattern
                .replace("[format]", format.as_str())
                .replace("[name]", name),
            FileNaming::Custom(naming) => naming(format, name),
        }
    }
}

impl Default for FileNaming {
    fn default() -> Self {
        FileNaming::Pattern(DEFAULT_FILE_NAME_PATTERN.to_string())
    }
}

impl fmt::Debug for FileNaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileNaming::Pattern(pattern) => f.debug_tuple("Pattern").field(pattern).finish(),
            FileNaming::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

impl From<&str> for FileNaming {
    fn from(pattern: &str) -> Self {
        FileNaming::pattern(pattern)
    }
}

impl From<String> for FileNaming {
    fn from(pattern: String) -> Self {
        FileNaming::Pattern(pattern)
    }
}
