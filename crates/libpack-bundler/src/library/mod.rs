//! Library packaging: options, validation and the per-format build.

mod executor;
mod format;
mod naming;
mod options;
mod validation;

pub use format::LibraryFormat;
pub use naming::{DEFAULT_FILE_NAME_PATTERN, FileNaming};
pub use options::{DEFAULT_CSS_FILE_NAME, LibraryOptions};
pub use validation::is_valid_identifier_path;
