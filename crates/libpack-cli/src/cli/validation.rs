use libpack_bundler::{LibraryFormat, is_valid_identifier_path};

/// Parse a `package=Global` pair for `--global`.
///
/// The global may be a dotted path (`Vue`, `window.Vue`) and must consist of
/// valid JavaScript identifiers.
///
/// # Examples
///
/// ```
/// use libpack_cli::cli::parse_global;
///
/// assert_eq!(
///     parse_global("vue=Vue").unwrap(),
///     ("vue".to_string(), "Vue".to_string())
/// );
/// assert!(parse_global("vue").is_err());
/// assert!(parse_global("vue=my-vue").is_err());
/// ```
pub fn parse_global(s: &str) -> Result<(String, String), String> {
    let Some((package, global)) = s.split_once('=') else {
        return Err(format!("Expected PACKAGE=GLOBAL, got '{}'", s));
    };

    let package = package.trim();
    let global = global.trim();

    if package.is_empty() {
        return Err(format!("Package name cannot be empty: '{}'", s));
    }

    if !is_valid_identifier_path(global) {
        return Err(format!(
            "Global for '{}' must be a valid JavaScript identifier: '{}'",
            package, global
        ));
    }

    Ok((package.to_string(), global.to_string()))
}

/// Parse one output format (`es`, `esm`, `umd`, `cjs`, `iife`).
pub fn parse_format(s: &str) -> Result<LibraryFormat, String> {
    s.trim().parse().map_err(|e: libpack_bundler::Error| e.to_string())
}
