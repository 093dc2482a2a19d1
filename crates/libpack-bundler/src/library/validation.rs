use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use path_clean::PathClean;

use super::{LibraryFormat, LibraryOptions};
use crate::{Error, Result};

/// Words that cannot name a variable in strict-mode module code.
const RESERVED_WORDS: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Whether `name` is a dotted path of JavaScript identifiers, such as
/// `Vue` or `My.Lib`.
///
/// The first segment becomes a variable and must not be a reserved word.
/// Later segments are property names, where reserved words are allowed.
pub fn is_valid_identifier_path(name: &str) -> bool {
    let mut segments = name.split('.');
    match segments.next() {
        Some(root) if is_valid_identifier(root) && !RESERVED_WORDS.contains(&root) => {}
        _ => return false,
    }
    segments.all(is_valid_identifier)
}

fn is_valid_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

pub(crate) fn validate(options: &LibraryOptions) -> Result<()> {
    if options.entry.as_os_str().is_empty() {
        return Err(Error::Configuration("entry path cannot be empty".to_string()));
    }

    validate_formats(&options.formats)?;
    validate_name(options)?;
    validate_externals(options)?;
    validate_file_names(options)?;

    Ok(())
}

fn validate_formats(formats: &[LibraryFormat]) -> Result<()> {
    if formats.is_empty() {
        return Err(Error::Configuration(
            "at least one output format is required".to_string(),
        ));
    }

    let mut seen = BTreeSet::new();
    for format in formats {
        if !seen.insert(*format) {
            return Err(Error::Configuration(format!(
                "format '{}' is requested more than once",
                format
            )));
        }
    }
    Ok(())
}

fn validate_name(options: &LibraryOptions) -> Result<()> {
    match options.name.as_deref() {
        Some(name) if !is_valid_identifier_path(name) => Err(Error::Configuration(format!(
            "library name '{}' is not a valid JavaScript identifier path",
            name
        ))),
        Some(_) => Ok(()),
        None => match options.formats.iter().find(|f| f.uses_globals()) {
            Some(format) => Err(Error::Configuration(format!(
                "a library name is required for the '{}' format",
                format
            ))),
            None => Ok(()),
        },
    }
}

fn validate_externals(options: &LibraryOptions) -> Result<()> {
    for package in &options.external {
        if package.trim().is_empty() {
            return Err(Error::Configuration(
                "external package names cannot be empty".to_string(),
            ));
        }
    }

    // Globals of packages that are not external are ignored by the build.
    for (package, global) in &options.globals {
        if !options.external.contains(package) {
            continue;
        }
        if !is_valid_identifier_path(global) {
            return Err(Error::Configuration(format!(
                "global '{}' for '{}' is not a valid JavaScript identifier path",
                global, package
            )));
        }
    }

    if let Some(format) = options.formats.iter().find(|f| f.uses_globals()) {
        for package in &options.external {
            if !options.globals.contains_key(package) {
                return Err(Error::Configuration(format!(
                    "external '{}' needs a global name for the '{}' format (e.g. {}={})",
                    package,
                    format,
                    package,
                    suggest_global(package)
                )));
            }
        }
    }

    Ok(())
}

fn validate_file_names(options: &LibraryOptions) -> Result<()> {
    let mut seen: BTreeSet<PathBuf> = BTreeSet::new();

    for (format, file_name) in options.script_file_names() {
        let normalized = validate_relative_file_name(&file_name, &format!("'{format}' output"))?;
        for taken in [normalized.clone(), map_name(&normalized)] {
            if !seen.insert(taken) {
                return Err(Error::Configuration(format!(
                    "file name '{}' for the '{}' format collides with another artifact",
                    file_name, format
                )));
            }
        }
    }

    if options.css_code_split {
        let normalized = validate_relative_file_name(&options.css_file_name, "stylesheet")?;
        if seen.contains(&normalized) {
            return Err(Error::Configuration(format!(
                "stylesheet name '{}' collides with a script artifact",
                options.css_file_name
            )));
        }
    }

    Ok(())
}

fn map_name(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".map");
    PathBuf::from(name)
}

fn validate_relative_file_name(file_name: &str, what: &str) -> Result<PathBuf> {
    if file_name.trim().is_empty() {
        return Err(Error::Configuration(format!(
            "file name for the {} is empty",
            what
        )));
    }
    if file_name.contains('\0') {
        return Err(Error::Configuration(format!(
            "file name for the {} contains a null byte",
            what
        )));
    }

    let path = Path::new(file_name);
    if path.is_absolute() || file_name.starts_with('/') || file_name.starts_with('\\') {
        return Err(Error::Configuration(format!(
            "file name '{}' for the {} must be relative",
            file_name, what
        )));
    }

    let cleaned = path.to_path_buf().clean();
    if matches!(cleaned.components().next(), Some(Component::ParentDir))
        || cleaned.as_os_str() == "."
    {
        return Err(Error::Configuration(format!(
            "file name '{}' for the {} leaves the output directory",
            file_name, what
        )));
    }

    Ok(cleaned)
}

/// `vue-router` -> `VueRouter`, `@scope/pkg` -> `Pkg`.
fn suggest_global(package: &str) -> String {
    package
        .rsplit('/')
        .next()
        .unwrap_or(package)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
