use crate::config::LibpackConfig;
use crate::error::{ConfigError, Result};
use libpack_bundler::is_valid_identifier_path;

impl LibpackConfig {
    /// Validate the shape of the configuration.
    ///
    /// Cross-field rules (globals for umd/iife, artifact name collisions)
    /// are checked by [`libpack_bundler::LibraryOptions::validate`].
    pub fn validate(&self) -> Result<()> {
        if self.entry.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "entry".to_string(),
                hint: "Provide the library entry module, e.g. \"src/index.js\"".to_string(),
            }
            .into());
        }

        if self.formats.is_empty() {
            return Err(ConfigError::MissingField {
                field: "formats".to_string(),
                hint: "Request at least one of es, umd, cjs or iife".to_string(),
            }
            .into());
        }

        if let Some(name) = &self.name {
            if !is_valid_identifier_path(name) {
                return Err(ConfigError::InvalidValue {
                    field: "name".to_string(),
                    value: name.clone(),
                    hint: "Use a JavaScript identifier such as \"MyLibrary\"".to_string(),
                }
                .into());
            }
        }

        if let Some(pattern) = &self.file_name {
            if !pattern.contains("[format]") && self.formats.len() > 1 {
                return Err(ConfigError::InvalidValue {
                    field: "fileName".to_string(),
                    value: pattern.clone(),
                    hint: "Include [format] so every format gets its own file".to_string(),
                }
                .into());
            }
        }

        for (package, global) in &self.globals {
            if !is_valid_identifier_path(global) {
                return Err(ConfigError::InvalidValue {
                    field: format!("globals.{}", package),
                    value: global.clone(),
                    hint: "Globals must be JavaScript identifiers, e.g. \"Vue\"".to_string(),
                }
                .into());
            }
        }

        if !self.css_file_name.ends_with(".css") {
            return Err(ConfigError::InvalidValue {
                field: "cssFileName".to_string(),
                value: self.css_file_name.clone(),
                hint: "The stylesheet name must end in .css".to_string(),
            }
            .into());
        }

        if self.out_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "outDir".to_string(),
                hint: "Set an output directory, e.g. \"dist\"".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
