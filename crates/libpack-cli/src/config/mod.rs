//! Layered configuration for the libpack CLI.
//!
//! Priority: CLI flags > `LIBPACK_*` environment > config file > defaults.
//! The config file is `libpack.toml`, `libpack.config.json` or the
//! `"libpack"` field of `package.json`, looked up in the working directory.

mod conversions;
mod defaults;
mod loading;
mod tests;
mod types;
mod validation;

use libpack_bundler::LibraryFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub use defaults::*;
pub use loading::{CONFIG_FILE_NAMES, ConfigOverrides, find_config_file};
pub use types::*;

/// libpack configuration, as read from `libpack.toml` or `libpack.config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LibpackConfig {
    /// Library entry module (e.g. "src/index.js")
    #[serde(default = "default_entry")]
    pub entry: String,

    /// Global name of the library for umd/iife output (e.g. "VuePolygonDrawer")
    #[schemars(regex(pattern = r"^[a-zA-Z_$][a-zA-Z0-9_$]*(\.[a-zA-Z_$][a-zA-Z0-9_$]*)*$"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Artifact file name pattern; `[name]` and `[format]` are substituted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Output formats (es, umd, cjs, iife), built in order
    #[schemars(with = "Vec<String>")]
    #[serde(default = "default_formats")]
    pub formats: Vec<LibraryFormat>,

    /// Packages kept out of the bundle
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external: Vec<String>,

    /// Global variable names of external packages for umd/iife output.
    /// Every package listed here is also external.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub globals: BTreeMap<String, String>,

    /// Extract styles into one stylesheet (true) or inject them at runtime (false)
    #[serde(default = "default_css_code_split")]
    pub css_code_split: bool,

    /// Name of the extracted stylesheet
    #[serde(default = "default_css_file_name")]
    pub css_file_name: String,

    /// Output directory
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Minify scripts and styles
    #[serde(default)]
    pub minify: bool,

    /// Emit a .map file next to each script
    #[serde(default)]
    pub sourcemap: bool,

    /// Target platform
    #[serde(default = "default_platform")]
    pub platform: Platform,

    /// Framework plugins to enable
    #[serde(default = "default_plugins")]
    pub plugins: Vec<PluginName>,

    /// Remove the output directory's contents before writing
    #[serde(default)]
    pub clean: bool,

    /// Project directory, relative to where libpack runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
}

impl Default for LibpackConfig {
    fn default() -> Self {
        Self {
            entry: default_entry(),
            name: None,
            file_name: None,
            formats: default_formats(),
            external: Vec::new(),
            globals: BTreeMap::new(),
            css_code_split: default_css_code_split(),
            css_file_name: default_css_file_name(),
            out_dir: default_out_dir(),
            minify: false,
            sourcemap: false,
            platform: default_platform(),
            plugins: default_plugins(),
            clean: false,
            cwd: None,
        }
    }
}

impl LibpackConfig {
    /// JSON Schema of the config file.
    pub fn json_schema() -> serde_json::Value {
        schemars::schema_for!(LibpackConfig).to_value()
    }
}
