use libpack_bundler::LibraryFormat;
use libpack_bundler::library::DEFAULT_CSS_FILE_NAME;
use std::path::PathBuf;

use crate::config::types::{Platform, PluginName};

pub fn default_entry() -> String {
    "src/index.js".to_string()
}

pub fn default_formats() -> Vec<LibraryFormat> {
    LibraryFormat::defaults()
}

pub fn default_css_code_split() -> bool {
    true
}

pub fn default_css_file_name() -> String {
    DEFAULT_CSS_FILE_NAME.to_string()
}

pub fn default_out_dir() -> PathBuf {
    PathBuf::from("dist")
}

pub fn default_platform() -> Platform {
    Platform::Browser
}

pub fn default_plugins() -> Vec<PluginName> {
    vec![PluginName::Vue]
}
