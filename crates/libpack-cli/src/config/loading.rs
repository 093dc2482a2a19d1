use crate::cli::BuildArgs;
use crate::config::{LibpackConfig, Platform, PluginName};
use crate::error::{ConfigError, Result};
use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized, Toml},
};
use libpack_bundler::LibraryFormat;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Config files looked up in the working directory, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["libpack.toml", "libpack.config.json"];

/// `LIBPACK_*` variables read into the config (after the prefix, lowercased).
const ENV_KEYS: &[&str] = &[
    "entry",
    "name",
    "file_name",
    "formats",
    "external",
    "globals",
    "css_code_split",
    "css_file_name",
    "out_dir",
    "minify",
    "sourcemap",
    "platform",
    "plugins",
    "clean",
];

/// Values set on the command line. Unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<LibraryFormat>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub globals: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_code_split: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sourcemap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<PluginName>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean: Option<bool>,
}

impl From<&BuildArgs> for ConfigOverrides {
    fn from(args: &BuildArgs) -> Self {
        let non_empty = |values: &Vec<String>| (!values.is_empty()).then(|| values.clone());

        Self {
            entry: args.entry.clone(),
            name: args.name.clone(),
            file_name: args.file_name.clone(),
            formats: (!args.formats.is_empty()).then(|| args.formats.clone()),
            external: non_empty(&args.external),
            globals: (!args.globals.is_empty()).then(|| args.globals.iter().cloned().collect()),
            css_code_split: args.css_code_split(),
            css_file_name: args.css_file_name.clone(),
            out_dir: args.out_dir.clone(),
            minify: args.minify.then_some(true),
            sourcemap: args.sourcemap.then_some(true),
            platform: args.platform.map(Into::into),
            plugins: args.no_vue.then(Vec::new),
            clean: args.clean.then_some(true),
        }
    }
}

/// Find the config file for a project directory.
///
/// `explicit` (resolved against `cwd`) must exist. Without it, the first of
/// [`CONFIG_FILE_NAMES`] present in `cwd` is used, then a `package.json`
/// carrying a `"libpack"` field.
pub fn find_config_file(explicit: Option<&Path>, cwd: &Path) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            cwd.join(path)
        };
        if !path.is_file() {
            return Err(ConfigError::NotFound(path).into());
        }
        return Ok(Some(path));
    }

    for name in CONFIG_FILE_NAMES {
        let path = cwd.join(name);
        if path.is_file() {
            return Ok(Some(path));
        }
    }

    let package_json = cwd.join("package.json");
    if package_json.is_file() && has_libpack_field(&package_json)? {
        return Ok(Some(package_json));
    }

    Ok(None)
}

fn has_libpack_field(package_json: &Path) -> Result<bool> {
    let content = std::fs::read_to_string(package_json).map_err(ConfigError::Io)?;
    let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| ConfigError::Load {
        source_name: package_json.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(value.get("libpack").is_some())
}

/// `OUT_DIR` -> `outDir`
fn env_key_to_camel(key: &str) -> String {
    let mut camel = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            camel.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            camel.push(c.to_ascii_lowercase());
        }
    }
    camel
}

impl LibpackConfig {
    /// Load configuration from every layer.
    ///
    /// Priority: `overrides` > `LIBPACK_*` environment > config file > defaults.
    pub fn load(
        overrides: &ConfigOverrides,
        config_path: Option<&Path>,
        cwd: &Path,
    ) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = find_config_file(config_path, cwd)?;
        if let Some(path) = &config_file {
            tracing::debug!(path = %path.display(), "loading config file");
            figment = match path.file_name().and_then(|name| name.to_str()) {
                Some("package.json") => {
                    figment.merge(Figment::from(Json::file(path)).focus("libpack"))
                }
                _ if path.extension().is_some_and(|ext| ext == "toml") => {
                    figment.merge(Toml::file(path))
                }
                _ => figment.merge(Json::file(path)),
            };
        }

        figment = figment.merge(
            Env::prefixed("LIBPACK_")
                .only(ENV_KEYS)
                .map(|key| env_key_to_camel(key.as_str()).into())
                .lowercase(false),
        );

        figment = figment.merge(Serialized::defaults(overrides));

        figment.extract().map_err(|e| {
            ConfigError::Load {
                source_name: config_file
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "configuration".to_string()),
                message: e.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_key_to_camel() {
        assert_eq!(env_key_to_camel("OUT_DIR"), "outDir");
        assert_eq!(env_key_to_camel("css_code_split"), "cssCodeSplit");
        assert_eq!(env_key_to_camel("ENTRY"), "entry");
    }

    #[test]
    fn test_overrides_skip_unset_fields() {
        let value = serde_json::to_value(ConfigOverrides::default()).unwrap();
        assert_eq!(value, serde_json::json!({}));

        let overrides = ConfigOverrides {
            out_dir: Some(PathBuf::from("lib")),
            css_code_split: Some(false),
            ..Default::default()
        };
        let value = serde_json::to_value(overrides).unwrap();
        assert_eq!(value, serde_json::json!({ "outDir": "lib", "cssCodeSplit": false }));
    }

    #[test]
    fn test_overrides_from_args() {
        let args = BuildArgs {
            entry: Some("src/main.js".to_string()),
            globals: vec![("vue".to_string(), "Vue".to_string())],
            minify: true,
            no_vue: true,
            ..Default::default()
        };
        let overrides = ConfigOverrides::from(&args);

        assert_eq!(overrides.entry.as_deref(), Some("src/main.js"));
        assert_eq!(overrides.globals.unwrap()["vue"], "Vue");
        assert_eq!(overrides.minify, Some(true));
        assert_eq!(overrides.sourcemap, None);
        assert_eq!(overrides.plugins, Some(vec![]));
        assert!(overrides.formats.is_none());
    }
}
