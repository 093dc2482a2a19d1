#[cfg(test)]
mod tests {
    use crate::config::*;
    use crate::ConfigError;
    use crate::error::CliError;
    use libpack_bundler::LibraryFormat;
    use serial_test::serial;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn load(dir: &Path, overrides: &ConfigOverrides) -> crate::error::Result<LibpackConfig> {
        LibpackConfig::load(overrides, None, dir)
    }

    #[test]
    fn test_serialization() {
        let config = LibpackConfig {
            name: Some("VuePolygonDrawer".to_string()),
            globals: [("vue".to_string(), "Vue".to_string())].into(),
            ..LibpackConfig::default()
        };

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["formats"], serde_json::json!(["es", "umd"]));
        assert_eq!(json["cssCodeSplit"], true);
        assert_eq!(json["cssFileName"], "style.css");
        assert_eq!(json["outDir"], "dist");
        assert_eq!(json["plugins"], serde_json::json!(["vue"]));
        assert!(json.get("css_code_split").is_none());

        // skip_serializing_if
        assert!(json.get("fileName").is_none());
        assert!(json.get("external").is_none());
        assert!(json.get("cwd").is_none());

        let back: LibpackConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result: Result<LibpackConfig, _> =
            serde_json::from_str(r#"{ "entry": "src/index.js", "bundle": true }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation() {
        assert!(LibpackConfig::default().validate().is_ok());

        assert!(LibpackConfig {
            entry: " ".to_string(),
            ..LibpackConfig::default()
        }
        .validate()
        .is_err());

        assert!(LibpackConfig {
            formats: vec![],
            ..LibpackConfig::default()
        }
        .validate()
        .is_err());

        assert!(LibpackConfig {
            name: Some("vue-polygon-drawer".to_string()),
            ..LibpackConfig::default()
        }
        .validate()
        .is_err());

        assert!(LibpackConfig {
            globals: [("vue".to_string(), "the vue".to_string())].into(),
            ..LibpackConfig::default()
        }
        .validate()
        .is_err());

        assert!(LibpackConfig {
            file_name: Some("lib.js".to_string()),
            ..LibpackConfig::default()
        }
        .validate()
        .is_err());

        assert!(LibpackConfig {
            file_name: Some("lib.js".to_string()),
            formats: vec![LibraryFormat::Es],
            ..LibpackConfig::default()
        }
        .validate()
        .is_ok());

        assert!(LibpackConfig {
            css_file_name: "style.scss".to_string(),
            ..LibpackConfig::default()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_json_schema_lists_fields() {
        let schema = LibpackConfig::json_schema();
        let properties = &schema["properties"];
        for field in ["entry", "name", "fileName", "formats", "globals", "cssCodeSplit", "outDir"] {
            assert!(properties.get(field).is_some(), "schema misses {field}");
        }
    }

    #[test]
    #[serial]
    fn test_defaults_without_config_file() {
        let dir = TempDir::new().unwrap();
        let config = load(dir.path(), &ConfigOverrides::default()).unwrap();
        assert_eq!(config, LibpackConfig::default());
    }

    #[test]
    #[serial]
    fn test_toml_file_is_loaded() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("libpack.toml"),
            r#"
entry = "src/main.js"
name = "VuePolygonDrawer"
fileName = "vue-polygon-drawer.[format].js"
formats = ["es", "umd", "cjs"]
cssCodeSplit = false

[globals]
vue = "Vue"
"#,
        )
        .unwrap();

        let config = load(dir.path(), &ConfigOverrides::default()).unwrap();
        assert_eq!(config.entry, "src/main.js");
        assert_eq!(config.name.as_deref(), Some("VuePolygonDrawer"));
        assert_eq!(
            config.formats,
            [LibraryFormat::Es, LibraryFormat::Umd, LibraryFormat::Cjs]
        );
        assert!(!config.css_code_split);
        assert_eq!(config.globals["vue"], "Vue");
        assert_eq!(config.out_dir, PathBuf::from("dist"));
    }

    #[test]
    #[serial]
    fn test_toml_wins_over_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("libpack.toml"), "entry = \"from-toml.js\"\n").unwrap();
        fs::write(
            dir.path().join("libpack.config.json"),
            r#"{ "entry": "from-json.js" }"#,
        )
        .unwrap();

        let config = load(dir.path(), &ConfigOverrides::default()).unwrap();
        assert_eq!(config.entry, "from-toml.js");
    }

    #[test]
    #[serial]
    fn test_package_json_field() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{ "name": "vue-polygon-drawer", "libpack": { "name": "VuePolygonDrawer", "minify": true } }"#,
        )
        .unwrap();

        let config = load(dir.path(), &ConfigOverrides::default()).unwrap();
        assert_eq!(config.name.as_deref(), Some("VuePolygonDrawer"));
        assert!(config.minify);
    }

    #[test]
    #[serial]
    fn test_package_json_without_field_is_ignored() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{ "name": "x" }"#).unwrap();

        assert_eq!(find_config_file(None, dir.path()).unwrap(), None);
    }

    #[test]
    #[serial]
    fn test_explicit_config_must_exist() {
        let dir = TempDir::new().unwrap();
        let err = LibpackConfig::load(
            &ConfigOverrides::default(),
            Some(Path::new("missing.toml")),
            dir.path(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::NotFound(_))));
    }

    #[test]
    #[serial]
    fn test_env_overrides_file_and_cli_overrides_env() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("libpack.config.json"),
            r#"{ "outDir": "file-dist", "minify": false, "cssFileName": "file.css" }"#,
        )
        .unwrap();

        unsafe {
            std::env::set_var("LIBPACK_OUT_DIR", "env-dist");
            std::env::set_var("LIBPACK_MINIFY", "true");
            std::env::set_var("LIBPACK_UNRELATED_SETTING", "ignored");
        }

        let overrides = ConfigOverrides {
            out_dir: Some(PathBuf::from("cli-dist")),
            ..Default::default()
        };
        let result = load(dir.path(), &overrides);

        unsafe {
            std::env::remove_var("LIBPACK_OUT_DIR");
            std::env::remove_var("LIBPACK_MINIFY");
            std::env::remove_var("LIBPACK_UNRELATED_SETTING");
        }

        let config = result.unwrap();
        assert_eq!(config.out_dir, PathBuf::from("cli-dist"));
        assert!(config.minify);
        assert_eq!(config.css_file_name, "file.css");
    }

    #[test]
    #[serial]
    fn test_invalid_field_type_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("libpack.config.json"),
            r#"{ "formats": ["es", "amd"] }"#,
        )
        .unwrap();

        let err = load(dir.path(), &ConfigOverrides::default()).unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::Load { .. })));
        assert!(err.to_string().contains("libpack.config.json"));
    }

    #[test]
    fn test_to_library_options() {
        let config = LibpackConfig {
            name: Some("VuePolygonDrawer".to_string()),
            file_name: Some("vue-polygon-drawer.[format].js".to_string()),
            formats: vec![LibraryFormat::Es, LibraryFormat::Umd, LibraryFormat::Cjs],
            external: vec!["lodash-es".to_string()],
            globals: [("vue".to_string(), "Vue".to_string())].into(),
            ..LibpackConfig::default()
        };

        let options = config.to_library_options(Path::new("/project"));
        assert_eq!(options.name.as_deref(), Some("VuePolygonDrawer"));
        assert_eq!(options.cwd.as_deref(), Some(Path::new("/project")));
        assert!(options.external.contains(&"vue".to_string()));
        assert!(options.external.contains(&"lodash-es".to_string()));
        assert_eq!(options.globals["vue"], "Vue");
        assert_eq!(
            options
                .script_file_names()
                .into_iter()
                .map(|(_, name)| name)
                .collect::<Vec<_>>(),
            [
                "vue-polygon-drawer.es.js",
                "vue-polygon-drawer.umd.js",
                "vue-polygon-drawer.cjs.js",
            ]
        );
    }
}
