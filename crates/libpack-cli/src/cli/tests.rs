#[cfg(test)]
mod tests {
    use crate::cli::validation::{parse_format, parse_global};
    use crate::cli::{Cli, Command, Platform};
    use crate::logger::LogLevel;
    use clap::Parser;
    use libpack_bundler::LibraryFormat;
    use std::path::PathBuf;

    #[test]
    fn test_parse_global_pairs() {
        assert_eq!(
            parse_global("vue=Vue"),
            Ok(("vue".to_string(), "Vue".to_string()))
        );
        assert_eq!(
            parse_global("@vueuse/core = VueUse"),
            Ok(("@vueuse/core".to_string(), "VueUse".to_string()))
        );
        assert_eq!(
            parse_global("vue=window.Vue"),
            Ok(("vue".to_string(), "window.Vue".to_string()))
        );
    }

    #[test]
    fn test_parse_global_rejects_malformed_pairs() {
        assert!(parse_global("vue").is_err());
        assert!(parse_global("=Vue").is_err());
        assert!(parse_global("vue=").is_err());
        assert!(parse_global("vue=1Vue").is_err());
        assert!(parse_global("vue=my-vue").is_err());
    }

    #[test]
    fn test_parse_format_aliases() {
        assert_eq!(parse_format("es"), Ok(LibraryFormat::Es));
        assert_eq!(parse_format("esm"), Ok(LibraryFormat::Es));
        assert_eq!(parse_format("commonjs"), Ok(LibraryFormat::Cjs));
        assert_eq!(parse_format(" umd "), Ok(LibraryFormat::Umd));
        assert!(parse_format("amd").is_err());
    }

    #[test]
    fn test_build_command_full() {
        let cli = Cli::try_parse_from([
            "libpack",
            "build",
            "src/index.js",
            "--name",
            "VuePolygonDrawer",
            "--file-name",
            "vue-polygon-drawer.[format].js",
            "-f",
            "es,umd,cjs",
            "-g",
            "vue=Vue",
            "-e",
            "lodash-es,@vueuse/core",
            "--no-css-code-split",
            "-d",
            "out",
            "-m",
            "--sourcemap",
            "--platform",
            "node",
            "--clean",
            "--no-vue",
        ])
        .unwrap();

        let Command::Build(args) = cli.command else {
            panic!("expected build command");
        };

        assert_eq!(args.entry.as_deref(), Some("src/index.js"));
        assert_eq!(args.name.as_deref(), Some("VuePolygonDrawer"));
        assert_eq!(
            args.file_name.as_deref(),
            Some("vue-polygon-drawer.[format].js")
        );
        assert_eq!(
            args.formats,
            [LibraryFormat::Es, LibraryFormat::Umd, LibraryFormat::Cjs]
        );
        assert_eq!(args.globals, [("vue".to_string(), "Vue".to_string())]);
        assert_eq!(args.external, ["lodash-es", "@vueuse/core"]);
        assert_eq!(args.css_code_split(), Some(false));
        assert_eq!(args.out_dir, Some(PathBuf::from("out")));
        assert!(args.minify);
        assert!(args.sourcemap);
        assert_eq!(args.platform, Some(Platform::Node));
        assert!(args.clean);
        assert!(args.no_vue);
    }

    #[test]
    fn test_build_command_defaults_are_unset() {
        let cli = Cli::try_parse_from(["libpack", "build"]).unwrap();
        let Command::Build(args) = cli.command else {
            panic!("expected build command");
        };

        assert!(args.entry.is_none());
        assert!(args.formats.is_empty());
        assert_eq!(args.css_code_split(), None);
        assert!(args.out_dir.is_none());
        assert!(args.platform.is_none());
    }

    #[test]
    fn test_css_code_split_last_flag_wins() {
        let cli = Cli::try_parse_from([
            "libpack",
            "build",
            "--no-css-code-split",
            "--css-code-split",
        ])
        .unwrap();
        let Command::Build(args) = cli.command else {
            panic!("expected build command");
        };
        assert_eq!(args.css_code_split(), Some(true));
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        assert!(Cli::try_parse_from(["libpack", "build", "-f", "es,amd"]).is_err());
    }

    #[test]
    fn test_check_command() {
        let cli =
            Cli::try_parse_from(["libpack", "check", "--config", "libpack.toml", "--schema"])
                .unwrap();
        let Command::Check(args) = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(args.config, Some(PathBuf::from("libpack.toml")));
        assert!(args.schema);
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["libpack", "-v", "check"]).unwrap();
        assert_eq!(cli.log_level(), Some(LogLevel::Debug));

        let cli = Cli::try_parse_from(["libpack", "check", "--quiet", "--no-color"]).unwrap();
        assert_eq!(cli.log_level(), Some(LogLevel::Error));
        assert!(cli.no_color);

        let cli = Cli::try_parse_from(["libpack", "--log-level", "warn", "check"]).unwrap();
        assert_eq!(cli.log_level(), Some(LogLevel::Warn));

        let cli = Cli::try_parse_from(["libpack", "check"]).unwrap();
        assert_eq!(cli.log_level(), None);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["libpack", "-v", "-q", "check"]).is_err());
    }
}
