use clap::{Args, Subcommand};
use libpack_bundler::LibraryFormat;
use std::path::PathBuf;

use crate::cli::enums::Platform;
use crate::cli::validation::{parse_format, parse_global};

/// Available libpack subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Package the library
    ///
    /// Bundles the entry once per requested format and writes the scripts,
    /// optional source maps and the extracted stylesheet to the output
    /// directory.
    Build(BuildArgs),

    /// Validate configuration without building
    ///
    /// Loads libpack.toml / libpack.config.json, environment overrides and
    /// checks the resulting library options.
    Check(CheckArgs),
}

/// Arguments for the build command
///
/// Every flag is optional; unset flags fall back to the config file,
/// `LIBPACK_*` environment variables and then the defaults.
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Library entry module
    ///
    /// Examples:
    ///   libpack build src/index.js
    #[arg(value_name = "ENTRY")]
    pub entry: Option<String>,

    /// Global name of the library for umd/iife output
    ///
    /// Example: --name VuePolygonDrawer
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// Artifact file name pattern
    ///
    /// `[name]` is replaced by the entry file stem and `[format]` by the
    /// output format.
    ///
    /// Example: --file-name "vue-polygon-drawer.[format].js"
    #[arg(long, value_name = "PATTERN")]
    pub file_name: Option<String>,

    /// Output formats, built in the given order
    ///
    /// Examples:
    ///   -f es,umd,cjs
    ///   -f es -f iife
    #[arg(
        short = 'f',
        long = "formats",
        value_name = "FORMAT",
        value_delimiter = ',',
        value_parser = parse_format
    )]
    pub formats: Vec<LibraryFormat>,

    /// Packages kept out of the bundle
    ///
    /// Examples:
    ///   --external vue --external vue-router
    ///   -e vue,vue-router
    #[arg(short, long, value_name = "PACKAGE", value_delimiter = ',')]
    pub external: Vec<String>,

    /// Global variable of an external package for umd/iife output
    ///
    /// The package is also marked external.
    ///
    /// Example: -g vue=Vue
    #[arg(short, long = "global", value_name = "PACKAGE=GLOBAL", value_parser = parse_global)]
    pub globals: Vec<(String, String)>,

    /// Extract styles into one stylesheet (default)
    #[arg(long, overrides_with = "no_css_code_split")]
    pub css_code_split: bool,

    /// Inject styles at runtime instead of emitting a stylesheet
    #[arg(long, overrides_with = "css_code_split")]
    pub no_css_code_split: bool,

    /// Name of the extracted stylesheet
    #[arg(long, value_name = "FILE")]
    pub css_file_name: Option<String>,

    /// Output directory (default: dist)
    #[arg(short = 'd', long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Minify scripts and styles
    #[arg(short = 'm', long)]
    pub minify: bool,

    /// Emit a .map file next to each script
    #[arg(long)]
    pub sourcemap: bool,

    /// Target platform environment
    #[arg(long, value_enum)]
    pub platform: Option<Platform>,

    /// Remove the output directory's contents before writing
    #[arg(long)]
    pub clean: bool,

    /// Working directory for the build
    ///
    /// The config file is looked up here and relative paths resolve
    /// against it. Defaults to the current directory.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Path to a config file (libpack.toml or libpack.config.json)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Do not load .vue files
    #[arg(long)]
    pub no_vue: bool,
}

impl BuildArgs {
    /// Value of the --css-code-split / --no-css-code-split pair, if given.
    pub fn css_code_split(&self) -> Option<bool> {
        if self.css_code_split {
            Some(true)
        } else if self.no_css_code_split {
            Some(false)
        } else {
            None
        }
    }
}

/// Arguments for the check command
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Path to a config file
    ///
    /// If not provided, searches for libpack.toml, libpack.config.json or a
    /// "libpack" field in package.json in the working directory.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the JSON schema of the config file and exit
    #[arg(long)]
    pub schema: bool,

    /// Working directory (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}
