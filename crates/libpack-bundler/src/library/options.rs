use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use path_clean::PathClean;

use super::{FileNaming, LibraryFormat};
use crate::output::LibraryBuild;
use crate::plugins::{IntoPlugin, PluginFactory, SharedPlugin};
use crate::{Platform, Result};

/// Default name of the extracted stylesheet artifact.
pub const DEFAULT_CSS_FILE_NAME: &str = "style.css";

/// Configuration for packaging a library.
///
/// Build one with [`LibraryOptions::new`] and the builder methods, then call
/// [`build`](LibraryOptions::build).
#[derive(Clone)]
pub struct LibraryOptions {
    /// Entry module; relative paths resolve against `cwd`.
    pub entry: PathBuf,

    /// Global name of the library for UMD/IIFE output (e.g. `VuePolygonDrawer`).
    pub name: Option<String>,

    /// Artifact file naming per format.
    pub file_naming: FileNaming,

    /// Requested output formats, built in this order.
    pub formats: Vec<LibraryFormat>,

    /// Packages kept out of the bundle.
    pub external: Vec<String>,

    /// Global variable names for external packages (UMD/IIFE).
    pub globals: BTreeMap<String, String>,

    /// Emit one stylesheet artifact (`true`) or inject styles at runtime (`false`).
    pub css_code_split: bool,

    /// Name of the stylesheet artifact when `css_code_split` is on.
    pub css_file_name: String,

    /// Minify scripts and styles (default: false).
    pub minify: bool,

    /// Emit `.map` files next to each script (default: false).
    pub sourcemap: bool,

    /// Target runtime platform (default: Browser).
    pub platform: Platform,

    /// Working directory for module resolution (default: current directory).
    pub cwd: Option<PathBuf>,

    pub(crate) plugins: Vec<Arc<dyn PluginFactory>>,
}

impl LibraryOptions {
    /// Create options for the given entry module.
    ///
    /// ```no_run
    /// use libpack_bundler::LibraryOptions;
    ///
    /// let options = LibraryOptions::new("./src/index.js").name("MyLib");
    /// ```
    pub fn new(entry: impl AsRef<Path>) -> Self {
        Self {
            entry: entry.as_ref().to_path_buf().clean(),
            name: None,
            file_naming: FileNaming::default(),
            formats: LibraryFormat::defaults(),
            external: Vec::new(),
            globals: BTreeMap::new(),
            css_code_split: true,
            css_file_name: DEFAULT_CSS_FILE_NAME.to_string(),
            minify: false,
            sourcemap: false,
            platform: Platform::Browser,
            cwd: None,
            plugins: Vec::new(),
        }
    }

    /// Set the library's global name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name artifacts with a `[name]`/`[format]` pattern.
    pub fn file_name(mut self, pattern: impl Into<String>) -> Self {
        self.file_naming = FileNaming::pattern(pattern);
        self
    }

    /// Name artifacts with a function of format and entry stem.
    pub fn file_name_with<F>(mut self, naming: F) -> Self
    where
        F: Fn(LibraryFormat, &str) -> String + Send + Sync + 'static,
    {
        self.file_naming = FileNaming::custom(naming);
        self
    }

    /// Replace the requested formats.
    pub fn formats<I>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = LibraryFormat>,
    {
        self.formats = formats.into_iter().collect();
        self
    }

    /// Append one format to the requested formats.
    pub fn format(mut self, format: LibraryFormat) -> Self {
        self.formats.push(format);
        self
    }

    /// Add external packages that should not be bundled.
    pub fn external<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for pkg in packages {
            let value = pkg.into();
            if !self.external.contains(&value) {
                self.external.push(value);
            }
        }
        self
    }

    /// Declare `package` external, exposed at runtime as the global `global`.
    pub fn global(mut self, package: impl Into<String>, global: impl Into<String>) -> Self {
        let package = package.into();
        if !self.external.contains(&package) {
            self.external.push(package.clone());
        }
        self.globals.insert(package, global.into());
        self
    }

    /// Set global variable mappings without marking the packages external.
    pub fn globals_map<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in entries {
            self.globals.insert(k.into(), v.into());
        }
        self
    }

    pub fn css_code_split(mut self, enabled: bool) -> Self {
        self.css_code_split = enabled;
        self
    }

    pub fn css_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.css_file_name = file_name.into();
        self
    }

    pub fn minify(mut self, enabled: bool) -> Self {
        self.minify = enabled;
        self
    }

    pub fn sourcemap(mut self, enabled: bool) -> Self {
        self.sourcemap = enabled;
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Set the working directory for module resolution.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Add a Rolldown plugin, shared by every format run.
    pub fn plugin<P>(mut self, plugin: P) -> Self
    where
        P: IntoPlugin,
    {
        self.plugins.push(Arc::new(SharedPlugin(plugin.into_plugin())));
        self
    }

    /// Add a plugin that is created per format run with access to the
    /// build's style sink.
    pub fn plugin_factory<F>(mut self, factory: F) -> Self
    where
        F: PluginFactory + 'static,
    {
        self.plugins.push(Arc::new(factory));
        self
    }

    /// Check the options for internal consistency without touching the
    /// filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`](crate::Error::Configuration) when:
    /// - the entry, format list or stylesheet name is empty
    /// - a format is requested twice
    /// - `umd`/`iife` is requested without a valid library name, or an
    ///   external has no global
    /// - a library name or global is not a valid identifier path
    /// - two artifacts would share a file name, or a name is absolute or
    ///   escapes the output directory
    pub fn validate(&self) -> Result<()> {
        super::validation::validate(self)
    }

    /// Build every requested format.
    ///
    /// Artifacts are kept in memory; use [`LibraryBuild::write_to`] to
    /// emit them.
    pub async fn build(&self) -> Result<LibraryBuild> {
        super::executor::execute_library_build(self).await
    }

    /// Stem of the entry file, substituted for `[name]`.
    pub fn entry_stem(&self) -> String {
        self.entry
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("index")
            .to_string()
    }

    /// Script file name of every requested format, in request order.
    pub fn script_file_names(&self) -> Vec<(LibraryFormat, String)> {
        let stem = self.entry_stem();
        self.formats
            .iter()
            .map(|format| (*format, self.file_naming.file_name(*format, &stem)))
            .collect()
    }

    /// Resolve the working directory.
    pub(crate) fn resolved_cwd(&self) -> Result<PathBuf> {
        let cwd = match &self.cwd {
            Some(cwd) if cwd.is_absolute() => cwd.clone(),
            Some(cwd) => std::env::current_dir()?.join(cwd),
            None => std::env::current_dir()?,
        };
        Ok(cwd.clean())
    }
}

impl fmt::Debug for LibraryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryOptions")
            .field("entry", &self.entry)
            .field("name", &self.name)
            .field("file_naming", &self.file_naming)
            .field("formats", &self.formats)
            .field("external", &self.external)
            .field("globals", &self.globals)
            .field("css_code_split", &self.css_code_split)
            .field("css_file_name", &self.css_file_name)
            .field("minify", &self.minify)
            .field("sourcemap", &self.sourcemap)
            .field("platform", &self.platform)
            .field("cwd", &self.cwd)
            .field("plugins", &self.plugins.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = LibraryOptions::new("./src/../src/index.js");
        assert_eq!(options.entry, PathBuf::from("src/index.js"));
        assert_eq!(options.formats, LibraryFormat::defaults());
        assert!(options.css_code_split);
        assert_eq!(options.css_file_name, "style.css");
        assert_eq!(options.entry_stem(), "index");
        assert!(!options.minify);
        assert!(!options.sourcemap);
    }

    #[test]
    fn global_marks_package_external_once() {
        let options = LibraryOptions::new("src/index.js")
            .external(["vue"])
            .global("vue", "Vue")
            .global("pinia", "Pinia");

        assert_eq!(options.external, ["vue", "pinia"]);
        assert_eq!(options.globals.get("vue").map(String::as_str), Some("Vue"));
    }

    #[test]
    fn globals_map_does_not_mark_external() {
        let options = LibraryOptions::new("src/index.js").globals_map([("vue", "Vue")]);
        assert!(options.external.is_empty());
        assert_eq!(options.globals.len(), 1);
    }

    #[test]
    fn script_file_names_follow_format_order() {
        let options = LibraryOptions::new("src/index.js")
            .file_name_with(|format, _| format!("lib.{format}.js"))
            .formats([LibraryFormat::Es, LibraryFormat::Umd])
            .format(LibraryFormat::Cjs);

        let names: Vec<String> = options
            .script_file_names()
            .into_iter()
            .map(|(_, name)| name)
            .collect();
        assert_eq!(names, ["lib.es.js", "lib.umd.js", "lib.cjs.js"]);
    }

    #[test]
    fn relative_cwd_is_absolutized() {
        let options = LibraryOptions::new("src/index.js").cwd("fixtures/lib");
        let cwd = options.resolved_cwd().unwrap();
        assert!(cwd.is_absolute());
        assert!(cwd.ends_with("fixtures/lib"));
    }
}
