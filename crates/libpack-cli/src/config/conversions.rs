use crate::config::{LibpackConfig, Platform, PluginName};
use libpack_bundler::LibraryOptions;
use libpack_plugin_vue::vue;
use std::path::Path;

impl From<crate::cli::Platform> for Platform {
    fn from(p: crate::cli::Platform) -> Self {
        match p {
            crate::cli::Platform::Browser => Platform::Browser,
            crate::cli::Platform::Node => Platform::Node,
            crate::cli::Platform::Neutral => Platform::Neutral,
        }
    }
}

impl From<Platform> for libpack_bundler::Platform {
    fn from(p: Platform) -> Self {
        match p {
            Platform::Browser => libpack_bundler::Platform::Browser,
            Platform::Node => libpack_bundler::Platform::Node,
            Platform::Neutral => libpack_bundler::Platform::Neutral,
        }
    }
}

impl LibpackConfig {
    /// Library options for a build rooted at `cwd`.
    pub fn to_library_options(&self, cwd: &Path) -> LibraryOptions {
        let mut options = LibraryOptions::new(&self.entry)
            .cwd(cwd)
            .formats(self.formats.iter().copied())
            .external(self.external.iter().cloned())
            .css_code_split(self.css_code_split)
            .css_file_name(self.css_file_name.clone())
            .minify(self.minify)
            .sourcemap(self.sourcemap)
            .platform(self.platform.into());

        if let Some(name) = &self.name {
            options = options.name(name.clone());
        }
        if let Some(pattern) = &self.file_name {
            options = options.file_name(pattern.clone());
        }
        for (package, global) in &self.globals {
            options = options.global(package.clone(), global.clone());
        }
        for plugin in &self.plugins {
            options = match plugin {
                PluginName::Vue => options.plugin_factory(vue()),
            };
        }

        options
    }
}
