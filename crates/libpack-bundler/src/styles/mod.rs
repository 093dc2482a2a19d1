//! Style handling for library builds.
//!
//! Stylesheets reach the module graph through `.css` imports and through
//! framework plugins (e.g. Vue `<style>` blocks). Both go through a
//! [`StyleSink`], which either collects the CSS for a separate stylesheet
//! artifact or turns it into code that injects a `<style>` element.

mod collector;
mod plugin;

pub use collector::StyleCollector;
pub use plugin::StylePlugin;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lightningcss::{
    printer::PrinterOptions,
    stylesheet::{MinifyOptions, ParserOptions, StyleSheet},
};

/// What happens to styles found while bundling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleMode {
    /// Collect into one stylesheet artifact.
    Extract,
    /// Inject at runtime from the script artifacts.
    Inject,
}

impl StyleMode {
    pub fn from_code_split(css_code_split: bool) -> Self {
        if css_code_split {
            StyleMode::Extract
        } else {
            StyleMode::Inject
        }
    }
}

/// Handle through which plugins hand styles to the build.
///
/// Cloning is cheap; clones share one [`StyleCollector`].
#[derive(Debug, Clone)]
pub struct StyleSink {
    mode: StyleMode,
    minify: bool,
    root: PathBuf,
    collector: Arc<StyleCollector>,
}

impl StyleSink {
    /// `root` is the build's working directory; module ids below it are
    /// recorded relative to it so output does not depend on where the
    /// project lives on disk.
    pub fn new(mode: StyleMode, minify: bool, root: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            minify,
            root: root.into(),
            collector: Arc::new(StyleCollector::new()),
        }
    }

    pub fn mode(&self) -> StyleMode {
        self.mode
    }

    pub fn collector(&self) -> &StyleCollector {
        &self.collector
    }

    /// Parse and print `source` with lightningcss, minifying when the build
    /// asks for it.
    pub fn process(&self, id: &str, source: &str) -> anyhow::Result<String> {
        let mut stylesheet = StyleSheet::parse(
            source,
            ParserOptions {
                filename: self.module_key(id),
                ..Default::default()
            },
        )
        .map_err(|e| anyhow::anyhow!("Failed to parse CSS from {}: {}", id, e))?;

        if self.minify {
            stylesheet
                .minify(MinifyOptions::default())
                .map_err(|e| anyhow::anyhow!("Failed to minify CSS from {}: {}", id, e))?;
        }

        let result = stylesheet
            .to_css(PrinterOptions {
                minify: self.minify,
                ..Default::default()
            })
            .map_err(|e| anyhow::anyhow!("Failed to print CSS from {}: {}", id, e))?;

        Ok(result.code)
    }

    /// Register block `index` of module `id` and return the JavaScript that
    /// stands in for it in the module graph.
    ///
    /// When extracting, the CSS is collected and the returned code is empty.
    /// When injecting, the returned code appends a `<style>` element once per
    /// block and does nothing outside a browser.
    pub fn register(&self, id: &str, index: usize, css: String) -> String {
        let key = self.module_key(id);
        match self.mode {
            StyleMode::Extract => {
                tracing::debug!(module = %key, index, bytes = css.len(), "collected style block");
                self.collector.insert(key, index, css);
                String::new()
            }
            StyleMode::Inject => injection_code(&format!("{key}:{index}"), &css),
        }
    }

    /// The assembled stylesheet, if styles were extracted.
    pub fn stylesheet(&self) -> Option<String> {
        match self.mode {
            StyleMode::Extract => self.collector.stylesheet(),
            StyleMode::Inject => None,
        }
    }

    fn module_key(&self, id: &str) -> String {
        let path = Path::new(id);
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative.to_string_lossy().replace('\\', "/")
    }
}

/// Self-contained snippet that injects `css` once, keyed by `key`.
fn injection_code(key: &str, css: &str) -> String {
    // JSON string literals are valid JavaScript string literals.
    let key = serde_json::Value::String(key.to_string()).to_string();
    let css = serde_json::Value::String(css.to_string()).to_string();
    format!(
        r#"(function () {{
  if (typeof document === "undefined") return;
  var key = {key};
  var existing = document.head.querySelectorAll("style[data-libpack]");
  for (var i = 0; i < existing.length; i++) {{
    if (existing[i].getAttribute("data-libpack") === key) return;
  }}
  var el = document.createElement("style");
  el.setAttribute("data-libpack", key);
  el.textContent = {css};
  document.head.appendChild(el);
}})();
"#
    )
}
