//! Rolldown plugin that loads Vue single-file components into library builds.
//!
//! ```text
//! .vue file -> load() hook -> block scanner -> styles to StyleSink
//!                                           -> scripts combined, setup first
//!                                           -> template attached for runtime compilation
//! ```
//!
//! Add it to a build with [`vue()`]:
//!
//! ```rust,no_run
//! use libpack_bundler::LibraryOptions;
//! use libpack_plugin_vue::vue;
//!
//! # async fn example() -> libpack_bundler::Result<()> {
//! let build = LibraryOptions::new("src/index.js")
//!     .name("VuePolygonDrawer")
//!     .global("vue", "Vue")
//!     .plugin_factory(vue())
//!     .build()
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! Templates are shipped as strings, so consumers need the Vue build that
//! includes the runtime template compiler.

mod compose;
pub mod sfc;

use std::borrow::Cow;
use std::sync::Arc;

use anyhow::Context;
use libpack_bundler::{
    HookLoadArgs, HookLoadOutput, HookLoadReturn, HookUsage, Plugin, PluginContext, PluginFactory,
    PluginPhase, SharedPluginable, StyleSink,
};

pub use sfc::{MAX_BLOCKS, MAX_FILE_SIZE, SfcError};

/// Loads `.vue` files.
#[derive(Debug, Clone)]
pub struct VuePlugin {
    styles: StyleSink,
}

impl VuePlugin {
    pub fn new(styles: StyleSink) -> Self {
        Self { styles }
    }
}

impl Plugin for VuePlugin {
    fn name(&self) -> Cow<'static, str> {
        "libpack:vue".into()
    }

    fn register_hook_usage(&self) -> HookUsage {
        HookUsage::Load
    }

    fn load(
        &self,
        _ctx: &PluginContext,
        args: &HookLoadArgs<'_>,
    ) -> impl std::future::Future<Output = HookLoadReturn> + Send {
        let id = args.id.to_string();
        let styles = self.styles.clone();

        async move {
            if !id.ends_with(".vue") {
                return Ok(None);
            }

            let source = tokio::fs::read_to_string(&id)
                .await
                .with_context(|| format!("Failed to read Vue file: {}", id))?;

            let descriptor =
                sfc::parse(&source).with_context(|| format!("Failed to parse Vue file: {}", id))?;
            let (code, module_type) = compose::compose(&id, &descriptor, &styles)?;

            tracing::debug!(file = %id, styles = descriptor.styles.len(), "loaded Vue component");

            Ok(Some(HookLoadOutput {
                code: code.into(),
                module_type: Some(module_type),
                ..Default::default()
            }))
        }
    }
}

/// Creates a [`VuePlugin`] for every format run of a library build.
#[derive(Debug, Clone, Copy, Default)]
pub struct VuePluginFactory;

impl PluginFactory for VuePluginFactory {
    fn create(&self, styles: &StyleSink) -> SharedPluginable {
        Arc::new(VuePlugin::new(styles.clone()))
    }

    fn phase(&self) -> PluginPhase {
        PluginPhase::Framework
    }
}

/// The Vue plugin, ready for [`LibraryOptions::plugin_factory`](libpack_bundler::LibraryOptions::plugin_factory).
pub fn vue() -> VuePluginFactory {
    VuePluginFactory
}

#[cfg(test)]
mod tests {
    use super::*;
    use libpack_bundler::StyleMode;

    #[test]
    fn plugin_name() {
        let plugin = VuePlugin::new(StyleSink::new(StyleMode::Extract, false, "/project"));
        assert_eq!(plugin.name(), "libpack:vue");
    }

    #[test]
    fn factory_runs_in_framework_phase() {
        assert_eq!(vue().phase(), PluginPhase::Framework);
    }

    #[tokio::test]
    async fn skips_other_files() {
        let plugin = VuePlugin::new(StyleSink::new(StyleMode::Extract, false, "/project"));
        let ctx = PluginContext::new_napi_context();
        let args = HookLoadArgs { id: "/project/index.js" };

        assert!(plugin.load(&ctx, &args).await.unwrap().is_none());
    }
}
