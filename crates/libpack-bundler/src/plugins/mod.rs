//! Plugin plumbing for library builds.
//!
//! A build runs Rolldown once per output format. Plugins are therefore
//! supplied as [`PluginFactory`] values and instantiated for every run, with
//! access to the build's shared [`StyleSink`].

pub mod registry;

pub use registry::PluginPhase;
pub(crate) use registry::PluginRegistry;

use std::sync::Arc;

use rolldown_plugin::Plugin;

use crate::SharedPluginable;
use crate::styles::StyleSink;

/// Creates the Rolldown plugin used by each per-format bundle.
pub trait PluginFactory: Send + Sync {
    /// Build the plugin instance for one format run.
    fn create(&self, styles: &StyleSink) -> SharedPluginable;

    /// Execution phase; defaults to `Transform`.
    fn phase(&self) -> PluginPhase {
        PluginPhase::Transform
    }
}

/// Trait alias for values that can be converted into a `SharedPluginable`.
pub trait IntoPlugin {
    fn into_plugin(self) -> SharedPluginable;
}

pub(crate) struct PluginHandle<P>(P);

/// Wrap a plugin value so it can be passed to [`LibraryOptions::plugin`](crate::LibraryOptions::plugin).
pub fn plugin<P>(plugin: P) -> impl IntoPlugin
where
    P: Plugin + 'static,
{
    PluginHandle(plugin)
}

impl IntoPlugin for SharedPluginable {
    fn into_plugin(self) -> SharedPluginable {
        self
    }
}

impl<T> IntoPlugin for Arc<T>
where
    T: Plugin + 'static,
{
    fn into_plugin(self) -> SharedPluginable {
        self
    }
}

impl<P> IntoPlugin for PluginHandle<P>
where
    P: Plugin + 'static,
{
    fn into_plugin(self) -> SharedPluginable {
        Arc::new(self.0)
    }
}

/// A ready-made plugin shared by every format run.
pub(crate) struct SharedPlugin(pub(crate) SharedPluginable);

impl PluginFactory for SharedPlugin {
    fn create(&self, _styles: &StyleSink) -> SharedPluginable {
        Arc::clone(&self.0)
    }
}
