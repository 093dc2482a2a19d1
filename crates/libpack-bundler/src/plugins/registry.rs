//! Plugin registry with execution phases.
//!
//! Plugins are handed to Rolldown in phase order so framework loaders
//! (e.g. `.vue`) see a file before the generic style loader does.

use crate::SharedPluginable;

/// Plugin execution phases
///
/// Plugins are executed in phase order (lower numbers first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PluginPhase {
    /// Framework single-file component loaders.
    Framework = 10,

    /// Content transformation supplied by the caller.
    Transform = 20,

    /// Stylesheet loading and collection.
    Styles = 30,
}

/// Plugin registry that maintains plugins in phase order
#[derive(Default)]
pub(crate) struct PluginRegistry {
    plugins: Vec<(PluginPhase, SharedPluginable)>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plugin with an explicit phase
    pub fn add_with_phase(&mut self, plugin: SharedPluginable, phase: PluginPhase) {
        self.plugins.push((phase, plugin));
    }

    /// Convert to Rolldown plugins in phase order.
    ///
    /// The sort is stable: plugins sharing a phase keep insertion order.
    pub fn into_rolldown_plugins(mut self) -> Vec<SharedPluginable> {
        self.plugins.sort_by_key(|(phase, _)| *phase);
        self.plugins.into_iter().map(|(_, plugin)| plugin).collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }
}
