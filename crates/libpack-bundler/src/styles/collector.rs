use std::collections::BTreeMap;

use parking_lot::Mutex;

/// Ordered store of the style blocks met while bundling.
///
/// Blocks are keyed by (module id, block index), so the assembled stylesheet
/// does not depend on the order in which Rolldown loads modules. Every
/// format run loads the same modules; re-inserting a block replaces it.
#[derive(Debug, Default)]
pub struct StyleCollector {
    blocks: Mutex<BTreeMap<(String, usize), String>>,
}

impl StyleCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, module_id: impl Into<String>, index: usize, css: impl Into<String>) {
        self.blocks
            .lock()
            .insert((module_id.into(), index), css.into());
    }

    pub fn len(&self) -> usize {
        self.blocks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.lock().is_empty()
    }

    /// Concatenate every collected block, or `None` if there are none.
    ///
    /// Blank blocks are skipped; each block ends with a newline.
    pub fn stylesheet(&self) -> Option<String> {
        let blocks = self.blocks.lock();
        let mut out = String::new();
        for css in blocks.values() {
            let css = css.trim();
            if css.is_empty() {
                continue;
            }
            out.push_str(css);
            out.push('\n');
        }
        (!out.is_empty()).then_some(out)
    }
}
