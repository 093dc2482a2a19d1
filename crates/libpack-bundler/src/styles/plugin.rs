use std::borrow::Cow;

use anyhow::Context;

use super::StyleSink;
use crate::{HookLoadArgs, HookLoadOutput, HookLoadReturn, ModuleType, Plugin, PluginContext};

/// Loads `.css` modules through the build's [`StyleSink`].
///
/// The stylesheet itself never reaches Rolldown: each `.css` module becomes
/// a JavaScript module that is either empty (styles extracted) or injects
/// the styles when evaluated.
#[derive(Debug, Clone)]
pub struct StylePlugin {
    sink: StyleSink,
}

impl StylePlugin {
    pub fn new(sink: StyleSink) -> Self {
        Self { sink }
    }
}

impl Plugin for StylePlugin {
    fn name(&self) -> Cow<'static, str> {
        "libpack:styles".into()
    }

    fn register_hook_usage(&self) -> crate::HookUsage {
        crate::HookUsage::Load
    }

    fn load(
        &self,
        _ctx: &PluginContext,
        args: &HookLoadArgs<'_>,
    ) -> impl std::future::Future<Output = HookLoadReturn> + Send {
        let id = args.id.to_string();
        let sink = self.sink.clone();

        async move {
            if !id.ends_with(".css") {
                return Ok(None);
            }

            let source = tokio::fs::read_to_string(&id)
                .await
                .with_context(|| format!("Failed to read CSS file: {}", id))?;
            let css = sink.process(&id, &source)?;

            let mut code = sink.register(&id, 0, css);
            code.push_str("export {};\n");

            Ok(Some(HookLoadOutput {
                code: code.into(),
                module_type: Some(ModuleType::Js),
                ..Default::default()
            }))
        }
    }
}
