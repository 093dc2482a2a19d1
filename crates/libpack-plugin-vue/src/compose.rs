//! Turns the blocks of a scanned SFC into one JavaScript module.

use anyhow::bail;
use libpack_bundler::{ModuleType, StyleSink};
use oxc_allocator::Allocator;
use oxc_ast::ast::{ExportDefaultDeclarationKind, Statement};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType};

use crate::sfc::{Block, SfcDescriptor};

/// Binding the default export is rebound to when a template is attached.
const COMPONENT_BINDING: &str = "__libpack_component";

/// Build the module code for the SFC at `id`.
pub(crate) fn compose(
    id: &str,
    sfc: &SfcDescriptor<'_>,
    styles: &StyleSink,
) -> anyhow::Result<(String, ModuleType)> {
    for script in [&sfc.script, &sfc.script_setup].into_iter().flatten() {
        if script.has_attr("src") {
            bail!("{id}: <script src> is not supported, import the module instead");
        }
    }

    let mut code = style_prelude(id, &sfc.styles, styles)?;

    let (script, module_type) = combine_scripts(sfc.script_setup.as_ref(), sfc.script.as_ref());

    let template = sfc.template.as_ref().and_then(|template| {
        if let Some(lang) = template.lang().filter(|lang| *lang != "html") {
            tracing::warn!(file = id, lang, "template lang is not supported, template ignored");
            return None;
        }
        if sfc.script_setup.is_some() {
            tracing::warn!(
                file = id,
                "template cannot be compiled at runtime for <script setup>, template ignored"
            );
            return None;
        }
        Some(template.content.trim())
    });

    match (script, template) {
        (None, None) => code.push_str("export default {};\n"),
        (None, Some(template)) => {
            code.push_str(&format!("export default {{ template: {} }};\n", js_string(template)));
        }
        (Some(script), template) => {
            code.push_str(&attach_template(id, &script, template, &module_type)?);
        }
    }

    Ok((code, module_type))
}

/// Process every `<style>` block and return the code standing in for them.
fn style_prelude(id: &str, blocks: &[Block<'_>], styles: &StyleSink) -> anyhow::Result<String> {
    let mut prelude = String::new();

    for (index, block) in blocks.iter().enumerate() {
        if let Some(lang) = block.lang().filter(|lang| *lang != "css") {
            bail!("{id}: <style lang=\"{lang}\"> is not supported, only plain CSS styles are");
        }
        if block.has_attr("src") {
            bail!("{id}: <style src> is not supported, import the stylesheet instead");
        }
        if block.has_attr("scoped") || block.has_attr("module") {
            tracing::warn!(file = id, index, "scoped and module styles are emitted as global CSS");
        }
        if block.content.trim().is_empty() {
            continue;
        }

        let css = styles.process(&format!("{id}?style={index}"), block.content)?;
        prelude.push_str(&styles.register(id, index, css));
    }

    Ok(prelude)
}

/// Combine `<script setup>` and `<script>`, setup first.
///
/// Returns `None` when the component has no script, together with the module
/// type of the strongest `lang` (tsx > jsx > ts > js).
fn combine_scripts(
    setup: Option<&Block<'_>>,
    regular: Option<&Block<'_>>,
) -> (Option<String>, ModuleType) {
    let mut combined: Option<String> = None;
    let mut lang = "js";

    for block in [setup, regular].into_iter().flatten() {
        let code = combined.get_or_insert_with(String::new);
        if !code.is_empty() {
            code.push_str("\n\n");
        }
        code.push_str(block.content);
        lang = choose_stronger_lang(lang, block.lang().unwrap_or("js"));
    }

    (combined, determine_module_type(lang))
}

/// How a script exports its component.
#[derive(Debug, PartialEq, Eq)]
enum DefaultExport {
    /// `export default <value>`, with the byte range of the `export default`
    /// keywords.
    Declaration { start: usize, end: usize },
    /// `export { component as default }`
    Specifier,
    Missing,
}

/// Locate the top-level default export of `script`.
///
/// Returns `None` when the script does not parse; Rolldown reports the
/// syntax error when it loads the module.
fn find_default_export(script: &str, module_type: &ModuleType) -> Option<DefaultExport> {
    let source_type = match module_type {
        ModuleType::Ts => SourceType::ts(),
        ModuleType::Tsx => SourceType::tsx(),
        ModuleType::Jsx => SourceType::jsx(),
        _ => SourceType::mjs(),
    };
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, script, source_type).parse();
    if !parsed.errors.is_empty() {
        return None;
    }

    for statement in &parsed.program.body {
        match statement {
            Statement::ExportDefaultDeclaration(export) => {
                if matches!(
                    export.declaration,
                    ExportDefaultDeclarationKind::TSInterfaceDeclaration(_)
                ) {
                    continue;
                }
                return Some(DefaultExport::Declaration {
                    start: export.span.start as usize,
                    end: export.declaration.span().start as usize,
                });
            }
            Statement::ExportNamedDeclaration(export)
                if export
                    .specifiers
                    .iter()
                    .any(|specifier| specifier.exported.name().as_str() == "default") =>
            {
                return Some(DefaultExport::Specifier);
            }
            _ => {}
        }
    }

    Some(DefaultExport::Missing)
}

/// Attach `template` to the component exported by `script`.
fn attach_template(
    id: &str,
    script: &str,
    template: Option<&str>,
    module_type: &ModuleType,
) -> anyhow::Result<String> {
    let Some(export) = find_default_export(script, module_type) else {
        tracing::debug!(file = id, "script does not parse, leaving it to the bundler");
        return Ok(script.to_string());
    };

    match (export, template) {
        (DefaultExport::Missing, Some(template)) => Ok(format!(
            "{script}\nexport default {{ template: {} }};\n",
            js_string(template)
        )),
        (DefaultExport::Missing, None) => Ok(format!("{script}\nexport default {{}};\n")),
        (_, None) => Ok(script.to_string()),
        (DefaultExport::Specifier, Some(_)) => bail!(
            "{id}: a template needs `export default <component>`, not `export {{ .. as default }}`"
        ),
        (DefaultExport::Declaration { start, end }, Some(template)) => {
            let mut code = String::with_capacity(script.len() + template.len() + 128);
            code.push_str(&script[..start]);
            code.push_str("const ");
            code.push_str(COMPONENT_BINDING);
            code.push_str(" = ");
            code.push_str(&script[end..]);
            code.push_str(&format!(
                "\n;{COMPONENT_BINDING}.template = {};\nexport default {COMPONENT_BINDING};\n",
                js_string(template)
            ));
            Ok(code)
        }
    }
}

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn determine_module_type(lang: &str) -> ModuleType {
    match lang {
        "ts" | "typescript" => ModuleType::Ts,
        "jsx" => ModuleType::Jsx,
        "tsx" => ModuleType::Tsx,
        _ => ModuleType::Js,
    }
}

fn choose_stronger_lang<'a>(lang1: &'a str, lang2: &'a str) -> &'a str {
    let strength = |lang: &str| match lang {
        "tsx" => 4,
        "jsx" => 3,
        "ts" | "typescript" => 2,
        _ => 1,
    };

    if strength(lang1) >= strength(lang2) {
        lang1
    } else {
        lang2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sfc::parse;
    use libpack_bundler::StyleMode;

    fn sink(mode: StyleMode) -> StyleSink {
        StyleSink::new(mode, false, "/project")
    }

    #[test]
    fn module_type_from_lang() {
        assert!(matches!(determine_module_type("js"), ModuleType::Js));
        assert!(matches!(determine_module_type("ts"), ModuleType::Ts));
        assert!(matches!(determine_module_type("typescript"), ModuleType::Ts));
        assert!(matches!(determine_module_type("jsx"), ModuleType::Jsx));
        assert!(matches!(determine_module_type("tsx"), ModuleType::Tsx));
    }

    #[test]
    fn stronger_lang_wins() {
        assert_eq!(choose_stronger_lang("js", "ts"), "ts");
        assert_eq!(choose_stronger_lang("ts", "tsx"), "tsx");
        assert_eq!(choose_stronger_lang("jsx", "js"), "jsx");
        assert_eq!(choose_stronger_lang("tsx", "ts"), "tsx");
    }

    #[test]
    fn setup_script_runs_first() {
        let sfc = parse(
            "<script>export default { name: 'A' }</script>\n<script setup lang=\"ts\">const count = 1</script>",
        )
        .unwrap();
        let (code, module_type) = combine_scripts(sfc.script_setup.as_ref(), sfc.script.as_ref());
        let code = code.unwrap();

        assert!(code.starts_with("const count = 1"));
        assert!(code.ends_with("export default { name: 'A' }"));
        assert!(matches!(module_type, ModuleType::Ts));
    }

    #[test]
    fn template_attached_to_default_export() {
        let sfc = parse(
            "<template><p>{{ msg }}</p></template>\n<script>\nimport { ref } from 'vue';\nexport default { data: () => ({ msg: 'hi' }) }\n</script>",
        )
        .unwrap();
        let (code, module_type) = compose("/project/Hello.vue", &sfc, &sink(StyleMode::Extract)).unwrap();

        assert!(code.contains("import { ref } from 'vue';"));
        assert!(code.contains("const __libpack_component = { data"));
        assert!(code.contains(r#"__libpack_component.template = "<p>{{ msg }}</p>";"#));
        assert!(code.trim_end().ends_with("export default __libpack_component;"));
        assert_eq!(code.matches("export default").count(), 1);
        assert!(matches!(module_type, ModuleType::Js));
    }

    #[test]
    fn export_default_in_comments_and_strings_is_not_rewritten() {
        let sfc = parse(
            "<template><p>hi</p></template><script>\n// the component is the export default below\nconst note = 'export default';\nexport default { name: 'A', note }\n</script>",
        )
        .unwrap();
        let (code, _) = compose("/project/A.vue", &sfc, &sink(StyleMode::Extract)).unwrap();

        assert!(code.contains("// the component is the export default below"));
        assert!(code.contains("const note = 'export default';"));
        assert!(code.contains("const __libpack_component = { name: 'A', note }"));
        assert_eq!(code.matches("export default __libpack_component;").count(), 1);
        assert_eq!(code.matches("\nexport default").count(), 1);
    }

    #[test]
    fn typescript_default_export_gets_template() {
        let sfc = parse(
            "<template><p/></template><script lang=\"ts\">\nimport { defineComponent } from 'vue';\nexport default defineComponent({ props: { n: Number as unknown as () => number } });\n</script>",
        )
        .unwrap();
        let (code, module_type) = compose("/project/T.vue", &sfc, &sink(StyleMode::Extract)).unwrap();

        assert!(matches!(module_type, ModuleType::Ts));
        assert!(code.contains("const __libpack_component = defineComponent("));
        assert!(code.contains("__libpack_component.template = \"<p/>\";"));
    }

    #[test]
    fn default_export_specifier_with_template_is_rejected() {
        let sfc = parse(
            "<template><p/></template><script>const A = {};\nexport { A as default };</script>",
        )
        .unwrap();
        let err = compose("/project/A.vue", &sfc, &sink(StyleMode::Extract)).unwrap_err();
        assert!(err.to_string().contains("as default"));
    }

    #[test]
    fn default_export_specifier_without_template_is_kept() {
        let sfc = parse("<script>const A = {};\nexport { A as default };</script>").unwrap();
        let (code, _) = compose("/project/A.vue", &sfc, &sink(StyleMode::Extract)).unwrap();
        assert_eq!(code, "const A = {};\nexport { A as default };");
    }

    #[test]
    fn template_only_component() {
        let sfc = parse("<template>\n  <span>static</span>\n</template>").unwrap();
        let (code, _) = compose("/project/Static.vue", &sfc, &sink(StyleMode::Extract)).unwrap();
        assert_eq!(code, "export default { template: \"<span>static</span>\" };\n");
    }

    #[test]
    fn empty_component() {
        let sfc = parse("<style>.a { color: red }</style>").unwrap();
        let (code, _) = compose("/project/Empty.vue", &sfc, &sink(StyleMode::Extract)).unwrap();
        assert_eq!(code, "export default {};\n");
    }

    #[test]
    fn script_without_default_export_gets_one() {
        let sfc = parse("<script>export const helper = 1;</script>").unwrap();
        let (code, _) = compose("/project/Helper.vue", &sfc, &sink(StyleMode::Extract)).unwrap();
        assert!(code.starts_with("export const helper = 1;"));
        assert!(code.trim_end().ends_with("export default {};"));
    }

    #[test]
    fn template_ignored_for_script_setup() {
        let sfc = parse("<template><p/></template><script setup>const a = 1</script>").unwrap();
        let (code, _) = compose("/project/Setup.vue", &sfc, &sink(StyleMode::Extract)).unwrap();
        assert!(!code.contains("template"));
        assert!(code.contains("export default {};"));
    }

    #[test]
    fn styles_are_extracted_in_block_order() {
        let styles = sink(StyleMode::Extract);
        let sfc = parse(
            "<style>.first { color: red }</style><script>export default {}</script><style scoped>.second { color: blue }</style>",
        )
        .unwrap();
        let (code, _) = compose("/project/src/Two.vue", &sfc, &styles).unwrap();

        assert_eq!(code, "export default {}");
        let stylesheet = styles.stylesheet().unwrap();
        let first = stylesheet.find(".first").unwrap();
        let second = stylesheet.find(".second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn styles_are_injected_without_split() {
        let styles = sink(StyleMode::Inject);
        let sfc = parse("<style>.a { color: red }</style><script>export default {}</script>").unwrap();
        let (code, _) = compose("/project/src/A.vue", &sfc, &styles).unwrap();

        assert!(code.contains(r#"var key = "src/A.vue:0";"#));
        assert!(code.trim_end().ends_with("export default {}"));
        assert!(styles.collector().is_empty());
    }

    #[test]
    fn preprocessor_styles_are_rejected() {
        let sfc = parse("<style lang=\"scss\">$c: red; .a { color: $c }</style>").unwrap();
        let err = compose("/project/A.vue", &sfc, &sink(StyleMode::Extract)).unwrap_err();
        assert!(err.to_string().contains("lang=\"scss\""));
    }

    #[test]
    fn external_script_is_rejected() {
        let sfc = parse("<script src=\"./a.js\"></script>").unwrap();
        let err = compose("/project/A.vue", &sfc, &sink(StyleMode::Extract)).unwrap_err();
        assert!(err.to_string().contains("<script src>"));
    }
}
