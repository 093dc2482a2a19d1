//! Integration tests for libpack-plugin-vue
//!
//! Loads components through the plugin hook and packages a small Vue
//! component library end to end.

use libpack_bundler::{
    HookLoadArgs, LibraryFormat, LibraryOptions, ModuleType, Plugin, PluginContext, StyleMode,
    StyleSink,
};
use libpack_plugin_vue::{VuePlugin, vue};
use std::fs;
use tempfile::TempDir;

const DRAWER_SFC: &str = r#"<template>
  <svg class="polygon-drawer" @click="addPoint">
    <polygon :points="pointList" />
  </svg>
</template>

<script>
import { computed } from 'vue';

export default {
  name: 'PolygonDrawer',
  props: { points: { type: Array, default: () => [] } },
  setup(props) {
    const pointList = computed(() => props.points.map((p) => p.join(',')).join(' '));
    return { pointList };
  },
};
</script>

<style>
.polygon-drawer {
  cursor: crosshair;
}
</style>
"#;

fn write_file(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(&path, content).expect("write test file");
    path.to_str().unwrap().to_string()
}

#[tokio::test]
async fn loads_component_with_template_and_styles() {
    let dir = TempDir::new().unwrap();
    let id = write_file(&dir, "PolygonDrawer.vue", DRAWER_SFC);

    let styles = StyleSink::new(StyleMode::Extract, false, dir.path());
    let plugin = VuePlugin::new(styles.clone());
    let ctx = PluginContext::new_napi_context();
    let args = HookLoadArgs { id: &id };

    let output = plugin.load(&ctx, &args).await.unwrap().unwrap();

    assert!(output.code.contains("import { computed } from 'vue';"));
    assert!(output.code.contains("__libpack_component.template ="));
    assert!(output.code.contains("polygon-drawer"));
    assert!(matches!(output.module_type, Some(ModuleType::Js)));

    let stylesheet = styles.stylesheet().unwrap();
    assert!(stylesheet.contains(".polygon-drawer"));
    assert!(stylesheet.contains("crosshair"));
}

#[tokio::test]
async fn typescript_setup_sets_module_type() {
    let dir = TempDir::new().unwrap();
    let id = write_file(
        &dir,
        "Counter.vue",
        "<script setup lang=\"ts\">\nconst count: number = 0\n</script>\n",
    );

    let plugin = VuePlugin::new(StyleSink::new(StyleMode::Extract, false, dir.path()));
    let ctx = PluginContext::new_napi_context();
    let args = HookLoadArgs { id: &id };

    let output = plugin.load(&ctx, &args).await.unwrap().unwrap();
    assert!(output.code.contains("const count: number = 0"));
    assert!(matches!(output.module_type, Some(ModuleType::Ts)));
}

#[tokio::test]
async fn malformed_component_fails_with_file_name() {
    let dir = TempDir::new().unwrap();
    let id = write_file(&dir, "Broken.vue", "<script>\nexport default {}\n");

    let plugin = VuePlugin::new(StyleSink::new(StyleMode::Extract, false, dir.path()));
    let ctx = PluginContext::new_napi_context();
    let args = HookLoadArgs { id: &id };

    let err = plugin.load(&ctx, &args).await.unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Broken.vue"), "{message}");
    assert!(message.contains("unclosed <script>"), "{message}");
}

#[tokio::test]
async fn missing_component_is_an_error() {
    let plugin = VuePlugin::new(StyleSink::new(StyleMode::Extract, false, "/project"));
    let ctx = PluginContext::new_napi_context();
    let args = HookLoadArgs {
        id: "/definitely/missing/App.vue",
    };

    let err = plugin.load(&ctx, &args).await.unwrap_err();
    assert!(err.to_string().contains("Failed to read Vue file"));
}

fn create_component_library() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "src/PolygonDrawer.vue", DRAWER_SFC);
    write_file(
        &dir,
        "src/index.js",
        "import PolygonDrawer from './PolygonDrawer.vue';\n\nexport { PolygonDrawer };\nexport default PolygonDrawer;\n",
    );
    dir
}

fn library_options(project: &TempDir) -> LibraryOptions {
    LibraryOptions::new("src/index.js")
        .cwd(project.path())
        .name("VuePolygonDrawer")
        .file_name_with(|format, _| format!("vue-polygon-drawer.{format}.js"))
        .formats([LibraryFormat::Es, LibraryFormat::Umd, LibraryFormat::Cjs])
        .global("vue", "Vue")
        .plugin_factory(vue())
}

#[tokio::test]
async fn packages_a_vue_component_library() {
    let project = create_component_library();

    let build = library_options(&project)
        .build()
        .await
        .expect("library build");

    assert_eq!(
        build.file_names(),
        [
            "vue-polygon-drawer.es.js",
            "vue-polygon-drawer.umd.js",
            "vue-polygon-drawer.cjs.js",
            "style.css",
        ]
    );

    let es = build.artifact(LibraryFormat::Es).unwrap().text().unwrap();
    assert!(es.contains("from \"vue\""), "es output:\n{es}");
    assert!(es.contains("PolygonDrawer"), "es output:\n{es}");
    assert!(!es.contains("crosshair"), "styles extracted:\n{es}");

    let umd = build.artifact(LibraryFormat::Umd).unwrap().text().unwrap();
    assert!(umd.contains("VuePolygonDrawer"), "umd output:\n{umd}");

    let stylesheet = build.stylesheet().unwrap().text().unwrap();
    assert_eq!(stylesheet.matches(".polygon-drawer").count(), 1);
}

#[tokio::test]
async fn component_styles_injected_without_split() {
    let project = create_component_library();

    let build = library_options(&project)
        .css_code_split(false)
        .build()
        .await
        .expect("library build");

    assert!(build.stylesheet().is_none());
    for (format, script) in build.scripts() {
        let code = script.text().unwrap();
        assert!(code.contains("crosshair"), "{format} output:\n{code}");
        assert!(code.contains("src/PolygonDrawer.vue:0"), "{format} output:\n{code}");
    }
}
