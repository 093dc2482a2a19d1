//! Per-format bundle runs and artifact assembly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use path_clean::PathClean;
use rolldown::{
    BundlerBuilder as RolldownBundlerBuilder, BundlerOptions, GlobalsOutputOption, InputItem,
    IsExternal, Platform, RawMinifyOptions, ResolveOptions, SourceMapType,
};
use rustc_hash::FxHashMap;

use super::{LibraryFormat, LibraryOptions};
use crate::diagnostics::{self, DiagnosticKind, DiagnosticSeverity, ExtractedDiagnostic};
use crate::output::{Artifact, ArtifactKind, LibraryBuild};
use crate::plugins::{PluginPhase, PluginRegistry};
use crate::styles::{StyleMode, StylePlugin, StyleSink};
use crate::{BundleOutput, Error, Output, Result, SharedPluginable};

pub(crate) async fn execute_library_build(options: &LibraryOptions) -> Result<LibraryBuild> {
    options.validate()?;

    let cwd = options.resolved_cwd()?;
    let entry = resolve_entry(&cwd, &options.entry)?;
    warn_unused_globals(options);

    let styles = StyleSink::new(
        StyleMode::from_code_split(options.css_code_split),
        options.minify,
        cwd.clone(),
    );

    let mut build = LibraryBuild::default();
    for (format, file_name) in options.script_file_names() {
        tracing::debug!(format = %format, file = %file_name, "bundling library format");

        let bundle = bundle_format(options, format, &entry, &cwd, &styles).await?;
        collect_warnings(format, &bundle, &mut build.warnings)?;
        collect_artifacts(format, &file_name, bundle, &mut build.artifacts)?;
    }

    if let Some(css) = styles.stylesheet() {
        build.artifacts.push(Artifact::new(
            options.css_file_name.clone(),
            ArtifactKind::Stylesheet,
            css,
        ));
    }

    tracing::info!(
        artifacts = build.artifacts.len(),
        bytes = build.total_size(),
        warnings = build.warnings.len(),
        "library build complete"
    );

    Ok(build)
}

fn resolve_entry(cwd: &Path, entry: &Path) -> Result<PathBuf> {
    let resolved = cwd.join(entry).clean();
    if !resolved.is_file() {
        return Err(Error::Configuration(format!(
            "entry '{}' does not exist (resolved to '{}')",
            entry.display(),
            resolved.display()
        )));
    }
    Ok(resolved)
}

fn warn_unused_globals(options: &LibraryOptions) {
    for (package, global) in &options.globals {
        if !options.external.contains(package) {
            tracing::warn!(
                package = %package,
                global = %global,
                "global declared for a package that is not external; ignoring it"
            );
        }
    }
}

async fn bundle_format(
    options: &LibraryOptions,
    format: LibraryFormat,
    entry: &Path,
    cwd: &Path,
    styles: &StyleSink,
) -> Result<BundleOutput> {
    let rolldown_options = configure_rolldown_options(options, format, entry, cwd);

    let mut registry = PluginRegistry::new();
    registry.add_with_phase(
        Arc::new(StylePlugin::new(styles.clone())) as SharedPluginable,
        PluginPhase::Styles,
    );
    for factory in &options.plugins {
        registry.add_with_phase(factory.create(styles), factory.phase());
    }

    let mut bundler = RolldownBundlerBuilder::default()
        .with_options(rolldown_options)
        .with_plugins(registry.into_rolldown_plugins())
        .build()
        .map_err(Error::from_rolldown_batch)?;

    bundler
        .generate()
        .await
        .map_err(Error::from_rolldown_batch)
}

/// Configure Rolldown options for one format run.
fn configure_rolldown_options(
    options: &LibraryOptions,
    format: LibraryFormat,
    entry: &Path,
    cwd: &Path,
) -> BundlerOptions {
    let mut rolldown_options = BundlerOptions {
        input: Some(vec![InputItem {
            name: Some(options.entry_stem()),
            import: entry.to_string_lossy().into_owned(),
        }]),
        cwd: Some(cwd.to_path_buf()),
        format: Some(format.to_rolldown()),
        platform: Some(options.platform),
        sourcemap: options.sourcemap.then_some(SourceMapType::File),
        inline_dynamic_imports: Some(true),
        resolve: Some(configure_resolution(cwd, options.platform)),
        ..Default::default()
    };

    if !options.external.is_empty() {
        rolldown_options.external = Some(IsExternal::from(options.external.clone()));
    }

    if format.uses_globals() {
        rolldown_options.name = options.name.clone();

        let globals: FxHashMap<String, String> = options
            .globals
            .iter()
            .filter(|(package, _)| options.external.contains(package))
            .map(|(package, global)| (package.clone(), global.clone()))
            .collect();
        if !globals.is_empty() {
            rolldown_options.globals = Some(GlobalsOutputOption::from(globals));
        }
    }

    if options.minify {
        rolldown_options.minify = Some(RawMinifyOptions::from(true));
    }

    rolldown_options
}

/// Configure module resolution: `node_modules` lookup from `cwd` upwards and
/// export conditions for the target platform.
fn configure_resolution(cwd: &Path, platform: Platform) -> ResolveOptions {
    let mut modules = Vec::new();
    let mut current = Some(cwd);
    while let Some(dir) = current {
        modules.push(dir.join("node_modules").to_string_lossy().into_owned());
        current = dir.parent();
    }
    modules.push("node_modules".to_string());

    let (conditions, main_fields): (&[&str], &[&str]) = match platform {
        Platform::Node => (
            &["node", "import", "module", "default"],
            &["module", "main"],
        ),
        Platform::Browser => (
            &["browser", "import", "module", "default"],
            &["browser", "module", "main"],
        ),
        _ => (&["import", "module", "default"], &["module", "main"]),
    };

    ResolveOptions {
        main_fields: Some(main_fields.iter().map(|s| s.to_string()).collect()),
        condition_names: Some(conditions.iter().map(|s| s.to_string()).collect()),
        extensions: Some(
            [".js", ".mjs", ".ts", ".jsx", ".tsx", ".vue", ".json", ".css"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        ),
        modules: Some(modules),
        symlinks: Some(true),
        ..Default::default()
    }
}

/// Record non-fatal warnings; an unresolved import fails the build.
fn collect_warnings(
    format: LibraryFormat,
    bundle: &BundleOutput,
    warnings: &mut Vec<ExtractedDiagnostic>,
) -> Result<()> {
    for warning in &bundle.warnings {
        let diag = diagnostics::extract_from_build_diagnostic(warning);

        if diag.kind == DiagnosticKind::UnresolvedImport {
            return Err(Error::from_diagnostics(vec![diag]));
        }

        if warnings.iter().any(|w| w.message == diag.message) {
            continue;
        }
        tracing::warn!(format = %format, kind = %diag.kind, "{}", diag.message);
        warnings.push(diag);
    }
    Ok(())
}

fn collect_artifacts(
    format: LibraryFormat,
    file_name: &str,
    bundle: BundleOutput,
    artifacts: &mut Vec<Artifact>,
) -> Result<()> {
    let entry = bundle.assets.iter().find_map(|output| match output {
        Output::Chunk(chunk) if chunk.is_entry => Some(Arc::clone(chunk)),
        _ => None,
    });
    let Some(entry) = entry else {
        return Err(Error::Bundler(vec![ExtractedDiagnostic {
            kind: DiagnosticKind::Other("MissingEntryChunk".to_string()),
            severity: DiagnosticSeverity::Error,
            message: format!("Rolldown produced no entry chunk for the '{}' format", format),
            file: None,
            line: None,
            column: None,
            help: None,
            context: None,
        }]));
    };

    let original_map = format!("{}.map", entry.filename.as_str());
    let map_name = format!("{}.map", file_name);
    let map_reference = Path::new(&map_name)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| map_name.clone());

    let mut script = Artifact::new(file_name, ArtifactKind::Script(format), entry.code.clone());
    let mut source_map = None;
    let mut extra = Vec::new();

    for output in &bundle.assets {
        match output {
            Output::Chunk(chunk) if chunk.filename == entry.filename => {}
            Output::Chunk(chunk) => {
                extra.push(Artifact::new(
                    chunk.filename.as_str(),
                    ArtifactKind::Asset(format),
                    chunk.code.clone(),
                ));
            }
            Output::Asset(asset) if asset.filename.as_str() == original_map => {
                let contents = rewrite_source_map(asset.source.as_bytes(), file_name);
                source_map = Some(Artifact::new(
                    map_name.clone(),
                    ArtifactKind::SourceMap(format),
                    contents,
                ));
            }
            Output::Asset(asset) => {
                let candidate = Artifact::new(
                    asset.filename.as_str(),
                    ArtifactKind::Asset(format),
                    asset.source.as_bytes().to_vec(),
                );
                // Plugins emit the same asset in every format run.
                let duplicate = artifacts.iter().any(|a| {
                    a.file_name == candidate.file_name && a.contents == candidate.contents
                });
                if !duplicate {
                    extra.push(candidate);
                }
            }
        }
    }

    if source_map.is_some() {
        script.contents = link_source_map(&entry.code, &map_reference).into_bytes();
    }

    tracing::debug!(
        format = %format,
        file = %file_name,
        bytes = script.len(),
        "assembled script artifact"
    );

    artifacts.push(script);
    artifacts.extend(source_map);
    artifacts.extend(extra);
    Ok(())
}

/// Point the script's `sourceMappingURL` comment at the renamed map.
fn link_source_map(code: &str, map_reference: &str) -> String {
    let mut out: String = code
        .lines()
        .filter(|line| !line.trim_start().starts_with("//# sourceMappingURL="))
        .collect::<Vec<_>>()
        .join("\n");
    out.push_str(&format!("\n//# sourceMappingURL={}\n", map_reference));
    out
}

/// Set the map's `file` field to the renamed script.
fn rewrite_source_map(source: &[u8], file_name: &str) -> Vec<u8> {
    let script_name = Path::new(file_name)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());

    match serde_json::from_slice::<serde_json::Value>(source) {
        Ok(serde_json::Value::Object(mut map)) => {
            map.insert("file".to_string(), serde_json::Value::String(script_name));
            serde_json::to_vec(&map).unwrap_or_else(|_| source.to_vec())
        }
        _ => source.to_vec(),
    }
}
