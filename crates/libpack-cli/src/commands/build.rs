//! `libpack build`: package the library and write its artifacts.

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::config::{ConfigOverrides, LibpackConfig};
use crate::error::Result;
use crate::ui;
use libpack_bundler::{ArtifactKind, LibraryBuild};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Execute the build command.
///
/// 1. Load and validate configuration (CLI > env > file > defaults)
/// 2. Check the entry and the output directory
/// 3. Build every format in memory
/// 4. Clean the output directory if requested, then write all artifacts
/// 5. Print the artifact summary
pub async fn execute(args: BuildArgs) -> Result<()> {
    let start_time = Instant::now();

    let base = utils::base_dir(args.cwd.as_deref())?;
    let config = LibpackConfig::load(&ConfigOverrides::from(&args), args.config.as_deref(), &base)?;
    config.validate()?;

    let project_dir = project_dir(&config, &base);
    let out_dir = utils::resolve_path(&config.out_dir, &project_dir);

    build(&config, &project_dir, &out_dir).await?;

    ui::success(&format!(
        "Build completed in {}",
        ui::format_duration(start_time.elapsed())
    ));

    Ok(())
}

/// Directory the library is built from.
pub(crate) fn project_dir(config: &LibpackConfig, base: &Path) -> PathBuf {
    match &config.cwd {
        Some(cwd) => utils::resolve_path(cwd, base),
        None => base.to_path_buf(),
    }
}

/// Build `config` and write the artifacts to `out_dir`.
pub(crate) async fn build(config: &LibpackConfig, project_dir: &Path, out_dir: &Path) -> Result<LibraryBuild> {
    utils::validate_entry(&utils::resolve_path(Path::new(&config.entry), project_dir))?;
    utils::validate_output_dir(out_dir, project_dir)?;

    let options = config.to_library_options(project_dir);
    options.validate()?;

    let formats = config
        .formats
        .iter()
        .map(|format| format.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    ui::info(&format!("Packaging {} as {}", config.entry, formats));
    tracing::debug!(?options, "library options");

    let started = Instant::now();
    let spinner = ui::Spinner::new("Bundling...");
    let library = match options.build().await {
        Ok(library) => {
            spinner.finish(&format!("Bundled in {}", ui::format_duration(started.elapsed())));
            library
        }
        Err(e) => {
            spinner.fail("Build failed");
            return Err(e.into());
        }
    };

    for warning in &library.warnings {
        match &warning.file {
            Some(file) => ui::warning(&format!("{}: {} ({})", warning.kind, warning.message, file)),
            None => ui::warning(&format!("{}: {}", warning.kind, warning.message)),
        }
    }

    if config.clean {
        tracing::info!(dir = %out_dir.display(), "cleaning output directory");
        utils::clean_output_dir(out_dir)?;
    }
    library.write_to(out_dir, true)?;

    let entries: Vec<(String, u64)> = library
        .artifacts
        .iter()
        .filter(|artifact| !matches!(artifact.kind, ArtifactKind::SourceMap(_)))
        .map(|artifact| (artifact.file_name.clone(), artifact.len() as u64))
        .collect();
    ui::print_build_summary(&entries, started.elapsed());

    Ok(library)
}
