//! `libpack check`: validate configuration without building.

use crate::cli::CheckArgs;
use crate::commands::{build, utils};
use crate::config::{ConfigOverrides, LibpackConfig, find_config_file};
use crate::error::Result;
use crate::ui;
use std::path::Path;

/// Execute the check command.
///
/// With `--schema`, prints the config JSON schema to stdout. Otherwise loads
/// every config layer, validates the result and the library options derived
/// from it, and checks that the entry exists.
pub async fn execute(args: CheckArgs) -> Result<()> {
    if args.schema {
        println!("{}", serde_json::to_string_pretty(&LibpackConfig::json_schema())?);
        return Ok(());
    }

    let base = utils::base_dir(args.cwd.as_deref())?;

    match find_config_file(args.config.as_deref(), &base)? {
        Some(path) => ui::info(&format!("Checking {}", path.display())),
        None => ui::warning("No libpack.toml or libpack.config.json found, checking defaults"),
    }

    let config = LibpackConfig::load(&ConfigOverrides::default(), args.config.as_deref(), &base)?;
    config.validate()?;

    let project_dir = build::project_dir(&config, &base);
    let options = config.to_library_options(&project_dir);
    options.validate()?;

    utils::validate_entry(&utils::resolve_path(Path::new(&config.entry), &project_dir))?;
    ui::success(&format!("Entry {} exists", config.entry));

    for (format, file_name) in options.script_file_names() {
        ui::info(&format!("{:<4} -> {}", format.as_str(), file_name));
    }
    if config.css_code_split {
        ui::info(&format!("css  -> {}", config.css_file_name));
    } else {
        ui::info("css  -> injected at runtime");
    }

    ui::success("Configuration is valid");
    Ok(())
}
