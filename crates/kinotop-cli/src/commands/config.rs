use super::{config_file, load_config};
use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Table};
use kinotop_config::Config;
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;

pub fn run_config(config_path: Option<&Path>, cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show_config(config_path, output),
        ConfigCommands::Init { force } => init_config(config_path, force, output),
        ConfigCommands::Path => {
            let file = config_file(config_path);
            match output.format() {
                OutputFormat::Human => output.println(file.display().to_string()),
                _ => output.json(&json!({ "config_file": file })),
            }
            Ok(())
        }
    }
}

fn show_config(config_path: Option<&Path>, output: &Output) -> Result<()> {
    let file = config_file(config_path);
    let config = load_config(config_path)?;

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            if !file.exists() {
                output.warn(format!(
                    "No config file at {}, showing built-in defaults",
                    file.display()
                ));
            }

            println!("{}", overview_table(&file, &config));
            println!();
            println!("{}", "Full configuration".bright_cyan().bold());
            let text = toml::to_string_pretty(&config).map_err(|e| eyre!("Failed to render config: {}", e))?;
            println!("{}", text);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "config_file": file,
                "exists": file.exists(),
                "config": config,
            }));
        }
    }

    Ok(())
}

fn overview_table(file: &Path, config: &Config) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new("Setting").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    let pacing = if config.pacing.enabled {
        format!(
            "{}s on page 1, up to {}s otherwise",
            config.pacing.captcha_pause_secs, config.pacing.jitter_max_secs
        )
    } else {
        "disabled".to_string()
    };

    table.add_row(vec![Cell::new("Config file"), Cell::new(file.display())]);
    table.add_row(vec![Cell::new("Listing pages"), Cell::new(config.listing.pages)]);
    table.add_row(vec![Cell::new("Headless"), Cell::new(config.browser.headless)]);
    table.add_row(vec![Cell::new("Pacing"), Cell::new(pacing)]);
    table.add_row(vec![Cell::new("Poster directory"), Cell::new(config.detail.image_dir.display())]);
    table.add_row(vec![Cell::new("Spreadsheet"), Cell::new(config.export.output.display())]);
    if let Some(dump) = &config.export.json_dump {
        table.add_row(vec![Cell::new("JSON dump"), Cell::new(dump.display())]);
    }
    table
}

fn init_config(config_path: Option<&Path>, force: bool, output: &Output) -> Result<()> {
    let file = config_file(config_path);
    write_default_config(&file, force)?;
    output.success(format!("Wrote default configuration to {}", file.display()));
    Ok(())
}

fn write_default_config(file: &Path, force: bool) -> Result<()> {
    if file.exists() && !force {
        return Err(eyre!(
            "Config file already exists at {} (use --force to overwrite)",
            file.display()
        ));
    }

    Config::default()
        .save_to_file(file)
        .map_err(|e| eyre!("Failed to write config to {}: {}", file.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_defaults() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("nested").join("config.toml");

        write_default_config(&file, false).unwrap();

        let config = Config::load_from_file(&file).unwrap();
        assert_eq!(config.listing.pages, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_init_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(&file, "[listing]\npages = 2\n").unwrap();

        let err = write_default_config(&file, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(Config::load_from_file(&file).unwrap().listing.pages, 2);

        write_default_config(&file, true).unwrap();
        assert_eq!(Config::load_from_file(&file).unwrap().listing.pages, 5);
    }
}
