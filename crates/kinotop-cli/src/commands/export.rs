use super::{load_config, validate_config};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use kinotop_core::export_records;
use kinotop_models::MovieRecord;
use std::path::{Path, PathBuf};

/// Rebuild the spreadsheet from a JSON dump without touching the browser
pub fn run_export(config_path: Option<&Path>, from: PathBuf, out: Option<PathBuf>, output: &Output) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(out) = out {
        config.export.output = out;
    }
    // Never overwrite the dump we are reading from
    config.export.json_dump = None;
    validate_config(&config)?;

    let mut records = MovieRecord::load_json(&from)
        .map_err(|e| eyre!("Failed to read {}: {}", from.display(), e))?;
    tracing::info!("Loaded {} records from {:?}", records.len(), from);

    let rows = export_records(&mut records, &config.export).map_err(|e| eyre!("{:#}", e))?;

    output.success(format!(
        "Wrote {} movies ({} rows) to {}",
        records.len(),
        rows,
        config.export.output.display()
    ));
    Ok(())
}
