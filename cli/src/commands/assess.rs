use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use farmcards::{
    ArcGisSource, AssessOptions, Assessor, Config, FeatureSource, LocalSource, LookupTables, Pin, TsvSink, run_batch,
};
use tracing::info;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::AssessArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(mode) = args.error_mode { config.error_mode = mode }
    if let Some(tolerance) = args.tolerance { config.acre_tolerance = tolerance }
    config.validate()?;

    let mut pins = args.pins.iter().map(|pin| Pin::new(pin)).collect::<Vec<_>>();
    if let Some(path) = &args.pin_file {
        pins.extend(read_pin_file(path)?);
    }
    pins.retain(|pin| !pin.id().is_empty());
    if pins.is_empty() {
        bail!("[assess] No parcel identifiers given");
    }

    let tables = LookupTables::load(&config.tables)?;
    let source: Box<dyn FeatureSource> = match &args.local_dir {
        Some(dir) => Box::new(LocalSource::from_dir(dir)?),
        None => remote_source(&config)?,
    };

    info!(mode = %config.error_mode, tolerance = config.acre_tolerance, "assessing {} parcels", pins.len());
    let assessor = Assessor::new(source, &tables, AssessOptions::from_config(&config));
    let mut errors = config.error_mode.sink(&config);
    let mut rows = TsvSink::new(&args.output);

    let outcome = run_batch(pins, &assessor, &mut errors, &mut rows)?;

    println!(
        "[assess] {} parcels, {} rows written to {}",
        outcome.parcels, outcome.rows, args.output.display(),
    );
    if outcome.is_clean() {
        println!("[assess] completed without warnings");
    } else {
        println!("[assess] completed with warnings: {} parcels skipped", outcome.skipped.len());
    }
    Ok(())
}

/// One identifier per line; blank lines and `#` comments are ignored.
fn read_pin_file(path: &Path) -> Result<Vec<Pin>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("[assess] Failed to read pin file {}", path.display()))?;
    Ok(text.lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(Pin::new)
        .collect())
}

fn remote_source(config: &Config) -> Result<Box<dyn FeatureSource>> {
    Ok(Box::new(ArcGisSource::new(config.source.clone())?))
}
