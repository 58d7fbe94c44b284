use std::path::PathBuf;

use farmcards::ErrorMode;

/// Farmland assessment cards CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "farmcards", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Assess parcels and append their valued rows to a TSV file
    Assess(AssessArgs),
}

#[derive(clap::Args, Debug)]
pub struct AssessArgs {
    /// Parcel identifiers (hyphens optional)
    pub pins: Vec<String>,

    /// File with one parcel identifier per line; '#' starts a comment
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub pin_file: Option<PathBuf>,

    /// Output TSV, appended to without a header
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// TOML configuration file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// warn, write, halt or ignore (overrides the configuration)
    #[arg(long)]
    pub error_mode: Option<ErrorMode>,

    /// Acreage tolerance as a fraction, e.g. 0.05 (overrides the configuration)
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Read parcels.geojson, soils.geojson and landuse.geojson from this directory
    /// instead of querying the feature services
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub local_dir: Option<PathBuf>,
}
