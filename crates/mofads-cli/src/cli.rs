use crate::utils::parser;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "MOFADS CLI - Rigid placement of atomic and diatomic adsorbates at open metal sites of metal-organic frameworks.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for batch placement.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Place one or more adsorbates on a single structure file.
    Place(PlaceArgs),
    /// Place adsorbates on every CIF/XYZ structure of a directory.
    Batch(BatchArgs),
    /// List the adsorbate species that can be placed.
    Species(SpeciesArgs),
}

/// Arguments for the `place` subcommand.
#[derive(Args, Debug, Clone)]
pub struct PlaceArgs {
    /// Path to the input structure file (.cif or .xyz).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Directory receiving one output file per placement.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    #[command(flatten)]
    pub placement: PlacementArgs,
}

/// Arguments for the `batch` subcommand.
#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Directory containing the input structure files.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub input: PathBuf,

    /// Directory receiving the output files and `summary.csv`.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    #[command(flatten)]
    pub placement: PlacementArgs,
}

/// Placement options shared by `place` and `batch`.
#[derive(Args, Debug, Clone, Default)]
pub struct PlacementArgs {
    // --- Core Arguments ---
    /// Adsorbate species identifier (e.g. 'O', 'O2_end', 'O2_side'), optionally with
    /// its own hapticity as 'ID:ETA' (e.g. 'O2_side:2').
    /// Can be given several times to place each species on its own copy of the structure.
    #[arg(short, long = "species", required = true, value_name = "ID[:ETA]")]
    pub species: Vec<String>,

    /// Distance in Angstroms between the site and the adsorbate anchor point.
    #[arg(short, long, required = true, value_name = "FLOAT")]
    pub bond_length: f64,

    /// Zero-based index of the site atom.
    #[arg(long, default_value_t = 0, value_name = "INDEX")]
    pub site: usize,

    /// Hapticity (1 for end-on, 2 for side-on) for species given without ':ETA'.
    /// Defaults to each species' own.
    #[arg(long, value_name = "ETA")]
    pub eta: Option<u8>,

    /// Placement direction from an external site detector, as 'x,y,z'.
    /// Skips the coordination-environment analysis.
    #[arg(long, value_name = "X,Y,Z", value_parser = parser::parse_direction, allow_hyphen_values = true)]
    pub direction: Option<[f64; 3]>,

    // --- Configuration ---
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the neighbor cutoff (Angstroms) used to find the site's coordination environment.
    #[arg(long = "cutoff", value_name = "FLOAT")]
    pub neighbor_cutoff: Option<f64>,

    /// Output format ('cif' or 'xyz'). Defaults to the input format.
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Additional species definitions in TOML format.
    #[arg(long, value_name = "PATH")]
    pub species_file: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file and arguments.
    /// Can be used multiple times. Example: -S placement.neighbor-cutoff=2.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `species` subcommand.
#[derive(Args, Debug, Clone)]
pub struct SpeciesArgs {
    /// Additional species definitions in TOML format.
    #[arg(long, value_name = "PATH")]
    pub species_file: Option<PathBuf>,

    /// Path to a configuration file whose `[species]` table is honored.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
