use super::output::{self, OutputPaths};
use crate::cli::PlaceArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use mofads::core::io::read_structure;
use mofads::workflows;
use std::fs;
use tracing::{error, info};

pub fn run(args: PlaceArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config = build_config(&args.placement)?;

    info!("Loading input structure from {:?}", &args.input);
    let structure = read_structure(&args.input)?;
    println!(
        "Loaded '{}' ({} atoms, {}).",
        structure.name().unwrap_or("<unnamed>"),
        structure.len(),
        structure.formula()
    );

    fs::create_dir_all(&args.output)?;

    info!("Invoking the placement workflow...");
    let results =
        workflows::place::run_variants(&structure, &config.requests, &config.engine_config);

    let total = results.len();
    let mut paths = OutputPaths::new();
    let mut failures = Vec::new();
    for (request, result) in config.requests.iter().zip(results) {
        match result {
            Ok(result) => {
                let written = output::write_result(
                    &result,
                    &args.input,
                    &config,
                    &args.output,
                    &mut paths,
                )?;
                println!("✓ {} written to: {}", result.label, written.path.display());
                if written.overlap {
                    println!(
                        "  Warning: closest contact {:.3} Å is below {:.3} Å.",
                        written.closest_contact.unwrap_or_default(),
                        config.overlap_warning
                    );
                }
            }
            Err(e) => {
                error!(species = %request.template().id, "Placement failed: {}", e);
                eprintln!("✗ {}: {}", request.template().id, e);
                failures.push(e);
            }
        }
    }

    match failures.len() {
        0 => Ok(()),
        1 if total == 1 => Err(CliError::Placement(failures.remove(0))),
        failed => Err(CliError::PartialFailure { failed, total }),
    }
}
