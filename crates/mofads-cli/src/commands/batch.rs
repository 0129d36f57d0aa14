use super::output::{self, OutputPaths};
use crate::cli::BatchArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::report::{self, Status, SummaryRow};
use crate::utils::progress::BatchProgress;
use mofads::core::io::{StructureFormat, read_structure};
use mofads::engine::assembler::label;
use mofads::engine::progress::ProgressReporter;
use mofads::workflows::batch::{self, BatchJob};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const SUMMARY_FILE: &str = "summary.csv";

struct JobOrigin {
    file: String,
    input: PathBuf,
    label: String,
}

/// Structure files of `dir` in a recognised format, sorted by file name.
fn collect_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut inputs = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && StructureFormat::from_path(path).is_some())
        .collect::<Vec<_>>();
    inputs.sort();
    Ok(inputs)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn run(args: BatchArgs, quiet: bool) -> Result<()> {
    let config = build_config(&args.placement)?;

    let inputs = collect_inputs(&args.input)?;
    if inputs.is_empty() {
        return Err(CliError::Argument(format!(
            "No .cif or .xyz files found in '{}'",
            args.input.display()
        )));
    }
    info!("Found {} structure file(s) in {:?}", inputs.len(), &args.input);
    fs::create_dir_all(&args.output)?;

    let mut rows = Vec::new();
    let mut jobs = Vec::new();
    let mut origins = HashMap::new();
    for path in &inputs {
        let file = file_name(path);
        let structure = match read_structure(path) {
            Ok(structure) => structure,
            Err(e) => {
                warn!(file = %file, "Skipping unreadable structure: {}", e);
                rows.push(SummaryRow {
                    file,
                    label: String::new(),
                    status: Status::ReadError,
                    message: e.to_string(),
                    closest_contact: None,
                    output: String::new(),
                });
                continue;
            }
        };
        for request in &config.requests {
            let label = label(structure.name(), request);
            let id = format!("{}:{}", file, label);
            origins.insert(
                id.clone(),
                JobOrigin {
                    file: file.clone(),
                    input: path.clone(),
                    label,
                },
            );
            jobs.push(BatchJob {
                id,
                structure: structure.clone(),
                request: request.clone(),
            });
        }
    }

    let progress = BatchProgress::new(quiet);
    let reporter = ProgressReporter::with_callback(progress.callback());
    let outcome = batch::run(&jobs, &config.engine_config, &reporter);
    let tally = progress.tally();
    debug!(
        placed = tally.placed,
        failed = tally.failed,
        "Placement phase finished."
    );

    let mut paths = OutputPaths::new();
    for success in &outcome.succeeded {
        let Some(origin) = origins.get(&success.id) else {
            continue;
        };
        let written = output::write_result(
            &success.result,
            &origin.input,
            &config,
            &args.output,
            &mut paths,
        );
        let row = match written {
            Ok(written) => SummaryRow {
                file: origin.file.clone(),
                label: success.result.label.clone(),
                status: Status::Ok,
                message: if written.overlap {
                    "closest contact below overlap threshold".to_string()
                } else {
                    String::new()
                },
                closest_contact: written.closest_contact,
                output: file_name(&written.path),
            },
            Err(e) => {
                warn!(job = %success.id, "Failed to write result: {}", e);
                SummaryRow {
                    file: origin.file.clone(),
                    label: success.result.label.clone(),
                    status: Status::WriteError,
                    message: e.to_string(),
                    closest_contact: success.result.closest_contact(),
                    output: String::new(),
                }
            }
        };
        rows.push(row);
    }

    for failure in &outcome.failed {
        let Some(origin) = origins.get(&failure.id) else {
            continue;
        };
        rows.push(SummaryRow {
            file: origin.file.clone(),
            label: origin.label.clone(),
            status: Status::Failed,
            message: failure.error.to_string(),
            closest_contact: None,
            output: String::new(),
        });
    }

    rows.sort_by(|a, b| a.file.cmp(&b.file).then_with(|| a.label.cmp(&b.label)));
    let summary_path = args.output.join(SUMMARY_FILE);
    report::write_summary(&summary_path, &rows)?;

    let written = rows.iter().filter(|r| r.status == Status::Ok).count();
    println!(
        "Processed {} file(s): {} structure(s) written, {} problem(s). Summary: {}",
        inputs.len(),
        written,
        rows.len() - written,
        summary_path.display()
    );
    if written < rows.len() {
        warn!(
            problems = rows.len() - written,
            "Some placements did not produce an output file; see the summary."
        );
    }
    Ok(())
}
