use crate::config::AppConfig;
use crate::error::Result;
use mofads::core::io::StructureFormat;
use mofads::core::models::structure::AtomicStructure;
use mofads::engine::assembler::PlacementResult;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct WrittenResult {
    pub path: PathBuf,
    pub closest_contact: Option<f64>,
    pub overlap: bool,
}

/// The requested format, else the input's, falling back to XYZ when the
/// structure cannot be written as CIF.
pub fn resolve_format(
    requested: Option<StructureFormat>,
    input: &Path,
    structure: &AtomicStructure,
) -> StructureFormat {
    let format = requested
        .or_else(|| StructureFormat::from_path(input))
        .unwrap_or(StructureFormat::Xyz);
    if format.can_write(structure) {
        format
    } else {
        warn!(
            requested = %format,
            "Structure has no lattice; writing extended XYZ instead."
        );
        StructureFormat::Xyz
    }
}

/// Hands out output paths within one run, never the same path twice.
///
/// A repeated name gets a `-2`, `-3`, ... suffix in the order paths are claimed.
#[derive(Debug, Default)]
pub struct OutputPaths {
    claimed: HashSet<PathBuf>,
}

impl OutputPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, dir: &Path, stem: &str, extension: &str) -> PathBuf {
        let mut path = dir.join(format!("{}.{}", stem, extension));
        let mut copy = 2;
        while !self.claimed.insert(path.clone()) {
            path = dir.join(format!("{}-{}.{}", stem, copy, extension));
            copy += 1;
        }
        path
    }
}

fn file_stem(label: &str) -> String {
    label
        .chars()
        .map(|c| match c {
            c if c.is_whitespace() => '_',
            '/' | '\\' | ':' => '_',
            c => c,
        })
        .collect()
}

/// Writes `{label}.{ext}` into `output_dir` and checks the closest contact
/// against the overlap threshold.
pub fn write_result(
    result: &PlacementResult,
    input: &Path,
    config: &AppConfig,
    output_dir: &Path,
    paths: &mut OutputPaths,
) -> Result<WrittenResult> {
    let format = resolve_format(config.output_format, input, &result.structure);
    let path = paths.claim(output_dir, &file_stem(&result.label), format.extension());

    info!("Writing {} to {:?}", result.label, &path);
    format.write(&result.structure, &path)?;

    let closest_contact = result.closest_contact();
    let overlap = closest_contact.is_some_and(|d| d < config.overlap_warning);
    if overlap {
        warn!(
            label = %result.label,
            closest_contact = closest_contact.unwrap_or_default(),
            threshold = config.overlap_warning,
            "Adsorbate sits very close to a framework atom."
        );
    }

    Ok(WrittenResult {
        path,
        closest_contact,
        overlap,
    })
}
