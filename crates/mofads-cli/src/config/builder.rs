use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::PlacementArgs;
use crate::error::{CliError, Result};
use crate::utils::parser::parse_species;
use mofads::core::io::StructureFormat;
use mofads::core::species::registry::SpeciesRegistry;
use mofads::engine::config::EngineConfigBuilder;
use mofads::engine::request::{PlacementRequest, Site};
use nalgebra::Vector3;
use std::path::Path;
use tracing::debug;

/// Merges defaults, the configuration file, command-line arguments and `--set`
/// overrides (in increasing precedence) and validates the placement requests.
pub fn build_config(args: &PlacementArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let mut file_config = load_file_config(args.config.as_deref())?;
    let mut overrides = apply_set_values(FileConfig::default(), &args.set_values)?;

    let placement_file = file_config.placement.take().unwrap_or_default();
    let placement_set = overrides.placement.take().unwrap_or_default();
    let neighbor_cutoff = placement_set
        .neighbor_cutoff
        .or(args.neighbor_cutoff)
        .or(placement_file.neighbor_cutoff)
        .unwrap_or(defaults.neighbor_cutoff);
    let coincidence_tolerance = placement_set
        .coincidence_tolerance
        .or(placement_file.coincidence_tolerance)
        .unwrap_or(defaults.coincidence_tolerance);

    let engine_config = EngineConfigBuilder::new()
        .neighbor_cutoff(neighbor_cutoff)
        .coincidence_tolerance(coincidence_tolerance)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let output_file = file_config.output.take().unwrap_or_default();
    let output_set = overrides.output.take().unwrap_or_default();
    let output_format = output_set
        .format
        .or_else(|| args.format.clone())
        .or(output_file.format)
        .map(|f| {
            f.parse::<StructureFormat>()
                .map_err(|e| CliError::Config(e.to_string()))
        })
        .transpose()?;
    let overlap_warning = output_set
        .overlap_warning
        .or(output_file.overlap_warning)
        .unwrap_or(defaults.overlap_warning);
    if !overlap_warning.is_finite() || overlap_warning < 0.0 {
        return Err(CliError::Config(format!(
            "output.overlap-warning must be a non-negative distance, got {}",
            overlap_warning
        )));
    }

    let registry_path = args.species_file.clone().or(file_config
        .species
        .take()
        .and_then(|s| s.registry));
    let registry = load_registry(registry_path.as_deref())?;

    let site = match args.direction {
        Some([x, y, z]) => Site::IndexWithDirection {
            index: args.site,
            direction: Vector3::new(x, y, z),
        },
        None => Site::Index(args.site),
    };

    let mut requests = Vec::with_capacity(args.species.len());
    for value in &args.species {
        let (id, eta) = parse_species(value).map_err(|e| CliError::Argument(e.to_string()))?;
        requests.push(PlacementRequest::new(
            &registry,
            id,
            args.bond_length,
            site.clone(),
            eta.or(args.eta),
        )?);
    }
    if requests.is_empty() {
        return Err(CliError::Argument(
            "At least one adsorbate species is required".to_string(),
        ));
    }

    debug!(
        neighbor_cutoff,
        coincidence_tolerance,
        overlap_warning,
        requests = requests.len(),
        "Configuration assembled."
    );

    Ok(AppConfig {
        engine_config,
        requests,
        output_format,
        overlap_warning,
    })
}

/// The species registry for commands that do not place anything.
pub fn build_registry(species_file: Option<&Path>, config: Option<&Path>) -> Result<SpeciesRegistry> {
    let mut file_config = load_file_config(config)?;
    let registry_path = species_file
        .map(Path::to_path_buf)
        .or(file_config.species.take().and_then(|s| s.registry));
    load_registry(registry_path.as_deref())
}

fn load_file_config(path: Option<&Path>) -> Result<FileConfig> {
    match path {
        Some(path) => FileConfig::from_file(path),
        None => Ok(FileConfig::default()),
    }
}

fn load_registry(path: Option<&Path>) -> Result<SpeciesRegistry> {
    match path {
        Some(path) => {
            debug!("Loading species registry from {:?}", path);
            Ok(SpeciesRegistry::load(path)?)
        }
        None => Ok(SpeciesRegistry::builtin()),
    }
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let parts: Vec<_> = kv_pair.splitn(2, '=').collect();
        if parts.len() != 2 {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        }
        let key = parts[0].trim();
        let value_str = parts[1].trim();

        match key {
            "placement.neighbor-cutoff" => {
                config
                    .placement
                    .get_or_insert_with(Default::default)
                    .neighbor_cutoff = Some(parse_float(key, value_str)?);
            }
            "placement.coincidence-tolerance" => {
                config
                    .placement
                    .get_or_insert_with(Default::default)
                    .coincidence_tolerance = Some(parse_float(key, value_str)?);
            }
            "output.format" => {
                config.output.get_or_insert_with(Default::default).format =
                    Some(value_str.to_string());
            }
            "output.overlap-warning" => {
                config
                    .output
                    .get_or_insert_with(Default::default)
                    .overlap_warning = Some(parse_float(key, value_str)?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

fn parse_float(key: &str, value: &str) -> Result<f64> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid float value for {}: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mofads::engine::config::DEFAULT_NEIGHBOR_CUTOFF;
    use mofads::engine::error::PlacementError;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn base_args() -> PlacementArgs {
        PlacementArgs {
            species: vec!["O2_end".to_string()],
            bond_length: 2.0,
            ..Default::default()
        }
    }

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("config.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn defaults_apply_without_file_or_overrides() {
        let app = build_config(&base_args()).unwrap();
        assert_eq!(app.engine_config.neighbor_cutoff, DEFAULT_NEIGHBOR_CUTOFF);
        assert_eq!(app.output_format, None);
        assert_eq!(app.overlap_warning, 0.75);
        assert_eq!(app.requests.len(), 1);
        assert_eq!(app.requests[0].eta(), 1);
        assert_eq!(app.requests[0].site(), &Site::Index(0));
    }

    #[test]
    fn file_then_cli_then_set_in_increasing_precedence() {
        let dir = tempdir().unwrap();
        let config = write_config(
            dir.path(),
            "[placement]\nneighbor-cutoff = 2.0\ncoincidence-tolerance = 0.01\n\n[output]\nformat = \"cif\"\noverlap-warning = 1.5\n",
        );

        let mut args = base_args();
        args.config = Some(config);
        let app = build_config(&args).unwrap();
        assert_eq!(app.engine_config.neighbor_cutoff, 2.0);
        assert_eq!(app.engine_config.coincidence_tolerance, 0.01);
        assert_eq!(app.output_format, Some(StructureFormat::Cif));
        assert_eq!(app.overlap_warning, 1.5);

        args.neighbor_cutoff = Some(2.4);
        args.format = Some("xyz".to_string());
        let app = build_config(&args).unwrap();
        assert_eq!(app.engine_config.neighbor_cutoff, 2.4);
        assert_eq!(app.output_format, Some(StructureFormat::Xyz));

        args.set_values = vec![
            "placement.neighbor-cutoff=2.8".to_string(),
            "output.format=cif".to_string(),
            "output.overlap-warning = 0.5".to_string(),
        ];
        let app = build_config(&args).unwrap();
        assert_eq!(app.engine_config.neighbor_cutoff, 2.8);
        assert_eq!(app.output_format, Some(StructureFormat::Cif));
        assert_eq!(app.overlap_warning, 0.5);
    }

    #[test]
    fn set_rejects_malformed_and_unknown_keys() {
        let mut args = base_args();
        args.set_values = vec!["placement.neighbor-cutoff".to_string()];
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        args.set_values = vec!["placement.radius=2".to_string()];
        let err = build_config(&args).err().unwrap();
        assert!(err.to_string().contains("Unsupported configuration key"));

        args.set_values = vec!["placement.neighbor-cutoff=far".to_string()];
        let err = build_config(&args).err().unwrap();
        assert!(err.to_string().contains("Invalid float value"));
    }

    #[test]
    fn invalid_engine_values_are_configuration_errors() {
        let mut args = base_args();
        args.neighbor_cutoff = Some(-1.0);
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        let mut args = base_args();
        args.set_values = vec!["output.overlap-warning=-0.1".to_string()];
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        let mut args = base_args();
        args.format = Some("pdb".to_string());
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn every_species_becomes_a_request_with_the_shared_site() {
        let mut args = base_args();
        args.species = vec!["O2_end".to_string(), "O2_side".to_string(), "O".to_string()];
        args.site = 4;
        args.direction = Some([0.0, 0.0, 1.0]);

        let app = build_config(&args).unwrap();
        let etas: Vec<u8> = app.requests.iter().map(|r| r.eta()).collect();
        assert_eq!(etas, vec![1, 2, 1]);
        for request in &app.requests {
            assert_eq!(
                request.site(),
                &Site::IndexWithDirection {
                    index: 4,
                    direction: Vector3::new(0.0, 0.0, 1.0)
                }
            );
        }
    }

    #[test]
    fn per_species_eta_overrides_the_shared_one() {
        let mut args = base_args();
        args.species = vec!["O2_end:1".to_string(), "O2_side:2".to_string()];
        let app = build_config(&args).unwrap();
        let placed: Vec<(&str, u8)> = app
            .requests
            .iter()
            .map(|r| (r.template().id.as_str(), r.eta()))
            .collect();
        assert_eq!(placed, vec![("O2_end", 1), ("O2_side", 2)]);

        args.species = vec!["O2_end".to_string(), "O2_side:2".to_string()];
        args.eta = Some(1);
        let etas: Vec<u8> = build_config(&args)
            .unwrap()
            .requests
            .iter()
            .map(|r| r.eta())
            .collect();
        assert_eq!(etas, vec![1, 2]);

        args.species = vec!["O2_side:two".to_string()];
        assert!(matches!(build_config(&args), Err(CliError::Argument(_))));

        args.species = vec!["O2_end:2".to_string()];
        args.eta = None;
        assert!(matches!(
            build_config(&args),
            Err(CliError::Placement(
                PlacementError::UnsupportedOrientation { .. }
            ))
        ));
    }

    #[test]
    fn invalid_requests_are_rejected_up_front() {
        let mut args = base_args();
        args.species = vec!["N2_triple".to_string()];
        assert!(matches!(
            build_config(&args),
            Err(CliError::Placement(PlacementError::UnknownSpecies { .. }))
        ));

        let mut args = base_args();
        args.eta = Some(2);
        assert!(matches!(
            build_config(&args),
            Err(CliError::Placement(
                PlacementError::UnsupportedOrientation { .. }
            ))
        ));

        let mut args = base_args();
        args.bond_length = 0.0;
        assert!(matches!(
            build_config(&args),
            Err(CliError::Placement(PlacementError::InvalidBondLength { .. }))
        ));
    }

    #[test]
    fn registry_from_config_file_is_resolved_relative_to_it() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("extra.toml"),
            "[CO_side]\ngeometry = \"side-on\"\nelements = [\"C\", \"O\"]\nbond-length = 1.13\n",
        )
        .unwrap();
        let config = write_config(dir.path(), "[species]\nregistry = \"extra.toml\"\n");

        let mut args = base_args();
        args.config = Some(config.clone());
        args.species = vec!["CO_side".to_string()];
        let app = build_config(&args).unwrap();
        assert_eq!(app.requests[0].eta(), 2);
        assert_eq!(app.requests[0].template().id, "CO_side");

        let registry = build_registry(None, Some(&config)).unwrap();
        assert!(registry.contains("CO_side"));
        assert!(!build_registry(None, None).unwrap().contains("CO_side"));
    }

    #[test]
    fn species_file_argument_overrides_config_registry() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let config = write_config(
            dir.path(),
            &format!("[species]\nregistry = {:?}\n", missing.to_string_lossy()),
        );
        let cli_registry = dir.path().join("cli.toml");
        fs::write(
            &cli_registry,
            "[Xe_atom]\ngeometry = \"atom\"\nelements = [\"Xe\"]\n",
        )
        .unwrap();

        let registry = build_registry(Some(&cli_registry), Some(&config)).unwrap();
        assert!(registry.contains("Xe_atom"));
        assert!(matches!(
            build_registry(None, Some(&config)),
            Err(CliError::Species(_))
        ));
    }
}
