use crate::cli::SpeciesArgs;
use crate::config::build_registry;
use crate::error::Result;
use mofads::core::species::registry::SpeciesRegistry;
use tracing::info;

fn render(registry: &SpeciesRegistry) -> Vec<String> {
    let mut lines = vec![format!(
        "{:<12} {:<10} {:<10} {:>8} {:>6}",
        "ID", "GEOMETRY", "ELEMENTS", "d (Å)", "ETA"
    )];
    for template in registry.molecular_templates() {
        let species = &template.species;
        let etas = species
            .supported_etas()
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(",");
        lines.push(format!(
            "{:<12} {:<10} {:<10} {:>8} {:>6}",
            template.id,
            species.geometry_name(),
            species.elements().join("-"),
            species
                .internal_bond_length()
                .map(|d| format!("{:.3}", d))
                .unwrap_or_else(|| "-".to_string()),
            etas
        ));
    }
    lines.push("Any element symbol (e.g. 'O', 'Cl') places a single atom (eta 1).".to_string());
    lines
}

pub fn run(args: SpeciesArgs) -> Result<()> {
    let registry = build_registry(args.species_file.as_deref(), args.config.as_deref())?;
    info!(
        molecular = registry.molecular_templates().len(),
        "Listing adsorbate species."
    );
    for line in render(&registry) {
        println!("{}", line);
    }
    Ok(())
}
