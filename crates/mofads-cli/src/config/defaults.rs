use mofads::engine::config::{DEFAULT_COINCIDENCE_TOLERANCE, DEFAULT_NEIGHBOR_CUTOFF};

pub struct DefaultsConfig {
    pub neighbor_cutoff: f64,
    pub coincidence_tolerance: f64,
    /// Closest adsorbate/framework contact (Angstroms) below which a warning is printed.
    pub overlap_warning: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            neighbor_cutoff: DEFAULT_NEIGHBOR_CUTOFF,
            coincidence_tolerance: DEFAULT_COINCIDENCE_TOLERANCE,
            overlap_warning: 0.75,
        }
    }
}
