use thiserror::Error;

pub const DEFAULT_NEIGHBOR_CUTOFF: f64 = 3.0;
pub const DEFAULT_COINCIDENCE_TOLERANCE: f64 = 1e-3;
pub const DEFAULT_DIRECTION_TOLERANCE: f64 = 1e-3;
pub const DEFAULT_FLATNESS_TOLERANCE: f64 = 1e-2;
pub const DEFAULT_CENTERING_TOLERANCE: f64 = 0.05;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{name}': {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Numerical settings of the local frame calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Atoms closer than this to the site atom (Angstroms) form its coordination environment.
    pub neighbor_cutoff: f64,
    /// Atoms closer than this to the site (Angstroms) are treated as coincident.
    pub coincidence_tolerance: f64,
    /// Below this length (Angstroms) the site-minus-centroid vector is unusable.
    pub direction_tolerance: f64,
    /// Relative eigenvalue threshold below which a coordination environment is flat.
    pub flatness_tolerance: f64,
    /// Fraction of the mean neighbor distance below which the site counts as lying on the
    /// centroid, line or plane of its neighbors.
    pub centering_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            neighbor_cutoff: DEFAULT_NEIGHBOR_CUTOFF,
            coincidence_tolerance: DEFAULT_COINCIDENCE_TOLERANCE,
            direction_tolerance: DEFAULT_DIRECTION_TOLERANCE,
            flatness_tolerance: DEFAULT_FLATNESS_TOLERANCE,
            centering_tolerance: DEFAULT_CENTERING_TOLERANCE,
        }
    }
}

#[derive(Default)]
pub struct EngineConfigBuilder {
    neighbor_cutoff: Option<f64>,
    coincidence_tolerance: Option<f64>,
    direction_tolerance: Option<f64>,
    flatness_tolerance: Option<f64>,
    centering_tolerance: Option<f64>,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn neighbor_cutoff(mut self, cutoff: f64) -> Self {
        self.neighbor_cutoff = Some(cutoff);
        self
    }
    pub fn coincidence_tolerance(mut self, tolerance: f64) -> Self {
        self.coincidence_tolerance = Some(tolerance);
        self
    }
    pub fn direction_tolerance(mut self, tolerance: f64) -> Self {
        self.direction_tolerance = Some(tolerance);
        self
    }
    pub fn flatness_tolerance(mut self, tolerance: f64) -> Self {
        self.flatness_tolerance = Some(tolerance);
        self
    }
    pub fn centering_tolerance(mut self, tolerance: f64) -> Self {
        self.centering_tolerance = Some(tolerance);
        self
    }

    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        let defaults = EngineConfig::default();
        let config = EngineConfig {
            neighbor_cutoff: self.neighbor_cutoff.unwrap_or(defaults.neighbor_cutoff),
            coincidence_tolerance: self
                .coincidence_tolerance
                .unwrap_or(defaults.coincidence_tolerance),
            direction_tolerance: self
                .direction_tolerance
                .unwrap_or(defaults.direction_tolerance),
            flatness_tolerance: self
                .flatness_tolerance
                .unwrap_or(defaults.flatness_tolerance),
            centering_tolerance: self
                .centering_tolerance
                .unwrap_or(defaults.centering_tolerance),
        };

        for (name, value) in [
            ("neighbor_cutoff", config.neighbor_cutoff),
            ("coincidence_tolerance", config.coincidence_tolerance),
            ("direction_tolerance", config.direction_tolerance),
            ("flatness_tolerance", config.flatness_tolerance),
            ("centering_tolerance", config.centering_tolerance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name,
                    value,
                    reason: "must be positive and finite",
                });
            }
        }
        if config.coincidence_tolerance >= config.neighbor_cutoff {
            return Err(ConfigError::InvalidParameter {
                name: "coincidence_tolerance",
                value: config.coincidence_tolerance,
                reason: "must be smaller than the neighbor cutoff",
            });
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_without_overrides_yields_defaults() {
        let config = EngineConfigBuilder::new().build().unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.neighbor_cutoff, DEFAULT_NEIGHBOR_CUTOFF);
    }

    #[test]
    fn builder_applies_overrides() {
        let config = EngineConfigBuilder::new()
            .neighbor_cutoff(2.5)
            .coincidence_tolerance(0.01)
            .direction_tolerance(1e-4)
            .flatness_tolerance(1e-3)
            .centering_tolerance(0.1)
            .build()
            .unwrap();
        assert_eq!(config.neighbor_cutoff, 2.5);
        assert_eq!(config.coincidence_tolerance, 0.01);
        assert_eq!(config.direction_tolerance, 1e-4);
        assert_eq!(config.flatness_tolerance, 1e-3);
        assert_eq!(config.centering_tolerance, 0.1);
    }

    #[test]
    fn builder_rejects_non_positive_cutoff() {
        let result = EngineConfigBuilder::new().neighbor_cutoff(0.0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "neighbor_cutoff",
                ..
            })
        ));
    }

    #[test]
    fn builder_rejects_nan_tolerance() {
        let result = EngineConfigBuilder::new()
            .direction_tolerance(f64::NAN)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn builder_rejects_coincidence_tolerance_above_cutoff() {
        let result = EngineConfigBuilder::new()
            .neighbor_cutoff(1.0)
            .coincidence_tolerance(1.5)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "coincidence_tolerance",
                ..
            })
        ));
    }
}
