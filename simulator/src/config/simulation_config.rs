use serde::{Deserialize, Serialize};

use crate::config::constants::*;
use crate::config::parameters::ParameterSet;
use crate::error::{Result, SimulationError};

/// How samples are grouped by illumination when computing mean effectiveness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GroupingMode {
    /// One group per distinct illumination value (floating-point equality).
    Exact,
    /// Fixed-width bins anchored at the illumination range minimum.
    Binned { width: f64 },
}

impl GroupingMode {
    pub fn validate(&self) -> Result<()> {
        match *self {
            GroupingMode::Exact => Ok(()),
            GroupingMode::Binned { width } if width.is_finite() && width > 0.0 => Ok(()),
            GroupingMode::Binned { width } => Err(SimulationError::InvalidBinWidth(width)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub parameters: ParameterSet,
    pub simulation_count: usize,
    pub seed: Option<u64>,
    pub parallel: bool,
    pub show_progress: bool,
    pub grouping: GroupingMode,
    pub recognition_threshold: f64,
    pub reference_line: f64,
    pub histogram_bins: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            parameters: ParameterSet::default(),
            simulation_count: NUM_SIMULATIONS,
            seed: None,
            parallel: false,
            show_progress: false,
            grouping: GroupingMode::Exact,
            recognition_threshold: RECOGNITION_THRESHOLD,
            reference_line: EFFECTIVENESS_REFERENCE_LINE,
            histogram_bins: HISTOGRAM_BINS,
        }
    }
}

impl SimulationConfig {
    /// Checks every setting up front so that no sampling starts on a bad configuration.
    pub fn validate(&self) -> Result<()> {
        self.parameters.validate()?;
        if self.simulation_count == 0 {
            return Err(SimulationError::InvalidSimulationCount);
        }
        self.grouping.validate()?;
        if !(0.0..=1.0).contains(&self.recognition_threshold) {
            return Err(SimulationError::InvalidThreshold(self.recognition_threshold));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_the_reference_run() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.simulation_count, 10_000);
        assert_eq!(config.recognition_threshold, 0.99);
        assert_eq!(config.grouping, GroupingMode::Exact);
    }

    #[test]
    fn zero_simulations_is_a_configuration_error() {
        let config = SimulationConfig {
            simulation_count: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimulationError::InvalidSimulationCount)));
    }

    #[test]
    fn bin_width_must_be_positive_and_finite() {
        assert!(GroupingMode::Binned { width: 50.0 }.validate().is_ok());
        assert!(GroupingMode::Binned { width: 0.0 }.validate().is_err());
        assert!(GroupingMode::Binned { width: -1.0 }.validate().is_err());
        assert!(GroupingMode::Binned { width: f64::INFINITY }.validate().is_err());
    }

    #[test]
    fn threshold_outside_unit_interval_is_rejected() {
        let config = SimulationConfig {
            recognition_threshold: 1.5,
            ..SimulationConfig::default()
        };
        assert!(matches!(config.validate(), Err(SimulationError::InvalidThreshold(_))));

        let config = SimulationConfig {
            recognition_threshold: f64::NAN,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
