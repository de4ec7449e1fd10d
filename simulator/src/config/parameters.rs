use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::constants::*;
use crate::error::{Result, SimulationError};
use crate::utils::logging::{self, FileIOType, OperationCategory};

/// Half-open sampling interval `[min, max)` for one input dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRange {
    pub min: f64,
    pub max: f64,
}

impl SampleRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }

    fn validate(&self, name: &'static str) -> Result<()> {
        // Written so that NaN bounds fail as well; the uniform sampler also
        // needs a finite width
        if self.min < self.max && self.width().is_finite() {
            Ok(())
        } else {
            Err(SimulationError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Coefficients of the linear predictor fed into the logistic transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticCoefficients {
    /// Intercept
    pub beta0: f64,
    /// Illumination weight
    pub beta1: f64,
    /// Image quality weight
    pub beta2: f64,
    /// Sensor sensitivity weight
    pub beta3: f64,
    /// Aperture weight
    pub beta4: f64,
}

impl Default for LogisticCoefficients {
    fn default() -> Self {
        Self {
            beta0: BETA0,
            beta1: BETA1,
            beta2: BETA2,
            beta3: BETA3,
            beta4: BETA4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingRanges {
    pub illumination: SampleRange,
    pub quality: SampleRange,
    pub sensitivity: SampleRange,
    pub aperture: SampleRange,
}

impl Default for SamplingRanges {
    fn default() -> Self {
        Self {
            illumination: SampleRange::new(ILLUMINATION_MIN, ILLUMINATION_MAX),
            quality: SampleRange::new(QUALITY_MIN, QUALITY_MAX),
            sensitivity: SampleRange::new(SENSITIVITY_MIN, SENSITIVITY_MAX),
            aperture: SampleRange::new(APERTURE_MIN, APERTURE_MAX),
        }
    }
}

/// The fixed experiment: model coefficients plus the four sampling ranges.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterSet {
    pub coefficients: LogisticCoefficients,
    pub ranges: SamplingRanges,
}

impl ParameterSet {
    pub fn new(coefficients: LogisticCoefficients, ranges: SamplingRanges) -> Result<Self> {
        let params = Self { coefficients, ranges };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        self.ranges.illumination.validate("illumination")?;
        self.ranges.quality.validate("quality")?;
        self.ranges.sensitivity.validate("sensitivity")?;
        self.ranges.aperture.validate("aperture")?;
        Ok(())
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let _timing = logging::start_timing("load_parameters",
            OperationCategory::FileIO { subcategory: FileIOType::ParameterLoad });
        let path = path.as_ref();
        let parameter_error = |reason: String| SimulationError::ParameterFile {
            path: path.display().to_string(),
            reason,
        };

        let contents = std::fs::read_to_string(path).map_err(|e| parameter_error(e.to_string()))?;
        let params: Self =
            serde_json::from_str(&contents).map_err(|e| parameter_error(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_parameters_match_reference_run() {
        let params = ParameterSet::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.coefficients.beta0, -4.0);
        assert_eq!(params.ranges.illumination, SampleRange::new(100.0, 700.0));
        assert_eq!(params.ranges.sensitivity, SampleRange::new(100.0, 800.0));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut ranges = SamplingRanges::default();
        ranges.quality = SampleRange::new(1.0, 0.0);
        let err = ParameterSet::new(LogisticCoefficients::default(), ranges).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidRange { name: "quality", .. }));
    }

    #[test]
    fn degenerate_and_nan_ranges_are_rejected() {
        let mut ranges = SamplingRanges::default();
        ranges.aperture = SampleRange::new(2.0, 2.0);
        assert!(ParameterSet::new(LogisticCoefficients::default(), ranges).is_err());

        ranges.aperture = SampleRange::new(f64::NAN, 2.0);
        assert!(ParameterSet::new(LogisticCoefficients::default(), ranges).is_err());

        ranges.aperture = SampleRange::new(f64::NEG_INFINITY, 2.0);
        assert!(ParameterSet::new(LogisticCoefficients::default(), ranges).is_err());

        ranges.aperture = SampleRange::new(-f64::MAX, f64::MAX);
        assert!(ParameterSet::new(LogisticCoefficients::default(), ranges).is_err());
    }

    #[test]
    fn range_membership_is_half_open() {
        let range = SampleRange::new(0.5, 4.0);
        assert!(range.contains(0.5));
        assert!(!range.contains(4.0));
        assert_eq!(range.width(), 3.5);
    }

    #[test]
    fn loads_and_validates_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&ParameterSet::default()).unwrap();
        file.write_all(json.as_bytes()).unwrap();
        let loaded = ParameterSet::from_json_file(file.path()).unwrap();
        assert_eq!(loaded, ParameterSet::default());

        let mut bad = ParameterSet::default();
        bad.ranges.illumination = SampleRange::new(700.0, 100.0);
        let mut bad_file = tempfile::NamedTempFile::new().unwrap();
        bad_file
            .write_all(serde_json::to_string(&bad).unwrap().as_bytes())
            .unwrap();
        assert!(matches!(
            ParameterSet::from_json_file(bad_file.path()),
            Err(SimulationError::InvalidRange { name: "illumination", .. })
        ));
    }

    #[test]
    fn malformed_json_reports_parameter_file_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(matches!(
            ParameterSet::from_json_file(file.path()),
            Err(SimulationError::ParameterFile { .. })
        ));
    }

    #[test]
    fn json_load_is_timed_as_parameter_io() {
        logging::set_timing_enabled(true);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&ParameterSet::default()).unwrap().as_bytes())
            .unwrap();
        ParameterSet::from_json_file(file.path()).unwrap();

        let (_, count) = logging::timing_for("load_parameters").unwrap();
        assert!(count >= 1);
    }
}
