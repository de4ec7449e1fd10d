use serde::Serialize;

use crate::config::parameters::LogisticCoefficients;

/// The four simulated capture conditions of one trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialInputs {
    pub illumination: f64,
    pub quality: f64,
    pub sensitivity: f64,
    pub aperture: f64,
}

/// One simulation trial: its inputs plus the derived effectiveness rate.
///
/// Samples are only created by scoring inputs, so the effectiveness always
/// agrees with the coefficients that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    #[serde(rename = "Illumination")]
    illumination: f64,
    #[serde(rename = "Qualidade_Imagem")]
    quality: f64,
    #[serde(rename = "ISO")]
    sensitivity: f64,
    #[serde(rename = "Abertura")]
    aperture: f64,
    #[serde(rename = "Taxa_Efetividade")]
    effectiveness: f64,
}

impl Sample {
    pub fn new(inputs: TrialInputs, coefficients: &LogisticCoefficients) -> Self {
        let effectiveness = coefficients.effectiveness(
            inputs.illumination,
            inputs.quality,
            inputs.sensitivity,
            inputs.aperture,
        );
        Self {
            illumination: inputs.illumination,
            quality: inputs.quality,
            sensitivity: inputs.sensitivity,
            aperture: inputs.aperture,
            effectiveness,
        }
    }

    pub fn illumination(&self) -> f64 {
        self.illumination
    }

    pub fn quality(&self) -> f64 {
        self.quality
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    pub fn aperture(&self) -> f64 {
        self.aperture
    }

    pub fn effectiveness(&self) -> f64 {
        self.effectiveness
    }

    pub fn inputs(&self) -> TrialInputs {
        TrialInputs {
            illumination: self.illumination,
            quality: self.quality,
            sensitivity: self.sensitivity,
            aperture: self.aperture,
        }
    }

    pub fn is_recognized(&self, threshold: f64) -> bool {
        self.effectiveness > threshold
    }
}
