use crate::config::parameters::LogisticCoefficients;

/// Smallest and largest effectiveness an f64 can hold strictly inside (0, 1).
const MIN_EFFECTIVENESS: f64 = f64::MIN_POSITIVE;
const MAX_EFFECTIVENESS: f64 = 1.0 - f64::EPSILON / 2.0;

/// Logistic transform `1 / (1 + e^-z)`.
///
/// Branches on the sign of `z` so the exponential is only ever taken of a
/// non-positive argument and cannot overflow. Saturated tails are clamped so
/// the result stays strictly inside (0, 1).
pub fn logistic(z: f64) -> f64 {
    let p = if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    };
    p.clamp(MIN_EFFECTIVENESS, MAX_EFFECTIVENESS)
}

impl LogisticCoefficients {
    /// Linear predictor `z` for one set of conditions.
    pub fn linear_predictor(
        &self,
        illumination: f64,
        quality: f64,
        sensitivity: f64,
        aperture: f64,
    ) -> f64 {
        self.beta0
            + self.beta1 * illumination
            + self.beta2 * quality
            + self.beta3 * sensitivity
            + self.beta4 * aperture
    }

    pub fn effectiveness(
        &self,
        illumination: f64,
        quality: f64,
        sensitivity: f64,
        aperture: f64,
    ) -> f64 {
        logistic(self.linear_predictor(illumination, quality, sensitivity, aperture))
    }
}
