// Logistic Model Coefficients
pub const BETA0: f64 = -4.0;    // Intercept, kept low so weak conditions score poorly
pub const BETA1: f64 = 0.02;    // Illumination (lux)
pub const BETA2: f64 = 0.05;    // Image quality (0-1)
pub const BETA3: f64 = 0.01;    // Sensor sensitivity (ISO)
pub const BETA4: f64 = 0.03;    // Lens aperture

// Sampling Ranges
pub const ILLUMINATION_MIN: f64 = 100.0;
pub const ILLUMINATION_MAX: f64 = 700.0;
pub const QUALITY_MIN: f64 = 0.0;
pub const QUALITY_MAX: f64 = 1.0;
pub const SENSITIVITY_MIN: f64 = 100.0;
pub const SENSITIVITY_MAX: f64 = 800.0;
pub const APERTURE_MIN: f64 = 0.5;
pub const APERTURE_MAX: f64 = 4.0;

// Simulation Constants
pub const NUM_SIMULATIONS: usize = 10_000;
pub const SAMPLER_CHUNK_SIZE: usize = 1024;          // Trials per independent RNG stream
pub const CHUNK_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

// Analysis Constants
pub const RECOGNITION_THRESHOLD: f64 = 0.99;        // Strictly above counts as recognized
pub const EFFECTIVENESS_REFERENCE_LINE: f64 = 0.75;
pub const HISTOGRAM_BINS: usize = 15;
pub const KDE_GRID_POINTS: usize = 200;

// Presentation Constants
pub const PLOT_WIDTH: u32 = 1000;
pub const PLOT_HEIGHT: u32 = 600;
pub const SCATTER_ALPHA: f64 = 0.5;
pub const DEFAULT_OUTPUT_DIR: &str = "output";
