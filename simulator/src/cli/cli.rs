use std::path::PathBuf;

use clap::Parser;

use crate::config::constants::{DEFAULT_OUTPUT_DIR, NUM_SIMULATIONS, RECOGNITION_THRESHOLD};
use crate::config::parameters::ParameterSet;
use crate::config::simulation_config::{GroupingMode, SimulationConfig};
use crate::error::Result;

#[derive(Parser, Debug)]
#[command(author, version, about = "Monte Carlo estimate of facial-recognition effectiveness", long_about = None)]
pub struct Args {
    #[arg(short = 'n', long, default_value_t = NUM_SIMULATIONS)]
    simulations: usize,

    #[arg(long, help = "Random seed for a reproducible run")]
    seed: Option<u64>,

    #[arg(short, long, default_value_t = false)]
    parallel: bool,

    #[arg(long, help = "Group illumination into bins of this width instead of exact values")]
    bin_width: Option<f64>,

    #[arg(long, default_value_t = RECOGNITION_THRESHOLD)]
    threshold: f64,

    #[arg(long, help = "JSON file overriding the model coefficients and sampling ranges")]
    params: Option<PathBuf>,

    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    #[arg(long, default_value_t = false)]
    no_plots: bool,

    #[arg(long, default_value_t = false)]
    no_export: bool,

    #[arg(long, help = "Print only the first and last N rows of the result table")]
    preview_rows: Option<usize>,

    #[arg(long, default_value_t = false)]
    no_progress: bool,

    #[arg(long, default_value_t = false)]
    enable_timing: bool,

    #[arg(long, default_value_t = false)]
    debug_logging: bool,
}

impl Args {
    pub fn simulations(&self) -> usize {
        self.simulations
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn grouping(&self) -> GroupingMode {
        match self.bin_width {
            Some(width) => GroupingMode::Binned { width },
            None => GroupingMode::Exact,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn params(&self) -> Option<&PathBuf> {
        self.params.as_ref()
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    pub fn render_plots(&self) -> bool {
        !self.no_plots
    }

    pub fn export_results(&self) -> bool {
        !self.no_export
    }

    pub fn preview_rows(&self) -> Option<usize> {
        self.preview_rows
    }

    pub fn show_progress(&self) -> bool {
        !self.no_progress
    }

    pub fn enable_timing(&self) -> bool {
        self.enable_timing
    }

    pub fn debug_logging(&self) -> bool {
        self.debug_logging
    }

    /// Builds the run configuration, loading the parameter file if one was given.
    pub fn to_config(&self) -> Result<SimulationConfig> {
        let parameters = match self.params() {
            Some(path) => ParameterSet::from_json_file(path)?,
            None => ParameterSet::default(),
        };
        let config = SimulationConfig {
            parameters,
            simulation_count: self.simulations(),
            seed: self.seed(),
            parallel: self.parallel(),
            show_progress: self.show_progress(),
            grouping: self.grouping(),
            recognition_threshold: self.threshold(),
            ..SimulationConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}
