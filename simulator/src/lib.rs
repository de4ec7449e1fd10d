// Module declarations for the facial-recognition Monte Carlo simulator

pub mod error;

// Core simulation modules
pub mod core {
    pub mod logistic;
    pub mod sampler;
    pub mod simulation;
}

// Configuration modules
pub mod config {
    pub mod constants;
    pub mod parameters;
    pub mod simulation_config;
}

// Model definitions
pub mod models {
    pub mod sample;
    pub mod result_table;
}

// Analysis and reporting
pub mod analysis {
    pub mod aggregator;
    pub mod distribution;
    pub mod reporting;
}

// Utility functions
pub mod utils {
    pub mod logging;
    pub mod csv_export;
}

// Chart rendering
pub mod presentation {
    pub mod plots;
}

// CLI interface
pub mod cli {
    pub mod cli;
}

// Re-export commonly used items
pub use crate::core::logistic::logistic;
pub use crate::core::sampler::MonteCarloSampler;
pub use crate::core::simulation::{run_simulation, SimulationOutcome};
pub use crate::analysis::aggregator::{AggregateView, Aggregator};
pub use crate::config::parameters::ParameterSet;
pub use crate::config::simulation_config::{GroupingMode, SimulationConfig};
pub use crate::error::SimulationError;
pub use crate::models::result_table::ResultTable;
pub use crate::models::sample::Sample;
