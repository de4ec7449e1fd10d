use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use tracing::info;

use crate::analysis::aggregator::{AggregateView, Aggregator};
use crate::analysis::distribution::{summarize_distribution, DistributionSummary};
use crate::config::constants::KDE_GRID_POINTS;
use crate::config::simulation_config::SimulationConfig;
use crate::core::sampler::MonteCarloSampler;
use crate::error::Result;
use crate::models::result_table::ResultTable;
use crate::utils::logging::{self, OperationCategory};

/// Everything a run produces, handed to the presentation layer.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub seed: u64,
    pub table: ResultTable,
    pub aggregate: AggregateView,
    pub distribution: Option<DistributionSummary>,
}

fn progress_bar(total: usize) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} trials ({eta})",
    ) {
        bar.set_style(style);
    }
    bar
}

/// Validates `config`, samples, and aggregates.
///
/// Without a configured seed one is drawn from the thread RNG and reported in
/// the outcome so the run can be replayed.
pub fn run_simulation(config: &SimulationConfig) -> Result<SimulationOutcome> {
    config.validate()?;
    let _timing = logging::start_timing("run_simulation", OperationCategory::Simulation);

    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!(
        trials = config.simulation_count,
        seed,
        parallel = config.parallel,
        "starting Monte Carlo simulation"
    );

    let sampler = MonteCarloSampler::new(&config.parameters)?;
    let table = if config.show_progress {
        let bar = progress_bar(config.simulation_count);
        let table = sampler.run_seeded_with_progress(
            config.simulation_count,
            seed,
            config.parallel,
            |n| bar.inc(n as u64),
        )?;
        bar.finish_and_clear();
        table
    } else {
        sampler.run_seeded(config.simulation_count, seed, config.parallel)?
    };

    let aggregator = Aggregator::new(
        config.grouping,
        config.recognition_threshold,
        config.parameters.ranges.illumination.min,
    )?;
    let aggregate = aggregator.aggregate(&table)?;

    let effectiveness: Vec<f64> = table.effectiveness().collect();
    let distribution = summarize_distribution(&effectiveness, config.histogram_bins, KDE_GRID_POINTS);

    info!(
        recognized = aggregate.counts.recognized,
        not_recognized = aggregate.counts.not_recognized,
        mean_quality = aggregate.mean_quality,
        "simulation complete"
    );

    Ok(SimulationOutcome {
        seed,
        table,
        aggregate,
        distribution,
    })
}
