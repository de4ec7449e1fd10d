use anyhow::Context;
use chrono::Local;
use clap::Parser;
use tracing::info;

use facesim::analysis::reporting;
use facesim::cli::cli::Args;
use facesim::core::simulation::run_simulation;
use facesim::presentation::plots;
use facesim::utils::csv_export::{ResultsExporter, RunSummary};
use facesim::utils::logging::{self, OperationCategory, PresentationType};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logging::init_logging(args.enable_timing(), args.debug_logging())?;

    println!("Facial Recognition Effectiveness Simulator (Monte Carlo)");
    println!("Trials: {}, parallel: {}, plots: {}, export: {}",
             args.simulations(),
             if args.parallel() { "enabled" } else { "disabled" },
             if args.render_plots() { "enabled" } else { "disabled" },
             if args.export_results() { "enabled" } else { "disabled" });

    let config = args.to_config().context("invalid simulation configuration")?;
    let outcome = run_simulation(&config)?;

    {
        let _timing = logging::start_timing("print_reports",
            OperationCategory::Presentation { subcategory: PresentationType::TextReport });
        reporting::print_results_table(&outcome.table, args.preview_rows());
        reporting::print_summary(&config.parameters, &outcome.aggregate, outcome.seed);
    }

    if args.export_results() || args.render_plots() {
        let exporter = ResultsExporter::new(args.output_dir())
            .with_context(|| format!("cannot create output directory under {}", args.output_dir().display()))?;

        if args.export_results() {
            exporter.export_results(&outcome.table)
                .map_err(|e| anyhow::anyhow!("failed to export results: {e}"))?;
            exporter.export_groups(&outcome.aggregate)
                .map_err(|e| anyhow::anyhow!("failed to export groups: {e}"))?;
            let summary = RunSummary {
                generated_at: Local::now().to_rfc3339(),
                seed: outcome.seed,
                parameters: &config.parameters,
                aggregate: &outcome.aggregate,
                distribution: outcome.distribution.as_ref(),
            };
            exporter.export_summary(&summary)
                .map_err(|e| anyhow::anyhow!("failed to export summary: {e}"))?;
        }

        if args.render_plots() {
            plots::render_all(
                exporter.output_dir(),
                &outcome.table,
                &outcome.aggregate,
                outcome.distribution.as_ref(),
                config.reference_line,
            )
            .map_err(|e| anyhow::anyhow!("failed to render plots: {e}"))?;
        }

        info!(dir = %exporter.output_dir().display(), "run artifacts written");
    }

    logging::print_timing_report();
    Ok(())
}
