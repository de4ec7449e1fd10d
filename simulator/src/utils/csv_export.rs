use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use tracing::info;

use crate::analysis::aggregator::AggregateView;
use crate::analysis::distribution::DistributionSummary;
use crate::config::parameters::ParameterSet;
use crate::models::result_table::ResultTable;
use crate::utils::logging::{self, FileIOType, OperationCategory};

/// Everything needed to reproduce and review a run, written as `summary.json`.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub generated_at: String,
    pub seed: u64,
    pub parameters: &'a ParameterSet,
    pub aggregate: &'a AggregateView,
    pub distribution: Option<&'a DistributionSummary>,
}

/// Writes run artifacts into a per-run timestamped directory.
pub struct ResultsExporter {
    output_dir: PathBuf,
}

impl ResultsExporter {
    /// Creates `<base_dir>/<YYYYmmdd_HHMMSS>` and exports into it.
    pub fn new(base_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        Self::in_dir(base_dir.as_ref().join(timestamp))
    }

    /// Exports directly into `output_dir`.
    pub fn in_dir(output_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Full result table, one row per trial.
    pub fn export_results(&self, table: &ResultTable) -> Result<PathBuf, Box<dyn Error + Send + Sync>> {
        let _timing = logging::start_timing("export_results",
            OperationCategory::FileIO { subcategory: FileIOType::ResultsSave });

        let path = self.output_dir.join("results.csv");
        let mut writer = csv::Writer::from_path(&path)?;
        for sample in table {
            writer.serialize(sample)?;
        }
        writer.flush()?;

        info!(rows = table.len(), path = %path.display(), "exported result table");
        Ok(path)
    }

    /// Grouped means, one row per illumination group.
    pub fn export_groups(&self, view: &AggregateView) -> Result<PathBuf, Box<dyn Error + Send + Sync>> {
        let path = self.output_dir.join("illumination_groups.csv");
        let mut writer = csv::Writer::from_path(&path)?;
        for group in &view.groups {
            writer.serialize(group)?;
        }
        writer.flush()?;
        Ok(path)
    }

    pub fn export_summary(&self, summary: &RunSummary<'_>) -> Result<PathBuf, Box<dyn Error + Send + Sync>> {
        let path = self.output_dir.join("summary.json");
        let file = File::create(&path)?;
        serde_json::to_writer_pretty(file, summary)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregator::Aggregator;
    use crate::config::simulation_config::GroupingMode;
    use crate::core::sampler::MonteCarloSampler;

    fn run(count: usize) -> (ParameterSet, ResultTable, AggregateView) {
        let params = ParameterSet::default();
        let table = MonteCarloSampler::new(&params).unwrap().run_seeded(count, 8, false).unwrap();
        let view = Aggregator::new(GroupingMode::Binned { width: 100.0 }, 0.99, 100.0)
            .unwrap()
            .aggregate(&table)
            .unwrap();
        (params, table, view)
    }

    #[test]
    fn results_csv_has_header_and_one_row_per_sample() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = ResultsExporter::in_dir(dir.path()).unwrap();
        let (_, table, _) = run(25);
        let path = exporter.export_results(&table).unwrap();

        let mut reader = csv::Reader::from_path(path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["Illumination", "Qualidade_Imagem", "ISO", "Abertura", "Taxa_Efetividade"]
        );
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 25);
        let first: f64 = rows[0][4].parse().unwrap();
        assert_eq!(first, table.samples()[0].effectiveness());
    }

    #[test]
    fn summary_json_round_trips_counts() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = ResultsExporter::in_dir(dir.path()).unwrap();
        let (params, _, view) = run(40);
        let summary = RunSummary {
            generated_at: "now".to_string(),
            seed: 8,
            parameters: &params,
            aggregate: &view,
            distribution: None,
        };
        let path = exporter.export_summary(&summary).unwrap();
        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(json["seed"], 8);
        assert_eq!(json["aggregate"]["sample_count"], 40);
        let counts = &json["aggregate"]["counts"];
        let total = counts["recognized"].as_u64().unwrap() + counts["not_recognized"].as_u64().unwrap();
        assert_eq!(total, 40);
    }

    #[test]
    fn group_csv_lists_each_group() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = ResultsExporter::in_dir(dir.path()).unwrap();
        let (_, _, view) = run(500);
        let path = exporter.export_groups(&view).unwrap();
        let rows = csv::Reader::from_path(path).unwrap().records().count();
        assert_eq!(rows, view.groups.len());
    }

    #[test]
    fn timestamped_exporter_nests_under_base() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = ResultsExporter::new(dir.path()).unwrap();
        assert!(exporter.output_dir().starts_with(dir.path()));
        assert!(exporter.output_dir().is_dir());
    }
}
