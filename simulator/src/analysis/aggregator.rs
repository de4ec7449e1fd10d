use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::simulation_config::GroupingMode;
use crate::error::{Result, SimulationError};
use crate::models::result_table::ResultTable;
use crate::models::sample::Sample;
use crate::utils::logging::{self, AggregationType, OperationCategory};

/// Mean values of the samples sharing one illumination key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IlluminationGroup {
    /// Exact illumination value, or the bin centre in binned mode.
    pub illumination: f64,
    pub count: usize,
    pub mean_effectiveness: f64,
    pub mean_quality: f64,
    pub mean_sensitivity: f64,
    pub mean_aperture: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionCounts {
    pub recognized: usize,
    pub not_recognized: usize,
}

impl RecognitionCounts {
    pub fn total(&self) -> usize {
        self.recognized + self.not_recognized
    }

    pub fn recognition_rate(&self) -> f64 {
        self.recognized as f64 / self.total() as f64
    }
}

/// Derived, read-only summary of a completed result table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateView {
    pub sample_count: usize,
    pub grouping: GroupingMode,
    pub groups: Vec<IlluminationGroup>,
    pub mean_quality: f64,
    pub mean_effectiveness: f64,
    pub threshold: f64,
    pub counts: RecognitionCounts,
}

pub struct Aggregator {
    grouping: GroupingMode,
    threshold: f64,
    /// Bin anchor for binned grouping; usually the illumination range minimum.
    origin: f64,
}

impl Aggregator {
    pub fn new(grouping: GroupingMode, threshold: f64, origin: f64) -> Result<Self> {
        grouping.validate()?;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(SimulationError::InvalidThreshold(threshold));
        }
        Ok(Self { grouping, threshold, origin })
    }

    pub fn aggregate(&self, table: &ResultTable) -> Result<AggregateView> {
        if table.is_empty() {
            return Err(SimulationError::EmptyResultTable);
        }
        let _timing = logging::start_timing("aggregate",
            OperationCategory::Aggregation { subcategory: AggregationType::Grouping });

        let groups = match self.grouping {
            GroupingMode::Exact => group_exact(table),
            GroupingMode::Binned { width } => group_binned(table, self.origin, width),
        };
        let counts = count_recognitions(table, self.threshold);

        debug!(groups = groups.len(), recognized = counts.recognized, "aggregated result table");

        Ok(AggregateView {
            sample_count: table.len(),
            grouping: self.grouping,
            groups,
            mean_quality: running_mean(table.quality()),
            mean_effectiveness: running_mean(table.effectiveness()),
            threshold: self.threshold,
            counts,
        })
    }
}

pub fn count_recognitions(table: &ResultTable, threshold: f64) -> RecognitionCounts {
    let recognized = table.iter().filter(|s| s.is_recognized(threshold)).count();
    RecognitionCounts {
        recognized,
        not_recognized: table.len() - recognized,
    }
}

/// Arithmetic mean by incremental update, so a constant column averages to
/// exactly that constant.
pub fn running_mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut mean = RunningMean::default();
    for value in values {
        mean.add(value);
    }
    mean.value()
}

#[derive(Debug, Default, Clone, Copy)]
struct RunningMean {
    count: usize,
    mean: f64,
}

impl RunningMean {
    fn add(&mut self, value: f64) {
        self.count += 1;
        self.mean += (value - self.mean) / self.count as f64;
    }

    fn value(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.mean }
    }
}

#[derive(Default)]
struct GroupAccumulator {
    effectiveness: RunningMean,
    quality: RunningMean,
    sensitivity: RunningMean,
    aperture: RunningMean,
}

impl GroupAccumulator {
    fn add(&mut self, sample: &Sample) {
        self.effectiveness.add(sample.effectiveness());
        self.quality.add(sample.quality());
        self.sensitivity.add(sample.sensitivity());
        self.aperture.add(sample.aperture());
    }

    fn finish(self, illumination: f64) -> IlluminationGroup {
        IlluminationGroup {
            illumination,
            count: self.effectiveness.count,
            mean_effectiveness: self.effectiveness.value(),
            mean_quality: self.quality.value(),
            mean_sensitivity: self.sensitivity.value(),
            mean_aperture: self.aperture.value(),
        }
    }
}

/// One group per distinct illumination value, ascending.
fn group_exact(table: &ResultTable) -> Vec<IlluminationGroup> {
    let mut ordered: Vec<&Sample> = table.iter().collect();
    ordered.sort_by(|a, b| a.illumination().total_cmp(&b.illumination()));

    let mut groups = Vec::new();
    let mut current: Option<(f64, GroupAccumulator)> = None;
    for sample in ordered {
        match current.as_mut() {
            Some((key, acc)) if *key == sample.illumination() => acc.add(sample),
            _ => {
                if let Some((key, acc)) = current.take() {
                    groups.push(acc.finish(key));
                }
                let mut acc = GroupAccumulator::default();
                acc.add(sample);
                current = Some((sample.illumination(), acc));
            }
        }
    }
    if let Some((key, acc)) = current {
        groups.push(acc.finish(key));
    }
    groups
}

/// Fixed-width bins anchored at `origin`, keyed by bin centre, ascending.
fn group_binned(table: &ResultTable, origin: f64, width: f64) -> Vec<IlluminationGroup> {
    let mut bins: std::collections::BTreeMap<i64, GroupAccumulator> = std::collections::BTreeMap::new();
    for sample in table {
        let index = ((sample.illumination() - origin) / width).floor() as i64;
        bins.entry(index).or_default().add(sample);
    }
    bins.into_iter()
        .map(|(index, acc)| acc.finish(origin + (index as f64 + 0.5) * width))
        .collect()
}
