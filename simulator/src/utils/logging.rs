use lazy_static::lazy_static;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::Level;
use tracing_subscriber::{EnvFilter, prelude::*};
use tracing_timing::{Builder, Histogram};
use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use std::time::{Duration, Instant};
use std::cell::RefCell;

const HISTOGRAM_MAX_NS: u64 = 60_000_000_000;
const HISTOGRAM_SIGFIG: u8 = 3;

// Define categories for different types of operations
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub enum OperationCategory {
    Simulation,
    Sampling {
        subcategory: SamplingType,
    },
    Aggregation {
        subcategory: AggregationType,
    },
    Presentation {
        subcategory: PresentationType,
    },
    FileIO {
        subcategory: FileIOType,
    },
}

#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub enum SamplingType {
    Sequential,
    Parallel,
}

#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub enum AggregationType {
    Grouping,
    Distribution,
}

#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub enum PresentationType {
    Plot,
    TextReport,
}

#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub enum FileIOType {
    ParameterLoad,
    ResultsSave,
}

impl OperationCategory {
    pub fn as_str(&self) -> String {
        match self {
            OperationCategory::Simulation => "Simulation".to_string(),
            OperationCategory::Sampling { subcategory } => {
                format!("Sampling - {}", match subcategory {
                    SamplingType::Sequential => "Sequential",
                    SamplingType::Parallel => "Parallel",
                })
            },
            OperationCategory::Aggregation { subcategory } => {
                format!("Aggregation - {}", match subcategory {
                    AggregationType::Grouping => "Grouping",
                    AggregationType::Distribution => "Distribution",
                })
            },
            OperationCategory::Presentation { subcategory } => {
                format!("Presentation - {}", match subcategory {
                    PresentationType::Plot => "Plot",
                    PresentationType::TextReport => "Text Report",
                })
            },
            OperationCategory::FileIO { subcategory } => {
                format!("File I/O - {}", match subcategory {
                    FileIOType::ParameterLoad => "Parameter Load",
                    FileIOType::ResultsSave => "Results Save",
                })
            },
        }
    }
}

thread_local! {
    static TIMING_STACK: RefCell<Vec<(String, OperationCategory, Instant)>> = RefCell::new(Vec::new());
}

lazy_static! {
    static ref TIMING_ENABLED: AtomicBool = AtomicBool::new(false);
    static ref FUNCTION_TIMINGS: Arc<RwLock<HashMap<String, Histogram<u64>>>> = Arc::new(RwLock::new(HashMap::new()));
    static ref CATEGORY_TIMINGS: Arc<RwLock<HashMap<OperationCategory, Histogram<u64>>>> = Arc::new(RwLock::new(HashMap::new()));
    static ref HIERARCHICAL_TIMINGS: Arc<RwLock<HashMap<String, (Duration, usize, Vec<String>)>>> = Arc::new(RwLock::new(HashMap::new()));
}

/// Records the elapsed time of the enclosing scope when dropped.
pub struct TimingGuard {
    function_name: String,
    category: OperationCategory,
    start: Instant,
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        record_timing_end(&self.function_name, duration, &self.category);
    }
}

pub fn start_timing(function_name: &str, category: OperationCategory) -> TimingGuard {
    let guard = TimingGuard {
        function_name: function_name.to_string(),
        category: category.clone(),
        start: Instant::now(),
    };

    TIMING_STACK.with(|stack| {
        stack.borrow_mut().push((function_name.to_string(), category, Instant::now()));
    });

    guard
}

fn new_histogram() -> Option<Histogram<u64>> {
    Histogram::<u64>::new_with_bounds(1, HISTOGRAM_MAX_NS, HISTOGRAM_SIGFIG).ok()
}

fn record_timing_end(function_name: &str, duration: Duration, category: &OperationCategory) {
    // The stack is pushed unconditionally, so it is popped unconditionally too
    let parent = TIMING_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        stack.pop();
        stack.last().map(|(parent_name, _, _)| parent_name.clone())
    });

    if !is_timing_enabled() {
        return;
    }

    let duration_ns = duration.as_nanos() as u64;

    {
        let mut hierarchical = HIERARCHICAL_TIMINGS.write();
        let entry = hierarchical
            .entry(function_name.to_string())
            .or_insert((Duration::from_nanos(0), 0, Vec::new()));

        entry.0 += duration;
        entry.1 += 1;

        if let Some(parent_name) = parent {
            if !entry.2.contains(&parent_name) {
                entry.2.push(parent_name);
            }
        }
    }

    // Record function-specific timing
    {
        let mut timings = FUNCTION_TIMINGS.write();
        if !timings.contains_key(function_name) {
            if let Some(histogram) = new_histogram() {
                timings.insert(function_name.to_string(), histogram);
            }
        }
        if let Some(histogram) = timings.get_mut(function_name) {
            let _ = histogram.record(duration_ns.max(1));
        }
    }

    // Record category timing
    {
        let mut category_timings = CATEGORY_TIMINGS.write();
        if !category_timings.contains_key(category) {
            if let Some(histogram) = new_histogram() {
                category_timings.insert(category.clone(), histogram);
            }
        }
        if let Some(histogram) = category_timings.get_mut(category) {
            let _ = histogram.record(duration_ns.max(1));
        }
    }
}

pub fn init_logging(enable_timing: bool, debug_logging: bool) -> anyhow::Result<()> {
    set_timing_enabled(enable_timing);

    let crate_level = if debug_logging { "facesim=debug" } else { "facesim=info" };
    let env_filter = EnvFilter::from_default_env()
        .add_directive(Level::WARN.into())
        .add_directive(crate_level.parse()?);

    if enable_timing {
        let template = new_histogram()
            .ok_or_else(|| anyhow::anyhow!("invalid timing histogram bounds"))?;
        let timing_layer = Builder::default().layer(move || template.clone());

        let subscriber = tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .with(timing_layer.boxed());

        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty());

        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}

pub fn set_timing_enabled(enabled: bool) {
    TIMING_ENABLED.store(enabled, Ordering::SeqCst);
}

pub fn is_timing_enabled() -> bool {
    TIMING_ENABLED.load(Ordering::SeqCst)
}

/// Total duration and call count recorded for one operation.
pub fn timing_for(function_name: &str) -> Option<(Duration, usize)> {
    HIERARCHICAL_TIMINGS
        .read()
        .get(function_name)
        .map(|(total, count, _)| (*total, *count))
}

pub fn print_timing_report() {
    if !is_timing_enabled() {
        return;
    }

    println!("\nDetailed Performance Report");
    println!("==========================");

    println!("\nHierarchical Timing Analysis:");
    println!("---------------------------");
    let hierarchical = HIERARCHICAL_TIMINGS.read();
    let mut entries: Vec<_> = hierarchical.iter().collect();
    entries.sort_by(|a, b| b.1.0.cmp(&a.1.0));

    for (function_name, (total_duration, count, parents)) in entries {
        let avg_duration = total_duration.div_f64(*count as f64);
        println!(
            "{}: total={:.3}s, count={}, avg={:.3}ms{}",
            function_name,
            total_duration.as_secs_f64(),
            count,
            avg_duration.as_secs_f64() * 1000.0,
            if !parents.is_empty() {
                format!("\n  Called by: {}", parents.join(", "))
            } else {
                String::new()
            }
        );
    }

    println!("\nPerformance by Category:");
    println!("------------------------");
    let category_timings = CATEGORY_TIMINGS.read();
    let mut category_vec: Vec<_> = category_timings.iter().collect();
    category_vec.sort_by(|a, b| {
        let b_total = b.1.mean() * (b.1.len() as f64);
        let a_total = a.1.mean() * (a.1.len() as f64);
        b_total.partial_cmp(&a_total).unwrap_or(std::cmp::Ordering::Equal)
    });

    let total_time: f64 = category_vec.iter()
        .map(|(_, hist)| hist.mean() * (hist.len() as f64))
        .sum();

    for (category, histogram) in category_vec {
        let category_total = histogram.mean() * (histogram.len() as f64);
        let percentage = if total_time > 0.0 { (category_total / total_time) * 100.0 } else { 0.0 };
        println!(
            "{}: {:.1}% of total time\n  mean={:.3}ms, p95={:.3}ms, p99={:.3}ms, count={}, total={:.3}s",
            category.as_str(),
            percentage,
            histogram.mean() / 1_000_000.0,
            histogram.value_at_quantile(0.95) as f64 / 1_000_000.0,
            histogram.value_at_quantile(0.99) as f64 / 1_000_000.0,
            histogram.len(),
            category_total / 1_000_000_000.0,
        );
    }

    println!("==========================\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_include_subcategory() {
        let category = OperationCategory::Sampling { subcategory: SamplingType::Parallel };
        assert_eq!(category.as_str(), "Sampling - Parallel");
        let category = OperationCategory::FileIO { subcategory: FileIOType::ResultsSave };
        assert_eq!(category.as_str(), "File I/O - Results Save");
    }

    #[test]
    fn guard_records_nested_timings_when_enabled() {
        set_timing_enabled(true);
        {
            let _outer = start_timing("logging_test_outer", OperationCategory::Simulation);
            let _inner = start_timing(
                "logging_test_inner",
                OperationCategory::Aggregation { subcategory: AggregationType::Grouping },
            );
        }

        let (_, count) = timing_for("logging_test_inner").unwrap();
        assert_eq!(count, 1);
        let parents = HIERARCHICAL_TIMINGS.read()["logging_test_inner"].2.clone();
        assert_eq!(parents, vec!["logging_test_outer".to_string()]);
    }
}
