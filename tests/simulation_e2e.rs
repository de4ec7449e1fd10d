use facesim::analysis::aggregator::count_recognitions;
use facesim::config::parameters::{LogisticCoefficients, SampleRange, SamplingRanges};
use facesim::models::sample::TrialInputs;
use facesim::utils::csv_export::{ResultsExporter, RunSummary};
use facesim::{
    run_simulation, Aggregator, GroupingMode, ParameterSet, ResultTable, Sample, SimulationConfig,
    SimulationError,
};

fn seeded(count: usize, seed: u64) -> SimulationConfig {
    SimulationConfig {
        simulation_count: count,
        seed: Some(seed),
        ..SimulationConfig::default()
    }
}

#[test]
fn reference_run_produces_full_table_and_consistent_view() {
    let outcome = run_simulation(&seeded(10_000, 77)).unwrap();
    let view = &outcome.aggregate;

    assert_eq!(outcome.table.len(), 10_000);
    assert_eq!(view.counts.recognized + view.counts.not_recognized, 10_000);
    assert_eq!(view.counts, count_recognitions(&outcome.table, 0.99));

    // Continuous draws almost never repeat, so exact grouping is near one group per row
    let grouped: usize = view.groups.iter().map(|g| g.count).sum();
    assert_eq!(grouped, 10_000);
    assert!(view.groups.len() > 9_990);
    assert!(view.groups.windows(2).all(|w| w[0].illumination < w[1].illumination));

    // Uniform quality on [0, 1) averages near one half
    assert!((view.mean_quality - 0.5).abs() < 0.02);
}

#[test]
fn parallel_and_sequential_runs_agree() {
    let sequential = run_simulation(&seeded(5_000, 31)).unwrap();
    let parallel = run_simulation(&SimulationConfig {
        parallel: true,
        ..seeded(5_000, 31)
    })
    .unwrap();
    assert_eq!(sequential.table, parallel.table);
    assert_eq!(sequential.aggregate, parallel.aggregate);
}

#[test]
fn narrow_ranges_pin_every_trial_near_the_favourable_scenario() {
    let ranges = SamplingRanges {
        illumination: SampleRange::new(399.999, 400.001),
        quality: SampleRange::new(0.4999, 0.5001),
        sensitivity: SampleRange::new(449.999, 450.001),
        aperture: SampleRange::new(1.9999, 2.0001),
    };
    let parameters = ParameterSet::new(LogisticCoefficients::default(), ranges).unwrap();
    let outcome = run_simulation(&SimulationConfig {
        parameters,
        ..seeded(1_000, 4)
    })
    .unwrap();

    assert_eq!(outcome.aggregate.counts.recognized, 1_000);
    for sample in &outcome.table {
        assert!((sample.effectiveness() - 0.99981).abs() < 1e-4);
    }
}

#[test]
fn inverted_range_fails_without_partial_results() {
    let mut config = seeded(100, 1);
    config.parameters.ranges.sensitivity = SampleRange::new(800.0, 100.0);
    let err = run_simulation(&config).unwrap_err();
    assert!(err.is_configuration_error());
    assert!(matches!(err, SimulationError::InvalidRange { name: "sensitivity", .. }));
}

#[test]
fn aggregator_rejects_empty_tables() {
    let aggregator = Aggregator::new(GroupingMode::Exact, 0.99, 100.0).unwrap();
    assert!(matches!(
        aggregator.aggregate(&ResultTable::default()),
        Err(SimulationError::EmptyResultTable)
    ));
}

#[test]
fn hand_built_table_aggregates_like_the_reference_grouping() {
    let coefficients = LogisticCoefficients::default();
    let at = |illumination: f64, quality: f64| {
        Sample::new(
            TrialInputs { illumination, quality, sensitivity: 100.0, aperture: 0.5 },
            &coefficients,
        )
    };
    let table = ResultTable::from_samples(vec![at(100.0, 0.0), at(200.0, 1.0), at(100.0, 0.5)]);
    let view = Aggregator::new(GroupingMode::Exact, 0.99, 100.0)
        .unwrap()
        .aggregate(&table)
        .unwrap();

    assert_eq!(view.groups.len(), 2);
    assert_eq!(view.groups[0].illumination, 100.0);
    assert_eq!(view.groups[0].count, 2);
    assert!((view.mean_quality - 0.5).abs() < 1e-15);
    assert_eq!(view.counts.not_recognized, 3);
}

#[test]
fn exports_land_in_output_directory() {
    let outcome = run_simulation(&seeded(300, 12)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let exporter = ResultsExporter::in_dir(dir.path().join("run")).unwrap();

    let results = exporter.export_results(&outcome.table).unwrap();
    let groups = exporter.export_groups(&outcome.aggregate).unwrap();
    let parameters = ParameterSet::default();
    let summary = exporter
        .export_summary(&RunSummary {
            generated_at: "test".to_string(),
            seed: outcome.seed,
            parameters: &parameters,
            aggregate: &outcome.aggregate,
            distribution: outcome.distribution.as_ref(),
        })
        .unwrap();

    for path in [results, groups, summary] {
        assert!(path.starts_with(dir.path()));
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
