use std::collections::BTreeMap;

use metacov_core::{CovError, Dataset, ErrorInfo, PathwayTransform, Record};
use metacov_exp::{run_experiment, CellStatus, ExperimentPlan, PrefixNamer};
use metacov_store::FileStore;
use tempfile::tempdir;

/// Stand-in engine: scores a single "pathway" per record as the sum of the
/// observed metabolite values. Shape-wise it behaves like the real transform.
struct SumEngine;

impl PathwayTransform for SumEngine {
    fn fit_transform(
        &self,
        records: &[Record],
        _labels: &[String],
    ) -> Result<Vec<Record>, CovError> {
        Ok(records
            .iter()
            .map(|record| {
                let mut out = Record::new();
                out.insert("PW_TOTAL".to_string(), record.values().sum());
                out.insert("PW_OBSERVED".to_string(), record.len() as f64);
                out
            })
            .collect())
    }
}

struct BrokenEngine;

impl PathwayTransform for BrokenEngine {
    fn fit_transform(
        &self,
        _records: &[Record],
        _labels: &[String],
    ) -> Result<Vec<Record>, CovError> {
        Err(CovError::Transform(ErrorInfo::new(
            "engine-infeasible",
            "network became infeasible",
        )))
    }
}

fn base_dataset(universe: usize, samples: usize) -> Dataset {
    let records = (0..samples)
        .map(|row| {
            (0..universe)
                .map(|col| (format!("m{col:03}_c"), (row * universe + col) as f64 * 0.1))
                .collect::<BTreeMap<_, _>>()
        })
        .collect();
    let labels = (0..samples)
        .map(|row| if row % 2 == 0 { "h".to_string() } else { "x".to_string() })
        .collect();
    Dataset::new(records, labels).expect("dataset")
}

fn seeded_store(universe: usize, samples: usize) -> (tempfile::TempDir, FileStore, Dataset) {
    let dir = tempdir().expect("tempdir");
    let store = FileStore::open(dir.path(), true).expect("store");
    let base = base_dataset(universe, samples);
    store.write("coverage_test#metabolites", &base).expect("base");
    let reference = SumEngine
        .fit_transform(&base.records, &base.labels)
        .map(|records| Dataset::new(records, base.labels.clone()).expect("reference"))
        .expect("transform");
    store.write("coverage_test#coverage=1", &reference).expect("reference");
    (dir, store, base)
}

fn plan(levels: Vec<f64>, iterations: usize) -> ExperimentPlan {
    ExperimentPlan {
        base_key: "coverage_test#metabolites".to_string(),
        reference_key: "coverage_test#coverage=1".to_string(),
        coverage_levels: levels,
        iterations,
        seed: 4242,
        resume: false,
        keep_going: false,
    }
}

#[test]
fn grid_produces_one_cell_per_level_iteration_pair() {
    let (_dir, store, base) = seeded_store(10, 4);
    let namer = PrefixNamer::new("coverage_test");
    let report =
        run_experiment(&store, &SumEngine, &plan(vec![0.5], 2), &namer).expect("run");

    assert_eq!(report.universe_size, 10);
    assert_eq!(report.cells.len(), 2);
    for cell in &report.cells {
        assert_eq!(cell.status, CellStatus::Completed);
        assert_eq!(cell.columns, 5); // ceil(0.5 * 10)
        let persisted = store.read(&cell.key).expect("cell");
        assert_eq!(persisted.len(), base.len());
        assert_eq!(persisted.labels, base.labels);
        for record in &persisted.records {
            assert!(record.keys().all(|key| key.starts_with("PW_")));
        }
    }
}

#[test]
fn full_grid_persists_exactly_levels_times_iterations_keys() {
    let (_dir, store, _base) = seeded_store(20, 3);
    let namer = PrefixNamer::new("coverage_test");
    let levels = vec![0.15, 0.10, 0.05];
    let report = run_experiment(&store, &SumEngine, &plan(levels.clone(), 5), &namer)
        .expect("run");
    assert_eq!(report.cells.len(), 15);

    let cell_keys: Vec<String> = store
        .keys()
        .expect("keys")
        .into_iter()
        .filter(|key| namer.parse(key).is_ok())
        .collect();
    assert_eq!(cell_keys.len(), 15);
}

#[test]
fn missing_base_key_aborts_before_any_cell() {
    let dir = tempdir().expect("tempdir");
    let store = FileStore::open(dir.path(), true).expect("store");
    let namer = PrefixNamer::new("coverage_test");
    let err = run_experiment(&store, &SumEngine, &plan(vec![0.5], 2), &namer).unwrap_err();
    assert!(matches!(err, CovError::NotFound(_)), "got {err:?}");
    assert!(store.keys().expect("keys").is_empty());
}

#[test]
fn failed_cells_carry_coordinates_and_leave_store_untouched() {
    let (_dir, store, _base) = seeded_store(10, 4);
    let namer = PrefixNamer::new("coverage_test");
    let err = run_experiment(&store, &BrokenEngine, &plan(vec![0.5], 1), &namer).unwrap_err();
    match &err {
        CovError::Transform(info) => {
            assert_eq!(info.context.get("coverage").map(String::as_str), Some("0.5"));
            assert_eq!(info.context.get("iteration").map(String::as_str), Some("0"));
        }
        other => panic!("unexpected error family: {other:?}"),
    }
    // Only the base and the reference remain.
    assert_eq!(store.keys().expect("keys").len(), 2);
}

#[test]
fn keep_going_records_failures_without_aborting() {
    let (_dir, store, _base) = seeded_store(10, 4);
    let namer = PrefixNamer::new("coverage_test");
    let mut broken_plan = plan(vec![0.5, 0.2], 2);
    broken_plan.keep_going = true;
    let report =
        run_experiment(&store, &BrokenEngine, &broken_plan, &namer).expect("run completes");
    assert_eq!(report.cells.len(), 4);
    assert!(report
        .cells
        .iter()
        .all(|cell| cell.status == CellStatus::Failed && cell.error.is_some()));
    assert_eq!(store.keys().expect("keys").len(), 2);
}

#[test]
fn resume_skips_persisted_cells_without_rewriting_them() {
    let (_dir, store, _base) = seeded_store(10, 4);
    let namer = PrefixNamer::new("coverage_test");
    let first = run_experiment(&store, &SumEngine, &plan(vec![0.5, 0.2], 2), &namer)
        .expect("first run");
    let probe_key = first.cells[0].key.clone();
    let before = store.read(&probe_key).expect("probe");

    let mut resume_plan = plan(vec![0.5, 0.2], 2);
    resume_plan.seed = 9999; // a different seed must not disturb persisted cells
    resume_plan.resume = true;
    let second = run_experiment(&store, &SumEngine, &resume_plan, &namer).expect("second run");
    assert!(second
        .cells
        .iter()
        .all(|cell| cell.status == CellStatus::Skipped));
    assert_eq!(store.read(&probe_key).expect("probe"), before);
}

#[test]
fn same_seed_reproduces_identical_cell_contents() {
    let (_dir_a, store_a, _) = seeded_store(12, 3);
    let (_dir_b, store_b, _) = seeded_store(12, 3);
    let namer = PrefixNamer::new("coverage_test");
    let the_plan = plan(vec![0.25], 3);
    run_experiment(&store_a, &SumEngine, &the_plan, &namer).expect("run a");
    run_experiment(&store_b, &SumEngine, &the_plan, &namer).expect("run b");
    for iteration in 0..3usize {
        let key = format!("coverage_test#coverage=0.25#iteration={iteration}");
        assert_eq!(
            store_a.read(&key).expect("a"),
            store_b.read(&key).expect("b")
        );
    }
}
