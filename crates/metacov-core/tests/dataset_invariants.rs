use std::collections::BTreeMap;

use metacov_core::{CovError, Dataset, Record};

fn record(pairs: &[(&str, f64)]) -> Record {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), *value))
        .collect::<BTreeMap<_, _>>()
}

#[test]
fn mismatched_labels_are_rejected() {
    let err = Dataset::new(vec![record(&[("glc__D_c", 1.0)])], vec![]).unwrap_err();
    assert!(matches!(err, CovError::Corrupt(_)));
}

#[test]
fn universe_is_sorted_union_of_record_keys() {
    let dataset = Dataset::new(
        vec![
            record(&[("glc__D_c", 1.0), ("pyr_c", 0.5)]),
            record(&[("atp_c", 2.0), ("glc__D_c", 0.9)]),
        ],
        vec!["h".into(), "x".into()],
    )
    .expect("dataset");
    assert_eq!(dataset.universe(), vec!["atp_c", "glc__D_c", "pyr_c"]);
}

#[test]
fn projection_keeps_rows_and_omits_absent_columns() {
    let dataset = Dataset::new(
        vec![
            record(&[("glc__D_c", 1.0), ("pyr_c", 0.5)]),
            record(&[("atp_c", 2.0)]),
        ],
        vec!["h".into(), "x".into()],
    )
    .expect("dataset");

    let projected = dataset.project(&["glc__D_c".to_string(), "atp_c".to_string()]);
    assert_eq!(projected.len(), dataset.len());
    assert_eq!(projected[0], record(&[("glc__D_c", 1.0)]));
    assert_eq!(projected[1], record(&[("atp_c", 2.0)]));
}
