use metacov_exp::{CellKey, PrefixNamer};

#[test]
fn display_matches_reference_layout() {
    let cell = CellKey {
        coverage: 0.15,
        iteration: 42,
    };
    assert_eq!(cell.to_string(), "coverage=0.15#iteration=42");
}

#[test]
fn cell_keys_roundtrip_through_text() {
    for &coverage in &[0.05, 0.1, 0.15, 0.333333, 1.0] {
        for iteration in [0usize, 1, 99] {
            let cell = CellKey {
                coverage,
                iteration,
            };
            let parsed = CellKey::parse(&cell.to_string()).expect("parse");
            assert_eq!(parsed.coverage, coverage);
            assert_eq!(parsed.iteration, iteration);
        }
    }
}

#[test]
fn namer_embeds_and_recovers_cells() {
    let namer = PrefixNamer::new("coverage_test");
    let cell = CellKey {
        coverage: 0.1,
        iteration: 7,
    };
    let key = namer.key(&cell);
    assert_eq!(key, "coverage_test#coverage=0.1#iteration=7");
    let recovered = namer.parse(&key).expect("parse");
    assert_eq!(recovered.coverage, 0.1);
    assert_eq!(recovered.iteration, 7);
}

#[test]
fn namer_rejects_foreign_keys() {
    let namer = PrefixNamer::new("coverage_test");
    assert!(namer.parse("other#coverage=0.1#iteration=0").is_err());
}

#[test]
fn malformed_keys_are_rejected() {
    assert!(CellKey::parse("coverage=0.1").is_err());
    assert!(CellKey::parse("coverage=abc#iteration=0").is_err());
    assert!(CellKey::parse("iteration=0#coverage=0.1").is_err());
}
