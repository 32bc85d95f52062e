use std::collections::BTreeSet;

use metacov_core::RngHandle;
use metacov_exp::{sample_columns, subset_size};
use proptest::prelude::*;

proptest! {
    #[test]
    fn draws_are_distinct_and_within_universe(
        seed in any::<u64>(),
        universe_size in 1usize..60,
        coverage in 0.01f64..1.0,
    ) {
        let universe: Vec<String> = (0..universe_size).map(|idx| format!("m{idx:03}_c")).collect();
        let k = subset_size(coverage, universe_size);
        prop_assert!(k >= 1);
        prop_assert!(k <= universe_size);

        let mut rng = RngHandle::from_seed(seed);
        let drawn = sample_columns(&universe, k, &mut rng).unwrap();
        prop_assert_eq!(drawn.len(), k);

        let distinct: BTreeSet<_> = drawn.iter().collect();
        prop_assert_eq!(distinct.len(), k);
        let universe_set: BTreeSet<_> = universe.iter().collect();
        prop_assert!(distinct.is_subset(&universe_set));
    }

    #[test]
    fn same_substream_draws_same_columns(seed in any::<u64>()) {
        let universe: Vec<String> = (0..30).map(|idx| format!("m{idx:03}_c")).collect();
        let mut rng_a = RngHandle::from_seed(seed);
        let mut rng_b = RngHandle::from_seed(seed);
        let a = sample_columns(&universe, 7, &mut rng_a).unwrap();
        let b = sample_columns(&universe, 7, &mut rng_b).unwrap();
        prop_assert_eq!(a, b);
    }
}

#[test]
fn degenerate_draws_are_rejected() {
    let universe: Vec<String> = (0..5).map(|idx| format!("m{idx}_c")).collect();
    let mut rng = RngHandle::from_seed(1);
    assert!(sample_columns(&universe, 0, &mut rng).is_err());
    assert!(sample_columns(&universe, 6, &mut rng).is_err());
}
