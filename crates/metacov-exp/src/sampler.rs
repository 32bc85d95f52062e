use metacov_core::{CovError, ErrorInfo, RngHandle};
use rand::seq::SliceRandom;

/// Draws `k` distinct columns uniformly at random, without replacement, from
/// the metabolite universe.
///
/// The returned columns are sorted so that downstream projection is
/// order-independent; uniformity of the draw is unaffected.
pub fn sample_columns(
    universe: &[String],
    k: usize,
    rng: &mut RngHandle,
) -> Result<Vec<String>, CovError> {
    if k == 0 {
        return Err(CovError::Sampling(ErrorInfo::new(
            "sample-zero-columns",
            "cannot draw an empty column subset",
        )));
    }
    if k > universe.len() {
        return Err(CovError::Sampling(
            ErrorInfo::new(
                "sample-overdraw",
                "requested more columns than the universe holds",
            )
            .with_context("requested", k.to_string())
            .with_context("universe", universe.len().to_string()),
        ));
    }
    let mut drawn: Vec<String> = universe
        .choose_multiple(rng.inner_mut(), k)
        .cloned()
        .collect();
    drawn.sort();
    Ok(drawn)
}
