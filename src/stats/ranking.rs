//! Rank-based retrieval metrics for a single replicate group.
//!
//! All functions operate on the rows of one group, with replicate flags
//! given in descending-similarity order. Groups with zero replicates yield
//! NaN rather than an error, so one degenerate group cannot abort the
//! evaluation of the others.

/// Precision and recall at a fixed rank cutoff `k`.
///
/// `flags` must be sorted by descending similarity. Hits are counted over
/// the first `k` rows (fewer if the group is smaller); the precision
/// denominator is always `k`. Recall is NaN when the group has no
/// replicates.
pub fn precision_recall_at(flags: &[bool], k: usize) -> (f64, f64) {
    let total_relevant = flags.iter().filter(|&&f| f).count();
    let hits = flags.iter().take(k).filter(|&&f| f).count();

    let precision = hits as f64 / k as f64;
    let recall = if total_relevant > 0 {
        hits as f64 / total_relevant as f64
    } else {
        f64::NAN
    };
    (precision, recall)
}

/// Precision at the natural cutoff R = the group's replicate count.
///
/// `flags` must be sorted by descending similarity. Returns `(R, precision)`
/// where precision is the fraction of the top-R rows that are replicates;
/// NaN when R is zero.
pub fn precision_at_natural(flags: &[bool]) -> (usize, f64) {
    let r = flags.iter().filter(|&&f| f).count();
    if r == 0 {
        return (0, f64::NAN);
    }
    let hits = flags.iter().take(r).filter(|&&f| f).count();
    (r, hits as f64 / r as f64)
}

/// Average precision of the group's full ranking.
///
/// `scores` are predicted relevance (similarity), `flags` the binary ground
/// truth; the slices are parallel and need not be pre-sorted. Negative
/// scores are clamped to zero before ranking: negative similarity is
/// treated as no evidence, not negative evidence. The clamp applies to
/// average precision only.
///
/// AP is the step-function sum over distinct score thresholds,
/// `Σ (R_n − R_{n−1}) · P_n`, so tied scores share a single curve point.
/// Returns NaN when the group has no positive rows.
pub fn average_precision(scores: &[f64], flags: &[bool]) -> f64 {
    debug_assert_eq!(scores.len(), flags.len());

    let n_positive = flags.iter().filter(|&&f| f).count();
    if n_positive == 0 {
        return f64::NAN;
    }

    let clamped: Vec<f64> = scores.iter().map(|&s| s.max(0.0)).collect();
    let mut order: Vec<usize> = (0..clamped.len()).collect();
    order.sort_by(|&a, &b| clamped[b].total_cmp(&clamped[a]));

    let mut ap = 0.0;
    let mut tp = 0usize;
    let mut seen = 0usize;
    let mut prev_recall = 0.0;

    for (rank, &idx) in order.iter().enumerate() {
        seen += 1;
        if flags[idx] {
            tp += 1;
        }
        // Close the threshold group at the last of a run of tied scores.
        let last_of_tie = match order.get(rank + 1) {
            Some(&next) => clamped[next] != clamped[idx],
            None => true,
        };
        if last_of_tie {
            let precision = tp as f64 / seen as f64;
            let recall = tp as f64 / n_positive as f64;
            ap += (recall - prev_recall) * precision;
            prev_recall = recall;
        }
    }
    ap
}
