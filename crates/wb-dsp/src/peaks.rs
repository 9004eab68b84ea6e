//! Separated extremum search over a sampled curve.

use std::cmp::Ordering;

/// Indices of local minima of `values` separated by more than `separation`.
///
/// A bin is a candidate when nothing within ±`separation` bins is smaller.
/// Candidates are then accepted smallest first, each one suppressing any
/// later candidate within `separation` bins of it. The result is sorted by
/// index.
///
/// # Example
/// ```
/// use wb_dsp::peaks::separated_minima;
/// let v = [5.0, 1.0, 4.0, 6.0, 4.0, 0.5, 3.0];
/// assert_eq!(separated_minima(&v, 1), vec![1, 5]);
/// assert_eq!(separated_minima(&v, 4), vec![5]);
/// ```
#[must_use]
pub fn separated_minima(values: &[f64], separation: usize) -> Vec<usize> {
    let n = values.len();
    let mut candidates: Vec<usize> = (0..n)
        .filter(|&i| {
            let lo = i.saturating_sub(separation);
            let hi = (i + separation + 1).min(n);
            values[lo..hi].iter().all(|&v| values[i] <= v)
        })
        .collect();

    candidates.sort_by(|&a, &b| match values[a].total_cmp(&values[b]) {
        Ordering::Equal => a.cmp(&b),
        other => other,
    });

    let mut accepted: Vec<usize> = Vec::with_capacity(candidates.len());
    for i in candidates {
        if accepted.iter().all(|&a| a.abs_diff(i) > separation) {
            accepted.push(i);
        }
    }
    accepted.sort_unstable();
    accepted
}

/// Nearest of `minima` strictly before and strictly after `peak`.
///
/// `minima` must be sorted.
#[must_use]
pub fn flanking(minima: &[usize], peak: usize) -> (Option<usize>, Option<usize>) {
    let split = minima.partition_point(|&m| m < peak);
    let before = split.checked_sub(1).map(|i| minima[i]);
    let after = minima[split..].iter().copied().find(|&m| m > peak);
    (before, after)
}

/// Index and value of the largest element. Ties keep the first index.
#[must_use]
pub fn argmax(values: &[f64]) -> Option<(usize, f64)> {
    values
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, v)| match best {
            Some((_, b)) if v <= b => best,
            _ => Some((i, v)),
        })
}
