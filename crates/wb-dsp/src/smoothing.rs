//! Lissage gaussien à support strict.

use wb_core::series::{FrameSeries, Sample};

/// Shape parameter of the Gaussian taps.
pub const GAUSS_ALPHA: f64 = 2.5;

/// `gausswin` taps of length `2·half + 1`, normalized to unit sum.
///
/// # Example
/// ```
/// use wb_dsp::smoothing::gaussian_taps;
/// let taps = gaussian_taps(3);
/// assert_eq!(taps.len(), 7);
/// assert!((taps.iter().sum::<f64>() - 1.0).abs() < 1e-12);
/// assert!(taps[3] > taps[2] && taps[2] > taps[1]);
/// ```
#[must_use]
pub fn gaussian_taps(half: usize) -> Vec<f64> {
    if half == 0 {
        return vec![1.0];
    }
    let half_f = half as f64;
    let raw: Vec<f64> = (0..=2 * half)
        .map(|k| {
            let x = GAUSS_ALPHA * (k as f64 - half_f) / half_f;
            (-0.5 * x * x).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / sum).collect()
}

/// Convolve `series` with [`gaussian_taps`]`(half)`.
///
/// A sample is defined only when its whole support lies inside the series
/// and every sample in it is defined.
#[must_use]
pub fn gaussian_smooth(series: &FrameSeries<Sample>, half: usize) -> FrameSeries<Sample> {
    let taps = gaussian_taps(half);
    let values = series.as_slice();
    (0..values.len())
        .map(|i| {
            let left = i.checked_sub(half)?;
            let support = values.get(left..=i + half)?;
            support
                .iter()
                .zip(&taps)
                .try_fold(0.0, |acc, (v, w)| v.map(|v| acc + v * w))
        })
        .collect()
}
