//! Vitesse angulaire centrée.

use wb_core::series::{FrameSeries, Sample};

/// Centered finite-difference rate of change of `angles`, in units per second.
///
/// `speed[i] = (d[i − 1] + d[i]) / 2` with `d[i] = (a[i + 1] − a[i]) · fs`.
/// The first and last frames are always undefined, as is any frame whose
/// neighbours are undefined.
///
/// # Example
/// ```
/// use wb_core::series::FrameSeries;
/// use wb_dsp::speed::centered_speed;
/// let a = FrameSeries::from_nan_slice(&[0.0, 1.0, 4.0, 9.0]);
/// let speed = centered_speed(&a, 2.0);
/// assert_eq!(speed.as_slice(), &[None, Some(4.0), Some(8.0), None]);
/// ```
#[must_use]
pub fn centered_speed(angles: &FrameSeries<Sample>, sample_rate_hz: f64) -> FrameSeries<Sample> {
    let values = angles.as_slice();
    let n = values.len();
    (0..n)
        .map(|i| {
            if i == 0 || i + 1 >= n {
                return None;
            }
            let (prev, mid, next) = (values[i - 1]?, values[i]?, values[i + 1]?);
            let backward = (mid - prev) * sample_rate_hz;
            let forward = (next - mid) * sample_rate_hz;
            Some((backward + forward) / 2.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ends_are_always_undefined() {
        for n in 0..6 {
            let a: FrameSeries<Sample> = (0..n).map(|i| Some(f64::from(i))).collect();
            let speed = centered_speed(&a, 10.0);
            assert_eq!(speed.len(), n as usize);
            if n > 0 {
                assert!(speed[0].is_none());
                assert!(speed[n as usize - 1].is_none());
            }
        }
    }

    #[test]
    fn linear_ramp_has_constant_speed() {
        let a: FrameSeries<Sample> = (0..10).map(|i| Some(3.0 * f64::from(i))).collect();
        let speed = centered_speed(&a, 25.0);
        for v in &speed.as_slice()[1..9] {
            assert!((v.unwrap_or(f64::NAN) - 75.0).abs() < 1e-9);
        }
    }

    #[test]
    fn undefined_neighbour_propagates() {
        let nan = f64::NAN;
        let a = FrameSeries::from_nan_slice(&[0.0, 1.0, nan, 3.0, 4.0, 5.0]);
        let speed = centered_speed(&a, 1.0);
        assert_eq!(speed.as_slice(), &[None, None, None, None, Some(1.0), None]);
    }
}
