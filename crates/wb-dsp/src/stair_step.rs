//! Amplitude en escalier : extrémum de chaque plage de signe constant.

use wb_core::series::{FrameSeries, Sample, sign_class};

/// Replace every sample by the extremum of its maximal constant-sign run.
///
/// Runs are split wherever the sign class changes or a sample is undefined.
/// Positive runs take their maximum, others their minimum. Undefined samples
/// stay undefined.
///
/// # Example
/// ```
/// use wb_core::series::FrameSeries;
/// use wb_dsp::stair_step::stair_step_amplitude;
/// let v = FrameSeries::from_nan_slice(&[1.0, 2.0, 3.0, 2.0, 1.0, -1.0, -2.0, -1.0, 1.0, 2.0, 2.0, 5.0]);
/// let amp = stair_step_amplitude(&v);
/// assert_eq!(
///     amp.to_nan_vec(),
///     vec![3.0, 3.0, 3.0, 3.0, 3.0, -2.0, -2.0, -2.0, 5.0, 5.0, 5.0, 5.0]
/// );
/// ```
#[must_use]
pub fn stair_step_amplitude(series: &FrameSeries<Sample>) -> FrameSeries<Sample> {
    let values = series.as_slice();
    let mut out: Vec<Sample> = vec![None; values.len()];

    let mut start = 0;
    while start < values.len() {
        let Some(first) = values[start] else {
            start += 1;
            continue;
        };
        let sign = sign_class(first);
        let end = values[start..]
            .iter()
            .position(|v| v.is_none_or(|v| sign_class(v) != sign))
            .map_or(values.len(), |offset| start + offset);

        let run = values[start..end].iter().flatten().copied();
        let extremum = if sign > 0 {
            run.fold(f64::NEG_INFINITY, f64::max)
        } else {
            run.fold(f64::INFINITY, f64::min)
        };
        out[start..end].fill(Some(extremum));
        start = end;
    }

    FrameSeries::from_vec(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_samples_split_runs() {
        let nan = f64::NAN;
        let v = FrameSeries::from_nan_slice(&[1.0, 4.0, nan, 2.0, 3.0, -1.0]);
        let amp = stair_step_amplitude(&v);
        assert_eq!(
            amp.as_slice(),
            &[Some(4.0), Some(4.0), None, Some(3.0), Some(3.0), Some(-1.0)]
        );
    }

    #[test]
    fn zero_forms_its_own_run() {
        let v = FrameSeries::from_nan_slice(&[-3.0, -1.0, 0.0, 0.0, 2.0]);
        let amp = stair_step_amplitude(&v);
        assert_eq!(amp.to_nan_vec(), vec![-3.0, -3.0, 0.0, 0.0, 2.0]);
    }

    #[test]
    fn nan_sample_is_not_a_run_value() {
        let v = FrameSeries::from_vec(vec![Some(2.0), Some(f64::NAN), Some(3.0)]);
        let amp = stair_step_amplitude(&v);
        assert_eq!(amp.as_slice(), &[Some(2.0), None, Some(3.0)]);
    }

    #[test]
    fn empty_and_undefined_series() {
        assert!(stair_step_amplitude(&FrameSeries::from_vec(Vec::new())).is_empty());
        assert!(stair_step_amplitude(&FrameSeries::undefined(4)).is_all_undefined());
    }

    #[test]
    fn applying_twice_is_stable() {
        let v = FrameSeries::from_nan_slice(&[0.5, 2.0, -4.0, -1.0, 3.0, 3.5, -0.1]);
        let once = stair_step_amplitude(&v);
        assert_eq!(stair_step_amplitude(&once), once);
    }
}
