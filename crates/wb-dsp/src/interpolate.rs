use wb_core::series::{FrameSeries, Sample};

/// Fill interior runs of undefined samples by linear interpolation.
///
/// Only runs bounded by defined samples on both sides are filled, and only
/// when the run is at most `max_gap` frames long (`None` fills every interior
/// run). Leading and trailing runs are never extrapolated.
///
/// # Example
/// ```
/// use wb_core::series::FrameSeries;
/// use wb_dsp::interpolate::interpolate_gaps;
/// let s = FrameSeries::from_vec(vec![None, Some(0.0), None, None, Some(3.0), None]);
/// let filled = interpolate_gaps(&s, Some(2));
/// assert_eq!(filled.as_slice(), &[None, Some(0.0), Some(1.0), Some(2.0), Some(3.0), None]);
/// ```
#[must_use]
pub fn interpolate_gaps(series: &FrameSeries<Sample>, max_gap: Option<usize>) -> FrameSeries<Sample> {
    let mut out = series.as_slice().to_vec();
    let mut last_defined: Option<(usize, f64)> = None;

    for (i, sample) in series.iter().enumerate() {
        let Some(value) = *sample else { continue };
        if let Some((start, start_value)) = last_defined {
            let gap = i - start - 1;
            if gap > 0 && max_gap.is_none_or(|limit| gap <= limit) {
                let step = (value - start_value) / (i - start) as f64;
                for (k, slot) in out[start + 1..i].iter_mut().enumerate() {
                    *slot = Some(start_value + step * (k + 1) as f64);
                }
            }
        }
        last_defined = Some((i, value));
    }

    FrameSeries::from_vec(out)
}
