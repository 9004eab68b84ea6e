//! Body-axis angles from skeleton point coordinates.

use wb_core::series::{FrameSeries, Sample};
use wb_core::skeleton::{PointSet, nan_mean};

/// Direction (radians) of a point set along the body, per frame.
///
/// For each frame the displacement between successive points is averaged
/// over the set (undefined displacements skipped) and the mean vector's
/// `atan2` is taken. A frame with no defined displacement is undefined.
///
/// # Example
/// ```
/// use wb_core::series::FrameSeries;
/// use wb_core::skeleton::PointSet;
/// use wb_dsp::angles::mean_segment_angles;
/// let x = vec![FrameSeries::from_vec(vec![Some(0.0)]), FrameSeries::from_vec(vec![Some(0.0)])];
/// let y = vec![FrameSeries::from_vec(vec![Some(0.0)]), FrameSeries::from_vec(vec![Some(2.0)])];
/// let set = PointSet::new(x, y).unwrap();
/// let angles = mean_segment_angles(&set);
/// assert!((angles[0].unwrap() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
/// ```
#[must_use]
pub fn mean_segment_angles(points: &PointSet) -> FrameSeries<Sample> {
    let (x, y) = (points.x(), points.y());
    (0..points.n_frames())
        .map(|frame| {
            let dx = nan_mean(
                x.windows(2)
                    .map(|pair| pair[1][frame].zip(pair[0][frame]).map(|(b, a)| b - a)),
            );
            let dy = nan_mean(
                y.windows(2)
                    .map(|pair| pair[1][frame].zip(pair[0][frame]).map(|(b, a)| b - a)),
            );
            dy.zip(dx).map(|(dy, dx)| dy.atan2(dx))
        })
        .collect()
}

/// Bend angle in degrees between two direction series, `tip − base`.
///
/// The difference is wrapped into (−180°, 180°].
#[must_use]
pub fn bend_difference_degrees(
    tip: &FrameSeries<Sample>,
    base: &FrameSeries<Sample>,
) -> FrameSeries<Sample> {
    tip.iter()
        .zip(base.iter())
        .map(|(t, b)| t.zip(*b).map(|(t, b)| wrap_degrees((t - b).to_degrees())))
        .collect()
}

/// Ramène un angle dans (−180°, 180°].
///
/// # Example
/// ```
/// use wb_dsp::angles::wrap_degrees;
/// assert!((wrap_degrees(270.0) + 90.0).abs() < 1e-12);
/// assert!((wrap_degrees(-180.0) - 180.0).abs() < 1e-12);
/// ```
#[inline]
#[must_use]
pub fn wrap_degrees(angle: f64) -> f64 {
    if angle > 180.0 {
        angle - 360.0
    } else if angle <= -180.0 {
        angle + 360.0
    } else {
        angle
    }
}
