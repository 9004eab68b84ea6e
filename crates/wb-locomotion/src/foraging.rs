//! Mouvements de la tête : amplitude en escalier et vitesse angulaire.

use wb_core::config::ForagingConfig;
use wb_core::error::CoreError;
use wb_core::series::{FrameSeries, Sample};
use wb_core::skeleton::{PointSet, VentralMode};
use wb_dsp::angles::{bend_difference_degrees, mean_segment_angles};
use wb_dsp::interpolate::interpolate_gaps;
use wb_dsp::smoothing::gaussian_smooth;
use wb_dsp::speed::centered_speed;
use wb_dsp::stair_step::stair_step_amplitude;

/// Foraging output: stair-step amplitude (degrees) and angular speed
/// (degrees per second), sharing one validity mask.
#[derive(Clone, Debug, PartialEq)]
pub struct ForagingMeasurement {
    pub amplitude: FrameSeries<Sample>,
    pub angular_speed: FrameSeries<Sample>,
}

/// Compute the foraging amplitude and angular speed of the nose relative to
/// the neck.
///
/// Coordinate rows are gap interpolated, reduced to one direction per frame
/// for each point set, and differenced into a nose bend angle. The angle is
/// optionally smoothed and its first and last `min_nose_window_frames`
/// frames are dropped. An `Anticlockwise` ventral side negates both outputs.
///
/// # Errors
/// Returns [`CoreError`] when the configuration is invalid or the two point
/// sets disagree on their frame count.
///
/// # Example
/// ```
/// use wb_core::config::ForagingConfig;
/// use wb_core::series::FrameSeries;
/// use wb_core::skeleton::{PointSet, VentralMode};
/// use wb_locomotion::compute_foraging_bends;
///
/// let row = |v: f64| FrameSeries::from_vec(vec![Some(v); 20]);
/// let nose = PointSet::new(vec![row(0.0), row(1.0)], vec![row(0.0), row(1.0)]).unwrap();
/// let neck = PointSet::new(vec![row(0.0), row(1.0)], vec![row(0.0), row(0.0)]).unwrap();
/// let out = compute_foraging_bends(&nose, &neck, VentralMode::Unknown, &ForagingConfig::default()).unwrap();
/// assert_eq!(out.amplitude.count_defined(), 12);
/// assert!((out.amplitude[10].unwrap() - 45.0).abs() < 1e-9);
/// assert!(out.angular_speed[10].unwrap().abs() < 1e-9);
/// ```
pub fn compute_foraging_bends(
    nose: &PointSet,
    neck: &PointSet,
    ventral: VentralMode,
    config: &ForagingConfig,
) -> Result<ForagingMeasurement, CoreError> {
    config.validate()?;
    let n_frames = nose.n_frames();
    if neck.n_frames() != n_frames {
        return Err(CoreError::LengthMismatch {
            what: "neck points",
            expected: n_frames,
            actual: neck.n_frames(),
        });
    }

    let max_gap = Some(config.max_interpolation_gap_frames);
    let nose = nose.map_rows(|row| interpolate_gaps(row, max_gap));
    let neck = neck.map_rows(|row| interpolate_gaps(row, max_gap));

    let mut bend = bend_difference_degrees(&mean_segment_angles(&nose), &mean_segment_angles(&neck));
    if config.smoothing {
        bend = gaussian_smooth(&bend, config.min_nose_window_frames);
    }
    let bend = trim_edges(&bend, config.min_nose_window_frames);

    let angular_speed = centered_speed(&bend, config.sample_rate_hz);
    let amplitude = stair_step_amplitude(&bend).masked_by(&angular_speed);

    log::debug!(
        "foraging: {}/{} frames définies (ventral {:?})",
        amplitude.count_defined(),
        n_frames,
        ventral
    );

    let sign = ventral.sign();
    Ok(ForagingMeasurement {
        amplitude: amplitude.map_defined(|v| v * sign),
        angular_speed: angular_speed.map_defined(|v| v * sign),
    })
}

/// Undefine the first and last `frames` samples.
fn trim_edges(series: &FrameSeries<Sample>, frames: usize) -> FrameSeries<Sample> {
    let n = series.len();
    series
        .iter()
        .enumerate()
        .map(|(i, v)| if i < frames || i + frames >= n { None } else { *v })
        .collect()
}
