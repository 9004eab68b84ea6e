use wb_core::config::CrawlingConfig;
use wb_core::error::CoreError;
use wb_core::series::{FrameSeries, MotionPauseMask, Sample, SegmentationMask};
use wb_core::skeleton::{BendAngleMatrix, Partition};
use wb_dsp::interpolate::interpolate_gaps;
use wb_dsp::spectral::{SpectralBendEstimator, SpectralParams};
use wb_dsp::zero_crossing::bound_windows;

/// Amplitude (degrés) et fréquence (Hz) signées d'une partition.
///
/// Both series share the same validity mask and the same sign on every
/// defined frame.
#[derive(Clone, Debug, PartialEq)]
pub struct BendMeasurement {
    pub amplitude: FrameSeries<Sample>,
    pub frequency: FrameSeries<Sample>,
}

impl BendMeasurement {
    fn undefined(n_frames: usize) -> Self {
        Self {
            amplitude: FrameSeries::undefined(n_frames),
            frequency: FrameSeries::undefined(n_frames),
        }
    }
}

/// Crawling output, one record per body partition.
#[derive(Clone, Debug, PartialEq)]
pub struct CrawlingBends {
    pub head: BendMeasurement,
    pub midbody: BendMeasurement,
    pub tail: BendMeasurement,
}

impl CrawlingBends {
    fn undefined(n_frames: usize) -> Self {
        Self {
            head: BendMeasurement::undefined(n_frames),
            midbody: BendMeasurement::undefined(n_frames),
            tail: BendMeasurement::undefined(n_frames),
        }
    }

    #[must_use]
    pub fn get(&self, partition: Partition) -> &BendMeasurement {
        match partition {
            Partition::Head => &self.head,
            Partition::Midbody => &self.midbody,
            Partition::Tail => &self.tail,
        }
    }
}

/// Compute crawling amplitude and frequency for the head, midbody and tail.
///
/// Each partition signal is the mean of its configured bend-angle rows, gap
/// interpolated, then passed through the zero-crossing window bounder and the
/// spectral estimator. Partitions run in parallel on the rayon pool.
///
/// If no frame is segmented every output is undefined and no spectrum is
/// computed.
///
/// # Errors
/// Returns [`CoreError`] when the configuration is invalid, a mask length
/// differs from the matrix frame count, or a partition range does not fit
/// the matrix rows.
///
/// # Example
/// ```
/// use wb_core::config::CrawlingConfig;
/// use wb_core::series::FrameSeries;
/// use wb_core::skeleton::BendAngleMatrix;
/// use wb_locomotion::compute_crawling_bends;
///
/// let rows = vec![FrameSeries::from_vec(vec![Some(1.0); 10]); 49];
/// let angles = BendAngleMatrix::new(rows).unwrap();
/// let paused = FrameSeries::filled(10, false);
/// let segmented = FrameSeries::filled(10, false);
/// let bends = compute_crawling_bends(&angles, &paused, &segmented, &CrawlingConfig::default()).unwrap();
/// assert!(bends.head.amplitude.is_all_undefined());
/// assert_eq!(bends.tail.frequency.len(), 10);
/// ```
pub fn compute_crawling_bends(
    angles: &BendAngleMatrix,
    is_paused: &MotionPauseMask,
    is_segmented: &SegmentationMask,
    config: &CrawlingConfig,
) -> Result<CrawlingBends, CoreError> {
    config.validate()?;
    let n_frames = angles.n_frames();
    is_paused.ensure_len("motion pause mask", n_frames)?;
    is_segmented.ensure_len("segmentation mask", n_frames)?;

    for partition in Partition::ALL {
        let range = config.partitions.range(partition);
        if range.end > angles.n_points() {
            return Err(CoreError::PartitionOutOfRange {
                partition: partition.name(),
                start: range.start,
                end: range.end,
                rows: angles.n_points(),
            });
        }
    }

    if !is_segmented.any() {
        log::info!("crawling: aucune frame segmentée sur {n_frames}, sorties indéfinies");
        return Ok(CrawlingBends::undefined(n_frames));
    }

    let estimator = SpectralBendEstimator::new(SpectralParams::from(config));
    let run = |partition| partition_bends(&estimator, angles, partition, is_paused, config);
    let (head, (midbody, tail)) = rayon::join(
        || run(Partition::Head),
        || rayon::join(|| run(Partition::Midbody), || run(Partition::Tail)),
    );

    Ok(CrawlingBends {
        head,
        midbody,
        tail,
    })
}

fn partition_bends(
    estimator: &SpectralBendEstimator,
    angles: &BendAngleMatrix,
    partition: Partition,
    is_paused: &MotionPauseMask,
    config: &CrawlingConfig,
) -> BendMeasurement {
    let signal = interpolate_gaps(
        &angles.rows_mean(config.partitions.range(partition)),
        config.max_interpolation_gap_frames,
    );
    let windows = bound_windows(&signal, config.min_window_frames());
    let bends = estimator.estimate(&signal, &windows, is_paused);

    log::debug!(
        "crawling {}: {}/{} frames définies, {} fenêtres résolues, rejets {:?}",
        partition.name(),
        bends.frequency.count_defined(),
        signal.len(),
        windows.iter().flatten().count(),
        bends.rejections
    );

    BendMeasurement {
        amplitude: bends.amplitude,
        frequency: bends.frequency,
    }
}
