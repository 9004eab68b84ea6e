//! Amplitude et fréquence instantanées d'un signal de courbure.
//!
//! Each frame's zero-crossing window is transformed, the dominant peak is
//! located, and the peak is kept only if it is clearly separated from its
//! neighbourhood (flanking minima low enough) and carries enough of the
//! spectrum's energy.

use std::collections::BTreeMap;

use rayon::prelude::*;
use wb_core::config::CrawlingConfig;
use wb_core::series::{FrameSeries, Sample, sign_class};

use crate::fft::SpectrumPipeline;
use crate::peaks::{argmax, flanking, separated_minima};
use crate::zero_crossing::Window;

/// Numeric parameters of the spectral estimator, already expressed in frames and bins.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectralParams {
    pub sample_rate_hz: f64,
    pub max_window_frames: usize,
    pub min_frequency_hz: f64,
    pub max_frequency_hz: f64,
    pub resolution: usize,
    pub max_bandwidth_minimum_fraction: f64,
    pub min_peak_energy_fraction: f64,
    pub bandwidth_search_bins: usize,
}

impl From<&CrawlingConfig> for SpectralParams {
    fn from(config: &CrawlingConfig) -> Self {
        Self {
            sample_rate_hz: config.sample_rate_hz,
            max_window_frames: config.max_window_frames(),
            min_frequency_hz: config.min_frequency_hz,
            max_frequency_hz: config.max_frequency_hz,
            resolution: config.fft_resolution,
            max_bandwidth_minimum_fraction: config.max_bandwidth_minimum_fraction,
            min_peak_energy_fraction: config.min_peak_energy_fraction,
            bandwidth_search_bins: config.bandwidth_search_bins,
        }
    }
}

/// Raison pour laquelle une frame reste indéfinie.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rejection {
    /// No zero crossing on one side, or expansion ran out of crossings.
    NoWindow,
    /// Window span above the maximum window duration.
    WindowTooLong,
    /// Center sample or a sample inside the window is undefined.
    UndefinedSample,
    /// Window extends past the start or end of the series.
    OutOfBounds,
    /// Frame flagged as a motion pause.
    Paused,
    /// Dominant peak in the first bin, so it cannot be bounded on the left.
    PeakAtFirstBin,
    FrequencyOutOfRange,
    /// No minimum found on one side of the peak.
    NoBandwidth,
    /// A flanking minimum reaches the configured fraction of the peak.
    UnclearPeak,
    /// Energy between the flanking minima below the configured fraction.
    WeakPeak,
    /// Window mean is exactly zero, so the bend has no sign.
    ZeroMean,
}

/// Unsigned description of an accepted spectral peak.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeakMeasure {
    /// Position in the zero-frequency-free spectrum.
    pub index: usize,
    pub magnitude: f64,
    pub frequency_hz: f64,
    /// `2 · magnitude / window_len`.
    pub amplitude: f64,
}

/// Per-frame output of [`SpectralBendEstimator::estimate`].
#[derive(Clone, Debug, PartialEq)]
pub struct BendSeries {
    pub amplitude: FrameSeries<Sample>,
    pub frequency: FrameSeries<Sample>,
    /// Count of undefined frames per reason.
    pub rejections: BTreeMap<Rejection, usize>,
}

/// Estimateur spectral d'amplitude/fréquence de courbure.
///
/// The FFT plan is built once; per-frame evaluation runs on the rayon pool
/// with one scratch pipeline per worker.
///
/// # Example
/// ```
/// use wb_dsp::spectral::{SpectralBendEstimator, SpectralParams};
/// let estimator = SpectralBendEstimator::new(SpectralParams {
///     sample_rate_hz: 20.0,
///     max_window_frames: 300,
///     min_frequency_hz: 1.0 / 60.0,
///     max_frequency_hz: 5.0,
///     resolution: 1024,
///     max_bandwidth_minimum_fraction: 0.5,
///     min_peak_energy_fraction: 0.5,
///     bandwidth_search_bins: 200,
/// });
/// assert!((estimator.frequency_step() - 10.0 / 511.0).abs() < 1e-12);
/// ```
pub struct SpectralBendEstimator {
    params: SpectralParams,
    pipeline: SpectrumPipeline,
}

impl SpectralBendEstimator {
    /// # Panics
    /// Panics if `params.resolution` is below 4.
    #[must_use]
    pub fn new(params: SpectralParams) -> Self {
        let pipeline = SpectrumPipeline::new(params.resolution);
        Self { params, pipeline }
    }

    /// Hz per spectrum index: `(fs / 2) / (resolution / 2 − 1)`.
    #[must_use]
    pub fn frequency_step(&self) -> f64 {
        let max_bin = self.params.resolution / 2;
        (self.params.sample_rate_hz / 2.0) / (max_bin - 1) as f64
    }

    /// Estimate signed amplitude and frequency for every frame.
    ///
    /// `windows` and `is_paused` must have one entry per frame of `signal`.
    #[must_use]
    pub fn estimate(
        &self,
        signal: &FrameSeries<Sample>,
        windows: &[Option<Window>],
        is_paused: &FrameSeries<bool>,
    ) -> BendSeries {
        let n = signal.len();
        let results: Vec<Result<(f64, f64), Rejection>> = (0..n)
            .into_par_iter()
            .map_init(
                || (self.pipeline.fork(), Vec::new(), Vec::new()),
                |(fft, spectrum, samples), frame| {
                    let paused = is_paused.get(frame).copied().unwrap_or(false);
                    let window = windows.get(frame).copied().flatten();
                    self.analyze_frame(fft, spectrum, samples, signal, frame, window, paused)
                },
            )
            .collect();

        let mut rejections = BTreeMap::new();
        let mut amplitude = Vec::with_capacity(n);
        let mut frequency = Vec::with_capacity(n);
        for result in results {
            match result {
                Ok((amp, freq)) => {
                    amplitude.push(Some(amp));
                    frequency.push(Some(freq));
                }
                Err(reason) => {
                    *rejections.entry(reason).or_insert(0) += 1;
                    amplitude.push(None);
                    frequency.push(None);
                }
            }
        }

        BendSeries {
            amplitude: FrameSeries::from_vec(amplitude),
            frequency: FrameSeries::from_vec(frequency),
            rejections,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn analyze_frame(
        &self,
        fft: &mut SpectrumPipeline,
        spectrum: &mut Vec<f64>,
        samples: &mut Vec<f64>,
        signal: &FrameSeries<Sample>,
        frame: usize,
        window: Option<Window>,
        paused: bool,
    ) -> Result<(f64, f64), Rejection> {
        let window = window.ok_or(Rejection::NoWindow)?;
        if window.len() > self.params.max_window_frames {
            return Err(Rejection::WindowTooLong);
        }
        if signal[frame].is_none() {
            return Err(Rejection::UndefinedSample);
        }
        let (left, right) = window.bounds(signal.len()).ok_or(Rejection::OutOfBounds)?;
        if paused {
            return Err(Rejection::Paused);
        }

        samples.clear();
        for value in &signal.as_slice()[left..=right] {
            samples.push(value.ok_or(Rejection::UndefinedSample)?);
        }

        fft.magnitudes(samples, spectrum);
        let peak = self.measure_peak(spectrum, samples.len())?;

        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let sign = match sign_class(mean) {
            0 => return Err(Rejection::ZeroMean),
            s => f64::from(s),
        };
        Ok((peak.amplitude * sign, peak.frequency_hz * sign))
    }

    /// Locate and validate the dominant peak of a zero-frequency-free
    /// magnitude spectrum computed from `window_len` samples.
    ///
    /// # Errors
    /// Returns the [`Rejection`] reason when the peak is unusable.
    pub fn measure_peak(&self, spectrum: &[f64], window_len: usize) -> Result<PeakMeasure, Rejection> {
        let (index, magnitude) = argmax(spectrum).ok_or(Rejection::PeakAtFirstBin)?;
        if index == 0 {
            return Err(Rejection::PeakAtFirstBin);
        }

        let frequency_hz = self.frequency_step() * index as f64;
        if !(self.params.min_frequency_hz..=self.params.max_frequency_hz).contains(&frequency_hz) {
            return Err(Rejection::FrequencyOutOfRange);
        }

        let (start, end) = self
            .bandwidth(spectrum, index, window_len)
            .ok_or(Rejection::NoBandwidth)?;

        let ceiling = self.params.max_bandwidth_minimum_fraction * magnitude;
        if spectrum[start] >= ceiling || spectrum[end] >= ceiling {
            return Err(Rejection::UnclearPeak);
        }

        let total: f64 = spectrum.iter().map(|m| m * m).sum();
        let band: f64 = spectrum[start..=end].iter().map(|m| m * m).sum();
        if band < self.params.min_peak_energy_fraction * total {
            return Err(Rejection::WeakPeak);
        }

        Ok(PeakMeasure {
            index,
            magnitude,
            frequency_hz,
            amplitude: 2.0 * magnitude / window_len as f64,
        })
    }

    /// Minima bounding `peak`, searched first within the bounded range and
    /// then, if the trailing minimum is missing or too close to the range
    /// edge, over the whole spectrum.
    fn bandwidth(&self, spectrum: &[f64], peak: usize, window_len: usize) -> Option<(usize, usize)> {
        let separation = ((window_len as f64).sqrt().round() as usize).max(1);
        let limit = self.params.bandwidth_search_bins.min(spectrum.len());

        let bounded = if peak < limit {
            flanking_minima(&spectrum[..limit], peak, separation)
        } else {
            (None, None)
        };
        let needs_full =
            limit < spectrum.len() && bounded.1.is_none_or(|end| end + separation >= limit);

        let (start, end) = if needs_full {
            flanking_minima(spectrum, peak, separation)
        } else {
            bounded
        };
        Some((start?, end?))
    }
}

fn flanking_minima(values: &[f64], peak: usize, separation: usize) -> (Option<usize>, Option<usize>) {
    flanking(&separated_minima(values, separation), peak)
}
