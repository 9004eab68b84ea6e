use std::sync::Arc;

use realfft::num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};

/// Spectre d'amplitude d'une fenêtre zéro-paddée, via realfft.
///
/// The plan is built once and shared; each pipeline owns its own input,
/// spectrum and scratch buffers so one can be forked per worker thread.
///
/// # Example
/// ```
/// use wb_dsp::fft::SpectrumPipeline;
/// let fft = SpectrumPipeline::new(64);
/// assert_eq!(fft.n_bins(), 31);
/// ```
pub struct SpectrumPipeline {
    resolution: usize,
    input_buf: Vec<f64>,
    spectrum_buf: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
    plan: Arc<dyn RealToComplex<f64>>,
}

impl SpectrumPipeline {
    /// Plan a forward transform of `resolution` points.
    ///
    /// # Panics
    /// Panics if `resolution` is below 4 (callers validate the configuration first).
    #[must_use]
    pub fn new(resolution: usize) -> Self {
        assert!(resolution >= 4, "FFT resolution must be >= 4");

        let mut planner = RealFftPlanner::<f64>::new();
        let plan = planner.plan_fft_forward(resolution);
        Self::with_plan(resolution, plan)
    }

    fn with_plan(resolution: usize, plan: Arc<dyn RealToComplex<f64>>) -> Self {
        Self {
            resolution,
            input_buf: plan.make_input_vec(),
            spectrum_buf: plan.make_output_vec(),
            scratch: plan.make_scratch_vec(),
            plan,
        }
    }

    /// New buffers sharing the same plan.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self::with_plan(self.resolution, Arc::clone(&self.plan))
    }

    /// Number of bins returned by [`Self::magnitudes`]: `resolution / 2 − 1`
    /// (the zero-frequency bin and the bins from Nyquist up are dropped).
    #[must_use]
    pub fn n_bins(&self) -> usize {
        self.resolution / 2 - 1
    }

    /// Unnormalized magnitude spectrum of `samples`, zero-padded to the
    /// resolution, written into `out` as bins `1 .. resolution/2`.
    ///
    /// Samples beyond the resolution are ignored.
    ///
    /// # Example
    /// ```
    /// use wb_dsp::fft::SpectrumPipeline;
    /// let mut fft = SpectrumPipeline::new(16);
    /// let mut out = Vec::new();
    /// // Cosinus pur sur le bin 2.
    /// let samples: Vec<f64> = (0..16).map(|i| (2.0 * std::f64::consts::PI * 2.0 * i as f64 / 16.0).cos()).collect();
    /// fft.magnitudes(&samples, &mut out);
    /// assert_eq!(out.len(), 7);
    /// assert!((out[1] - 8.0).abs() < 1e-9);
    /// ```
    pub fn magnitudes(&mut self, samples: &[f64], out: &mut Vec<f64>) {
        let n = self.resolution.min(samples.len());
        self.input_buf[..n].copy_from_slice(&samples[..n]);
        self.input_buf[n..].fill(0.0);

        out.clear();
        if self
            .plan
            .process_with_scratch(&mut self.input_buf, &mut self.spectrum_buf, &mut self.scratch)
            .is_err()
        {
            out.resize(self.n_bins(), 0.0);
            return;
        }

        out.extend(
            self.spectrum_buf[1..self.resolution / 2]
                .iter()
                .map(|c| c.norm()),
        );
    }
}
