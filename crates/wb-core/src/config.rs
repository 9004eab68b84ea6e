use std::ops::Range;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::skeleton::Partition;

/// Cadence d'acquisition par défaut (frames par seconde).
pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 25.8398;

/// Taille par défaut de la FFT (bins avant repliement).
pub const DEFAULT_FFT_RESOLUTION: usize = 1 << 14;

/// Default size of the bounded first-phase bandwidth search, in spectrum bins.
pub const DEFAULT_BANDWIDTH_SEARCH_BINS: usize = 2000;

/// Half-open bend-angle row ranges averaged for each crawling partition.
///
/// # Example
/// ```
/// use wb_core::config::PartitionRanges;
/// use wb_core::skeleton::Partition;
/// let ranges = PartitionRanges::default();
/// assert_eq!(ranges.range(Partition::Midbody), 23..27);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct PartitionRanges {
    pub head: [usize; 2],
    pub midbody: [usize; 2],
    pub tail: [usize; 2],
}

impl Default for PartitionRanges {
    fn default() -> Self {
        Self {
            head: [6, 10],
            midbody: [23, 27],
            tail: [40, 44],
        }
    }
}

impl PartitionRanges {
    #[must_use]
    pub fn range(&self, partition: Partition) -> Range<usize> {
        let [start, end] = match partition {
            Partition::Head => self.head,
            Partition::Midbody => self.midbody,
            Partition::Tail => self.tail,
        };
        start..end
    }
}

/// Paramètres du calcul de crawling (ondulation du corps).
///
/// # Example
/// ```
/// use wb_core::config::CrawlingConfig;
/// let config = CrawlingConfig::default();
/// assert_eq!(config.min_window_frames(), 13);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CrawlingConfig {
    /// Frames par seconde de la vidéo source.
    pub sample_rate_hz: f64,
    /// Durée minimale de la fenêtre entre passages par zéro (secondes).
    pub min_window_secs: f64,
    /// Durée maximale de la fenêtre (secondes). Au-delà, la frame est indéfinie.
    pub max_window_secs: f64,
    /// Number of FFT bins the windowed signal is zero-padded to.
    pub fft_resolution: usize,
    /// Lowest accepted crawling frequency (Hz).
    pub min_frequency_hz: f64,
    /// Highest accepted crawling frequency (Hz).
    pub max_frequency_hz: f64,
    /// A flanking minimum at or above this fraction of the peak rejects the frame.
    pub max_bandwidth_minimum_fraction: f64,
    /// Energy between the flanking minima must reach this fraction of the total.
    pub min_peak_energy_fraction: f64,
    /// Bins scanned in the bounded first phase of the bandwidth search.
    pub bandwidth_search_bins: usize,
    /// Longest interior gap filled before windowing. `None` fills every gap.
    #[serde(default)]
    pub max_interpolation_gap_frames: Option<usize>,
    /// Bend-angle rows averaged per partition.
    pub partitions: PartitionRanges,
}

impl Default for CrawlingConfig {
    fn default() -> Self {
        Self::for_sample_rate(DEFAULT_SAMPLE_RATE_HZ)
    }
}

impl CrawlingConfig {
    /// Defaults whose frequency ceiling follows the given frame rate.
    #[must_use]
    pub fn for_sample_rate(sample_rate_hz: f64) -> Self {
        let max_window_secs = 15.0;
        Self {
            sample_rate_hz,
            min_window_secs: 0.5,
            max_window_secs,
            fft_resolution: DEFAULT_FFT_RESOLUTION,
            // Au moins la moitié d'une onde dans la fenêtre maximale.
            min_frequency_hz: 1.0 / (4.0 * max_window_secs),
            max_frequency_hz: sample_rate_hz / 4.0,
            max_bandwidth_minimum_fraction: 0.5,
            min_peak_energy_fraction: 0.5,
            bandwidth_search_bins: DEFAULT_BANDWIDTH_SEARCH_BINS,
            max_interpolation_gap_frames: None,
            partitions: PartitionRanges::default(),
        }
    }

    /// Minimum zero-crossing window, in frames.
    #[must_use]
    pub fn min_window_frames(&self) -> usize {
        secs_to_frames(self.min_window_secs, self.sample_rate_hz)
    }

    /// Maximum window span, in frames.
    #[must_use]
    pub fn max_window_frames(&self) -> usize {
        secs_to_frames(self.max_window_secs, self.sample_rate_hz)
    }

    /// Clamp the fractional fields to their valid ranges.
    pub fn clamp_all(&mut self) {
        self.max_bandwidth_minimum_fraction =
            clamp_logged("max_bandwidth_minimum_fraction", self.max_bandwidth_minimum_fraction, 0.0, 1.0);
        self.min_peak_energy_fraction =
            clamp_logged("min_peak_energy_fraction", self.min_peak_energy_fraction, 0.0, 1.0);
    }

    /// Check every precondition the crawling computation relies on.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] describing the first violated constraint.
    pub fn validate(&self) -> Result<(), CoreError> {
        ensure_positive("sample_rate_hz", self.sample_rate_hz)?;
        ensure_positive("min_window_secs", self.min_window_secs)?;
        ensure_positive("max_window_secs", self.max_window_secs)?;
        ensure_positive("min_frequency_hz", self.min_frequency_hz)?;
        ensure_positive("max_frequency_hz", self.max_frequency_hz)?;
        ensure_positive(
            "max_bandwidth_minimum_fraction",
            self.max_bandwidth_minimum_fraction,
        )?;
        ensure_positive("min_peak_energy_fraction", self.min_peak_energy_fraction)?;
        ensure_at_most_one(
            "max_bandwidth_minimum_fraction",
            self.max_bandwidth_minimum_fraction,
        )?;
        ensure_at_most_one("min_peak_energy_fraction", self.min_peak_energy_fraction)?;

        if self.min_window_frames() == 0 {
            return Err(CoreError::Config(
                "min_window_secs est inférieur à une frame".into(),
            ));
        }
        if self.min_window_secs > self.max_window_secs {
            return Err(CoreError::Config(format!(
                "min_window_secs ({}) > max_window_secs ({})",
                self.min_window_secs, self.max_window_secs
            )));
        }
        if self.min_frequency_hz > self.max_frequency_hz {
            return Err(CoreError::Config(format!(
                "min_frequency_hz ({}) > max_frequency_hz ({})",
                self.min_frequency_hz, self.max_frequency_hz
            )));
        }
        if self.fft_resolution < 4 || self.fft_resolution < self.max_window_frames() {
            return Err(CoreError::Config(format!(
                "fft_resolution ({}) doit couvrir la fenêtre maximale ({} frames)",
                self.fft_resolution,
                self.max_window_frames()
            )));
        }
        if self.bandwidth_search_bins == 0 {
            return Err(CoreError::Config("bandwidth_search_bins doit être > 0".into()));
        }
        for partition in Partition::ALL {
            let range = self.partitions.range(partition);
            if range.is_empty() {
                return Err(CoreError::Config(format!(
                    "partition {} vide : {}..{}",
                    partition.name(),
                    range.start,
                    range.end
                )));
            }
        }
        Ok(())
    }
}

/// Paramètres du calcul de foraging (mouvements du nez).
///
/// # Example
/// ```
/// use wb_core::config::ForagingConfig;
/// let config = ForagingConfig::default();
/// assert_eq!(config.min_nose_window_frames, 3);
/// assert_eq!(config.max_interpolation_gap_frames, 5);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ForagingConfig {
    /// Frames par seconde de la vidéo source.
    pub sample_rate_hz: f64,
    /// Frames trimmed at both ends, and the half-width of the smoothing kernel.
    pub min_nose_window_frames: usize,
    /// Longest run of missing coordinates filled by linear interpolation.
    pub max_interpolation_gap_frames: usize,
    /// Smooth the nose bend angle with a normalized Gaussian window.
    #[serde(default)]
    pub smoothing: bool,
}

impl Default for ForagingConfig {
    fn default() -> Self {
        Self::for_sample_rate(DEFAULT_SAMPLE_RATE_HZ)
    }
}

impl ForagingConfig {
    /// Defaults scaled to the given frame rate (0.1 s nose window).
    #[must_use]
    pub fn for_sample_rate(sample_rate_hz: f64) -> Self {
        let min_nose_window_frames = secs_to_frames(0.1, sample_rate_hz);
        Self {
            sample_rate_hz,
            min_nose_window_frames,
            max_interpolation_gap_frames: (2 * min_nose_window_frames).saturating_sub(1),
            smoothing: false,
        }
    }

    /// # Errors
    /// Returns [`CoreError::Config`] if the sample rate is not positive.
    pub fn validate(&self) -> Result<(), CoreError> {
        ensure_positive("sample_rate_hz", self.sample_rate_hz)
    }
}

/// Configuration complète, sérialisable en TOML.
///
/// # Example
/// ```
/// use wb_core::config::BendsConfig;
/// let config = BendsConfig::for_sample_rate(30.0);
/// assert!((config.crawling.max_frequency_hz - 7.5).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct BendsConfig {
    pub crawling: CrawlingConfig,
    pub foraging: ForagingConfig,
}

impl BendsConfig {
    #[must_use]
    pub fn for_sample_rate(sample_rate_hz: f64) -> Self {
        Self {
            crawling: CrawlingConfig::for_sample_rate(sample_rate_hz),
            foraging: ForagingConfig::for_sample_rate(sample_rate_hz),
        }
    }

    pub fn clamp_all(&mut self) {
        self.crawling.clamp_all();
    }

    /// # Errors
    /// Returns the first violated precondition of either section.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.crawling.validate()?;
        self.foraging.validate()
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    sample_rate_hz: Option<f64>,
    crawling: Option<CrawlingSection>,
    foraging: Option<ForagingSection>,
}

/// Crawling section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct CrawlingSection {
    min_window_secs: Option<f64>,
    max_window_secs: Option<f64>,
    fft_resolution: Option<usize>,
    min_frequency_hz: Option<f64>,
    max_frequency_hz: Option<f64>,
    max_bandwidth_minimum_fraction: Option<f64>,
    min_peak_energy_fraction: Option<f64>,
    bandwidth_search_bins: Option<usize>,
    max_interpolation_gap_frames: Option<usize>,
    partitions: Option<PartitionRanges>,
}

/// Foraging section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct ForagingSection {
    min_nose_window_frames: Option<usize>,
    max_interpolation_gap_frames: Option<usize>,
    smoothing: Option<bool>,
}

/// Parse a TOML document and merge it over the defaults.
///
/// A top-level `sample_rate_hz` rescales every rate-derived default before
/// the section overrides are applied.
///
/// # Errors
/// Returns an error if the document cannot be parsed or the merged
/// configuration violates a precondition.
///
/// # Example
/// ```
/// use wb_core::config::parse_config;
/// let config = parse_config("sample_rate_hz = 30.0\n[foraging]\nsmoothing = true\n").unwrap();
/// assert!(config.foraging.smoothing);
/// assert_eq!(config.foraging.min_nose_window_frames, 3);
/// ```
pub fn parse_config(content: &str) -> Result<BendsConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = match file.sample_rate_hz {
        Some(rate) => BendsConfig::for_sample_rate(rate),
        None => BendsConfig::default(),
    };

    if let Some(c) = file.crawling {
        let cfg = &mut config.crawling;
        if let Some(v) = c.min_window_secs {
            cfg.min_window_secs = v;
        }
        if let Some(v) = c.max_window_secs {
            cfg.max_window_secs = v;
        }
        if let Some(v) = c.fft_resolution {
            cfg.fft_resolution = v;
        }
        if let Some(v) = c.min_frequency_hz {
            cfg.min_frequency_hz = v;
        }
        if let Some(v) = c.max_frequency_hz {
            cfg.max_frequency_hz = v;
        }
        if let Some(v) = c.max_bandwidth_minimum_fraction {
            cfg.max_bandwidth_minimum_fraction = v;
        }
        if let Some(v) = c.min_peak_energy_fraction {
            cfg.min_peak_energy_fraction = v;
        }
        if let Some(v) = c.bandwidth_search_bins {
            cfg.bandwidth_search_bins = v;
        }
        if c.max_interpolation_gap_frames.is_some() {
            cfg.max_interpolation_gap_frames = c.max_interpolation_gap_frames;
        }
        if let Some(v) = c.partitions {
            cfg.partitions = v;
        }
    }

    if let Some(f) = file.foraging {
        let cfg = &mut config.foraging;
        if let Some(v) = f.min_nose_window_frames {
            cfg.min_nose_window_frames = v;
            cfg.max_interpolation_gap_frames = (2 * v).saturating_sub(1);
        }
        if let Some(v) = f.max_interpolation_gap_frames {
            cfg.max_interpolation_gap_frames = v;
        }
        if let Some(v) = f.smoothing {
            cfg.smoothing = v;
        }
    }

    config.clamp_all();
    config.validate()?;
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed, or validated.
///
/// # Example
/// ```no_run
/// use wb_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/bends.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<BendsConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Configuration invalide dans {}", path.display()))
}

fn secs_to_frames(secs: f64, sample_rate_hz: f64) -> usize {
    let frames = (secs * sample_rate_hz).round();
    if frames.is_finite() && frames > 0.0 {
        frames as usize
    } else {
        0
    }
}

fn ensure_positive(name: &str, value: f64) -> Result<(), CoreError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CoreError::Config(format!("{name} doit être > 0 (valeur : {value})")))
    }
}

fn ensure_at_most_one(name: &str, value: f64) -> Result<(), CoreError> {
    if value <= 1.0 {
        Ok(())
    } else {
        Err(CoreError::Config(format!("{name} doit être ≤ 1 (valeur : {value})")))
    }
}

fn clamp_logged(name: &str, value: f64, min: f64, max: f64) -> f64 {
    let clamped = value.clamp(min, max);
    if (clamped - value).abs() > f64::EPSILON {
        log::warn!("{name} = {value} hors de [{min}, {max}], ramené à {clamped}");
    }
    clamped
}
