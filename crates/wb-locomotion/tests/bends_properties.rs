use std::f64::consts::PI;
use std::io::Write;

use wb_core::config::{CrawlingConfig, ForagingConfig, load_config};
use wb_core::series::{FrameSeries, Sample};
use wb_core::skeleton::{BendAngleMatrix, Partition, PointSet, VentralMode};
use wb_dsp::speed::centered_speed;
use wb_dsp::stair_step::stair_step_amplitude;
use wb_dsp::zero_crossing::bound_windows;
use wb_locomotion::{compute_crawling_bends, compute_foraging_bends};

const FS: f64 = 20.0;
const N_FRAMES: usize = 600;

fn crawling_config() -> CrawlingConfig {
    CrawlingConfig {
        fft_resolution: 1024,
        bandwidth_search_bins: 200,
        ..CrawlingConfig::for_sample_rate(FS)
    }
}

/// 49 bend-angle rows; each partition oscillates at its own frequency.
fn crawling_angles() -> BendAngleMatrix {
    let rows = (0..49)
        .map(|row| {
            let freq = match row {
                0..=15 => 0.5,
                16..=32 => 0.3,
                _ => 0.8,
            };
            (0..N_FRAMES)
                .map(|frame| {
                    let t = (frame as f64 + 0.37) / FS;
                    let wobble = 0.5 * (2.0 * PI * 3.1 * t + row as f64).sin();
                    Some(25.0 * (2.0 * PI * freq * t).sin() + wobble)
                })
                .collect()
        })
        .collect();
    BendAngleMatrix::new(rows).unwrap_or_else(|e| panic!("{e}"))
}

fn no_pause() -> FrameSeries<bool> {
    FrameSeries::filled(N_FRAMES, false)
}

fn all_segmented() -> FrameSeries<bool> {
    FrameSeries::filled(N_FRAMES, true)
}

#[test]
fn every_output_has_input_length() {
    let bends = compute_crawling_bends(&crawling_angles(), &no_pause(), &all_segmented(), &crawling_config())
        .unwrap_or_else(|e| panic!("{e}"));
    for partition in Partition::ALL {
        assert_eq!(bends.get(partition).amplitude.len(), N_FRAMES);
        assert_eq!(bends.get(partition).frequency.len(), N_FRAMES);
    }
}

#[test]
fn defined_frequencies_respect_bounds_and_sign() {
    let config = crawling_config();
    let bends = compute_crawling_bends(&crawling_angles(), &no_pause(), &all_segmented(), &config)
        .unwrap_or_else(|e| panic!("{e}"));
    for partition in Partition::ALL {
        let m = bends.get(partition);
        assert!(m.frequency.count_defined() > 0, "{} sans fréquence", partition.name());
        for (a, f) in m.amplitude.iter().zip(m.frequency.iter()) {
            assert_eq!(a.is_some(), f.is_some());
            if let (Some(a), Some(f)) = (a, f) {
                assert!(f.abs() >= config.min_frequency_hz && f.abs() <= config.max_frequency_hz);
                assert_eq!(a.signum(), f.signum());
            }
        }
    }
}

#[test]
fn dominant_frequency_matches_partition() {
    let bends = compute_crawling_bends(&crawling_angles(), &no_pause(), &all_segmented(), &crawling_config())
        .unwrap_or_else(|e| panic!("{e}"));
    for (partition, expected) in [(Partition::Head, 0.5), (Partition::Midbody, 0.3), (Partition::Tail, 0.8)] {
        let freqs: Vec<f64> = bends.get(partition).frequency.iter().flatten().map(|f| f.abs()).collect();
        let mean = freqs.iter().sum::<f64>() / freqs.len() as f64;
        assert!((mean - expected).abs() < 0.2, "{}: {mean}", partition.name());
    }
}

#[test]
fn unsegmented_series_yields_only_undefined() {
    let segmented = FrameSeries::filled(N_FRAMES, false);
    let bends = compute_crawling_bends(&crawling_angles(), &no_pause(), &segmented, &crawling_config())
        .unwrap_or_else(|e| panic!("{e}"));
    for partition in Partition::ALL {
        assert!(bends.get(partition).amplitude.is_all_undefined());
        assert!(bends.get(partition).frequency.is_all_undefined());
        assert_eq!(bends.get(partition).amplitude.len(), N_FRAMES);
    }
}

#[test]
fn paused_frames_are_undefined() {
    let mut paused = vec![false; N_FRAMES];
    paused[200..300].fill(true);
    let paused = FrameSeries::from_vec(paused);
    let bends = compute_crawling_bends(&crawling_angles(), &paused, &all_segmented(), &crawling_config())
        .unwrap_or_else(|e| panic!("{e}"));
    for partition in Partition::ALL {
        let m = bends.get(partition);
        assert!(m.frequency.as_slice()[200..300].iter().all(Option::is_none));
        assert!(m.amplitude.as_slice()[200..300].iter().all(Option::is_none));
    }
}

#[test]
fn repeated_runs_are_identical() {
    let angles = crawling_angles();
    let config = crawling_config();
    let first = compute_crawling_bends(&angles, &no_pause(), &all_segmented(), &config);
    let second = compute_crawling_bends(&angles, &no_pause(), &all_segmented(), &config);
    assert_eq!(first, second);
}

#[test]
fn repeated_foraging_runs_are_identical() {
    let config = ForagingConfig {
        smoothing: true,
        ..ForagingConfig::for_sample_rate(FS)
    };
    let (nose, neck) = head_points(200, |i| 35.0 * (i as f64 * 0.21).sin());
    let first = compute_foraging_bends(&nose, &neck, VentralMode::Anticlockwise, &config);
    let second = compute_foraging_bends(&nose, &neck, VentralMode::Anticlockwise, &config);
    assert!(first.as_ref().is_ok_and(|m| m.amplitude.count_defined() > 0));
    assert_eq!(first, second);
}

#[test]
fn resolved_windows_respect_minimum_span() {
    let config = crawling_config();
    let angles = crawling_angles();
    let signal = angles.rows_mean(config.partitions.range(Partition::Midbody));
    let min_window = config.min_window_frames();
    let windows = bound_windows(&signal, min_window);
    assert!(windows.iter().flatten().count() > 0);
    for w in windows.iter().flatten() {
        assert!(w.len() >= min_window);
    }
}

#[test]
fn single_crossing_gives_undefined_windows() {
    // Un seul changement de signe, plages plus courtes que la fenêtre minimale.
    let signal = FrameSeries::from_nan_slice(&[3.0, 2.0, 1.0, -1.0, -2.0, -3.0]);
    assert!(bound_windows(&signal, 13).iter().all(Option::is_none));
}

#[test]
fn stair_step_fixture() {
    let v = FrameSeries::from_nan_slice(&[1.0, 2.0, 3.0, 2.0, 1.0, -1.0, -2.0, -1.0, 1.0, 2.0, 2.0, 5.0]);
    assert_eq!(
        stair_step_amplitude(&v).to_nan_vec(),
        vec![3.0, 3.0, 3.0, 3.0, 3.0, -2.0, -2.0, -2.0, 5.0, 5.0, 5.0, 5.0]
    );
}

#[test]
fn centered_speed_fixture() {
    let a: FrameSeries<Sample> = (0..8).map(|i| Some(f64::from(i * i))).collect();
    let speed = centered_speed(&a, FS);
    assert!(speed[0].is_none());
    assert!(speed[7].is_none());
    for i in 1..7 {
        let expected = ((a[i].unwrap_or(0.0) - a[i - 1].unwrap_or(0.0)) * FS
            + (a[i + 1].unwrap_or(0.0) - a[i].unwrap_or(0.0)) * FS)
            / 2.0;
        assert!((speed[i].unwrap_or(f64::NAN) - expected).abs() < 1e-9);
    }
}

fn head_points(n: usize, angle_deg: impl Fn(usize) -> f64) -> (PointSet, PointSet) {
    let row = |f: &dyn Fn(usize) -> f64| -> FrameSeries<Sample> { (0..n).map(|i| Some(f(i))).collect() };
    let nose = PointSet::new(
        vec![row(&|_| 0.0), row(&|i| angle_deg(i).to_radians().cos())],
        vec![row(&|_| 0.0), row(&|i| angle_deg(i).to_radians().sin())],
    )
    .unwrap_or_else(|e| panic!("{e}"));
    let neck = PointSet::new(
        vec![row(&|_| -1.0), row(&|_| 0.0)],
        vec![row(&|_| 0.0), row(&|_| 0.0)],
    )
    .unwrap_or_else(|e| panic!("{e}"));
    (nose, neck)
}

#[test]
fn foraging_masks_align_and_ends_are_undefined() {
    let config = ForagingConfig::for_sample_rate(FS);
    let (nose, neck) = head_points(200, |i| 35.0 * (i as f64 * 0.21).sin());
    let out = compute_foraging_bends(&nose, &neck, VentralMode::Unknown, &config)
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(out.amplitude.len(), 200);
    assert_eq!(out.angular_speed.len(), 200);
    for (a, s) in out.amplitude.iter().zip(out.angular_speed.iter()) {
        assert_eq!(a.is_some(), s.is_some());
    }
    let trimmed = config.min_nose_window_frames;
    assert!(out.angular_speed.as_slice()[..=trimmed].iter().all(Option::is_none));
    assert!(out.angular_speed.as_slice()[200 - trimmed - 1..].iter().all(Option::is_none));
    // Amplitude en escalier : chaque plage porte son extrémum.
    for a in out.amplitude.iter().flatten() {
        assert!(a.abs() <= 35.0 + 1e-9);
    }
}

#[test]
fn configuration_file_drives_both_computations() {
    let mut file = tempfile::NamedTempFile::new().unwrap_or_else(|e| panic!("{e}"));
    write!(
        file,
        "sample_rate_hz = 20.0\n[crawling]\nfft_resolution = 1024\nbandwidth_search_bins = 200\n[foraging]\nmin_nose_window_frames = 4\n"
    )
    .unwrap_or_else(|e| panic!("{e}"));
    let config = load_config(file.path()).unwrap_or_else(|e| panic!("{e:#}"));
    assert_eq!(config.crawling, crawling_config());
    assert_eq!(config.foraging.max_interpolation_gap_frames, 7);

    let bends = compute_crawling_bends(&crawling_angles(), &no_pause(), &all_segmented(), &config.crawling)
        .unwrap_or_else(|e| panic!("{e}"));
    assert!(bends.head.frequency.count_defined() > 0);

    let (nose, neck) = head_points(50, |i| i as f64);
    let out = compute_foraging_bends(&nose, &neck, VentralMode::Anticlockwise, &config.foraging)
        .unwrap_or_else(|e| panic!("{e}"));
    assert!(out.angular_speed.iter().flatten().all(|&s| s < 0.0));
}
