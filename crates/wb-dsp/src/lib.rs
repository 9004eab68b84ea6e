// Signal processing building blocks for worm bend descriptors.

pub mod angles;
pub mod fft;
pub mod interpolate;
pub mod peaks;
pub mod smoothing;
pub mod spectral;
pub mod speed;
pub mod stair_step;
pub mod zero_crossing;
