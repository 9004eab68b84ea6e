/// Types, configuration et erreurs partagés du workspace wormbends.
///
/// This crate holds the per-frame series model, the skeleton containers fed
/// in by the upstream pose extraction, and the TOML configuration used by
/// the crawling and foraging computations.

pub mod config;
pub mod error;
pub mod series;
pub mod skeleton;

pub use config::{BendsConfig, CrawlingConfig, ForagingConfig};
pub use error::CoreError;
pub use series::{FrameSeries, MotionPauseMask, Sample, SegmentationMask};
pub use skeleton::{BendAngleMatrix, Partition, PointSet, VentralMode};
