/// Descripteurs de locomotion : crawling et foraging.
///
/// The two entry points take complete, fixed-length series from the upstream
/// skeleton extraction and return per-frame outputs aligned on the same
/// frames. Rejected frames are undefined samples, never errors.

pub mod crawling;
pub mod foraging;

pub use crawling::{BendMeasurement, CrawlingBends, compute_crawling_bends};
pub use foraging::{ForagingMeasurement, compute_foraging_bends};
