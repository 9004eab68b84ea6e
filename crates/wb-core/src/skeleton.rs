use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::series::{FrameSeries, Sample};

/// Partition du corps mesurée pour le crawling.
///
/// # Example
/// ```
/// use wb_core::skeleton::Partition;
/// assert_eq!(Partition::ALL.len(), 3);
/// assert_eq!(Partition::Midbody.name(), "midbody");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    Head,
    Midbody,
    Tail,
}

impl Partition {
    /// Les trois partitions, de la tête vers la queue.
    pub const ALL: [Self; 3] = [Self::Head, Self::Midbody, Self::Tail];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Midbody => "midbody",
            Self::Tail => "tail",
        }
    }
}

/// Body orientation convention used to sign foraging outputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum VentralMode {
    /// Ventral side not annotated.
    #[default]
    Unknown,
    /// Ventral side is clockwise from the head.
    Clockwise,
    /// Ventral side is anticlockwise; foraging outputs are negated.
    Anticlockwise,
}

impl VentralMode {
    /// Sign multiplier applied to foraging amplitude and angular speed.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Anticlockwise => -1.0,
            Self::Unknown | Self::Clockwise => 1.0,
        }
    }
}

/// Bend angles (degrees) for every skeleton bend point over every frame.
///
/// Stored row-major: one [`FrameSeries`] per skeleton point, all of the same
/// length.
///
/// # Example
/// ```
/// use wb_core::series::FrameSeries;
/// use wb_core::skeleton::BendAngleMatrix;
/// let rows = vec![
///     FrameSeries::from_vec(vec![Some(10.0), None]),
///     FrameSeries::from_vec(vec![Some(20.0), None]),
/// ];
/// let m = BendAngleMatrix::new(rows).unwrap();
/// let mean = m.rows_mean(0..2);
/// assert_eq!(mean.as_slice(), &[Some(15.0), None]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BendAngleMatrix {
    rows: Vec<FrameSeries<Sample>>,
    n_frames: usize,
}

impl BendAngleMatrix {
    /// Build a matrix from per-point rows.
    ///
    /// # Errors
    /// Returns [`CoreError::LengthMismatch`] if the rows disagree on frame count.
    pub fn new(rows: Vec<FrameSeries<Sample>>) -> Result<Self, CoreError> {
        let n_frames = rows.first().map_or(0, FrameSeries::len);
        for row in &rows {
            row.ensure_len("bend angle row", n_frames)?;
        }
        Ok(Self { rows, n_frames })
    }

    #[must_use]
    pub fn n_points(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    /// Mean across the rows in `range`, skipping undefined samples.
    ///
    /// A frame with no defined sample in the range stays undefined. The range
    /// is clipped to the available rows.
    #[must_use]
    pub fn rows_mean(&self, range: Range<usize>) -> FrameSeries<Sample> {
        let end = range.end.min(self.rows.len());
        let start = range.start.min(end);
        let rows = &self.rows[start..end];
        (0..self.n_frames)
            .map(|frame| nan_mean(rows.iter().map(|row| row[frame])))
            .collect()
    }
}

/// Coordinates of consecutive skeleton points over time.
///
/// `x[p][frame]` / `y[p][frame]` hold point `p` of the set.
#[derive(Clone, Debug, PartialEq)]
pub struct PointSet {
    x: Vec<FrameSeries<Sample>>,
    y: Vec<FrameSeries<Sample>>,
    n_frames: usize,
}

impl PointSet {
    /// Build a point set, checking that every coordinate row has the same length.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyPointSet`] if no point is given and
    /// [`CoreError::LengthMismatch`] on inconsistent rows.
    pub fn new(
        x: Vec<FrameSeries<Sample>>,
        y: Vec<FrameSeries<Sample>>,
    ) -> Result<Self, CoreError> {
        if x.is_empty() {
            return Err(CoreError::EmptyPointSet("x"));
        }
        if x.len() != y.len() {
            return Err(CoreError::LengthMismatch {
                what: "point set y rows",
                expected: x.len(),
                actual: y.len(),
            });
        }
        let n_frames = x[0].len();
        for row in x.iter().chain(y.iter()) {
            row.ensure_len("point coordinate row", n_frames)?;
        }
        Ok(Self { x, y, n_frames })
    }

    #[must_use]
    pub fn n_points(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    #[must_use]
    pub fn x(&self) -> &[FrameSeries<Sample>] {
        &self.x
    }

    #[must_use]
    pub fn y(&self) -> &[FrameSeries<Sample>] {
        &self.y
    }

    /// Apply `f` to every coordinate row, keeping the point layout.
    #[must_use]
    pub fn map_rows(&self, f: impl Fn(&FrameSeries<Sample>) -> FrameSeries<Sample>) -> Self {
        Self {
            x: self.x.iter().map(&f).collect(),
            y: self.y.iter().map(&f).collect(),
            n_frames: self.n_frames,
        }
    }
}

/// Moyenne des échantillons définis ; `None` si aucun.
#[must_use]
pub fn nan_mean(values: impl Iterator<Item = Sample>) -> Sample {
    let (sum, count) = values
        .flatten()
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}
