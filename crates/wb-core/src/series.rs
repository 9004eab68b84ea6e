use std::ops::Index;

use crate::error::CoreError;

/// A single per-frame value. `None` marks a frame with no value.
///
/// Arithmetic goes through `Option` combinators (`zip`, `map`), so any
/// operation touching an undefined sample yields an undefined sample.
pub type Sample = Option<f64>;

/// Valeur stockable dans une [`FrameSeries`].
///
/// `normalized` is applied to every value entering a series. For [`Sample`]
/// it turns `Some(NaN)` into `None`, so NaN never appears as a defined value.
pub trait FrameValue: Copy {
    #[must_use]
    fn normalized(self) -> Self;
}

impl FrameValue for Sample {
    #[inline]
    fn normalized(self) -> Self {
        self.filter(|v| !v.is_nan())
    }
}

impl FrameValue for bool {
    #[inline]
    fn normalized(self) -> Self {
        self
    }
}

/// Série temporelle de longueur fixe, indexée par numéro de frame.
///
/// All series of one analysis run share the same length and are aligned by
/// frame index. A series is never mutated once handed to a caller.
///
/// # Example
/// ```
/// use wb_core::series::FrameSeries;
/// let s = FrameSeries::from_vec(vec![Some(1.0), None, Some(3.0)]);
/// assert_eq!(s.len(), 3);
/// assert_eq!(s.count_defined(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameSeries<T> {
    values: Vec<T>,
}

impl<T: FrameValue> FrameSeries<T> {
    /// Wrap an existing vector of per-frame values, normalizing each one.
    ///
    /// # Example
    /// ```
    /// use wb_core::series::FrameSeries;
    /// let s = FrameSeries::from_vec(vec![Some(f64::NAN), Some(2.0)]);
    /// assert_eq!(s.as_slice(), &[None, Some(2.0)]);
    /// ```
    #[must_use]
    pub fn from_vec(mut values: Vec<T>) -> Self {
        for v in &mut values {
            *v = v.normalized();
        }
        Self { values }
    }
}

impl<T> FrameSeries<T> {
    /// Nombre de frames.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` if the series has no frames.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, frame: usize) -> Option<&T> {
        self.values.get(frame)
    }

    /// Fail with [`CoreError::LengthMismatch`] unless the series has `expected` frames.
    ///
    /// # Errors
    /// Returns an error when the lengths differ.
    pub fn ensure_len(&self, what: &'static str, expected: usize) -> Result<(), CoreError> {
        if self.len() == expected {
            Ok(())
        } else {
            Err(CoreError::LengthMismatch {
                what,
                expected,
                actual: self.len(),
            })
        }
    }
}

impl<T> Index<usize> for FrameSeries<T> {
    type Output = T;

    #[inline]
    fn index(&self, frame: usize) -> &T {
        &self.values[frame]
    }
}

impl<T: FrameValue> FromIterator<T> for FrameSeries<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(FrameValue::normalized).collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a FrameSeries<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl FrameSeries<Sample> {
    /// A series of `len` undefined frames.
    ///
    /// # Example
    /// ```
    /// use wb_core::series::FrameSeries;
    /// let s = FrameSeries::undefined(4);
    /// assert!(s.is_all_undefined());
    /// ```
    #[must_use]
    pub fn undefined(len: usize) -> Self {
        Self {
            values: vec![None; len],
        }
    }

    /// Build from raw floats, mapping NaN to an undefined sample.
    ///
    /// # Example
    /// ```
    /// use wb_core::series::FrameSeries;
    /// let s = FrameSeries::from_nan_slice(&[1.0, f64::NAN]);
    /// assert_eq!(s.as_slice(), &[Some(1.0), None]);
    /// ```
    #[must_use]
    pub fn from_nan_slice(raw: &[f64]) -> Self {
        raw.iter().map(|&v| (!v.is_nan()).then_some(v)).collect()
    }

    /// Flatten back to raw floats, undefined samples becoming NaN.
    #[must_use]
    pub fn to_nan_vec(&self) -> Vec<f64> {
        self.values.iter().map(|v| v.unwrap_or(f64::NAN)).collect()
    }

    /// Nombre de frames définies.
    #[must_use]
    pub fn count_defined(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    #[must_use]
    pub fn is_all_undefined(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Apply `f` to every defined sample, leaving undefined samples untouched.
    #[must_use]
    pub fn map_defined(&self, f: impl Fn(f64) -> f64) -> Self {
        self.values.iter().map(|v| v.map(&f)).collect()
    }

    /// Force frames to undefined wherever `other` is undefined.
    ///
    /// Used to keep the validity masks of paired outputs identical.
    ///
    /// # Example
    /// ```
    /// use wb_core::series::FrameSeries;
    /// let a = FrameSeries::from_vec(vec![Some(1.0), Some(2.0)]);
    /// let b = FrameSeries::from_vec(vec![None, Some(5.0)]);
    /// assert_eq!(a.masked_by(&b).as_slice(), &[None, Some(2.0)]);
    /// ```
    #[must_use]
    pub fn masked_by(&self, other: &Self) -> Self {
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(v, o)| o.and(*v))
            .collect()
    }
}

impl FrameSeries<bool> {
    /// A mask of `len` frames all set to `value`.
    #[must_use]
    pub fn filled(len: usize, value: bool) -> Self {
        Self {
            values: vec![value; len],
        }
    }

    #[must_use]
    pub fn any(&self) -> bool {
        self.values.iter().any(|&v| v)
    }
}

/// Per-frame mask of frames where the pose was successfully tracked.
pub type SegmentationMask = FrameSeries<bool>;

/// Per-frame mask of frames classified as a motion pause.
pub type MotionPauseMask = FrameSeries<bool>;

/// Classe de signe d'un échantillon : -1, 0 ou +1.
#[inline]
#[must_use]
pub fn sign_class(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}
