//! Fenêtres bornées par les passages par zéro.
//!
//! Every frame is bracketed by the nearest sign change behind and ahead of
//! it; the bracket is widened crossing by crossing until it spans the minimum
//! duration, then centered on the frame by mirroring the longer side.

use wb_core::series::{FrameSeries, Sample, sign_class};

/// A window centered on `center`, covering `[center − half, center + half]`.
///
/// # Example
/// ```
/// use wb_dsp::zero_crossing::Window;
/// let w = Window { center: 10, half: 3 };
/// assert_eq!(w.len(), 7);
/// assert_eq!(w.bounds(20), Some((7, 13)));
/// assert_eq!(w.bounds(12), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub center: usize,
    pub half: usize,
}

impl Window {
    /// Nombre d'échantillons couverts (`2·half + 1`).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        2 * self.half + 1
    }

    /// A window always covers at least its center frame.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Inclusive `(left, right)` frame bounds, or `None` if the window leaves
    /// a series of `n_frames` frames.
    #[must_use]
    pub fn bounds(&self, n_frames: usize) -> Option<(usize, usize)> {
        let left = self.center.checked_sub(self.half)?;
        let right = self.center + self.half;
        (right < n_frames).then_some((left, right))
    }
}

/// Table monotone des passages par zéro d'un signal.
///
/// `changes[j] = k` means the sign class differs between frames `k` and
/// `k + 1`, both defined. `before[i]` counts the changes with `k < i`, so
/// the back crossing of frame `i` is `changes[before[i] − 1]` and its front
/// crossing is `changes[before[i]] + 1`.
#[derive(Clone, Debug)]
pub struct CrossingTable {
    changes: Vec<usize>,
    before: Vec<usize>,
}

impl CrossingTable {
    /// Single cumulative pass over the signal.
    #[must_use]
    pub fn new(signal: &FrameSeries<Sample>) -> Self {
        let values = signal.as_slice();
        let changes: Vec<usize> = values
            .windows(2)
            .enumerate()
            .filter_map(|(k, pair)| match (pair[0], pair[1]) {
                (Some(a), Some(b)) if sign_class(a) != sign_class(b) => Some(k),
                _ => None,
            })
            .collect();

        let mut before = vec![0usize; values.len()];
        let mut seen = 0usize;
        let mut next = changes.iter().peekable();
        for (i, slot) in before.iter_mut().enumerate() {
            while next.next_if(|&&k| k < i).is_some() {
                seen += 1;
            }
            *slot = seen;
        }

        Self { changes, before }
    }

    /// Expand the crossings around `frame` until they span `min_window`
    /// frames, then center the result.
    ///
    /// Returns `None` when no crossing exists on a side that needs one.
    #[must_use]
    pub fn window_for(&self, frame: usize, min_window: usize) -> Option<Window> {
        let seen = *self.before.get(frame)?;
        if seen == 0 || seen >= self.changes.len() {
            return None;
        }

        let mut back_idx = seen - 1;
        let mut front_idx = seen;
        let mut back = self.changes[back_idx];
        let mut front = self.changes[front_idx] + 1;

        while front - back + 1 < min_window {
            if frame - back < front - frame {
                back_idx = back_idx.checked_sub(1)?;
                back = self.changes[back_idx];
            } else {
                front_idx += 1;
                front = *self.changes.get(front_idx)? + 1;
            }
        }

        Some(Window {
            center: frame,
            half: (frame - back).max(front - frame),
        })
    }
}

/// Resolve a window for every frame of `signal`.
///
/// # Example
/// ```
/// use wb_core::series::FrameSeries;
/// use wb_dsp::zero_crossing::bound_windows;
/// let s = FrameSeries::from_vec([1.0, 1.0, -1.0, -1.0, 1.0, 1.0].map(Some).to_vec());
/// let windows = bound_windows(&s, 1);
/// assert!(windows[0].is_none());
/// assert_eq!(windows[2].map(|w| w.half), Some(2));
/// ```
#[must_use]
pub fn bound_windows(signal: &FrameSeries<Sample>, min_window: usize) -> Vec<Option<Window>> {
    let table = CrossingTable::new(signal);
    (0..signal.len())
        .map(|frame| table.window_for(frame, min_window))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(values: &[f64]) -> FrameSeries<Sample> {
        FrameSeries::from_nan_slice(values)
    }

    #[test]
    fn crossings_ignore_undefined_neighbours() {
        let nan = f64::NAN;
        let table = CrossingTable::new(&signal(&[1.0, nan, -1.0, -1.0, 2.0]));
        assert_eq!(table.changes, vec![3]);
        assert_eq!(table.before, vec![0, 0, 0, 0, 1]);
    }

    #[test]
    fn zero_is_its_own_sign_class() {
        let table = CrossingTable::new(&signal(&[1.0, 0.0, -1.0]));
        assert_eq!(table.changes, vec![0, 1]);
    }

    #[test]
    fn frame_without_both_crossings_is_invalid() {
        // Un seul changement de signe : aucune frame n'est encadrée.
        let s = signal(&[1.0, 1.0, 1.0, -1.0, -1.0, -1.0]);
        assert!(bound_windows(&s, 1).iter().all(Option::is_none));
    }

    #[test]
    fn window_is_centered_on_larger_side() {
        // Changements entre 1|2 et 6|7.
        let s = signal(&[1.0, 1.0, -1.0, -1.0, -1.0, -1.0, -1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        let windows = bound_windows(&s, 1);
        // Frame 3 : back = 1 (distance 2), front = 7 (distance 4).
        assert_eq!(windows[3], Some(Window { center: 3, half: 4 }));
        // Frame 5 : back = 1 (distance 4), front = 7 (distance 2).
        assert_eq!(windows[5], Some(Window { center: 5, half: 4 }));
    }

    #[test]
    fn short_bracket_expands_to_next_crossing() {
        // Alternance rapide puis longues plages.
        let s = signal(&[
            1.0, 1.0, 1.0, 1.0, -1.0, 1.0, -1.0, -1.0, -1.0, -1.0, 1.0, 1.0,
        ]);
        // Frame 5 : crossings 4|5 and 5|6 give back = 4, front = 6 (span 3).
        let tight = bound_windows(&s, 3);
        assert_eq!(tight[5], Some(Window { center: 5, half: 1 }));
        // Avec min 6 : gauche (dist 1) vs droite (dist 1) -> droite d'abord,
        // front = 10 (span 7).
        let wide = bound_windows(&s, 6);
        assert_eq!(wide[5], Some(Window { center: 5, half: 5 }));
    }

    #[test]
    fn expansion_stops_when_crossings_run_out() {
        // Two changes only: the only bracketed frames cannot reach span 10.
        let s = signal(&[1.0, 1.0, -1.0, -1.0, 1.0, 1.0]);
        let windows = bound_windows(&s, 10);
        assert!(windows.iter().all(Option::is_none));
    }

    #[test]
    fn resolved_windows_meet_minimum_span() {
        let values: Vec<f64> = (0..200)
            .map(|i| (f64::from(i) * 0.37).sin() + 0.2 * (f64::from(i) * 1.7).cos())
            .collect();
        let s = signal(&values);
        for min_window in [3, 8, 15] {
            for w in bound_windows(&s, min_window).into_iter().flatten() {
                assert!(w.len() >= min_window, "{w:?} < {min_window}");
            }
        }
    }
}
