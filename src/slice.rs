use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo};

use crate::error::{Error, Result};

/// A start/stop/step selection of pixels with sequence-slice semantics
///
/// Negative positions count from the end, out-of-range bounds are clamped and a
/// negative step walks backwards. Missing bounds default to the whole buffer in
/// the direction of the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Slice {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl Slice {
    pub const fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Slice { start, stop, step }
    }

    /// Every pixel, front to back
    pub const fn full() -> Self {
        Slice::new(None, None, None)
    }

    pub fn step_by(self, step: isize) -> Self {
        Slice {
            step: Some(step),
            ..self
        }
    }

    /// Resolve against a sequence of `len` pixels into the concrete target indices
    pub fn indices(&self, len: usize) -> Result<SliceIndices> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(Error::value_range("slice step", 0));
        }

        let len = len as isize;
        let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };

        let clamp = |bound: Option<isize>, default: isize| match bound {
            None => default,
            Some(i) if i < 0 => (i + len).max(lower),
            Some(i) => i.min(upper),
        };
        let start = clamp(self.start, if step < 0 { upper } else { lower });
        let stop = clamp(self.stop, if step < 0 { lower } else { upper });

        let remaining = if step > 0 && start < stop {
            ((stop - start - 1) / step + 1) as usize
        } else if step < 0 && stop < start {
            ((start - stop - 1) / -step + 1) as usize
        } else {
            0
        };

        Ok(SliceIndices {
            next: start,
            step,
            remaining,
        })
    }
}

/// Ordered pixel indices selected by a [`Slice`]
#[derive(Debug, Clone)]
pub struct SliceIndices {
    next: isize,
    step: isize,
    remaining: usize,
}

impl SliceIndices {
    pub(crate) fn all(len: usize) -> Self {
        SliceIndices {
            next: 0,
            step: 1,
            remaining: len,
        }
    }
}

impl Iterator for SliceIndices {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.next as usize;
        self.next += self.step;
        self.remaining -= 1;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for SliceIndices {}

impl From<Range<isize>> for Slice {
    fn from(r: Range<isize>) -> Self {
        Slice::new(Some(r.start), Some(r.end), None)
    }
}

impl From<RangeFrom<isize>> for Slice {
    fn from(r: RangeFrom<isize>) -> Self {
        Slice::new(Some(r.start), None, None)
    }
}

impl From<RangeTo<isize>> for Slice {
    fn from(r: RangeTo<isize>) -> Self {
        Slice::new(None, Some(r.end), None)
    }
}

impl From<RangeInclusive<isize>> for Slice {
    fn from(r: RangeInclusive<isize>) -> Self {
        // ..=-1 means "through the last pixel"; isize::MAX has no successor
        let stop = match *r.end() {
            -1 => None,
            end => end.checked_add(1),
        };
        Slice::new(Some(*r.start()), stop, None)
    }
}

impl From<RangeFull> for Slice {
    fn from(_: RangeFull) -> Self {
        Slice::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(slice: impl Into<Slice>, len: usize) -> Vec<usize> {
        slice.into().indices(len).unwrap().collect()
    }

    #[test]
    fn test_forward_slices() {
        assert_eq!(resolve(.., 5), vec![0, 1, 2, 3, 4]);
        assert_eq!(resolve(1..4, 5), vec![1, 2, 3]);
        assert_eq!(resolve(Slice::from(1..5).step_by(2), 5), vec![1, 3]);
        assert_eq!(resolve(0..2, 20), vec![0, 1]);
        assert_eq!(resolve(Slice::from(0..2).step_by(2), 20), vec![0]);
    }

    #[test]
    fn test_negative_bounds() {
        assert_eq!(resolve(-2.., 5), vec![3, 4]);
        assert_eq!(resolve(..-1, 5), vec![0, 1, 2, 3]);
        assert_eq!(resolve(-3..=-1, 5), vec![2, 3, 4]);
        assert_eq!(resolve(-100..100, 3), vec![0, 1, 2]);
    }

    #[test]
    fn test_inclusive_to_max() {
        assert_eq!(resolve(1..=isize::MAX, 4), vec![1, 2, 3]);
        assert_eq!(Slice::from(0..=isize::MAX).stop, None);
    }

    #[test]
    fn test_negative_step() {
        assert_eq!(resolve(Slice::full().step_by(-1), 5), vec![4, 3, 2, 1, 0]);
        assert_eq!(resolve(Slice::full().step_by(-2), 5), vec![4, 2, 0]);
        assert_eq!(resolve(Slice::from(3..0).step_by(-1), 5), vec![3, 2, 1]);
        assert_eq!(resolve(Slice::new(Some(10), None, Some(-3)), 5), vec![4, 1]);
    }

    #[test]
    fn test_empty_slices() {
        assert!(resolve(10.., 5).is_empty());
        assert!(resolve(..-10, 5).is_empty());
        assert!(resolve(3..1, 5).is_empty());
        assert!(resolve(.., 0).is_empty());
    }

    #[test]
    fn test_exact_size() {
        let indices = Slice::from(0..10).step_by(3).indices(10).unwrap();
        assert_eq!(indices.len(), 4); // 0, 3, 6, 9
    }

    #[test]
    fn test_zero_step() {
        let err = Slice::full().step_by(0).indices(5);
        assert!(matches!(err, Err(Error::ValueRange { .. })));
    }
}
