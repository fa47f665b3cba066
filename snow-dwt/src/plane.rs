//! Row access for the orchestrators.
//!
//! Transforms address rows by level and logical row index. Row `r` of level
//! `l` is line `r << l` of the plane and covers its first `width >> l`
//! coefficients.

use crate::Coefficient;
use crate::lifting::MAX_TAPS;

/// Storage that can lend one row mutably together with several other rows.
pub(crate) trait RowStore<T: Coefficient> {
    /// Call `f` with row `target` of `level` and the rows `sources` of the
    /// same level.
    ///
    /// `sources` never contains `target` but may repeat rows.
    fn with_rows<R>(
        &mut self,
        level: usize,
        target: usize,
        sources: &[usize],
        f: impl FnOnce(&mut [T], &[&[T]]) -> R,
    ) -> R;
}

/// A plane held in one contiguous, strided buffer.
pub(crate) struct PlaneRows<'a, T> {
    buffer: &'a mut [T],
    width: usize,
    stride: usize,
}

impl<'a, T> PlaneRows<'a, T> {
    pub(crate) fn new(buffer: &'a mut [T], width: usize, stride: usize) -> Self {
        Self {
            buffer,
            width,
            stride,
        }
    }
}

impl<T: Coefficient> RowStore<T> for PlaneRows<'_, T> {
    #[inline]
    fn with_rows<R>(
        &mut self,
        level: usize,
        target: usize,
        sources: &[usize],
        f: impl FnOnce(&mut [T], &[&[T]]) -> R,
    ) -> R {
        let width = self.width >> level;
        let pitch = self.stride << level;
        let start = target * pitch;

        let (before, rest) = self.buffer.split_at_mut(start);
        let (dst, after) = rest.split_at_mut(width);

        let mut rows: [&[T]; MAX_TAPS] = [&[]; MAX_TAPS];

        for (slot, &source) in rows.iter_mut().zip(sources) {
            debug_assert_ne!(source, target);
            let offset = source * pitch;

            *slot = if source < target {
                &before[offset..offset + width]
            } else {
                let offset = offset - start - width;
                &after[offset..offset + width]
            };
        }

        f(dst, &rows[..sources.len()])
    }
}
