//! A bounded cache of plane lines for incremental composition.
//!
//! Only a window of lines around the composition cursor is ever needed, so a
//! slice buffer keeps a fixed pool of line buffers and lends them to lines
//! on first use. A line is filled from a [`LineSource`] when it is
//! materialized and returns its buffer to the pool when it is released.

use alloc::vec::Vec;

use crate::Coefficient;
use crate::error::{DwtError, Result, try_alloc};
use crate::lifting::MAX_TAPS;
use crate::plane::RowStore;

/// Produces the coefficients of a line when it is first materialized.
pub trait LineSource<T> {
    /// Fill `dst` with the coefficients of `line`.
    fn load(&mut self, line: usize, dst: &mut [T]);
}

impl<T, F: FnMut(usize, &mut [T])> LineSource<T> for F {
    fn load(&mut self, line: usize, dst: &mut [T]) {
        self(line, dst);
    }
}

/// A fixed pool of line buffers indexed by plane line.
#[derive(Debug)]
pub struct SliceBuffer<T> {
    line_width: usize,
    /// Pool slot of every materialized line.
    lines: Vec<Option<usize>>,
    pool: Vec<Vec<T>>,
    /// Pool slots not assigned to any line.
    free: Vec<usize>,
}

impl<T: Coefficient> SliceBuffer<T> {
    /// Allocate `max_allocated_lines` buffers of `line_width` coefficients for
    /// a plane of `line_count` lines.
    ///
    /// Either every buffer is allocated or none is kept.
    pub fn new(line_count: usize, max_allocated_lines: usize, line_width: usize) -> Result<Self> {
        let lines = try_alloc::<Option<usize>>(line_count)?;

        let mut pool = Vec::new();
        pool.try_reserve_exact(max_allocated_lines)
            .map_err(|_| DwtError::Allocation)?;

        for _ in 0..max_allocated_lines {
            pool.push(try_alloc(line_width)?);
        }

        let mut free = try_alloc::<usize>(max_allocated_lines)?;
        // Hand out low slots first.
        for (slot, entry) in free.iter_mut().rev().enumerate() {
            *entry = slot;
        }

        Ok(Self {
            line_width,
            lines,
            pool,
            free,
        })
    }

    /// The buffer of `line`, loading it from `source` if it is not
    /// materialized yet.
    ///
    /// # Panics
    /// Panics if the line is out of range or if every buffer is in use.
    pub fn get_or_load(&mut self, line: usize, source: &mut impl LineSource<T>) -> &mut [T] {
        let slot = self.materialize(line, source);

        &mut self.pool[slot]
    }

    /// The buffer of `line` if it is materialized.
    pub fn get(&self, line: usize) -> Option<&[T]> {
        self.lines
            .get(line)
            .copied()
            .flatten()
            .map(|slot| self.pool[slot].as_slice())
    }

    /// Whether `line` currently holds a buffer.
    pub fn is_materialized(&self, line: usize) -> bool {
        self.get(line).is_some()
    }

    /// Return the buffer of `line` to the pool.
    ///
    /// # Panics
    /// Panics if the line is not materialized.
    pub fn release(&mut self, line: usize) {
        let slot = self.lines[line]
            .take()
            .unwrap_or_else(|| panic!("line {line} is not materialized"));

        self.free.push(slot);
    }

    /// Release every materialized line.
    pub fn flush(&mut self) {
        for entry in &mut self.lines {
            if let Some(slot) = entry.take() {
                self.free.push(slot);
            }
        }
    }

    /// Number of lines currently holding a buffer.
    pub fn materialized_count(&self) -> usize {
        self.lines.iter().filter(|l| l.is_some()).count()
    }

    /// Number of buffers not assigned to any line.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Size of the buffer pool.
    pub fn max_allocated_lines(&self) -> usize {
        self.pool.len()
    }

    /// Number of lines of the plane.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Coefficients per line.
    pub fn line_width(&self) -> usize {
        self.line_width
    }

    fn materialize(&mut self, line: usize, source: &mut impl LineSource<T>) -> usize {
        if let Some(slot) = self.lines[line] {
            return slot;
        }

        let slot = self
            .free
            .pop()
            .unwrap_or_else(|| panic!("slice buffer exhausted while loading line {line}"));

        let buf = &mut self.pool[slot];
        buf.fill(T::default());
        source.load(line, buf);
        self.lines[line] = Some(slot);

        slot
    }
}

/// Rows of a plane resolved through a slice buffer.
pub(crate) struct SlicedRows<'a, T, S> {
    pub(crate) buffer: &'a mut SliceBuffer<T>,
    pub(crate) source: &'a mut S,
    pub(crate) width: usize,
}

impl<T: Coefficient, S: LineSource<T>> RowStore<T> for SlicedRows<'_, T, S> {
    fn with_rows<R>(
        &mut self,
        level: usize,
        target: usize,
        sources: &[usize],
        f: impl FnOnce(&mut [T], &[&[T]]) -> R,
    ) -> R {
        let width = self.width >> level;
        let target = self.buffer.materialize(target << level, &mut *self.source);

        let mut slots = [0; MAX_TAPS];

        for (slot, &source) in slots.iter_mut().zip(sources) {
            *slot = self.buffer.materialize(source << level, &mut *self.source);
        }

        let (before, rest) = self.buffer.pool.split_at_mut(target);
        let (dst, after) = rest.split_at_mut(1);
        let dst = &mut dst[0];

        let mut rows: [&[T]; MAX_TAPS] = [&[]; MAX_TAPS];

        for (row, &slot) in rows.iter_mut().zip(&slots[..sources.len()]) {
            debug_assert_ne!(slot, target);

            *row = if slot < target {
                &before[slot][..width]
            } else {
                &after[slot - target - 1][..width]
            };
        }

        f(&mut dst[..width], &rows[..sources.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(line: usize, dst: &mut [i32]) {
        for (i, v) in dst.iter_mut().enumerate() {
            *v = (line * 100 + i) as i32;
        }
    }

    fn balanced(buffer: &SliceBuffer<i32>) -> bool {
        buffer.materialized_count() + buffer.free_count() == buffer.max_allocated_lines()
    }

    #[test]
    fn loads_on_first_use_only() {
        let mut buffer = SliceBuffer::new(8, 3, 4).unwrap();
        let mut loads = 0;
        let mut counting = |line: usize, dst: &mut [i32]| {
            loads += 1;
            source(line, dst);
        };

        assert_eq!(buffer.get_or_load(5, &mut counting), [500, 501, 502, 503]);
        buffer.get_or_load(5, &mut counting)[0] = -7;
        assert_eq!(buffer.get(5), Some(&[-7, 501, 502, 503][..]));
        assert_eq!(loads, 1);
        assert!(balanced(&buffer));
    }

    #[test]
    fn release_recycles_buffers() {
        let mut buffer = SliceBuffer::new(8, 2, 4).unwrap();
        let mut src = source;

        buffer.get_or_load(0, &mut src);
        buffer.get_or_load(1, &mut src);
        assert_eq!(buffer.free_count(), 0);

        buffer.release(0);
        assert!(!buffer.is_materialized(0));
        assert_eq!(buffer.get_or_load(2, &mut src), [200, 201, 202, 203]);
        assert!(balanced(&buffer));
    }

    #[test]
    fn flush_is_idempotent() {
        let mut buffer = SliceBuffer::new(8, 4, 2).unwrap();
        let mut src = source;

        for line in [1, 3, 6] {
            buffer.get_or_load(line, &mut src);
        }

        buffer.flush();
        assert_eq!(buffer.materialized_count(), 0);
        assert_eq!(buffer.free_count(), 4);

        buffer.flush();
        assert_eq!(buffer.materialized_count(), 0);
        assert_eq!(buffer.free_count(), 4);
        assert!(balanced(&buffer));
    }

    #[test]
    #[should_panic(expected = "slice buffer exhausted")]
    fn exhaustion_panics() {
        let mut buffer = SliceBuffer::new(8, 2, 4).unwrap();
        let mut src = source;

        for line in 0..3 {
            buffer.get_or_load(line, &mut src);
        }
    }

    #[test]
    #[should_panic(expected = "not materialized")]
    fn releasing_unknown_line_panics() {
        let mut buffer = SliceBuffer::<i32>::new(8, 2, 4).unwrap();
        buffer.release(3);
    }

    #[test]
    fn sliced_rows_lend_lines() {
        let mut buffer = SliceBuffer::new(8, 6, 4).unwrap();
        let mut src = source;
        let mut rows = SlicedRows {
            buffer: &mut buffer,
            source: &mut src,
            width: 4,
        };

        rows.with_rows(1, 1, &[0, 2], |dst, sources| {
            assert_eq!(dst, [200, 201]);
            assert_eq!(sources[0], [0, 1]);
            assert_eq!(sources[1], [400, 401]);
            dst[1] = 0;
        });

        assert_eq!(buffer.materialized_count(), 3);
        assert_eq!(buffer.get(2), Some(&[200, 0, 202, 203][..]));
    }
}
