//! Incremental composition.
//!
//! Each level keeps a cursor `y` and a short window of resolved row indices.
//! One advance fetches two more rows, runs the family's vertical stages at
//! fixed offsets from the cursor, horizontally composes the two rows that
//! have become final at this level and slides the window by two. Levels are
//! driven from the coarsest to the finest, and each level is only advanced
//! as far as the rows requested so far need, so output rows become
//! available progressively.

use alloc::vec::Vec;

use crate::Coefficient;
use crate::dsp::{DwtDsp, DwtKernels};
use crate::error::{ConfigError, Result, bail, try_alloc};
use crate::lifting::MAX_TAPS;
use crate::plane::{PlaneRows, RowStore};
use crate::settings::{DwtSettings, MAX_DECOMPOSITIONS};
use crate::slice_buffer::{LineSource, SliceBuffer, SlicedRows};
use crate::wavelet::{Family, Schedule};

/// Capacity of a level's row window.
pub(crate) const MAX_WINDOW: usize = 10;

/// The composition state of one decomposition level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DwtCompose {
    y: isize,
    rows: [usize; MAX_WINDOW],
    len: usize,
}

impl DwtCompose {
    fn new(family: &Family, schedule: &Schedule, height: usize) -> Self {
        let mut rows = [0; MAX_WINDOW];

        for (i, row) in rows.iter_mut().take(schedule.window).enumerate() {
            *row = family.policy.resolve(schedule.lag - 1 + i as isize, height);
        }

        Self {
            y: schedule.lag,
            rows,
            len: schedule.window,
        }
    }

    /// The next row this level will help produce.
    pub fn y(&self) -> isize {
        self.y
    }

    /// Rows currently held by the window, oldest first.
    pub fn window(&self) -> &[usize] {
        &self.rows[..self.len]
    }

    fn push(&mut self, row: usize) {
        self.rows[self.len] = row;
        self.len += 1;
    }

    fn slide(&mut self) {
        self.rows.copy_within(2..self.len, 0);
        self.len -= 2;
        self.y += 2;
    }
}

/// The scheduling state shared by the direct and buffered sessions.
#[derive(Debug, Clone)]
struct Scheduler {
    settings: DwtSettings,
    family: &'static Family,
    schedule: Schedule,
    dsp: DwtDsp,
    levels: [DwtCompose; MAX_DECOMPOSITIONS],
}

impl Scheduler {
    fn new(settings: DwtSettings, dsp: DwtDsp) -> Result<Self> {
        settings.validate()?;

        let family = settings.wavelet.family();

        let Some(schedule) = family.schedule else {
            lwarn!("{:?} cannot be composed incrementally", settings.wavelet);
            bail!(ConfigError::UnsupportedStreaming);
        };

        let mut levels = [DwtCompose {
            y: 0,
            rows: [0; MAX_WINDOW],
            len: 0,
        }; MAX_DECOMPOSITIONS];

        for (level, state) in levels
            .iter_mut()
            .enumerate()
            .take(settings.decompositions)
        {
            *state = DwtCompose::new(family, &schedule, settings.height >> level);
        }

        ldebug!(
            "composing {:?} over {}x{} (stride {}) with {} levels on {:?} kernels",
            settings.wavelet,
            settings.width,
            settings.height,
            settings.stride,
            settings.decompositions,
            dsp.backend()
        );

        Ok(Self {
            settings,
            family,
            schedule,
            dsp,
            levels,
        })
    }

    fn levels(&self) -> &[DwtCompose] {
        &self.levels[..self.settings.decompositions]
    }

    fn is_finished(&self) -> bool {
        self.levels()
            .iter()
            .enumerate()
            .all(|(level, state)| state.y > (self.settings.height >> level) as isize)
    }

    /// Advance every level far enough for rows up to `y_target` to be final.
    fn slice<T: Coefficient>(
        &mut self,
        store: &mut impl RowStore<T>,
        temp: &mut [T],
        y_target: usize,
    ) {
        ltrace!("advancing to row {}", y_target);

        for level in (0..self.settings.decompositions).rev() {
            let height = self.settings.height >> level;
            let limit = (y_target >> level)
                .saturating_add(self.schedule.support)
                .min(height) as isize;

            while self.levels[level].y <= limit {
                self.step(store, temp, level);
            }

            ltrace!("level {} cursor at {}", level, self.levels[level].y);
        }
    }

    fn step<T: Coefficient>(&mut self, store: &mut impl RowStore<T>, temp: &mut [T], level: usize) {
        let height = self.settings.height >> level;
        let wavelet = self.settings.wavelet;
        let dsp = &self.dsp;
        let family = self.family;
        let state = &mut self.levels[level];

        let y = state.y;
        let k = self.schedule.window as isize;
        state.push(family.policy.resolve(y + k - 1, height));
        state.push(family.policy.resolve(y + k, height));

        for (stage, &offset) in family.vertical.iter().zip(self.schedule.passes) {
            let target = y + offset;

            if target < 0 || target >= height as isize {
                continue;
            }

            let slot = (target - (y - 1)) as usize;
            debug_assert_eq!(state.rows[slot], target as usize);

            let mut sources = [0; MAX_TAPS];
            let mut count = 0;

            for offset in stage.row_offsets() {
                sources[count] = state.rows[(slot as isize + offset) as usize];
                count += 1;
            }

            store.with_rows(level, target as usize, &sources[..count], |dst, rows| {
                dsp.vertical_compose(stage, dst, rows);
            });
        }

        for row in [y - 1, y] {
            if row >= 0 && row < height as isize {
                store.with_rows(level, row as usize, &[], |dst, _| {
                    dsp.horizontal_compose(wavelet, dst, temp);
                });
            }
        }

        state.slide();
    }
}

/// An incremental inverse transform over a plane held in one buffer.
///
/// After [`DwtContext::slice`]`(y)` returns, every row up to and including
/// `y` holds its final value.
#[derive(Debug)]
pub struct DwtContext<'a, T> {
    plane: &'a mut [T],
    temp: Vec<T>,
    scheduler: Scheduler,
}

impl<'a, T: Coefficient> DwtContext<'a, T> {
    /// Start composing the decomposed plane in `plane`.
    pub fn new(plane: &'a mut [T], settings: DwtSettings, dsp: DwtDsp) -> Result<Self> {
        let scheduler = Scheduler::new(settings, dsp)?;
        let temp = try_alloc(settings.temp_len())?;
        settings.check_buffers(plane.len(), temp.len())?;

        Ok(Self {
            plane,
            temp,
            scheduler,
        })
    }

    /// Compose until every row up to `y_target` is final.
    ///
    /// Targets below an earlier target do nothing.
    pub fn slice(&mut self, y_target: usize) {
        let settings = &self.scheduler.settings;
        let mut rows = PlaneRows::new(&mut *self.plane, settings.width, settings.stride);

        self.scheduler.slice(&mut rows, &mut self.temp, y_target);
    }

    /// Compose the rest of the plane.
    pub fn finish(&mut self) {
        self.slice(self.scheduler.settings.height);
    }

    /// Whether every level has been composed completely.
    pub fn is_finished(&self) -> bool {
        self.scheduler.is_finished()
    }

    /// The per-level composition states.
    pub fn levels(&self) -> &[DwtCompose] {
        self.scheduler.levels()
    }

    /// The plane being composed.
    pub fn plane(&self) -> &[T] {
        &*self.plane
    }

    /// The plane being composed, for adding predictions to rows that are not
    /// final yet.
    pub fn plane_mut(&mut self) -> &mut [T] {
        &mut *self.plane
    }

    /// The settings of the session.
    pub fn settings(&self) -> &DwtSettings {
        &self.scheduler.settings
    }
}

/// An incremental inverse transform that holds only a window of lines.
///
/// Lines are loaded from a [`LineSource`] when the composition first touches
/// them and handed to the caller, then released, as soon as they are final.
#[derive(Debug)]
pub struct BufferedIdwt<T, S> {
    buffer: SliceBuffer<T>,
    source: S,
    temp: Vec<T>,
    scheduler: Scheduler,
    rows_per_slice: usize,
    /// Rows below this have been handed out and released.
    emitted: usize,
}

impl<T: Coefficient, S: LineSource<T>> BufferedIdwt<T, S> {
    /// Start a session that advances at most `rows_per_slice` rows at a time.
    ///
    /// The slice buffer is sized with [`Wavelet::slice_buffer_lines`].
    ///
    /// [`Wavelet::slice_buffer_lines`]: crate::Wavelet::slice_buffer_lines
    pub fn new(settings: DwtSettings, dsp: DwtDsp, source: S, rows_per_slice: usize) -> Result<Self> {
        let scheduler = Scheduler::new(settings, dsp)?;
        let rows_per_slice = rows_per_slice.max(1);

        let Some(lines) = settings
            .wavelet
            .slice_buffer_lines(settings.decompositions, rows_per_slice)
        else {
            bail!(ConfigError::UnsupportedStreaming);
        };

        let buffer = SliceBuffer::new(settings.height, lines, settings.width)?;
        let temp = try_alloc(settings.temp_len())?;

        ldebug!("slice buffer holds {} of {} lines", lines, settings.height);

        Ok(Self {
            buffer,
            source,
            temp,
            scheduler,
            rows_per_slice,
            emitted: 0,
        })
    }

    /// Compose until every row below `y_target` is final and pass those
    /// rows to `sink` in order.
    ///
    /// Each row is handed out exactly once and its line is released right
    /// after. Targets at or below an earlier target do nothing.
    pub fn advance(&mut self, y_target: usize, mut sink: impl FnMut(usize, &[T])) {
        let height = self.scheduler.settings.height;
        let y_target = y_target.min(height);

        while self.emitted < y_target {
            let next = (self.emitted + self.rows_per_slice).min(y_target);

            let mut rows = SlicedRows {
                buffer: &mut self.buffer,
                source: &mut self.source,
                width: self.scheduler.settings.width,
            };
            self.scheduler.slice(&mut rows, &mut self.temp, next);

            for line in self.emitted..next {
                if let Some(row) = self.buffer.get(line) {
                    sink(line, row);
                    self.buffer.release(line);
                }
            }

            self.emitted = next;
        }
    }

    /// Compose and hand out every remaining row.
    pub fn finish(&mut self, sink: impl FnMut(usize, &[T])) {
        self.advance(self.scheduler.settings.height, sink);
    }

    /// The line `line`, loading it if needed.
    ///
    /// Lets the caller add predictions to rows that are not final yet.
    ///
    /// # Panics
    /// Panics if `line` was already handed out.
    pub fn get_or_load(&mut self, line: usize) -> &mut [T] {
        assert!(line >= self.emitted, "line {line} was already released");

        self.buffer.get_or_load(line, &mut self.source)
    }

    /// Rows below this index have been handed out.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Whether every level has been composed completely.
    pub fn is_finished(&self) -> bool {
        self.scheduler.is_finished()
    }

    /// The per-level composition states.
    pub fn levels(&self) -> &[DwtCompose] {
        self.scheduler.levels()
    }

    /// The underlying slice buffer.
    pub fn slice_buffer(&self) -> &SliceBuffer<T> {
        &self.buffer
    }
}

/// Compose a whole plane with the incremental scheduler.
pub(crate) fn compose_plane<T: Coefficient>(
    buffer: &mut [T],
    temp: &mut [T],
    settings: &DwtSettings,
    dsp: DwtDsp,
) -> Result<()> {
    let mut scheduler = Scheduler::new(*settings, dsp)?;
    let mut rows = PlaneRows::new(buffer, settings.width, settings.stride);
    scheduler.slice(&mut rows, temp, settings.height);

    Ok(())
}
