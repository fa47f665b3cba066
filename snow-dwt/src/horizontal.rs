//! Row transforms.
//!
//! Lifting families share one skeleton: split the row into its even and odd
//! samples, run the family's stages over the two halves and interleave the
//! result again. Decomposition leaves the row as `[low | high]`, which is
//! also what composition expects. Haar is a plain butterfly.

use crate::Coefficient;
use crate::lifting::apply_horizontal;
use crate::wavelet::{Family, Wavelet};

/// Padding the scratch row carries on either side of the signal.
pub const TEMP_PADDING: usize = 8;

/// The minimum scratch row length for rows of `width` samples.
pub fn temp_row_len(width: usize) -> usize {
    width + 2 * TEMP_PADDING
}

/// Undo [`decompose_row`] on `row`, interleaving the result in place.
///
/// `temp` must hold at least [`temp_row_len`]`(row.len())` elements.
#[inline(always)]
pub fn compose_row<T: Coefficient>(wavelet: Wavelet, row: &mut [T], temp: &mut [T]) {
    let family = wavelet.family();

    match wavelet {
        Wavelet::DiracHaar0 | Wavelet::DiracHaar1 => compose_haar(family, row, temp),
        _ => compose_lifting(family, row, temp),
    }
}

/// Split `row` into its low-pass and high-pass halves in place.
///
/// `temp` must hold at least [`temp_row_len`]`(row.len())` elements.
#[inline(always)]
pub fn decompose_row<T: Coefficient>(wavelet: Wavelet, row: &mut [T], temp: &mut [T]) {
    let family = wavelet.family();

    match wavelet {
        Wavelet::DiracHaar0 | Wavelet::DiracHaar1 => decompose_haar(family, row, temp),
        _ => decompose_lifting(family, row, temp),
    }
}

#[inline(always)]
fn scratch<T>(temp: &mut [T], width: usize) -> &mut [T] {
    assert!(temp.len() >= temp_row_len(width), "temp row too short");

    &mut temp[TEMP_PADDING..TEMP_PADDING + width]
}

#[inline(always)]
fn compose_lifting<T: Coefficient>(family: &Family, row: &mut [T], temp: &mut [T]) {
    let width = row.len();
    let half = width.div_ceil(2);
    let scratch = scratch(temp, width);
    scratch.copy_from_slice(row);

    let (low, high) = scratch.split_at_mut(half);

    for stage in family.horizontal {
        apply_horizontal(stage, low, high, width, false);
    }

    let round = family.round;
    let shift = family.shift;

    for (pair, (&l, &h)) in row.chunks_exact_mut(2).zip(low.iter().zip(high.iter())) {
        pair[0] = T::from_i32(l.to_i32().wrapping_add(round) >> shift);
        pair[1] = T::from_i32(h.to_i32().wrapping_add(round) >> shift);
    }

    if width & 1 == 1 {
        row[width - 1] = T::from_i32(low[half - 1].to_i32().wrapping_add(round) >> shift);
    }
}

#[inline(always)]
fn decompose_lifting<T: Coefficient>(family: &Family, row: &mut [T], temp: &mut [T]) {
    let width = row.len();
    let half = width.div_ceil(2);
    let shift = family.shift;
    let scratch = scratch(temp, width);

    {
        let (low, high) = scratch.split_at_mut(half);

        for (k, l) in low.iter_mut().enumerate() {
            *l = T::from_i32(row[2 * k].to_i32() << shift);
        }

        for (k, h) in high.iter_mut().enumerate() {
            *h = T::from_i32(row[2 * k + 1].to_i32() << shift);
        }

        for stage in family.horizontal.iter().rev() {
            apply_horizontal(stage, low, high, width, true);
        }
    }

    row.copy_from_slice(scratch);
}

#[inline(always)]
fn compose_haar<T: Coefficient>(family: &Family, row: &mut [T], temp: &mut [T]) {
    let width = row.len();
    let pairs = width / 2;
    // An odd row keeps its last low-pass sample in front of the high band.
    let half = width.div_ceil(2);
    let shift = family.shift;
    let round = family.round;
    let scratch = scratch(temp, width);

    for x in 0..pairs {
        let l = row[x].to_i32().wrapping_sub(row[x + half].to_i32().wrapping_add(1) >> 1);
        let h = row[x + half].to_i32().wrapping_add(l);

        scratch[2 * x] = T::from_i32(l.wrapping_add(round) >> shift);
        scratch[2 * x + 1] = T::from_i32(h.wrapping_add(round) >> shift);
    }

    if width & 1 == 1 {
        scratch[width - 1] = T::from_i32(row[pairs].to_i32().wrapping_add(round) >> shift);
    }

    row.copy_from_slice(scratch);
}

#[inline(always)]
fn decompose_haar<T: Coefficient>(family: &Family, row: &mut [T], temp: &mut [T]) {
    let width = row.len();
    let pairs = width / 2;
    let half = width.div_ceil(2);
    let shift = family.shift;
    let scratch = scratch(temp, width);

    for x in 0..pairs {
        let e = row[2 * x].to_i32() << shift;
        let o = row[2 * x + 1].to_i32() << shift;
        let h = o.wrapping_sub(e);

        scratch[x] = T::from_i32(e.wrapping_add(h.wrapping_add(1) >> 1));
        scratch[x + half] = T::from_i32(h);
    }

    if width & 1 == 1 {
        scratch[pairs] = T::from_i32(row[width - 1].to_i32() << shift);
    }

    row.copy_from_slice(scratch);
}
