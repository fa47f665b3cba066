//! Column transforms.
//!
//! A vertical stage updates one row from a set of rows of the other parity.
//! Boundary handling happens before the call, when the orchestrator resolves
//! which rows to pass in, so the kernels are plain loops over columns.

use crate::Coefficient;
use crate::lifting::{LiftStage, Taps};

/// Apply `stage` to every column of `target`.
///
/// `sources` holds one row per tap in tap order. Only the first
/// `target.len()` columns of each source are read.
#[inline(always)]
pub(crate) fn apply_stage<T: Coefficient>(
    stage: &LiftStage,
    forward: bool,
    target: &mut [T],
    sources: &[&[T]],
) {
    debug_assert_eq!(sources.len(), stage.tap_count());

    match stage.taps {
        Taps::Pair(mul) => {
            let (b0, b2) = (&sources[0][..target.len()], &sources[1][..target.len()]);

            for ((t, &a), &b) in target.iter_mut().zip(b0).zip(b2) {
                let acc = mul.wrapping_mul(a.to_i32().wrapping_add(b.to_i32()));
                *t = T::from_i32(stage.apply(t.to_i32(), acc, forward, true));
            }
        }
        Taps::Wide { coeffs, .. } => {
            for (i, t) in target.iter_mut().enumerate() {
                let acc = coeffs
                    .iter()
                    .zip(sources)
                    .fold(0_i32, |acc, (&c, row)| {
                        acc.wrapping_add(c.wrapping_mul(row[i].to_i32()))
                    });

                *t = T::from_i32(stage.apply(t.to_i32(), acc, forward, true));
            }
        }
    }
}
