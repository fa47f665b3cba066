//! Lifting primitives and lifting-stage descriptors.
//!
//! Every transform in this crate is a sequence of lifting stages. A stage
//! updates one polyphase component (the low-pass samples at even positions
//! or the high-pass samples at odd positions) from a weighted sum of the
//! neighboring samples of the other component. Stages are stored in
//! composition order; decomposition runs them in reverse with the opposite
//! sign.

use crate::Coefficient;

/// The polyphase component a lifting stage updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Even samples (low-pass band).
    Low,
    /// Odd samples (high-pass band).
    High,
}

/// The neighborhood a lifting stage reads from the other component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Taps {
    /// Two symmetric neighbors with a common weight.
    ///
    /// A low-pass sample `k` reads high-pass samples `k-1` and `k`, a
    /// high-pass sample `k` reads low-pass samples `k` and `k+1`.
    Pair(i32),
    /// An arbitrary run of weighted neighbors.
    ///
    /// Sample `k` reads `other[k + first + j] * coeffs[j]`.
    Wide {
        /// Offset of the first tap relative to the target sample.
        first: isize,
        /// Tap weights.
        coeffs: &'static [i32],
    },
}

/// How the prediction is combined with the target during composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiftOp {
    /// `t += (acc + add) >> shift`.
    Add,
    /// `t -= (acc + add) >> shift`.
    Sub,
    /// `t += (acc + add + 4t) >> 4`, the rearranged low-pass update of the
    /// Snow 9/7 wavelet. Its forward form is an exact division rather than a
    /// shift, see [`lift_s`].
    Scaled,
}

/// One lifting stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiftStage {
    /// The component being updated.
    pub phase: Phase,
    /// The neighbors of the other component that are read.
    pub taps: Taps,
    /// Rounding offset added before the shift.
    pub add: i32,
    /// Right shift applied to the weighted sum.
    pub shift: u32,
    /// Combine operator used during composition.
    pub op: LiftOp,
}

/// Largest number of taps any stage reads.
pub const MAX_TAPS: usize = 8;

impl LiftStage {
    pub(crate) const fn pair(phase: Phase, mul: i32, add: i32, shift: u32, op: LiftOp) -> Self {
        Self {
            phase,
            taps: Taps::Pair(mul),
            add,
            shift,
            op,
        }
    }

    pub(crate) const fn wide(
        phase: Phase,
        first: isize,
        coeffs: &'static [i32],
        add: i32,
        shift: u32,
        op: LiftOp,
    ) -> Self {
        Self {
            phase,
            taps: Taps::Wide { first, coeffs },
            add,
            shift,
            op,
        }
    }

    /// Number of rows or samples the stage reads.
    pub fn tap_count(&self) -> usize {
        match self.taps {
            Taps::Pair(_) => 2,
            Taps::Wide { coeffs, .. } => coeffs.len(),
        }
    }

    /// Offsets, in interleaved (row) coordinates, of the samples a target
    /// at an interleaved position reads.
    ///
    /// Low-pass targets sit on even rows and read odd rows, high-pass
    /// targets sit on odd rows and read even rows.
    pub fn row_offsets(&self) -> impl Iterator<Item = isize> + '_ {
        let (first, count) = match self.taps {
            Taps::Pair(_) => (if self.phase == Phase::Low { -1 } else { 0 }, 2),
            Taps::Wide { first, coeffs } => (first, coeffs.len()),
        };
        let parity = if self.phase == Phase::Low { 1 } else { -1 };

        (0..count as isize).map(move |j| 2 * (first + j) + parity)
    }

    /// Apply the stage to a single sample.
    ///
    /// `acc` is the weighted tap sum. `vertical` selects the rounding of the
    /// forward scaled update, which differs between the two directions.
    #[inline(always)]
    pub(crate) fn apply(&self, t: i32, acc: i32, forward: bool, vertical: bool) -> i32 {
        match self.op {
            LiftOp::Scaled => {
                if forward {
                    scaled_forward(t, acc, self.add, vertical)
                } else {
                    scaled_inverse(t, acc, self.add, self.shift)
                }
            }
            LiftOp::Add | LiftOp::Sub => {
                let d = acc.wrapping_add(self.add) >> self.shift;

                if (self.op == LiftOp::Add) != forward {
                    t.wrapping_add(d)
                } else {
                    t.wrapping_sub(d)
                }
            }
        }
    }
}

#[inline(always)]
fn scaled_inverse(t: i32, acc: i32, add: i32, shift: u32) -> i32 {
    t.wrapping_add(acc.wrapping_add(add).wrapping_add(t.wrapping_mul(4)) >> shift)
}

#[inline(always)]
fn scaled_forward(t: i32, acc: i32, add: i32, vertical: bool) -> i32 {
    if vertical {
        t.wrapping_mul(64)
            .wrapping_sub(acc.wrapping_mul(4))
            .wrapping_add(add.wrapping_mul(5))
            .div_euclid(80)
    } else {
        let n = t
            .wrapping_mul(-16)
            .wrapping_add(acc)
            .wrapping_add(add)
            .wrapping_add(add / 4)
            .wrapping_add(1);

        n.div_euclid(20).wrapping_neg()
    }
}

/// The arithmetic of a two-tap lifting step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiftRecipe {
    /// Weight of both neighbors.
    pub mul: i32,
    /// Rounding offset.
    pub add: i32,
    /// Right shift.
    pub shift: u32,
}

/// Run one two-tap lifting step over a polyphase component in place.
///
/// `target` holds the component being updated and `reference` the other
/// component of a signal of `width` samples. Each target sample receives
/// `(mul * (a + b) + add) >> shift` of its two neighbors, added or
/// subtracted depending on `inverse`. At an edge where only one neighbor
/// exists it is counted twice. Low-pass components are always mirrored on
/// the left, and exactly one of the components is mirrored on the right
/// depending on the parity of `width`.
#[inline(always)]
pub fn lift<T: Coefficient>(
    target: &mut [T],
    reference: &[T],
    width: usize,
    recipe: LiftRecipe,
    highpass: bool,
    inverse: bool,
) {
    lift_with(target, reference, width, highpass, |t, sum| {
        let pred = recipe.mul.wrapping_mul(sum).wrapping_add(recipe.add) >> recipe.shift;

        if inverse {
            t.wrapping_sub(pred)
        } else {
            t.wrapping_add(pred)
        }
    });
}

/// The scaled variant of [`lift`], used by the Snow 9/7 low-pass update.
///
/// The rearrangement only holds for `shift == 4`. Composition (`inverse`)
/// computes `t + ((mul * (a + b) + add + 4t) >> 4)`, decomposition the exact
/// floor division that undoes it up to rounding.
#[inline(always)]
pub fn lift_s<T: Coefficient>(
    target: &mut [T],
    reference: &[T],
    width: usize,
    recipe: LiftRecipe,
    highpass: bool,
    inverse: bool,
) {
    debug_assert_eq!(recipe.shift, 4);

    lift_with(target, reference, width, highpass, |t, sum| {
        let acc = recipe.mul.wrapping_mul(sum);

        if inverse {
            scaled_inverse(t, acc, recipe.add, recipe.shift)
        } else {
            scaled_forward(t, acc, recipe.add, false)
        }
    });
}

#[inline(always)]
fn lift_with<T: Coefficient>(
    target: &mut [T],
    reference: &[T],
    width: usize,
    highpass: bool,
    combine: impl Fn(i32, i32) -> i32,
) {
    if reference.is_empty() || target.is_empty() {
        return;
    }

    let odd = width & 1 == 1;
    let mirror_left = !highpass;
    let mirror_right = odd != highpass;
    let w = ((width >> 1) + usize::from(highpass && odd)).saturating_sub(1);

    let mut apply = |idx: usize, sum: i32| {
        target[idx] = T::from_i32(combine(target[idx].to_i32(), sum));
    };

    let mut base = 0;

    if mirror_left {
        apply(0, reference[0].to_i32().wrapping_mul(2));
        base = 1;
    }

    for i in 0..w {
        apply(
            base + i,
            reference[i].to_i32().wrapping_add(reference[i + 1].to_i32()),
        );
    }

    if mirror_right {
        apply(base + w, reference[w].to_i32().wrapping_mul(2));
    }
}

/// Run one lifting step with arbitrary taps, clamping neighbor indices to
/// the reference component.
#[inline(always)]
pub fn lift_wide<T: Coefficient>(
    target: &mut [T],
    reference: &[T],
    stage: &LiftStage,
    first: isize,
    coeffs: &[i32],
    forward: bool,
) {
    let Some(last) = reference.len().checked_sub(1) else {
        return;
    };
    let last = last as isize;

    for (k, t) in target.iter_mut().enumerate() {
        let mut acc = 0_i32;

        for (j, &c) in coeffs.iter().enumerate() {
            let idx = (k as isize + first + j as isize).clamp(0, last) as usize;
            acc = acc.wrapping_add(c.wrapping_mul(reference[idx].to_i32()));
        }

        *t = T::from_i32(stage.apply(t.to_i32(), acc, forward, false));
    }
}

/// Run `stage` horizontally over the deinterleaved halves of a signal of
/// `width` samples.
#[inline(always)]
pub(crate) fn apply_horizontal<T: Coefficient>(
    stage: &LiftStage,
    low: &mut [T],
    high: &mut [T],
    width: usize,
    forward: bool,
) {
    let highpass = stage.phase == Phase::High;
    let (target, reference) = if highpass {
        (high, &*low)
    } else {
        (low, &*high)
    };

    match stage.taps {
        Taps::Pair(mul) => {
            let recipe = LiftRecipe {
                mul,
                add: stage.add,
                shift: stage.shift,
            };

            match stage.op {
                LiftOp::Scaled => lift_s(target, reference, width, recipe, highpass, !forward),
                LiftOp::Add => lift(target, reference, width, recipe, highpass, forward),
                LiftOp::Sub => lift(target, reference, width, recipe, highpass, !forward),
            }
        }
        Taps::Wide { first, coeffs } => {
            lift_wide(target, reference, stage, first, coeffs, forward);
        }
    }
}
