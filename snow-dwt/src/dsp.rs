//! Kernel dispatch.
//!
//! Every kernel set must produce bit-identical output for the same input.
//! The SIMD set vectorizes the two-tap vertical stages with `i32x8` and runs
//! the remaining kernels as portable loops inside `fearless_simd`'s dispatch,
//! compiled for the best instruction set the CPU supports.

use crate::lifting::LiftStage;
use crate::wavelet::Wavelet;
use crate::{Coefficient, horizontal, vertical};

/// The kinds of kernel sets that can be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Plain loops compiled for the baseline target.
    Portable,
    /// Loops compiled for the instruction set detected at runtime.
    Simd,
}

/// The operations a kernel set provides.
pub trait DwtKernels {
    /// Compose one row of a level in place.
    fn horizontal_compose<T: Coefficient>(&self, wavelet: Wavelet, row: &mut [T], temp: &mut [T]);

    /// Decompose one row of a level in place.
    fn horizontal_decompose<T: Coefficient>(
        &self,
        wavelet: Wavelet,
        row: &mut [T],
        temp: &mut [T],
    );

    /// Run a vertical lifting stage in the composition direction.
    fn vertical_compose<T: Coefficient>(
        &self,
        stage: &LiftStage,
        target: &mut [T],
        sources: &[&[T]],
    );

    /// Run a vertical lifting stage in the decomposition direction.
    fn vertical_decompose<T: Coefficient>(
        &self,
        stage: &LiftStage,
        target: &mut [T],
        sources: &[&[T]],
    );
}

/// The reference kernels.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortableKernels;

impl DwtKernels for PortableKernels {
    fn horizontal_compose<T: Coefficient>(&self, wavelet: Wavelet, row: &mut [T], temp: &mut [T]) {
        horizontal::compose_row(wavelet, row, temp);
    }

    fn horizontal_decompose<T: Coefficient>(
        &self,
        wavelet: Wavelet,
        row: &mut [T],
        temp: &mut [T],
    ) {
        horizontal::decompose_row(wavelet, row, temp);
    }

    fn vertical_compose<T: Coefficient>(
        &self,
        stage: &LiftStage,
        target: &mut [T],
        sources: &[&[T]],
    ) {
        vertical::apply_stage(stage, false, target, sources);
    }

    fn vertical_decompose<T: Coefficient>(
        &self,
        stage: &LiftStage,
        target: &mut [T],
        sources: &[&[T]],
    ) {
        vertical::apply_stage(stage, true, target, sources);
    }
}

#[cfg(feature = "simd")]
mod simd {
    use super::DwtKernels;
    use crate::lifting::{LiftOp, LiftStage, Taps};
    use crate::wavelet::Wavelet;
    use crate::{Coefficient, horizontal, vertical};
    use fearless_simd::*;

    /// Kernels compiled for the detected instruction set.
    #[derive(Debug, Clone, Copy)]
    pub struct SimdKernels {
        level: Level,
    }

    impl SimdKernels {
        pub(crate) fn new() -> Self {
            Self {
                level: Level::new(),
            }
        }
    }

    impl DwtKernels for SimdKernels {
        fn horizontal_compose<T: Coefficient>(
            &self,
            wavelet: Wavelet,
            row: &mut [T],
            temp: &mut [T],
        ) {
            dispatch!(self.level, simd => compose_row_simd(simd, wavelet, row, temp));
        }

        fn horizontal_decompose<T: Coefficient>(
            &self,
            wavelet: Wavelet,
            row: &mut [T],
            temp: &mut [T],
        ) {
            dispatch!(self.level, simd => decompose_row_simd(simd, wavelet, row, temp));
        }

        fn vertical_compose<T: Coefficient>(
            &self,
            stage: &LiftStage,
            target: &mut [T],
            sources: &[&[T]],
        ) {
            dispatch!(self.level, simd => vertical_simd(simd, stage, false, target, sources));
        }

        fn vertical_decompose<T: Coefficient>(
            &self,
            stage: &LiftStage,
            target: &mut [T],
            sources: &[&[T]],
        ) {
            dispatch!(self.level, simd => vertical_simd(simd, stage, true, target, sources));
        }
    }

    #[inline(always)]
    fn compose_row_simd<S: Simd, T: Coefficient>(
        _simd: S,
        wavelet: Wavelet,
        row: &mut [T],
        temp: &mut [T],
    ) {
        horizontal::compose_row(wavelet, row, temp);
    }

    #[inline(always)]
    fn decompose_row_simd<S: Simd, T: Coefficient>(
        _simd: S,
        wavelet: Wavelet,
        row: &mut [T],
        temp: &mut [T],
    ) {
        horizontal::decompose_row(wavelet, row, temp);
    }

    const LANES: usize = 8;

    /// Two-tap stages run eight columns at a time, everything else and the
    /// trailing columns fall back to the portable loop.
    #[inline(always)]
    fn vertical_simd<S: Simd, T: Coefficient>(
        simd: S,
        stage: &LiftStage,
        forward: bool,
        target: &mut [T],
        sources: &[&[T]],
    ) {
        let Taps::Pair(mul) = stage.taps else {
            return vertical::apply_stage(stage, forward, target, sources);
        };

        // The forward scaled update is an exact division.
        if forward && stage.op == LiftOp::Scaled {
            return vertical::apply_stage(stage, forward, target, sources);
        }

        let width = target.len();
        let body = width - width % LANES;
        let (b0, b2) = (&sources[0][..width], &sources[1][..width]);
        let (head, tail) = target.split_at_mut(body);

        for ((t, a), b) in head
            .chunks_exact_mut(LANES)
            .zip(b0.chunks_exact(LANES))
            .zip(b2.chunks_exact(LANES))
        {
            let a = i32x8::from_fn(simd, |i| a[i].to_i32());
            let b = i32x8::from_fn(simd, |i| b[i].to_i32());
            let v = i32x8::from_fn(simd, |i| t[i].to_i32());
            let acc = (a + b) * mul;

            let out = match stage.op {
                LiftOp::Scaled => v + ((acc + stage.add + v * 4) >> stage.shift),
                op => {
                    let d = (acc + stage.add) >> stage.shift;

                    if (op == LiftOp::Add) != forward {
                        v + d
                    } else {
                        v - d
                    }
                }
            };

            for (t, &o) in t.iter_mut().zip(out.as_slice()) {
                *t = T::from_i32(o);
            }
        }

        vertical::apply_stage(stage, forward, tail, &[&b0[body..], &b2[body..]]);
    }
}

#[cfg(feature = "simd")]
pub use simd::SimdKernels;

#[derive(Debug, Clone, Copy)]
enum Kernels {
    Portable(PortableKernels),
    #[cfg(feature = "simd")]
    Simd(SimdKernels),
}

/// The kernel set of a session, selected once at setup.
#[derive(Debug, Clone, Copy)]
pub struct DwtDsp {
    kernels: Kernels,
}

impl DwtDsp {
    /// Select the kernels for `backend`.
    ///
    /// Without the `simd` feature every backend falls back to the portable
    /// kernels.
    pub fn new(backend: Backend) -> Self {
        let kernels = match backend {
            Backend::Portable => Kernels::Portable(PortableKernels),
            #[cfg(feature = "simd")]
            Backend::Simd => Kernels::Simd(SimdKernels::new()),
            #[cfg(not(feature = "simd"))]
            Backend::Simd => Kernels::Portable(PortableKernels),
        };

        Self { kernels }
    }

    /// Select the best kernels available on this machine.
    pub fn detect() -> Self {
        Self::new(Backend::Simd)
    }

    /// The backend that was actually selected.
    pub fn backend(&self) -> Backend {
        match self.kernels {
            Kernels::Portable(_) => Backend::Portable,
            #[cfg(feature = "simd")]
            Kernels::Simd(_) => Backend::Simd,
        }
    }
}

impl Default for DwtDsp {
    fn default() -> Self {
        Self::detect()
    }
}

macro_rules! delegate {
    ($self:ident, $k:ident => $call:expr) => {
        match &$self.kernels {
            Kernels::Portable($k) => $call,
            #[cfg(feature = "simd")]
            Kernels::Simd($k) => $call,
        }
    };
}

impl DwtKernels for DwtDsp {
    fn horizontal_compose<T: Coefficient>(&self, wavelet: Wavelet, row: &mut [T], temp: &mut [T]) {
        delegate!(self, k => k.horizontal_compose(wavelet, row, temp));
    }

    fn horizontal_decompose<T: Coefficient>(
        &self,
        wavelet: Wavelet,
        row: &mut [T],
        temp: &mut [T],
    ) {
        delegate!(self, k => k.horizontal_decompose(wavelet, row, temp));
    }

    fn vertical_compose<T: Coefficient>(
        &self,
        stage: &LiftStage,
        target: &mut [T],
        sources: &[&[T]],
    ) {
        delegate!(self, k => k.vertical_compose(stage, target, sources));
    }

    fn vertical_decompose<T: Coefficient>(
        &self,
        stage: &LiftStage,
        target: &mut [T],
        sources: &[&[T]],
    ) {
        delegate!(self, k => k.vertical_decompose(stage, target, sources));
    }
}
