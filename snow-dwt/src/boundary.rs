//! Row and sample index extension at plane edges.

/// Reflect `v` into `[0, m]`.
///
/// Out-of-range indices are negated and, if still negative, shifted by
/// `2m`, until they land inside the range. `m == 0` always yields 0.
#[inline]
pub fn mirror(mut v: isize, m: isize) -> isize {
    if m <= 0 {
        return 0;
    }

    while v < 0 || v > m {
        v = -v;

        if v < 0 {
            v += 2 * m;
        }
    }

    v
}

/// Saturate `v` into `[lo, hi]`.
#[inline]
pub fn clip(v: isize, lo: isize, hi: isize) -> isize {
    v.max(lo).min(hi)
}

/// How a wavelet family resolves rows outside the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// Whole-sample symmetric reflection around the first and last row.
    Mirror,
    /// Clamp to the nearest row of the same parity.
    ///
    /// Even rows hold low-pass samples and odd rows hold high-pass samples,
    /// so even indices saturate into `[0, len-2]` and odd indices into
    /// `[1, len-1]`.
    Clip,
}

impl BoundaryPolicy {
    /// Map a possibly out-of-range row index onto a row of a level with
    /// `len` rows.
    #[inline]
    pub fn resolve(self, row: isize, len: usize) -> usize {
        let last = len as isize - 1;

        let resolved = match self {
            Self::Mirror => mirror(row, last),
            Self::Clip => {
                if row & 1 == 0 {
                    clip(row, 0, (last - 1).max(0))
                } else {
                    clip(row, 1.min(last), last)
                }
            }
        };

        resolved.max(0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_reflects_both_edges() {
        let got: Vec<isize> = (-5..=12).map(|v| mirror(v, 7)).collect();
        assert_eq!(
            got,
            [5, 4, 3, 2, 1, 0, 1, 2, 3, 4, 5, 6, 7, 6, 5, 4, 3, 2]
        );
    }

    #[test]
    fn mirror_degenerate_range() {
        assert_eq!(mirror(-3, 0), 0);
        assert_eq!(mirror(4, 0), 0);
    }

    #[test]
    fn mirror_far_outside() {
        assert_eq!(mirror(-20, 3), 2);
        assert_eq!(mirror(20, 3), 2);
    }

    #[test]
    fn clip_saturates() {
        assert_eq!(clip(-4, 0, 9), 0);
        assert_eq!(clip(12, 0, 9), 9);
        assert_eq!(clip(5, 0, 9), 5);
    }

    #[test]
    fn clip_policy_keeps_parity() {
        let got: Vec<usize> = (-6..12).map(|r| BoundaryPolicy::Clip.resolve(r, 8)).collect();
        assert_eq!(
            got,
            [0, 1, 0, 1, 0, 1, 0, 1, 2, 3, 4, 5, 6, 7, 6, 7, 6, 7]
        );
    }

    #[test]
    fn mirror_policy_reflects() {
        let got: Vec<usize> = (-6..12)
            .map(|r| BoundaryPolicy::Mirror.resolve(r, 8))
            .collect();
        assert_eq!(
            got,
            [6, 5, 4, 3, 2, 1, 0, 1, 2, 3, 4, 5, 6, 7, 6, 5, 4, 3]
        );
    }
}
