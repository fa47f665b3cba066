//! Coefficient storage types.

use core::fmt::Debug;

/// A signed integer type that can store wavelet coefficients.
///
/// All kernel arithmetic happens in wrapping 32-bit integers. Results are
/// narrowed back into the storage type by wrapping truncation, so `i16`
/// planes behave exactly like 16-bit integer promotion would.
pub trait Coefficient: Copy + Default + PartialEq + Debug + Send + Sync + 'static {
    /// Widen to the arithmetic domain.
    fn to_i32(self) -> i32;
    /// Narrow from the arithmetic domain, wrapping on overflow.
    fn from_i32(value: i32) -> Self;
}

impl Coefficient for i16 {
    #[inline(always)]
    fn to_i32(self) -> i32 {
        i32::from(self)
    }

    #[inline(always)]
    fn from_i32(value: i32) -> Self {
        value as Self
    }
}

impl Coefficient for i32 {
    #[inline(always)]
    fn to_i32(self) -> i32 {
        self
    }

    #[inline(always)]
    fn from_i32(value: i32) -> Self {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrowing_wraps() {
        assert_eq!(i16::from_i32(32768), -32768);
        assert_eq!(i16::from_i32(-32769), 32767);
        assert_eq!(i16::from_i32(-5).to_i32(), -5);
        assert_eq!(i32::from_i32(i32::MIN), i32::MIN);
    }
}
