//! Error types for wavelet sessions.

use core::fmt;

/// The main error type for wavelet transform operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DwtError {
    /// The requested configuration cannot be processed.
    Config(ConfigError),
    /// A buffer required by the session could not be allocated.
    Allocation,
}

/// Errors related to plane geometry and session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Width or height is zero.
    InvalidDimensions,
    /// The stride is smaller than the plane width.
    StrideTooSmall,
    /// The coefficient buffer cannot hold the described plane.
    BufferTooSmall,
    /// The decomposition count is zero or above the supported maximum.
    InvalidDecompositionCount,
    /// The plane is not a multiple of `2^levels` in both directions.
    UnalignedDimensions,
    /// The coarsest level would be smaller than 2x2.
    PlaneTooSmall,
    /// The wavelet cannot be composed incrementally.
    UnsupportedStreaming,
    /// The scratch row is shorter than `temp_row_len(width)`.
    TempBufferTooSmall,
    /// A bitstream wavelet index does not name a known wavelet.
    UnknownWavelet(u32),
}

impl fmt::Display for DwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::Allocation => write!(f, "failed to allocate wavelet buffers"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions => write!(f, "invalid plane dimensions"),
            Self::StrideTooSmall => write!(f, "stride is smaller than the plane width"),
            Self::BufferTooSmall => write!(f, "coefficient buffer is too small for the plane"),
            Self::InvalidDecompositionCount => write!(f, "invalid decomposition count"),
            Self::UnalignedDimensions => {
                write!(f, "plane dimensions are not divisible by 2^levels")
            }
            Self::PlaneTooSmall => write!(f, "coarsest level is smaller than 2x2"),
            Self::UnsupportedStreaming => {
                write!(f, "wavelet does not support incremental composition")
            }
            Self::TempBufferTooSmall => write!(f, "temp row buffer is too small"),
            Self::UnknownWavelet(idx) => write!(f, "unknown wavelet index {idx}"),
        }
    }
}

impl core::error::Error for DwtError {}
impl core::error::Error for ConfigError {}

impl From<ConfigError> for DwtError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Result type for wavelet transform operations.
pub type Result<T> = core::result::Result<T, DwtError>;

macro_rules! bail {
    ($err:expr) => {
        return Err($err.into())
    };
}

pub(crate) use bail;

/// Allocate a vector of `len` default coefficients, reporting failure instead of aborting.
pub(crate) fn try_alloc<T: Default + Clone>(len: usize) -> Result<alloc::vec::Vec<T>> {
    let mut v = alloc::vec::Vec::new();
    v.try_reserve_exact(len).map_err(|_| DwtError::Allocation)?;
    v.resize(len, T::default());

    Ok(v)
}
