//! Plane geometry and session configuration.

use crate::error::{ConfigError, Result, bail};
use crate::horizontal::temp_row_len;
use crate::wavelet::Wavelet;

/// The maximum number of decomposition levels.
pub const MAX_DECOMPOSITIONS: usize = 8;

/// Geometry and filter choice of one plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DwtSettings {
    /// Plane width in coefficients.
    pub width: usize,
    /// Plane height in rows.
    pub height: usize,
    /// Distance between the starts of two rows, in coefficients.
    pub stride: usize,
    /// The filter bank.
    pub wavelet: Wavelet,
    /// Number of decomposition levels.
    pub decompositions: usize,
}

impl DwtSettings {
    /// Settings for a tightly packed plane.
    pub fn new(width: usize, height: usize, wavelet: Wavelet, decompositions: usize) -> Self {
        Self {
            width,
            height,
            stride: width,
            wavelet,
            decompositions,
        }
    }

    /// Use `stride` instead of the plane width as row pitch.
    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    /// Check that every level of the plane can be processed.
    pub fn validate(&self) -> Result<()> {
        let result = self.check();

        if let Err(e) = result {
            lwarn!("rejecting {}x{} plane: {}", self.width, self.height, e);
        }

        result
    }

    fn check(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!(ConfigError::InvalidDimensions);
        }

        if self.stride < self.width {
            bail!(ConfigError::StrideTooSmall);
        }

        if self.decompositions == 0 || self.decompositions > MAX_DECOMPOSITIONS {
            bail!(ConfigError::InvalidDecompositionCount);
        }

        let coarsest = self.decompositions - 1;

        if (self.width >> coarsest) < 2 || (self.height >> coarsest) < 2 {
            bail!(ConfigError::PlaneTooSmall);
        }

        if self.wavelet.is_dirac() {
            let mask = (1 << self.decompositions) - 1;

            if self.width & mask != 0 || self.height & mask != 0 {
                bail!(ConfigError::UnalignedDimensions);
            }
        }

        Ok(())
    }

    /// The number of elements a buffer holding this plane needs.
    pub fn buffer_len(&self) -> usize {
        (self.height - 1) * self.stride + self.width
    }

    /// The scratch row length transforms of this plane need.
    pub fn temp_len(&self) -> usize {
        temp_row_len(self.width)
    }

    pub(crate) fn check_buffers(&self, buffer: usize, temp: usize) -> Result<()> {
        if buffer < self.buffer_len() {
            lwarn!("buffer holds {} of {} coefficients", buffer, self.buffer_len());
            bail!(ConfigError::BufferTooSmall);
        }

        if temp < self.temp_len() {
            lwarn!("temp row holds {} of {} coefficients", temp, self.temp_len());
            bail!(ConfigError::TempBufferTooSmall);
        }

        Ok(())
    }
}
