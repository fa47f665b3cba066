/*!
A memory-safe, pure-Rust integer wavelet engine for Snow and Dirac video
planes.

`snow-dwt` decomposes and composes 2D coefficient planes in place with the
integer lifting wavelets used by the Snow and Dirac (VC-2) codecs. Besides
full-plane transforms it can compose a plane incrementally, producing
output rows progressively as a decoder asks for them, either directly in a
caller-owned plane or through a bounded [`SliceBuffer`] that only keeps a
window of lines alive.

# Example
```rust
use snow_dwt::{DwtDsp, DwtSettings, Wavelet, spatial_dwt, spatial_idwt};

let settings = DwtSettings::new(16, 16, Wavelet::DiracDd97, 2);
let dsp = DwtDsp::detect();
let input: Vec<i32> = (0..256).map(|i| (i * 37 % 255) - 128).collect();

let mut plane = input.clone();
let mut temp = vec![0; settings.temp_len()];
spatial_dwt(&mut plane, &mut temp, &settings, &dsp).unwrap();
spatial_idwt(&mut plane, &mut temp, &settings, &dsp).unwrap();

assert_eq!(plane, input);
```

# Cargo features
- `std` (default): std support. Without it the crate only needs `alloc`.
- `simd` (default): dispatch kernels to the best instruction set of the
  running CPU via `fearless_simd`.
- `logging`: emit diagnostics through the `log` crate.

# Safety
This crate forbids unsafe code via a crate-level attribute.
*/

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[macro_use]
mod log;

mod boundary;
mod coefficient;
mod compose;
mod dsp;
mod error;
mod horizontal;
pub mod lifting;
mod plane;
mod settings;
mod slice_buffer;
mod spatial;
mod vertical;
mod wavelet;

pub use boundary::{BoundaryPolicy, clip, mirror};
pub use coefficient::Coefficient;
pub use compose::{BufferedIdwt, DwtCompose, DwtContext};
pub use dsp::{Backend, DwtDsp, DwtKernels, PortableKernels};
#[cfg(feature = "simd")]
pub use dsp::SimdKernels;
pub use error::{ConfigError, DwtError, Result};
pub use horizontal::{TEMP_PADDING, compose_row, decompose_row, temp_row_len};
pub use settings::{DwtSettings, MAX_DECOMPOSITIONS};
pub use slice_buffer::{LineSource, SliceBuffer};
pub use spatial::{spatial_dwt, spatial_idwt};
pub use wavelet::Wavelet;
