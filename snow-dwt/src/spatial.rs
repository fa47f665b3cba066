//! Full-plane transforms.

use crate::compose::compose_plane;
use crate::dsp::{DwtDsp, DwtKernels};
use crate::lifting::{LiftStage, MAX_TAPS, Phase};
use crate::plane::{PlaneRows, RowStore};
use crate::settings::DwtSettings;
use crate::wavelet::Family;
use crate::{Coefficient, Result};

/// Decompose the plane in `buffer` in place.
///
/// Each level splits the low-pass band of the previous level into four
/// bands. Level `l` covers the first `width >> l` coefficients of every
/// `2^l`-th line.
pub fn spatial_dwt<T: Coefficient>(
    buffer: &mut [T],
    temp: &mut [T],
    settings: &DwtSettings,
    dsp: &DwtDsp,
) -> Result<()> {
    settings.validate()?;
    settings.check_buffers(buffer.len(), temp.len())?;

    let family = settings.wavelet.family();
    let mut rows = PlaneRows::new(buffer, settings.width, settings.stride);

    for level in 0..settings.decompositions {
        let height = settings.height >> level;

        for row in 0..height {
            rows.with_rows(level, row, &[], |dst, _| {
                dsp.horizontal_decompose(settings.wavelet, dst, temp);
            });
        }

        for stage in family.vertical.iter().rev() {
            vertical_pass(&mut rows, dsp, family, stage, level, height, true);
        }
    }

    Ok(())
}

/// Compose the plane in `buffer` in place, undoing [`spatial_dwt`].
///
/// Wavelets with an incremental schedule run it to completion, the others
/// are composed one stage at a time.
pub fn spatial_idwt<T: Coefficient>(
    buffer: &mut [T],
    temp: &mut [T],
    settings: &DwtSettings,
    dsp: &DwtDsp,
) -> Result<()> {
    settings.validate()?;
    settings.check_buffers(buffer.len(), temp.len())?;

    if settings.wavelet.supports_streaming() {
        compose_plane(buffer, temp, settings, *dsp)
    } else {
        compose_stagewise(buffer, temp, settings, dsp);

        Ok(())
    }
}

/// Compose level by level, running each vertical stage over the whole level
/// before the next.
pub(crate) fn compose_stagewise<T: Coefficient>(
    buffer: &mut [T],
    temp: &mut [T],
    settings: &DwtSettings,
    dsp: &DwtDsp,
) {
    let family = settings.wavelet.family();
    let mut rows = PlaneRows::new(buffer, settings.width, settings.stride);

    for level in (0..settings.decompositions).rev() {
        let height = settings.height >> level;

        for stage in family.vertical {
            vertical_pass(&mut rows, dsp, family, stage, level, height, false);
        }

        for row in 0..height {
            rows.with_rows(level, row, &[], |dst, _| {
                dsp.horizontal_compose(settings.wavelet, dst, temp);
            });
        }
    }
}

fn vertical_pass<T: Coefficient>(
    rows: &mut impl RowStore<T>,
    dsp: &DwtDsp,
    family: &Family,
    stage: &LiftStage,
    level: usize,
    height: usize,
    forward: bool,
) {
    let start = match stage.phase {
        Phase::Low => 0,
        Phase::High => 1,
    };

    for target in (start..height).step_by(2) {
        let mut sources = [0; MAX_TAPS];
        let mut count = 0;

        for offset in stage.row_offsets() {
            sources[count] = family.policy.resolve(target as isize + offset, height);
            count += 1;
        }

        rows.with_rows(level, target, &sources[..count], |dst, srcs| {
            if forward {
                dsp.vertical_decompose(stage, dst, srcs);
            } else {
                dsp.vertical_compose(stage, dst, srcs);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Backend, Wavelet};

    fn pseudo_random(len: usize, seed: u32) -> Vec<i32> {
        let mut state = seed;

        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
                ((state >> 16) % 1001) as i32 - 500
            })
            .collect()
    }

    #[test]
    fn legall_4x4_fixture() {
        let settings = DwtSettings::new(4, 4, Wavelet::Snow53, 1);
        let dsp = DwtDsp::new(Backend::Portable);
        let input: Vec<i32> = (0..16).collect();
        let mut plane = input.clone();
        let mut temp = vec![0; settings.temp_len()];

        spatial_dwt(&mut plane, &mut temp, &settings, &dsp).unwrap();
        assert_eq!(plane, [0, 2, 0, 1, 0, 0, 0, 0, 9, 11, 0, 1, 4, 4, 0, 0]);

        spatial_idwt(&mut plane, &mut temp, &settings, &dsp).unwrap();
        assert_eq!(plane, input);
    }

    #[test]
    fn dirac_4x4_fixtures() {
        let cases: [(Wavelet, [i32; 16]); 3] = [
            (
                Wavelet::DiracLeGall53,
                [0, 5, 0, 2, 0, 0, 0, 0, 18, 23, 0, 2, 8, 8, 0, 0],
            ),
            (
                Wavelet::DiracHaar0,
                [3, 5, 1, 1, 4, 4, 0, 0, 11, 13, 1, 1, 4, 4, 0, 0],
            ),
            (
                Wavelet::DiracHaar1,
                [5, 9, 2, 2, 8, 8, 0, 0, 21, 25, 2, 2, 8, 8, 0, 0],
            ),
        ];

        for (wavelet, expected) in cases {
            let settings = DwtSettings::new(4, 4, wavelet, 1);
            let mut plane: Vec<i32> = (0..16).collect();
            let mut temp = vec![0; settings.temp_len()];

            spatial_dwt(&mut plane, &mut temp, &settings, &DwtDsp::default()).unwrap();
            assert_eq!(plane, expected, "{wavelet:?}");
        }
    }

    #[test]
    fn scheduler_matches_stagewise_composition() {
        for wavelet in Wavelet::ALL {
            if !wavelet.supports_streaming() {
                continue;
            }

            let (width, height) = if wavelet.is_dirac() { (48, 40) } else { (45, 37) };

            for levels in 1..=3 {
                let settings = DwtSettings::new(width, height, wavelet, levels).with_stride(50);
                let dsp = DwtDsp::new(Backend::Portable);
                let mut a = pseudo_random(settings.buffer_len(), levels as u32);
                let mut temp = vec![0; settings.temp_len()];

                spatial_dwt(&mut a, &mut temp, &settings, &dsp).unwrap();
                let mut b = a.clone();

                spatial_idwt(&mut a, &mut temp, &settings, &dsp).unwrap();
                compose_stagewise(&mut b, &mut temp, &settings, &dsp);

                assert_eq!(a, b, "{wavelet:?} with {levels} levels");
            }
        }
    }

    #[test]
    fn fidelity_round_trips() {
        let settings = DwtSettings::new(32, 24, Wavelet::DiracFidelity, 3);
        let dsp = DwtDsp::default();
        let input = pseudo_random(settings.buffer_len(), 7);
        let mut plane = input.clone();
        let mut temp = vec![0; settings.temp_len()];

        spatial_dwt(&mut plane, &mut temp, &settings, &dsp).unwrap();
        assert_ne!(plane, input);
        spatial_idwt(&mut plane, &mut temp, &settings, &dsp).unwrap();
        assert_eq!(plane, input);
    }

    #[test]
    fn padding_between_rows_is_untouched() {
        let settings = DwtSettings::new(8, 8, Wavelet::DiracDd137, 2).with_stride(11);
        let dsp = DwtDsp::default();
        let mut plane = vec![77_i32; settings.buffer_len()];
        let mut temp = vec![0; settings.temp_len()];

        spatial_dwt(&mut plane, &mut temp, &settings, &dsp).unwrap();
        spatial_idwt(&mut plane, &mut temp, &settings, &dsp).unwrap();

        assert!(plane.iter().all(|&v| v == 77));
    }
}
