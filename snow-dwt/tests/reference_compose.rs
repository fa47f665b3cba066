//! Composition output of the Dirac wavelets pinned to known-good values.
//!
//! Each input is treated as already decomposed coefficients, so the edge
//! columns and rows exercise the boundary policy and the final rounding
//! shift on odd values.

use snow_dwt::{
    Backend, DwtContext, DwtDsp, DwtSettings, Wavelet, compose_row, spatial_idwt, temp_row_len,
};

const ROW: [i32; 16] = [23, -7, 41, -3, 16, 9, -28, 5, -11, 6, 3, -4, 13, -9, 2, 7];

const PLANE: [[i32; 8]; 8] = [
    [-48, 13, -23, 38, 2, -34, 27, -9],
    [-11, -36, 36, 11, -14, -39, 33, 8],
    [26, 12, -2, -16, -30, -44, 39, 25],
    [-34, -37, -40, -43, -46, 48, 45, 42],
    [3, 11, 19, 27, 35, 43, -46, -38],
    [40, -38, -19, 0, 19, 38, -40, -21],
    [-20, 10, 40, -27, 3, 33, -34, -4],
    [17, -39, 2, 43, -13, 28, -28, 13],
];

fn composed_row(wavelet: Wavelet, input: &[i32]) -> Vec<i32> {
    let mut row = input.to_vec();
    let mut temp = vec![0; temp_row_len(row.len())];
    compose_row(wavelet, &mut row, &mut temp);

    row
}

fn flatten(plane: &[[i32; 8]; 8]) -> Vec<i32> {
    plane.iter().flatten().copied().collect()
}

fn check_plane(wavelet: Wavelet, expected: &[[i32; 8]; 8]) {
    let settings = DwtSettings::new(8, 8, wavelet, 1);
    let expected = flatten(expected);

    for backend in [Backend::Portable, Backend::Simd] {
        let mut plane = flatten(&PLANE);
        let mut temp = vec![0; settings.temp_len()];
        spatial_idwt(&mut plane, &mut temp, &settings, &DwtDsp::new(backend)).unwrap();

        assert_eq!(plane, expected, "{wavelet:?} {backend:?}");
    }

    if wavelet.supports_streaming() {
        let mut plane = flatten(&PLANE);
        let mut ctx = DwtContext::new(&mut plane, settings, DwtDsp::detect()).unwrap();

        for y in 0..8 {
            ctx.slice(y);
        }

        ctx.finish();
        assert_eq!(plane, expected, "{wavelet:?} sliced");
    }
}

#[test]
fn daubechies_rounds_the_output_shift() {
    assert_eq!(
        composed_row(Wavelet::DiracDaub97, &[1, 3, -5, 7, 0, 2, 9, -1]),
        [1, 1, 1, -1, -4, 3, 2, 2]
    );
}

#[test]
fn legall_rows() {
    assert_eq!(
        composed_row(Wavelet::DiracLeGall53, &ROW),
        [14, 0, -3, 12, 20, 11, -1, 1, 7, 12, 4, -9, -13, -4, 2, 5]
    );
}

#[test]
fn deslauriers_dubuc_rows() {
    assert_eq!(
        composed_row(Wavelet::DiracDd97, &ROW),
        [14, -1, -3, 12, 20, 12, -1, 0, 7, 14, 4, -10, -13, -6, 2, 6]
    );
    assert_eq!(
        composed_row(Wavelet::DiracDd137, &ROW),
        [15, -1, -3, 11, 19, 12, -1, 0, 7, 14, 4, -9, -12, -6, 1, 6]
    );
}

#[test]
fn haar_rows() {
    assert_eq!(
        composed_row(Wavelet::DiracHaar0, &ROW),
        [28, 17, -10, -4, 39, 42, -1, -5, 9, 22, 13, 4, -29, -27, 1, 8]
    );
    assert_eq!(
        composed_row(Wavelet::DiracHaar1, &ROW),
        [14, 9, -5, -2, 20, 21, 0, -2, 5, 11, 7, 2, -14, -13, 1, 4]
    );
}

#[test]
fn fidelity_rows() {
    assert_eq!(
        composed_row(Wavelet::DiracFidelity, &ROW),
        [38, -12, -7, 16, 16, 15, 1, -6, 2, 26, 0, -17, -6, -6, -3, 13]
    );
}

#[test]
fn daubechies_rows() {
    assert_eq!(
        composed_row(Wavelet::DiracDaub97, &ROW),
        [15, -1, -4, 10, 17, 10, -2, -1, 6, 13, 4, -9, -11, -5, 1, 6]
    );
}

#[test]
fn legall_plane() {
    check_plane(
        Wavelet::DiracLeGall53,
        &[
            [-24, 1, 16, -9, -20, 4, 17, 10],
            [-3, -6, 8, -25, 10, 32, 5, 9],
            [22, 15, 23, -10, 3, 7, -8, -2],
            [1, -17, -4, 6, -20, -5, -21, -8],
            [-10, 20, 7, 24, 20, 2, 30, 9],
            [2, 13, -16, 27, 12, -22, 15, -7],
            [-17, -2, 13, 26, 22, -5, -16, -17],
            [-5, -13, -9, 29, 23, -7, 7, 12],
        ],
    );
}

#[test]
fn deslauriers_dubuc_9_7_plane() {
    check_plane(
        Wavelet::DiracDd97,
        &[
            [-24, 3, 16, -9, -20, 1, 17, 13],
            [-1, -6, 10, -26, 9, 32, 2, 7],
            [22, 16, 23, -9, 3, 6, -8, -2],
            [4, -15, -4, 5, -19, -5, -20, -7],
            [-10, 19, 7, 25, 20, 3, 30, 9],
            [0, 12, -17, 27, 13, -21, 17, -6],
            [-17, -2, 13, 30, 22, -5, -16, -20],
            [-6, -16, -8, 31, 24, -6, 4, 10],
        ],
    );
}

#[test]
fn deslauriers_dubuc_13_7_plane() {
    check_plane(
        Wavelet::DiracDd137,
        &[
            [-24, 3, 17, -8, -21, 0, 16, 12],
            [-1, -5, 11, -25, 9, 30, 1, 6],
            [23, 18, 24, -9, 4, 6, -8, -3],
            [6, -13, -3, 4, -18, -5, -18, -5],
            [-10, 18, 7, 24, 23, 6, 33, 12],
            [0, 10, -19, 26, 14, -18, 19, -3],
            [-18, -4, 12, 30, 22, -4, -17, -20],
            [-6, -18, -10, 30, 23, -4, 4, 11],
        ],
    );
}

#[test]
fn haar_planes() {
    check_plane(
        Wavelet::DiracHaar0,
        &[
            [-48, -39, 38, 23, -46, -36, 38, 25],
            [-52, -57, 22, -32, -27, 16, 45, 40],
            [46, 39, 64, -4, 10, 26, 3, 7],
            [35, -18, 3, -17, -53, 8, -61, -15],
            [-30, -5, 18, 42, 41, 15, 41, 13],
            [1, 45, -39, 23, 42, -24, 51, 2],
            [-34, -25, 19, 38, 49, 29, -44, -55],
            [-10, -14, -34, 13, 65, 17, -7, -5],
        ],
    );
    check_plane(
        Wavelet::DiracHaar1,
        &[
            [-24, -19, 19, 12, -23, -18, 19, 13],
            [-26, -28, 11, -16, -13, 8, 23, 20],
            [23, 20, 32, -2, 5, 13, 2, 4],
            [18, -9, 2, -8, -26, 4, -30, -7],
            [-15, -2, 9, 21, 21, 8, 21, 7],
            [1, 23, -19, 12, 21, -12, 26, 1],
            [-17, -12, 10, 19, 25, 15, -22, -27],
            [-5, -7, -17, 7, 33, 9, -3, -2],
        ],
    );
}

#[test]
fn fidelity_plane() {
    check_plane(
        Wavelet::DiracFidelity,
        &[
            [-60, 31, -6, 40, -54, -44, 51, 0],
            [15, -42, 44, -65, 22, 71, -52, 20],
            [0, 44, 29, -21, 38, -26, 19, -12],
            [50, -58, -18, 31, -76, 24, -56, 19],
            [-58, 46, 21, -3, 61, -5, 58, -8],
            [9, 32, -89, 49, 4, -62, 69, -35],
            [-25, -18, 49, 13, -3, 22, -56, -10],
            [47, -27, -48, 35, 16, -24, 34, 25],
        ],
    );
}

#[test]
fn daubechies_plane() {
    check_plane(
        Wavelet::DiracDaub97,
        &[
            [-23, 3, 16, -2, -22, -5, 15, 12],
            [-1, -11, 9, -26, 8, 29, -1, 6],
            [19, 15, 22, -9, 5, 3, -6, -3],
            [8, -15, -5, 6, -21, -1, -19, -2],
            [-14, 18, 5, 19, 20, 2, 31, 7],
            [0, 12, -24, 23, 9, -22, 20, -6],
            [-17, -4, 14, 23, 17, -3, -17, -21],
            [0, -16, -12, 25, 17, -8, 2, 9],
        ],
    );
}
