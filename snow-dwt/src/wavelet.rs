//! Wavelet families and their lifting tables.

use crate::boundary::BoundaryPolicy;
use crate::error::{ConfigError, DwtError};
use crate::lifting::LiftOp::{Add, Scaled, Sub};
use crate::lifting::LiftStage;
use crate::lifting::Phase::{High, Low};

/// A wavelet filter bank.
///
/// The two 9/7 variants are numerically different filters and must not be
/// used interchangeably.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wavelet {
    /// Snow's integer LeGall 5/3.
    Snow53,
    /// Snow's integer Daubechies-like 9/7.
    Snow97,
    /// Dirac LeGall 5/3.
    DiracLeGall53,
    /// Dirac Deslauriers-Dubuc 9/7.
    DiracDd97,
    /// Dirac Deslauriers-Dubuc 13/7.
    DiracDd137,
    /// Dirac Haar without output shift.
    DiracHaar0,
    /// Dirac Haar with a rounding output shift of one bit.
    DiracHaar1,
    /// Dirac Fidelity filter.
    DiracFidelity,
    /// Dirac Daubechies 9/7.
    DiracDaub97,
}

/// The incremental composition schedule of a family.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Schedule {
    /// Number of rows each level keeps between advances.
    pub(crate) window: usize,
    /// Initial row cursor.
    pub(crate) lag: isize,
    /// For each vertical stage in composition order, the offset of its
    /// target row from the cursor during one advance.
    pub(crate) passes: &'static [isize],
    /// Rows of lookahead a level needs before an output row is final.
    pub(crate) support: usize,
}

#[derive(Debug)]
pub(crate) struct Family {
    pub(crate) horizontal: &'static [LiftStage],
    pub(crate) vertical: &'static [LiftStage],
    /// Right shift applied to every output sample after horizontal composition.
    pub(crate) shift: u32,
    /// Rounding offset that goes with `shift`.
    pub(crate) round: i32,
    pub(crate) policy: BoundaryPolicy,
    pub(crate) schedule: Option<Schedule>,
}

const SNOW53_H: &[LiftStage] = &[
    LiftStage::pair(Low, 1, 2, 2, Sub),
    LiftStage::pair(High, -1, 0, 1, Sub),
];
const SNOW53_V: &[LiftStage] = &[
    LiftStage::pair(Low, 1, 2, 2, Sub),
    LiftStage::pair(High, 1, 0, 1, Add),
];

const W_AM: i32 = 3;
const W_AO: i32 = 0;
const W_AS: u32 = 1;
const W_BM: i32 = 1;
const W_BO: i32 = 8;
const W_BS: u32 = 4;
const W_CM: i32 = 1;
const W_CO: i32 = 0;
const W_CS: u32 = 0;
const W_DM: i32 = 3;
const W_DO: i32 = 4;
const W_DS: u32 = 3;

// Both directions share the stage list, only the forward rounding of the
// scaled stage differs.
const SNOW97: &[LiftStage] = &[
    LiftStage::pair(Low, W_DM, W_DO, W_DS, Sub),
    LiftStage::pair(High, W_CM, W_CO, W_CS, Sub),
    LiftStage::pair(Low, W_BM, W_BO, W_BS, Scaled),
    LiftStage::pair(High, W_AM, W_AO, W_AS, Add),
];

const DIRAC53: &[LiftStage] = &[
    LiftStage::pair(Low, 1, 2, 2, Sub),
    LiftStage::pair(High, 1, 1, 1, Add),
];

const DD_TAPS: &[i32] = &[-1, 9, 9, -1];

const DD97: &[LiftStage] = &[
    LiftStage::pair(Low, 1, 2, 2, Sub),
    LiftStage::wide(High, -1, DD_TAPS, 8, 4, Add),
];

const DD137: &[LiftStage] = &[
    LiftStage::wide(Low, -2, DD_TAPS, 16, 5, Sub),
    LiftStage::wide(High, -1, DD_TAPS, 8, 4, Add),
];

const HAAR: &[LiftStage] = &[
    LiftStage::wide(Low, 0, &[1], 1, 1, Sub),
    LiftStage::wide(High, 0, &[1], 0, 0, Add),
];

const FIDELITY: &[LiftStage] = &[
    LiftStage::wide(High, -3, &[-2, 10, -25, 81, 81, -25, 10, -2], 128, 8, Add),
    LiftStage::wide(Low, -4, &[-8, 21, -46, 161, 161, -46, 21, -8], 128, 8, Sub),
];

const DAUB97: &[LiftStage] = &[
    LiftStage::pair(Low, 1817, 2048, 12, Sub),
    LiftStage::pair(High, 113, 64, 7, Sub),
    LiftStage::pair(Low, 217, 2048, 12, Add),
    LiftStage::pair(High, 6497, 2048, 12, Add),
];

const TWO_STAGE: Schedule = Schedule {
    window: 2,
    lag: -1,
    passes: &[1, 0],
    support: 3,
};

const FOUR_STAGE: Schedule = Schedule {
    window: 4,
    lag: -3,
    passes: &[3, 2, 1, 0],
    support: 5,
};

const SNOW53_FAMILY: Family = Family {
    horizontal: SNOW53_H,
    vertical: SNOW53_V,
    shift: 0,
    round: 0,
    policy: BoundaryPolicy::Mirror,
    schedule: Some(TWO_STAGE),
};

const SNOW97_FAMILY: Family = Family {
    horizontal: SNOW97,
    vertical: SNOW97,
    shift: 0,
    round: 0,
    policy: BoundaryPolicy::Mirror,
    schedule: Some(FOUR_STAGE),
};

const DIRAC53_FAMILY: Family = Family {
    horizontal: DIRAC53,
    vertical: DIRAC53,
    shift: 1,
    round: 1,
    policy: BoundaryPolicy::Mirror,
    schedule: Some(TWO_STAGE),
};

const DD97_FAMILY: Family = Family {
    horizontal: DD97,
    vertical: DD97,
    shift: 1,
    round: 1,
    policy: BoundaryPolicy::Clip,
    schedule: Some(Schedule {
        window: 6,
        lag: -5,
        passes: &[5, 2],
        support: 7,
    }),
};

const DD137_FAMILY: Family = Family {
    horizontal: DD137,
    vertical: DD137,
    shift: 1,
    round: 1,
    policy: BoundaryPolicy::Clip,
    schedule: Some(Schedule {
        window: 8,
        lag: -5,
        passes: &[5, 2],
        support: 7,
    }),
};

const HAAR_SCHEDULE: Schedule = Schedule {
    window: 0,
    lag: 1,
    passes: &[-1, 0],
    support: 1,
};

const HAAR0_FAMILY: Family = Family {
    horizontal: HAAR,
    vertical: HAAR,
    shift: 0,
    round: 0,
    policy: BoundaryPolicy::Clip,
    schedule: Some(HAAR_SCHEDULE),
};

const HAAR1_FAMILY: Family = Family {
    horizontal: HAAR,
    vertical: HAAR,
    shift: 1,
    round: 1,
    policy: BoundaryPolicy::Clip,
    schedule: Some(HAAR_SCHEDULE),
};

const FIDELITY_FAMILY: Family = Family {
    horizontal: FIDELITY,
    vertical: FIDELITY,
    shift: 0,
    round: 0,
    policy: BoundaryPolicy::Clip,
    schedule: None,
};

const DAUB97_FAMILY: Family = Family {
    horizontal: DAUB97,
    vertical: DAUB97,
    shift: 1,
    round: 1,
    policy: BoundaryPolicy::Mirror,
    schedule: Some(FOUR_STAGE),
};

impl Wavelet {
    /// Every supported wavelet.
    pub const ALL: [Self; 9] = [
        Self::Snow53,
        Self::Snow97,
        Self::DiracLeGall53,
        Self::DiracDd97,
        Self::DiracDd137,
        Self::DiracHaar0,
        Self::DiracHaar1,
        Self::DiracFidelity,
        Self::DiracDaub97,
    ];

    /// Map a Dirac bitstream wavelet index to a wavelet.
    pub fn from_dirac_index(idx: u32) -> Result<Self, DwtError> {
        Ok(match idx {
            0 => Self::DiracDd97,
            1 => Self::DiracLeGall53,
            2 => Self::DiracDd137,
            3 => Self::DiracHaar0,
            4 => Self::DiracHaar1,
            5 => Self::DiracFidelity,
            6 => Self::DiracDaub97,
            _ => return Err(ConfigError::UnknownWavelet(idx).into()),
        })
    }

    /// Map a Snow header wavelet type to a wavelet.
    pub fn from_snow_type(idx: u32) -> Result<Self, DwtError> {
        match idx {
            0 => Ok(Self::Snow97),
            1 => Ok(Self::Snow53),
            _ => Err(ConfigError::UnknownWavelet(idx).into()),
        }
    }

    pub(crate) fn family(self) -> &'static Family {
        match self {
            Self::Snow53 => &SNOW53_FAMILY,
            Self::Snow97 => &SNOW97_FAMILY,
            Self::DiracLeGall53 => &DIRAC53_FAMILY,
            Self::DiracDd97 => &DD97_FAMILY,
            Self::DiracDd137 => &DD137_FAMILY,
            Self::DiracHaar0 => &HAAR0_FAMILY,
            Self::DiracHaar1 => &HAAR1_FAMILY,
            Self::DiracFidelity => &FIDELITY_FAMILY,
            Self::DiracDaub97 => &DAUB97_FAMILY,
        }
    }

    /// The lifting stages of the row transform, in composition order.
    pub fn horizontal_stages(self) -> &'static [LiftStage] {
        self.family().horizontal
    }

    /// The lifting stages of the column transform, in composition order.
    pub fn vertical_stages(self) -> &'static [LiftStage] {
        self.family().vertical
    }

    /// Whether the wavelet belongs to the Dirac set.
    ///
    /// Dirac wavelets only operate on planes whose dimensions are divisible
    /// by `2^levels`.
    pub fn is_dirac(self) -> bool {
        !matches!(self, Self::Snow53 | Self::Snow97)
    }

    /// Whether `decompose` followed by `compose` reproduces every input
    /// exactly.
    pub fn is_reversible(self) -> bool {
        self != Self::Snow97
    }

    /// Whether the wavelet can be composed incrementally.
    pub fn supports_streaming(self) -> bool {
        self.family().schedule.is_some()
    }

    /// Boundary policy used for out-of-range rows and samples.
    pub fn boundary_policy(self) -> BoundaryPolicy {
        self.family().policy
    }

    /// Rows of lookahead each level needs before an output row is final.
    ///
    /// `None` for wavelets without an incremental schedule.
    pub fn support(self) -> Option<usize> {
        self.family().schedule.map(|s| s.support)
    }

    /// The number of slice buffer lines an incremental session needs.
    ///
    /// Assumes the caller advances in steps of at most `rows_per_slice` rows
    /// and releases every row below its latest target after each advance.
    /// `None` for wavelets without an incremental schedule.
    pub fn slice_buffer_lines(self, levels: usize, rows_per_slice: usize) -> Option<usize> {
        let support = self.support()?;

        Some(rows_per_slice + (levels + 1) * (support + 1) + 1)
    }
}
