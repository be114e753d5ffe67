//! Synthetic outcome metrics.
//!
//! Values are placeholders drawn from fixed ranges per analysis branch. They
//! are not derived from trial data and carry no clinical meaning.

use std::ops::RangeInclusive;

use rand::Rng;

use super::report::{Months, Percent};
use crate::analysis::AnalysisType;

/// Inclusive ranges for one set of generated metrics. Month ranges bound the
/// whole part; the tenth digit is drawn separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRanges {
    pub orr: RangeInclusive<u8>,
    pub pfs: RangeInclusive<u8>,
    pub os: RangeInclusive<u8>,
    pub ae_rate: RangeInclusive<u8>,
}

/// Largest tenth digit a generated duration can carry.
pub const MAX_TENTH: u8 = 8;

impl MetricRanges {
    /// Comparison-row ranges for an analysis branch.
    pub fn for_analysis(analysis: AnalysisType) -> Self {
        match analysis {
            AnalysisType::Safety => Self {
                orr: 60..=79,
                pfs: 6..=13,
                os: 12..=29,
                ae_rate: 15..=39,
            },
            AnalysisType::Efficacy => Self {
                orr: 50..=79,
                pfs: 10..=24,
                os: 20..=43,
                ae_rate: 8..=22,
            },
            AnalysisType::MolecularSpecific => Self {
                orr: 55..=79,
                pfs: 8..=19,
                os: 16..=35,
                ae_rate: 10..=27,
            },
            _ => Self {
                orr: 45..=74,
                pfs: 8..=19,
                os: 18..=41,
                ae_rate: 10..=29,
            },
        }
    }
}

/// Per-card ranges, independent of the analysis branch.
pub const CARD_ORR: RangeInclusive<u8> = 30..=69;
pub const CARD_PFS: RangeInclusive<u8> = 5..=19;
pub const CARD_AE_RATE: RangeInclusive<u8> = 5..=29;

/// One draw of outcome metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeMetrics {
    pub orr: Percent,
    pub pfs: Months,
    pub os: Months,
    pub ae_rate: Percent,
}

pub fn percent<R: Rng + ?Sized>(range: &RangeInclusive<u8>, rng: &mut R) -> Percent {
    Percent(rng.gen_range(range.clone()))
}

pub fn months<R: Rng + ?Sized>(range: &RangeInclusive<u8>, rng: &mut R) -> Months {
    Months {
        whole: rng.gen_range(range.clone()),
        tenth: rng.gen_range(0..=MAX_TENTH),
    }
}

/// Metrics shown on a trial card. Cards carry no OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardMetrics {
    pub orr: Percent,
    pub pfs: Months,
    pub ae_rate: Percent,
}

pub fn draw_card<R: Rng + ?Sized>(rng: &mut R) -> CardMetrics {
    CardMetrics {
        orr: percent(&CARD_ORR, rng),
        pfs: months(&CARD_PFS, rng),
        ae_rate: percent(&CARD_AE_RATE, rng),
    }
}

/// Draw ORR, PFS, OS and AE rate, in that order.
pub fn draw<R: Rng + ?Sized>(ranges: &MetricRanges, rng: &mut R) -> OutcomeMetrics {
    OutcomeMetrics {
        orr: percent(&ranges.orr, rng),
        pfs: months(&ranges.pfs, rng),
        os: months(&ranges.os, rng),
        ae_rate: percent(&ranges.ae_rate, rng),
    }
}
