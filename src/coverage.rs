//! How well a cell's datasheet covers one operating point.
//!
//! A quick screen for the cell-to-scenario workflow: each condition outside
//! the rated discharge envelope costs a fixed deduction from 100 and adds a
//! gap explaining what data is missing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::CellSpec;

const TEMP_OUT_OF_WINDOW: i32 = 30;
const RATE_ABOVE_CONT: i32 = 25;
const RATE_NEAR_CONT: i32 = 10;
const NEAR_CONT_FRACTION: f64 = 0.8;

const HIGH_FROM: i32 = 80;
const MEDIUM_FROM: i32 = 60;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageLevel {
    High,
    Medium,
    Low,
}

impl CoverageLevel {
    pub fn for_percentage(percentage: i32) -> Self {
        if percentage < MEDIUM_FROM {
            CoverageLevel::Low
        } else if percentage < HIGH_FROM {
            CoverageLevel::Medium
        } else {
            CoverageLevel::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CoverageGap {
    BelowDischargeWindow { temp_c: f64, min_c: f64 },
    AboveDischargeWindow { temp_c: f64, max_c: f64 },
    RateAboveContinuous { c_rate: f64, max_c: f64 },
    /// Above 80% of the continuous rating; high-rate test data is thin there.
    RateNearContinuous { c_rate: f64, max_c: f64 },
}

impl fmt::Display for CoverageGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageGap::BelowDischargeWindow { temp_c, min_c } => write!(
                f,
                "{} °C is below the minimum discharge temperature of {} °C",
                temp_c, min_c
            ),
            CoverageGap::AboveDischargeWindow { temp_c, max_c } => write!(
                f,
                "{} °C is above the maximum discharge temperature of {} °C",
                temp_c, max_c
            ),
            CoverageGap::RateAboveContinuous { c_rate, max_c } => write!(
                f,
                "{}C exceeds the maximum continuous rate of {}C",
                c_rate, max_c
            ),
            CoverageGap::RateNearContinuous { .. } => {
                f.write_str("rate is close to the continuous limit, add high-rate test data")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    pub percentage: u8,
    pub level: CoverageLevel,
    pub gaps: Vec<CoverageGap>,
}

/// Datasheet coverage of a discharge at `temperature_c` and `c_rate`.
///
/// Deductions stack. A rate above the continuous rating is also above 80% of
/// it, so it costs both the 25 and the 10 point deductions.
pub fn calculate_coverage(cell: &CellSpec, temperature_c: f64, c_rate: f64) -> Coverage {
    let mut coverage = 100;
    let mut gaps = Vec::new();

    if temperature_c < cell.temp_discharge_min_c {
        coverage -= TEMP_OUT_OF_WINDOW;
        gaps.push(CoverageGap::BelowDischargeWindow {
            temp_c: temperature_c,
            min_c: cell.temp_discharge_min_c,
        });
    }
    if temperature_c > cell.temp_discharge_max_c {
        coverage -= TEMP_OUT_OF_WINDOW;
        gaps.push(CoverageGap::AboveDischargeWindow {
            temp_c: temperature_c,
            max_c: cell.temp_discharge_max_c,
        });
    }
    if c_rate > cell.max_discharge_c_cont {
        coverage -= RATE_ABOVE_CONT;
        gaps.push(CoverageGap::RateAboveContinuous {
            c_rate,
            max_c: cell.max_discharge_c_cont,
        });
    }
    if c_rate > cell.max_discharge_c_cont * NEAR_CONT_FRACTION {
        coverage -= RATE_NEAR_CONT;
        gaps.push(CoverageGap::RateNearContinuous {
            c_rate,
            max_c: cell.max_discharge_c_cont,
        });
    }

    let percentage = coverage.clamp(0, 100);
    log::trace!(
        "coverage for {} at {} °C / {}C: {}%",
        cell.id,
        temperature_c,
        c_rate,
        percentage
    );

    Coverage {
        // Clamped to 0..=100 above.
        percentage: percentage as u8,
        level: CoverageLevel::for_percentage(percentage),
        gaps,
    }
}
