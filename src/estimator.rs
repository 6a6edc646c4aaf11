//! Heuristic electrochemical estimators.
//!
//! Every function here is total: inputs are clamped rather than rejected, and
//! each derating is an independent multiplicative factor built from smooth
//! ramps so that downstream grids have no step discontinuities.

use serde::{Deserialize, Serialize};

use crate::cell::{CellSpec, Chemistry};
use crate::math::{clamp, smooth_step};
use crate::scenario::Cooling;

/// Life estimates never fall below this many cycles.
pub const LIFE_FLOOR_CYCLES: u32 = 200;

/// Resistance never falls below this share of the 25 °C reference.
const RESISTANCE_FLOOR_RATIO: f64 = 0.6;

/// State a single estimate is evaluated at.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingPoint {
    /// 0..1, clamped by the estimators.
    pub state_of_charge: f64,
    pub temperature_c: f64,
    /// Positive while discharging.
    #[serde(default)]
    pub current_a: Option<f64>,
}

impl OperatingPoint {
    pub fn new(state_of_charge: f64, temperature_c: f64) -> Self {
        Self {
            state_of_charge,
            temperature_c,
            current_a: None,
        }
    }

    pub fn with_current(mut self, current_a: f64) -> Self {
        self.current_a = Some(current_a);
        self
    }
}

/// Combined estimate at one operating point.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellEstimate {
    pub ocv_v: f64,
    pub resistance_ohm: f64,
    /// `ocv - I·R`, only when a current was given.
    pub terminal_v: Option<f64>,
    /// Ohmic heat `I²·R` [W], only when a current was given.
    pub heat_w: Option<f64>,
}

/// Open-circuit voltage at `soc`, bounded to the cell's voltage window.
pub fn estimate_ocv_v(cell: &CellSpec, soc: f64) -> f64 {
    let soc = clamp(soc, 0.0, 1.0);

    let ocv = match cell.chemistry {
        Chemistry::Lfp => plateau_ocv(soc, 3.28, 2.9, 0.25, (0.12, 0.2), (0.9, 1.0), (0.85, 0.95)),
        Chemistry::Lto => plateau_ocv(soc, 2.35, 1.9, 0.35, (0.1, 0.2), (0.85, 1.0), (0.8, 0.95)),
        Chemistry::Nmc | Chemistry::Nca | Chemistry::Lco => {
            let base = 3.45 + 0.65 * smooth_step(0.05, 0.95, soc);
            let knee_low = 0.35 * (1.0 - smooth_step(0.08, 0.18, soc));
            let knee_high = 0.25 * smooth_step(0.88, 0.98, soc);
            base - knee_low + knee_high
        }
    };

    clamp(ocv, cell.voltage_min, cell.voltage_max)
}

/// Flat plateau with a low knee rising from `low_start` and a high knee of
/// height `high_rise`, each blended in over its own window.
fn plateau_ocv(
    soc: f64,
    plateau: f64,
    low_start: f64,
    high_rise: f64,
    low_blend: (f64, f64),
    high_shape: (f64, f64),
    high_blend: (f64, f64),
) -> f64 {
    let low = low_start + 0.35 * smooth_step(0.0, 0.1, soc);
    let high = plateau + high_rise * smooth_step(high_shape.0, high_shape.1, soc);
    plateau
        + (low - plateau) * (1.0 - smooth_step(low_blend.0, low_blend.1, soc))
        + (high - plateau) * smooth_step(high_blend.0, high_blend.1, soc)
}

/// Internal resistance at (`soc`, `temp_c`) [Ω].
pub fn estimate_resistance_ohm(cell: &CellSpec, soc: f64, temp_c: f64) -> f64 {
    let soc = clamp(soc, 0.0, 1.0);
    let soc_factor =
        1.0 + 0.6 * (1.0 - smooth_step(0.1, 0.25, soc)) + 0.5 * smooth_step(0.8, 0.95, soc);
    let cold_factor = 1.0 + 1.8 * (1.0 - smooth_step(-5.0, 15.0, temp_c));
    let hot_factor = 1.0 - 0.15 * smooth_step(35.0, 55.0, temp_c);

    let r_ref = cell.resistance_ohm_at_25c();
    (r_ref * soc_factor * cold_factor * hot_factor).max(r_ref * RESISTANCE_FLOOR_RATIO)
}

/// Steady-state temperature rise at a continuous per-cell current [°C].
pub fn estimate_thermal_delta_t_cont_c(
    cell: &CellSpec,
    cont_cell_a: f64,
    ambient_c: f64,
    cooling: Cooling,
) -> f64 {
    let r = estimate_resistance_ohm(cell, 0.5, ambient_c);
    let heat_w = cont_cell_a * cont_cell_a * r;
    heat_w * cooling.coefficient_c_per_w()
}

/// Cycle life extrapolated from the 80% DoD / 25 °C reference point.
pub fn estimate_life_cycles(
    cell: &CellSpec,
    usable_soc_fraction: f64,
    avg_temp_c: f64,
    cont_c_rate: f64,
) -> u32 {
    let mut life = f64::from(cell.cycle_life_80_dod_at_25c);

    let dod = clamp(usable_soc_fraction, 0.55, 0.95);
    life *= (0.8 / dod).powf(0.55);

    if avg_temp_c > 30.0 {
        life *= 1.0 - 0.015 * (avg_temp_c - 30.0);
    }
    if avg_temp_c < 10.0 {
        life *= 1.0 - 0.006 * (10.0 - avg_temp_c);
    }

    if cont_c_rate > 1.0 {
        life *= 1.0 - 0.08 * (cont_c_rate - 1.0).min(3.0);
    }

    // A NaN or negative intermediate falls through to the floor.
    let rounded = life.round();
    if rounded >= f64::from(LIFE_FLOOR_CYCLES) {
        rounded as u32
    } else {
        LIFE_FLOOR_CYCLES
    }
}

/// OCV and resistance at `point`, plus terminal voltage and heat when a current is set.
pub fn estimate_at(cell: &CellSpec, point: &OperatingPoint) -> CellEstimate {
    let ocv_v = estimate_ocv_v(cell, point.state_of_charge);
    let resistance_ohm = estimate_resistance_ohm(cell, point.state_of_charge, point.temperature_c);
    let terminal_v = point.current_a.map(|i| ocv_v - i * resistance_ohm);
    let heat_w = point.current_a.map(|i| i * i * resistance_ohm);

    log::trace!(
        "estimate {} soc={:.2} t={:.1}C -> ocv={:.3}V r={:.5}ohm",
        cell.id,
        point.state_of_charge,
        point.temperature_c,
        ocv_v,
        resistance_ohm
    );

    CellEstimate {
        ocv_v,
        resistance_ohm,
        terminal_v,
        heat_w,
    }
}
