use serde::{Deserialize, Serialize};

use crate::cell::{CellSpec, Chemistry};
use crate::estimator::{estimate_ocv_v, estimate_resistance_ohm};
use crate::math::{clamp, lerp, smooth_step};

const SOC_AXIS_PCT: (i32, i32, i32) = (5, 95, 5);
const TEMP_AXIS_C: (i32, i32, i32) = (-20, 60, 5);

/// Maximum allowable current over an SOC × temperature plane.
///
/// Tables are indexed `[temp_index][soc_index]` and hold whole amperes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoaGrid {
    pub soc_axis: Vec<f64>,
    pub temp_axis: Vec<f64>,
    pub discharge_a: Vec<Vec<f64>>,
    pub charge_a: Vec<Vec<f64>>,
}

/// Which table a lookup reads.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Direction {
    Discharge,
    Charge,
}

impl SoaGrid {
    /// Limit at the grid node nearest to (`soc_pct`, `temp_c`).
    pub fn limit_at(&self, direction: Direction, soc_pct: f64, temp_c: f64) -> Option<f64> {
        let t = nearest_index(&self.temp_axis, temp_c)?;
        let s = nearest_index(&self.soc_axis, soc_pct)?;
        let table = match direction {
            Direction::Discharge => &self.discharge_a,
            Direction::Charge => &self.charge_a,
        };
        table.get(t)?.get(s).copied()
    }
}

fn nearest_index(axis: &[f64], value: f64) -> Option<usize> {
    if value.is_nan() {
        return None;
    }
    axis.iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (*a - value).abs().total_cmp(&(*b - value).abs()))
        .map(|(i, _)| i)
}

/// Advisory operating window. This is a chemistry default, not a computed
/// safety boundary; BMS limits must come from the grid and the datasheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoaPolicy {
    pub recommended_soc_min_pct: f64,
    pub recommended_soc_max_pct: f64,
    pub notes: Vec<String>,
}

/// Advisory SOC window for the cell's chemistry.
pub fn default_soa_policy(cell: &CellSpec) -> SoaPolicy {
    let (min, max, notes) = match cell.chemistry {
        Chemistry::Lfp => (
            10.0,
            90.0,
            vec![
                "avoid prolonged rest at high SOC to preserve life",
                "low-temperature charging needs current limiting or pre-heating",
            ],
        ),
        Chemistry::Lto => (
            5.0,
            95.0,
            vec![
                "strong rate capability, suited to high power and fast charge",
                "energy density is typically lower",
            ],
        ),
        Chemistry::Nmc | Chemistry::Nca | Chemistry::Lco => (
            15.0,
            85.0,
            vec![
                "fast charging at high SOC should be more conservative",
                "derate at high temperature to protect cycle life",
            ],
        ),
    };

    SoaPolicy {
        recommended_soc_min_pct: min,
        recommended_soc_max_pct: max,
        notes: notes.into_iter().map(String::from).collect(),
    }
}

/// Cold and hot derating shared by both directions, in `[0.2, 1]`.
fn thermal_limit_factor(temp_c: f64) -> f64 {
    let cold = lerp(0.65, 1.0, smooth_step(-10.0, 15.0, temp_c));
    let hot = lerp(1.0, 0.65, smooth_step(45.0, 60.0, temp_c));
    clamp(cold * hot, 0.2, 1.0)
}

/// Lithium-plating and high-temperature charge risk, in `[0, 1]`.
fn charge_risk_factor(cell: &CellSpec, soc: f64, temp_c: f64) -> f64 {
    if temp_c <= cell.temp_charge_min_c {
        return 0.0;
    }
    let cold = smooth_step(cell.temp_charge_min_c, cell.temp_charge_min_c + 15.0, temp_c);
    let high_soc = 1.0 - 0.75 * smooth_step(0.85, 0.98, soc);
    let hot = 1.0 - 0.4 * smooth_step(40.0, 55.0, temp_c);
    clamp(cold * high_soc * hot, 0.0, 1.0)
}

fn axis((start, end, step): (i32, i32, i32)) -> Vec<f64> {
    (start..=end).step_by(step as usize).map(f64::from).collect()
}

/// Build the full charge/discharge current grid for `cell`.
pub fn build_soa_grid(cell: &CellSpec) -> SoaGrid {
    let soc_axis = axis(SOC_AXIS_PCT);
    let temp_axis = axis(TEMP_AXIS_C);

    let dis_spec_a = cell.max_discharge_c_cont * cell.capacity_ah;
    let chg_spec_a = cell.max_charge_c_cont * cell.capacity_ah;

    let mut discharge_a = Vec::with_capacity(temp_axis.len());
    let mut charge_a = Vec::with_capacity(temp_axis.len());

    for &temp_c in &temp_axis {
        let thermal = thermal_limit_factor(temp_c);
        let mut dis_row = Vec::with_capacity(soc_axis.len());
        let mut chg_row = Vec::with_capacity(soc_axis.len());

        for &soc_pct in &soc_axis {
            let soc = soc_pct / 100.0;
            let ocv = estimate_ocv_v(cell, soc);
            let r = estimate_resistance_ohm(cell, soc, temp_c);

            let dis_volt_a = ((ocv - cell.voltage_min) / r).max(0.0);
            let chg_volt_a = ((cell.voltage_max - ocv) / r).max(0.0);

            let dis = dis_volt_a.min(dis_spec_a * thermal);
            let risk = charge_risk_factor(cell, soc, temp_c);
            let chg = chg_volt_a.min(chg_spec_a * thermal * risk);

            dis_row.push(dis.round().max(0.0));
            chg_row.push(chg.round().max(0.0));
        }

        discharge_a.push(dis_row);
        charge_a.push(chg_row);
    }

    log::debug!(
        "built soa grid for {}: {}x{} nodes",
        cell.id,
        temp_axis.len(),
        soc_axis.len()
    );

    SoaGrid {
        soc_axis,
        temp_axis,
        discharge_a,
        charge_a,
    }
}
