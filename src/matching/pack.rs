use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::CellSpec;
use crate::estimator::{estimate_life_cycles, estimate_thermal_delta_t_cont_c};
use crate::scenario::ScenarioSpec;

/// Advisory boundary violations attached to a pack candidate.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningTag {
    PeakRateExceeded,
    ContinuousRateExceeded,
    LowTempDischargeRisk,
    HighTempDischargeRisk,
    LowTempChargeProhibited,
    CycleLifeBelowTarget,
}

impl fmt::Display for WarningTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WarningTag::PeakRateExceeded => "peak rate exceeded",
            WarningTag::ContinuousRateExceeded => "continuous rate exceeded",
            WarningTag::LowTempDischargeRisk => "low-temperature discharge risk",
            WarningTag::HighTempDischargeRisk => "high-temperature discharge risk",
            WarningTag::LowTempChargeProhibited => "low-temperature charge prohibited",
            WarningTag::CycleLifeBelowTarget => "cycle life below target",
        };
        f.write_str(label)
    }
}

/// A series/parallel arrangement of one cell sized for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackCandidate {
    pub ns: u32,
    pub np: u32,
    pub pack_nominal_v: f64,
    pub pack_energy_wh: f64,
    pub peak_cell_a: f64,
    pub cont_cell_a: f64,
    pub peak_c_rate: f64,
    pub cont_c_rate: f64,
    /// Pulse ceiling minus required peak C-rate; negative means overstressed.
    pub peak_margin: f64,
    /// Continuous ceiling minus required continuous C-rate.
    pub cont_margin: f64,
    pub estimated_delta_t_cont_c: f64,
    pub estimated_life_cycles: u32,
    pub warnings: Vec<WarningTag>,
}

impl PackCandidate {
    pub fn has_warning(&self, tag: WarningTag) -> bool {
        self.warnings.contains(&tag)
    }
}

/// Size a pack of `cell` for `scenario`.
///
/// Returns `None` when the voltage target cannot be reached with at least
/// one series cell; that means "not applicable", not a fault.
pub fn find_best_pack(cell: &CellSpec, scenario: &ScenarioSpec) -> Option<PackCandidate> {
    let ns_raw = (scenario.nominal_voltage_v / cell.nominal_voltage_v).round();
    if !(ns_raw >= 1.0) || !ns_raw.is_finite() {
        return None;
    }
    let ns = ns_raw as u32;

    let pack_nominal_v = f64::from(ns) * cell.nominal_voltage_v;
    let cell_energy_wh = cell.energy_wh();
    let np_raw = (scenario.energy_wh / (f64::from(ns) * cell_energy_wh)).round();
    // NaN and sub-one values both collapse to a single string.
    let np = if np_raw >= 1.0 && np_raw.is_finite() {
        np_raw as u32
    } else {
        1
    };
    let pack_energy_wh = f64::from(ns) * f64::from(np) * cell_energy_wh;

    let peak_cell_a = scenario.peak_power_w / pack_nominal_v / f64::from(np);
    let cont_cell_a = scenario.continuous_power_w / pack_nominal_v / f64::from(np);
    let peak_c_rate = peak_cell_a / cell.capacity_ah;
    let cont_c_rate = cont_cell_a / cell.capacity_ah;

    let peak_margin = cell.max_discharge_c_pulse - peak_c_rate;
    let cont_margin = cell.max_discharge_c_cont - cont_c_rate;

    let avg_temp_c = scenario.ambient_midpoint_c();
    let estimated_delta_t_cont_c =
        estimate_thermal_delta_t_cont_c(cell, cont_cell_a, avg_temp_c, scenario.cooling);
    let estimated_life_cycles = estimate_life_cycles(
        cell,
        scenario.usable_soc_fraction(),
        avg_temp_c + estimated_delta_t_cont_c * 0.5,
        cont_c_rate,
    );

    let mut warnings = Vec::new();
    if peak_margin < 0.0 {
        warnings.push(WarningTag::PeakRateExceeded);
    }
    if cont_margin < 0.0 {
        warnings.push(WarningTag::ContinuousRateExceeded);
    }
    if scenario.min_ambient_temp_c < cell.temp_discharge_min_c {
        warnings.push(WarningTag::LowTempDischargeRisk);
    }
    if scenario.max_ambient_temp_c + estimated_delta_t_cont_c > cell.temp_discharge_max_c {
        warnings.push(WarningTag::HighTempDischargeRisk);
    }
    if scenario.min_ambient_temp_c < cell.temp_charge_min_c {
        warnings.push(WarningTag::LowTempChargeProhibited);
    }
    if estimated_life_cycles < scenario.expected_cycles {
        warnings.push(WarningTag::CycleLifeBelowTarget);
    }

    log::debug!(
        "sized {}: {}s{}p, {:.2}C cont / {:.2}C peak, dT={:.1}C, life={} cycles, {} warnings",
        cell.id,
        ns,
        np,
        cont_c_rate,
        peak_c_rate,
        estimated_delta_t_cont_c,
        estimated_life_cycles,
        warnings.len()
    );

    Some(PackCandidate {
        ns,
        np,
        pack_nominal_v,
        pack_energy_wh,
        peak_cell_a,
        cont_cell_a,
        peak_c_rate,
        cont_c_rate,
        peak_margin,
        cont_margin,
        estimated_delta_t_cont_c,
        estimated_life_cycles,
        warnings,
    })
}
