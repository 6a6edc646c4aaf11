use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Cell chemistry. Selects which OCV and derating curve family applies.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Chemistry {
    Lfp,
    Nmc,
    Nca,
    Lto,
    Lco,
}

impl Chemistry {
    /// Flat-plateau chemistries (LFP, LTO) use the plateau OCV family.
    pub fn has_flat_plateau(self) -> bool {
        matches!(self, Chemistry::Lfp | Chemistry::Lto)
    }

    /// Human-readable label for tables and reports.
    pub fn label(self) -> &'static str {
        match self {
            Chemistry::Lfp => "LFP (lithium iron phosphate)",
            Chemistry::Nmc => "NMC (nickel manganese cobalt)",
            Chemistry::Nca => "NCA (high-nickel)",
            Chemistry::Lto => "LTO (lithium titanate)",
            Chemistry::Lco => "LCO (lithium cobalt oxide)",
        }
    }
}

impl fmt::Display for Chemistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = match self {
            Chemistry::Lfp => "LFP",
            Chemistry::Nmc => "NMC",
            Chemistry::Nca => "NCA",
            Chemistry::Lto => "LTO",
            Chemistry::Lco => "LCO",
        };
        f.write_str(short)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormFactor {
    Cylindrical,
    Prismatic,
    Pouch,
}

/// Static datasheet attributes of one catalog cell.
///
/// Values are trusted by the estimators once `validate` has passed; build
/// catalogs through `CellSpec::validate` (or `EngineRequest::parse`) so that
/// inverted bounds are rejected at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellSpec {
    pub id: String,
    pub model: String,
    pub chemistry: Chemistry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_factor: Option<FormFactor>,

    pub capacity_ah: f64,
    #[serde(alias = "nominalV")]
    pub nominal_voltage_v: f64,
    #[serde(alias = "vMin")]
    pub voltage_min: f64,
    #[serde(alias = "vMax")]
    pub voltage_max: f64,

    pub max_discharge_c_cont: f64,
    pub max_discharge_c_pulse: f64,
    pub max_charge_c_cont: f64,

    pub temp_charge_min_c: f64,
    pub temp_charge_max_c: f64,
    pub temp_discharge_min_c: f64,
    pub temp_discharge_max_c: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass_g: Option<f64>,
    /// Internal resistance at 25 °C and mid-SOC [mΩ].
    #[serde(rename = "resistanceMOhmAt25C", alias = "resistanceMOhm25C")]
    pub resistance_m_ohm_at_25c: f64,
    /// Reference cycle life at 80% DoD and 25 °C.
    #[serde(rename = "cycleLife80DoDAt25C", alias = "cycleLife80DoD25C")]
    pub cycle_life_80_dod_at_25c: u32,
    /// 1 is the cheapest tier.
    pub cost_tier: u8,
}

impl CellSpec {
    /// Reference resistance in ohms.
    pub fn resistance_ohm_at_25c(&self) -> f64 {
        self.resistance_m_ohm_at_25c / 1000.0
    }

    /// Nominal stored energy of one cell [Wh].
    pub fn energy_wh(&self) -> f64 {
        self.capacity_ah * self.nominal_voltage_v
    }

    /// Check that every bound is self-consistent.
    pub fn validate(&self) -> Result<(), EngineError> {
        let fail = |reason| {
            Err(EngineError::InvalidCell {
                id: self.id.clone(),
                reason,
            })
        };

        if self.id.trim().is_empty() {
            return fail("id must not be empty");
        }
        if !(self.capacity_ah > 0.0) {
            return fail("capacity must be positive");
        }
        if !(self.voltage_min < self.nominal_voltage_v && self.nominal_voltage_v < self.voltage_max) {
            return fail("voltage bounds must satisfy min < nominal < max");
        }
        if self.voltage_min <= 0.0 {
            return fail("minimum voltage must be positive");
        }
        if !(self.max_discharge_c_cont >= 0.0 && self.max_charge_c_cont >= 0.0) {
            return fail("c-rate ceilings must be non-negative");
        }
        if !(self.max_discharge_c_pulse >= self.max_discharge_c_cont) {
            return fail("pulse discharge rate must not be below continuous rate");
        }
        if !(self.temp_charge_min_c <= self.temp_charge_max_c) {
            return fail("charge temperature window is inverted");
        }
        if !(self.temp_discharge_min_c <= self.temp_discharge_max_c) {
            return fail("discharge temperature window is inverted");
        }
        if !(self.resistance_m_ohm_at_25c > 0.0) {
            return fail("reference resistance must be positive");
        }
        if self.cycle_life_80_dod_at_25c == 0 {
            return fail("reference cycle life must be positive");
        }
        if self.cost_tier == 0 {
            return fail("cost tier starts at 1");
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_fixtures_validate() {
        for cell in [lfp_280(), nmc_21700(), lto_20()] {
            assert!(cell.validate().is_ok(), "fixture {} should be valid", cell.id);
        }
    }

    #[test]
    fn test_inverted_voltage_rejected() {
        let mut cell = lfp_280();
        cell.voltage_min = 3.7;
        let err = cell.validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidCell { ref id, .. } if id == "lfp-280"));
    }

    #[test]
    fn test_inverted_temperature_window_rejected() {
        let mut cell = nmc_21700();
        cell.temp_charge_min_c = 50.0;
        assert!(cell.validate().is_err());
    }

    #[test]
    fn test_pulse_below_continuous_rejected() {
        let mut cell = nmc_21700();
        cell.max_discharge_c_pulse = 1.0;
        assert!(cell.validate().is_err());
    }

    #[test]
    fn test_nan_capacity_rejected() {
        let mut cell = lfp_280();
        cell.capacity_ah = f64::NAN;
        assert!(cell.validate().is_err());
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(lfp_280()).unwrap();
        assert_eq!(json["chemistry"], "LFP");
        assert_eq!(json["maxDischargeCCont"], 1.0);
        assert_eq!(json["formFactor"], "prismatic");
        assert_eq!(json["resistanceMOhmAt25C"], 0.25);
        assert_eq!(json["cycleLife80DoDAt25C"], 6000);
    }

    #[test]
    fn test_catalog_record_names_accepted() {
        let row = r#"{
            "id": "lfp-280", "model": "LFP-280Ah", "chemistry": "LFP", "formFactor": "prismatic",
            "capacityAh": 280, "nominalV": 3.2, "vMin": 2.8, "vMax": 3.65,
            "maxDischargeCCont": 1.0, "maxDischargeCPulse": 2.0, "maxChargeCCont": 0.5,
            "tempDischargeMinC": -20, "tempDischargeMaxC": 55,
            "tempChargeMinC": 0, "tempChargeMaxC": 45,
            "massG": 5400, "resistanceMOhm25C": 0.25,
            "cycleLife80DoD25C": 6000, "costTier": 1,
            "dataQuality": "demo", "sourceNote": "typical datasheet values"
        }"#;
        let cell: CellSpec = serde_json::from_str(row).unwrap();
        assert_eq!(cell, lfp_280());
    }
}
