use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::math::clamp;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Application {
    #[serde(rename = "EV")]
    Ev,
    Storage,
    Drone,
    Consumer,
    PowerTool,
    OutdoorPower,
}

/// Pack cooling quality. Worse cooling amplifies the steady-state rise.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cooling {
    Poor,
    Normal,
    Good,
}

impl Cooling {
    /// Heuristic temperature rise per watt of ohmic heat [°C/W].
    pub fn coefficient_c_per_w(self) -> f64 {
        match self {
            Cooling::Poor => 0.18,
            Cooling::Normal => 0.12,
            Cooling::Good => 0.08,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Safety,
    Balanced,
    Performance,
    Cost,
}

/// Workload a pack must serve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSpec {
    pub application: Application,
    pub energy_wh: f64,
    pub nominal_voltage_v: f64,
    pub peak_power_w: f64,
    pub continuous_power_w: f64,
    pub min_ambient_temp_c: f64,
    pub max_ambient_temp_c: f64,
    pub expected_cycles: u32,
    pub cooling: Cooling,
    pub priority: Priority,
}

impl Default for ScenarioSpec {
    fn default() -> Self {
        Self {
            application: Application::Ev,
            energy_wh: 60_000.0,
            nominal_voltage_v: 400.0,
            peak_power_w: 180_000.0,
            continuous_power_w: 60_000.0,
            min_ambient_temp_c: -10.0,
            max_ambient_temp_c: 40.0,
            expected_cycles: 1500,
            cooling: Cooling::Good,
            priority: Priority::Balanced,
        }
    }
}

impl ScenarioSpec {
    pub fn ambient_midpoint_c(&self) -> f64 {
        (self.min_ambient_temp_c + self.max_ambient_temp_c) / 2.0
    }

    /// Average fraction of capacity cycled per cycle, by application and priority.
    pub fn usable_soc_fraction(&self) -> f64 {
        let base = match self.application {
            Application::Storage => 0.75,
            Application::Ev => 0.8,
            Application::Drone => 0.85,
            _ => 0.8,
        };
        let priority_adj = match self.priority {
            Priority::Safety => -0.12,
            Priority::Cost => 0.06,
            Priority::Performance => 0.04,
            Priority::Balanced => 0.0,
        };
        clamp(base + priority_adj, 0.6, 0.9)
    }

    /// Deterministic hash over every field, used as a memoization key.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.application.hash(&mut hasher);
        for value in [
            self.energy_wh,
            self.nominal_voltage_v,
            self.peak_power_w,
            self.continuous_power_w,
            self.min_ambient_temp_c,
            self.max_ambient_temp_c,
        ] {
            value.to_bits().hash(&mut hasher);
        }
        self.expected_cycles.hash(&mut hasher);
        self.cooling.hash(&mut hasher);
        self.priority.hash(&mut hasher);
        hasher.finish()
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.nominal_voltage_v > 0.0) {
            return Err(EngineError::InvalidScenario("pack voltage must be positive"));
        }
        if !(self.energy_wh > 0.0) {
            return Err(EngineError::InvalidScenario("pack energy must be positive"));
        }
        if !(self.peak_power_w >= 0.0 && self.continuous_power_w >= 0.0) {
            return Err(EngineError::InvalidScenario("power demand must be non-negative"));
        }
        if !(self.min_ambient_temp_c <= self.max_ambient_temp_c) {
            return Err(EngineError::InvalidScenario("ambient range is inverted"));
        }
        if self.expected_cycles == 0 {
            return Err(EngineError::InvalidScenario("expected cycles must be positive"));
        }
        Ok(())
    }
}
