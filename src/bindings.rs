//! JSON entry points for the browser front end.
//!
//! Each exported function has a plain Rust twin returning `EngineError`, so
//! the conversion to `JsValue` stays at the very edge.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::cell::CellSpec;
use crate::coverage::{calculate_coverage, Coverage};
use crate::display::{normalize_scores_for_display, DisplayRow};
use crate::error::EngineError;
use crate::matching::{match_scenario_to_cells, CellMatchResult};
use crate::scenario::ScenarioSpec;
use crate::soa::{build_soa_grid, default_soa_policy, SoaGrid, SoaPolicy};

/// A catalog and a workload, as sent by the front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineRequest {
    pub cells: Vec<CellSpec>,
    #[serde(default)]
    pub scenario: ScenarioSpec,
}

impl EngineRequest {
    /// Deserialize and validate every cell and the scenario.
    ///
    /// Cell ids must be unique across the catalog.
    pub fn parse(json: &str) -> Result<Self, EngineError> {
        let request: EngineRequest = serde_json::from_str(json)?;
        let mut seen = HashSet::with_capacity(request.cells.len());
        for cell in &request.cells {
            cell.validate()?;
            if !seen.insert(cell.id.as_str()) {
                return Err(EngineError::DuplicateCellId(cell.id.clone()));
            }
        }
        request.scenario.validate()?;
        Ok(request)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoaResponse {
    pub grid: SoaGrid,
    pub policy: SoaPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub results: Vec<CellMatchResult>,
    pub display: Vec<DisplayRow>,
}

pub fn soa_grid_for(cell_json: &str) -> Result<String, EngineError> {
    let cell: CellSpec = serde_json::from_str(cell_json)?;
    cell.validate()?;
    let response = SoaResponse {
        grid: build_soa_grid(&cell),
        policy: default_soa_policy(&cell),
    };
    Ok(serde_json::to_string(&response)?)
}

pub fn coverage_for(cell_json: &str, temperature_c: f64, c_rate: f64) -> Result<Coverage, EngineError> {
    let cell: CellSpec = serde_json::from_str(cell_json)?;
    cell.validate()?;
    Ok(calculate_coverage(&cell, temperature_c, c_rate))
}

pub fn match_cells_for(request_json: &str) -> Result<String, EngineError> {
    let request = EngineRequest::parse(request_json)?;
    let results = match_scenario_to_cells(&request.cells, &request.scenario);
    let display = normalize_scores_for_display(&results);
    Ok(serde_json::to_string(&MatchResponse { results, display })?)
}

fn to_js(err: EngineError) -> JsValue {
    log::error!("{}", err);
    js_sys::Error::new(&err.to_string()).into()
}

#[wasm_bindgen]
pub fn soa_grid_json(cell_json: &str) -> Result<String, JsValue> {
    soa_grid_for(cell_json).map_err(to_js)
}

#[wasm_bindgen]
pub fn coverage_json(cell_json: &str, temperature_c: f64, c_rate: f64) -> Result<String, JsValue> {
    coverage_for(cell_json, temperature_c, c_rate)
        .and_then(|coverage| Ok(serde_json::to_string(&coverage)?))
        .map_err(to_js)
}

#[wasm_bindgen]
pub fn match_cells_json(request_json: &str) -> Result<String, JsValue> {
    match_cells_for(request_json).map_err(to_js)
}

#[wasm_bindgen]
pub fn default_scenario_json() -> String {
    // Serializing a plain struct of numbers and enums cannot fail.
    serde_json::to_string(&ScenarioSpec::default()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::fixtures::{lfp_280, nmc_21700};

    #[test]
    fn test_soa_grid_roundtrip() {
        let json = serde_json::to_string(&lfp_280()).unwrap();
        let out = soa_grid_for(&json).unwrap();
        let response: SoaResponse = serde_json::from_str(&out).unwrap();
        assert_eq!(response.grid, build_soa_grid(&lfp_280()));
        assert_eq!(response.policy.recommended_soc_max_pct, 90.0);
    }

    #[test]
    fn test_invalid_cell_rejected_at_load() {
        let mut cell = lfp_280();
        cell.voltage_max = 2.0;
        let json = serde_json::to_string(&cell).unwrap();
        assert!(matches!(soa_grid_for(&json), Err(EngineError::InvalidCell { .. })));
    }

    #[test]
    fn test_scenario_defaults_when_absent() {
        let json = format!(r#"{{"cells": [{}]}}"#, serde_json::to_string(&nmc_21700()).unwrap());
        let request = EngineRequest::parse(&json).unwrap();
        assert_eq!(request.scenario, ScenarioSpec::default());
    }

    #[test]
    fn test_match_response() {
        let request = EngineRequest {
            cells: vec![lfp_280(), nmc_21700()],
            scenario: ScenarioSpec::default(),
        };
        let out = match_cells_for(&serde_json::to_string(&request).unwrap()).unwrap();
        let response: MatchResponse = serde_json::from_str(&out).unwrap();
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.display.len(), 2);
        assert_eq!(response.display[0].cell_id, response.results[0].cell.id);
    }

    #[test]
    fn test_duplicate_ids_rejected_at_load() {
        let twin = CellSpec {
            id: "lfp-280".to_string(),
            ..nmc_21700()
        };
        let request = EngineRequest {
            cells: vec![lfp_280(), twin],
            scenario: ScenarioSpec::default(),
        };
        let json = serde_json::to_string(&request).unwrap();
        match EngineRequest::parse(&json) {
            Err(EngineError::DuplicateCellId(id)) => assert_eq!(id, "lfp-280"),
            other => panic!("expected duplicate id rejection, got {:?}", other),
        }
        assert!(matches!(match_cells_for(&json), Err(EngineError::DuplicateCellId(_))));
    }

    #[test]
    fn test_catalog_record_row_builds_grid() {
        let row = r#"{
            "id": "nmc-21700", "model": "NMC-21700-5Ah", "chemistry": "NMC",
            "formFactor": "cylindrical",
            "capacityAh": 5, "nominalV": 3.6, "vMin": 2.5, "vMax": 4.2,
            "maxDischargeCCont": 3, "maxDischargeCPulse": 10, "maxChargeCCont": 1,
            "tempDischargeMinC": -20, "tempDischargeMaxC": 60,
            "tempChargeMinC": 0, "tempChargeMaxC": 45,
            "massG": 69, "resistanceMOhm25C": 15, "cycleLife80DoD25C": 1000,
            "costTier": 3, "dataQuality": "estimated"
        }"#;
        let out = soa_grid_for(row).unwrap();
        let response: SoaResponse = serde_json::from_str(&out).unwrap();
        assert_eq!(response.grid, build_soa_grid(&nmc_21700()));
    }

    #[test]
    fn test_coverage_for_cell_json() {
        let json = serde_json::to_string(&lfp_280()).unwrap();
        let coverage = coverage_for(&json, -25.0, 1.2).unwrap();
        assert_eq!(coverage, calculate_coverage(&lfp_280(), -25.0, 1.2));
        assert_eq!(coverage.percentage, 35);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(match_cells_for("{not json"), Err(EngineError::Json(_))));
    }

    #[test]
    fn test_default_scenario_json_parses() {
        let scenario: ScenarioSpec = serde_json::from_str(&default_scenario_json()).unwrap();
        assert_eq!(scenario, ScenarioSpec::default());
    }
}
