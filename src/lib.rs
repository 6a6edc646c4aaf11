//! Battery cell selection and safe-operating-area estimation.
//!
//! Estimator → {SOA grid builder, pack sizing and matching}. All engine
//! functions are pure; caching is opt-in through [`EngineCache`].

pub mod bindings;
pub mod cache;
pub mod cell;
pub mod coverage;
pub mod display;
pub mod error;
pub mod estimator;
pub mod math;
pub mod matching;
pub mod scenario;
pub mod soa;

pub use cache::EngineCache;
pub use cell::{CellSpec, Chemistry, FormFactor};
pub use coverage::{calculate_coverage, Coverage, CoverageGap, CoverageLevel};
pub use display::{normalize_scores_for_display, DisplayRow, RecommendTier};
pub use error::EngineError;
pub use estimator::{
    estimate_at, estimate_life_cycles, estimate_ocv_v, estimate_resistance_ohm,
    estimate_thermal_delta_t_cont_c, CellEstimate, OperatingPoint,
};
pub use matching::{
    find_best_pack, match_scenario_to_cells, score_candidate, Bottleneck, CandidateScore,
    CellMatchResult, PackCandidate, WarningTag,
};
pub use scenario::{Application, Cooling, Priority, ScenarioSpec};
pub use soa::{build_soa_grid, default_soa_policy, Direction, SoaGrid, SoaPolicy};

use log::Level;
use wasm_bindgen::prelude::*;

/// Route `log` output to the browser console when the module loads.
#[wasm_bindgen(start)]
pub fn start() {
    let _ = console_log::init_with_level(Level::Debug);
    log::debug!("cellsoa engine loaded");
}
