//! Pack sizing and scenario-to-cell ranking.

mod pack;
mod score;

pub use pack::{find_best_pack, PackCandidate, WarningTag};
pub use score::{score_candidate, Bottleneck, CandidateScore};

use serde::{Deserialize, Serialize};

use crate::cell::CellSpec;
use crate::scenario::ScenarioSpec;

/// At most this many results are returned by a ranking.
pub const MATCH_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellMatchResult {
    pub cell: CellSpec,
    pub best: PackCandidate,
    pub score: f64,
    pub bottleneck: Bottleneck,
}

/// Size and score one cell. `None` when the cell cannot reach the pack voltage.
pub fn evaluate_cell(cell: &CellSpec, scenario: &ScenarioSpec) -> Option<CellMatchResult> {
    let Some(best) = find_best_pack(cell, scenario) else {
        log::warn!(
            "skipping {}: {:.2} V cell cannot build a {:.1} V pack",
            cell.id,
            cell.nominal_voltage_v,
            scenario.nominal_voltage_v
        );
        return None;
    };
    let CandidateScore { score, bottleneck } = score_candidate(cell, &best, scenario);
    Some(CellMatchResult {
        cell: cell.clone(),
        best,
        score,
        bottleneck,
    })
}

/// Sort descending by score and keep the top `MATCH_LIMIT`.
///
/// The sort is stable, so equal scores keep catalog order.
pub fn rank(mut results: Vec<CellMatchResult>) -> Vec<CellMatchResult> {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(MATCH_LIMIT);
    results
}

/// Rank every applicable catalog cell against `scenario`.
pub fn match_scenario_to_cells(cells: &[CellSpec], scenario: &ScenarioSpec) -> Vec<CellMatchResult> {
    let results = cells
        .iter()
        .filter_map(|cell| evaluate_cell(cell, scenario))
        .collect();
    let ranked = rank(results);
    log::debug!(
        "ranked {} of {} cells, top score {:?}",
        ranked.len(),
        cells.len(),
        ranked.first().map(|r| r.score)
    );
    ranked
}
