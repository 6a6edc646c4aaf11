use std::collections::HashMap;

use crate::cell::CellSpec;
use crate::matching::{evaluate_cell, rank, CellMatchResult};
use crate::scenario::ScenarioSpec;
use crate::soa::{build_soa_grid, SoaGrid};

/// Caller-owned memoization of grids and per-cell match results.
///
/// Grids are keyed by cell id and match results by `(cell id, scenario
/// fingerprint)`. Each entry keeps the cell it was computed from and is
/// recomputed when a lookup brings a different cell under the same id.
#[derive(Debug, Default)]
pub struct EngineCache {
    grids: HashMap<String, (CellSpec, SoaGrid)>,
    matches: HashMap<(String, u64), (CellSpec, Option<CellMatchResult>)>,
}

impl EngineCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn soa_grid(&mut self, cell: &CellSpec) -> &SoaGrid {
        let entry = self
            .grids
            .entry(cell.id.clone())
            .or_insert_with(|| {
                log::debug!("soa grid cache miss for {}", cell.id);
                (cell.clone(), build_soa_grid(cell))
            });
        if entry.0 != *cell {
            log::debug!("soa grid for {} is stale, rebuilding", cell.id);
            *entry = (cell.clone(), build_soa_grid(cell));
        }
        &entry.1
    }

    /// Same ranking as `match_scenario_to_cells`, reusing cached evaluations.
    pub fn match_cells(&mut self, cells: &[CellSpec], scenario: &ScenarioSpec) -> Vec<CellMatchResult> {
        let fingerprint = scenario.fingerprint();
        let mut results = Vec::with_capacity(cells.len());
        for cell in cells {
            let entry = self
                .matches
                .entry((cell.id.clone(), fingerprint))
                .or_insert_with(|| {
                    log::trace!("match cache miss for {} / {:016x}", cell.id, fingerprint);
                    (cell.clone(), evaluate_cell(cell, scenario))
                });
            if entry.0 != *cell {
                log::trace!("stale match for {} / {:016x}", cell.id, fingerprint);
                *entry = (cell.clone(), evaluate_cell(cell, scenario));
            }
            if let Some(result) = &entry.1 {
                results.push(result.clone());
            }
        }
        rank(results)
    }

    pub fn invalidate_cell(&mut self, cell_id: &str) {
        self.grids.remove(cell_id);
        self.matches.retain(|(id, _), _| id != cell_id);
    }

    pub fn clear(&mut self) {
        self.grids.clear();
        self.matches.clear();
    }

    pub fn len(&self) -> usize {
        self.grids.len() + self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
