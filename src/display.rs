//! Display-only post-processing of ranked results.
//!
//! Nothing here feeds back into scoring: the engine's `CellMatchResult`s are
//! read, never modified, and the spread scores exist only for list rendering.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::matching::CellMatchResult;

const SPREAD_MIN: f64 = 68.0;
const SPREAD_MAX: f64 = 97.0;
const DISPLAY_CEILING: f64 = 99.0;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecommendTier {
    Recommended,
    Alternative,
    Usable,
}

impl RecommendTier {
    fn for_rank(index: usize) -> Self {
        match index {
            0 => RecommendTier::Recommended,
            1 | 2 => RecommendTier::Alternative,
            _ => RecommendTier::Usable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRow {
    pub cell_id: String,
    pub score: f64,
    pub display_score: f64,
    pub tier: RecommendTier,
}

/// Spread clustered scores so a ranked list is visually distinguishable.
///
/// Expects `results` in rank order, as returned by the matcher.
pub fn normalize_scores_for_display(results: &[CellMatchResult]) -> Vec<DisplayRow> {
    if results.is_empty() {
        return Vec::new();
    }

    let max = results.iter().map(|r| r.score).fold(f64::MIN, f64::max);
    let min = results.iter().map(|r| r.score).fold(f64::MAX, f64::min);
    let distinct: HashSet<u64> = results.iter().map(|r| r.score.to_bits()).collect();
    let spread = max - min < 6.0 || (distinct.len() < 3 && results.len() >= 3);

    results
        .iter()
        .enumerate()
        .map(|(index, r)| {
            let display = if !spread {
                r.score
            } else if max == min {
                SPREAD_MAX - 3.0 * index as f64
            } else {
                let t = (r.score - min) / (max - min);
                (SPREAD_MIN + t * (SPREAD_MAX - SPREAD_MIN)).round() - index as f64
            };
            DisplayRow {
                cell_id: r.cell.id.clone(),
                score: r.score,
                display_score: display.clamp(0.0, DISPLAY_CEILING),
                tier: RecommendTier::for_rank(index),
            }
        })
        .collect()
}
