use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cell::{CellSpec, Chemistry};
use crate::math::clamp;
use crate::matching::pack::PackCandidate;
use crate::scenario::{Priority, ScenarioSpec};

const PEAK_RATE_PENALTY: f64 = 40.0;
const CONT_RATE_PENALTY: f64 = 30.0;
const LOW_TEMP_CHARGE_PENALTY: f64 = 15.0;
const LOW_TEMP_DISCHARGE_PENALTY: f64 = 20.0;
const LIFE_SHORTFALL_WEIGHT: f64 = 25.0;
const COST_TIER_STEP: f64 = 3.0;
const COST_PRIORITY_PENALTY: f64 = 10.0;

/// The constraint blamed for a candidate's score.
///
/// Attribution is first-match-wins in declaration order, while every
/// triggered penalty still lowers the numeric score.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Bottleneck {
    PeakRateExceeded,
    ContinuousRateInsufficient,
    LowTempChargeRestricted,
    LowTempDischargeRisk,
    CycleLifeInsufficient,
    CostHigh,
    None,
}

impl fmt::Display for Bottleneck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Bottleneck::PeakRateExceeded => "peak rate exceeded",
            Bottleneck::ContinuousRateInsufficient => "continuous rate insufficient",
            Bottleneck::LowTempChargeRestricted => "low-temperature charge restricted",
            Bottleneck::LowTempDischargeRisk => "low-temperature discharge risk",
            Bottleneck::CycleLifeInsufficient => "cycle life insufficient",
            Bottleneck::CostHigh => "cost high",
            Bottleneck::None => "no significant bottleneck",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    /// Heuristic suitability in `[0, 100]`.
    pub score: f64,
    pub bottleneck: Bottleneck,
}

/// Score a sized pack against the scenario.
pub fn score_candidate(cell: &CellSpec, pack: &PackCandidate, scenario: &ScenarioSpec) -> CandidateScore {
    let mut score = 100.0;
    let mut bottleneck = Bottleneck::None;
    let mut blame = |b: Bottleneck| {
        if bottleneck == Bottleneck::None {
            bottleneck = b;
        }
    };

    if pack.peak_margin < 0.0 {
        score -= PEAK_RATE_PENALTY;
        blame(Bottleneck::PeakRateExceeded);
    } else if pack.cont_margin < 0.0 {
        score -= CONT_RATE_PENALTY;
        blame(Bottleneck::ContinuousRateInsufficient);
    }

    if scenario.min_ambient_temp_c < cell.temp_charge_min_c {
        score -= LOW_TEMP_CHARGE_PENALTY;
        blame(Bottleneck::LowTempChargeRestricted);
    }
    if scenario.min_ambient_temp_c < cell.temp_discharge_min_c {
        score -= LOW_TEMP_DISCHARGE_PENALTY;
        blame(Bottleneck::LowTempDischargeRisk);
    }

    let life_ratio = f64::from(pack.estimated_life_cycles) / f64::from(scenario.expected_cycles);
    if life_ratio < 1.0 {
        score -= LIFE_SHORTFALL_WEIGHT * (1.0 - life_ratio);
        blame(Bottleneck::CycleLifeInsufficient);
    }

    let tier = f64::from(cell.cost_tier);
    score -= COST_TIER_STEP * (tier - 1.0);
    if scenario.priority == Priority::Cost && cell.cost_tier > 3 {
        score -= COST_PRIORITY_PENALTY;
        blame(Bottleneck::CostHigh);
    }

    // Priority bonuses never change attribution.
    match scenario.priority {
        Priority::Safety if cell.chemistry == Chemistry::Lfp => score += 8.0,
        Priority::Performance if cell.max_discharge_c_pulse >= 10.0 => score += 6.0,
        Priority::Cost if cell.cost_tier <= 2 => score += 8.0,
        _ => {}
    }

    CandidateScore {
        score: clamp(score, 0.0, 100.0),
        bottleneck,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::fixtures::{lfp_280, lto_20, nmc_21700};
    use crate::matching::pack::find_best_pack;
    use crate::matching::pack::fixtures::storage_block_overdrawn;
    use crate::scenario::{Application, Cooling};

    fn blank_pack() -> PackCandidate {
        PackCandidate {
            ns: 1,
            np: 1,
            pack_nominal_v: 3.2,
            pack_energy_wh: 896.0,
            peak_cell_a: 0.0,
            cont_cell_a: 0.0,
            peak_c_rate: 0.0,
            cont_c_rate: 0.0,
            peak_margin: 1.0,
            cont_margin: 1.0,
            estimated_delta_t_cont_c: 0.0,
            estimated_life_cycles: 6000,
            warnings: Vec::new(),
        }
    }

    fn mild_scenario() -> ScenarioSpec {
        ScenarioSpec {
            min_ambient_temp_c: 10.0,
            max_ambient_temp_c: 30.0,
            expected_cycles: 1000,
            ..ScenarioSpec::default()
        }
    }

    #[test]
    fn test_continuous_overdraw_is_the_bottleneck() {
        let cell = lfp_280();
        let scenario = storage_block_overdrawn();
        let pack = find_best_pack(&cell, &scenario).unwrap();
        let result = score_candidate(&cell, &pack, &scenario);
        assert!(result.score <= 70.0, "score {} should be at most 70", result.score);
        assert_eq!(result.bottleneck, Bottleneck::ContinuousRateInsufficient);
        assert_eq!(result.bottleneck.to_string(), "continuous rate insufficient");
    }

    #[test]
    fn test_clean_candidate_scores_full() {
        let result = score_candidate(&lfp_280(), &blank_pack(), &mild_scenario());
        assert_eq!(result.score, 100.0);
        assert_eq!(result.bottleneck, Bottleneck::None);
    }

    #[test]
    fn test_peak_overrides_continuous() {
        let mut pack = blank_pack();
        pack.peak_margin = -0.1;
        pack.cont_margin = -0.1;
        let result = score_candidate(&lfp_280(), &pack, &mild_scenario());
        // Only the peak penalty applies; the continuous branch is exclusive.
        assert_eq!(result.score, 60.0);
        assert_eq!(result.bottleneck, Bottleneck::PeakRateExceeded);
    }

    #[test]
    fn test_first_trigger_wins_but_all_penalties_apply() {
        let mut cell = lfp_280();
        cell.temp_discharge_min_c = -5.0;
        let scenario = ScenarioSpec {
            min_ambient_temp_c: -10.0,
            ..mild_scenario()
        };
        let mut pack = blank_pack();
        pack.estimated_life_cycles = 500;
        let result = score_candidate(&cell, &pack, &scenario);
        // 15 (charge) + 20 (discharge) + 25 · 0.5 (life)
        assert!((result.score - 52.5).abs() < 1e-9);
        assert_eq!(result.bottleneck, Bottleneck::LowTempChargeRestricted);
    }

    #[test]
    fn test_life_penalty_is_proportional() {
        let mut pack = blank_pack();
        pack.estimated_life_cycles = 750;
        let result = score_candidate(&lfp_280(), &pack, &mild_scenario());
        assert!((result.score - 93.75).abs() < 1e-9);
        assert_eq!(result.bottleneck, Bottleneck::CycleLifeInsufficient);
    }

    #[test]
    fn test_cost_priority() {
        let scenario = ScenarioSpec {
            priority: Priority::Cost,
            ..mild_scenario()
        };
        let expensive = score_candidate(&lto_20(), &blank_pack(), &scenario);
        // tier 5: -12, plus -10 for cost priority
        assert_eq!(expensive.score, 78.0);
        assert_eq!(expensive.bottleneck, Bottleneck::CostHigh);

        let cheap = score_candidate(&lfp_280(), &blank_pack(), &scenario);
        assert_eq!(cheap.score, 100.0);
        assert_eq!(cheap.bottleneck, Bottleneck::None);
    }

    #[test]
    fn test_priority_bonuses_do_not_attribute() {
        let safety = ScenarioSpec {
            priority: Priority::Safety,
            ..mild_scenario()
        };
        let mut pack = blank_pack();
        pack.estimated_life_cycles = 900;
        let result = score_candidate(&lfp_280(), &pack, &safety);
        assert!((result.score - 100.0).abs() < 1e-9, "bonus is capped at 100");
        assert_eq!(result.bottleneck, Bottleneck::CycleLifeInsufficient);

        let performance = ScenarioSpec {
            priority: Priority::Performance,
            ..mild_scenario()
        };
        // tier 3: -6, pulse 10C: +6
        let result = score_candidate(&nmc_21700(), &blank_pack(), &performance);
        assert_eq!(result.score, 100.0);
    }

    #[test]
    fn test_score_bounded_for_adversarial_inputs() {
        let mut cells = vec![lfp_280(), nmc_21700(), lto_20()];
        let mut worst = nmc_21700();
        worst.cost_tier = u8::MAX;
        worst.temp_charge_min_c = 100.0;
        worst.temp_discharge_min_c = 100.0;
        worst.max_discharge_c_pulse = 0.0;
        worst.max_discharge_c_cont = 0.0;
        worst.cycle_life_80_dod_at_25c = 1;
        cells.push(worst);
        let mut tiny = lfp_280();
        tiny.capacity_ah = 1e-12;
        cells.push(tiny);

        let mut scenarios = Vec::new();
        for priority in [Priority::Safety, Priority::Balanced, Priority::Performance, Priority::Cost] {
            for cooling in [Cooling::Poor, Cooling::Normal, Cooling::Good] {
                for (power, cycles) in [(0.0, 1), (1e9, u32::MAX), (f64::MAX, 1500)] {
                    scenarios.push(ScenarioSpec {
                        application: Application::Drone,
                        peak_power_w: power,
                        continuous_power_w: power,
                        expected_cycles: cycles,
                        cooling,
                        priority,
                        ..ScenarioSpec::default()
                    });
                }
            }
        }

        for cell in &cells {
            for scenario in &scenarios {
                if let Some(pack) = find_best_pack(cell, scenario) {
                    let result = score_candidate(cell, &pack, scenario);
                    assert!(
                        (0.0..=100.0).contains(&result.score),
                        "score {} escaped bounds for {}",
                        result.score,
                        cell.id
                    );
                }
            }
        }
    }
}
