use std::env;
use std::error::Error;
use std::fs;

use cellsoa::bindings::EngineRequest;
use cellsoa::{
    build_soa_grid, default_soa_policy, match_scenario_to_cells, normalize_scores_for_display,
};

fn main() -> Result<(), Box<dyn Error>> {
    let path = env::args()
        .nth(1)
        .ok_or("usage: cellsoa <request.json>")?;
    let request = EngineRequest::parse(&fs::read_to_string(&path)?)?;

    let results = match_scenario_to_cells(&request.cells, &request.scenario);
    let display = normalize_scores_for_display(&results);

    println!(
        "Scenario: {:.0} Wh @ {:.0} V, {:.0} W peak / {:.0} W cont, {:.0}..{:.0} °C",
        request.scenario.energy_wh,
        request.scenario.nominal_voltage_v,
        request.scenario.peak_power_w,
        request.scenario.continuous_power_w,
        request.scenario.min_ambient_temp_c,
        request.scenario.max_ambient_temp_c
    );
    println!("{} of {} cells applicable", results.len(), request.cells.len());

    for (result, row) in results.iter().zip(&display) {
        let pack = &result.best;
        let warnings: Vec<String> = pack.warnings.iter().map(|w| w.to_string()).collect();
        println!(
            "  {:<20} {:>5.1} ({:>2.0})  {}s{}p  {:.2}C cont  {:.2}C peak  life {:>6}  {}",
            result.cell.model,
            result.score,
            row.display_score,
            pack.ns,
            pack.np,
            pack.cont_c_rate,
            pack.peak_c_rate,
            pack.estimated_life_cycles,
            result.bottleneck
        );
        if !warnings.is_empty() {
            println!("  {:<20} warnings: {}", "", warnings.join(", "));
        }
    }

    let Some(top) = results.first() else {
        return Ok(());
    };

    let grid = build_soa_grid(&top.cell);
    let policy = default_soa_policy(&top.cell);
    println!();
    println!(
        "SOA discharge limits for {}, {} [A] (rows °C, columns SOC %)",
        top.cell.model,
        top.cell.chemistry.label()
    );
    print!("{:>6}", "");
    for soc in grid.soc_axis.iter().step_by(2) {
        print!("{:>6.0}", soc);
    }
    println!();
    for (temp, row) in grid.temp_axis.iter().zip(&grid.discharge_a) {
        print!("{:>6.0}", temp);
        for amps in row.iter().step_by(2) {
            print!("{:>6.0}", amps);
        }
        println!();
    }
    println!(
        "Advisory SOC window: {:.0}%..{:.0}% ({})",
        policy.recommended_soc_min_pct,
        policy.recommended_soc_max_pct,
        policy.notes.join("; ")
    );

    Ok(())
}
