//! Keeper Navigation Simulator
//!
//! Headless runner for creature navigation. Loads a scenario, sends every
//! creature to its destination and steps the navigation system on a fixed
//! tick until all of them have arrived or the tick budget runs out.
//!
//! Run with: cargo run -p keeper_sim
//!       or: cargo run --bin keeper-sim -- path/to/scenario.toml

mod error;
mod scenario;
mod simulation;

use scenario::SimConfig;
use simulation::Simulation;

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    if let Err(e) = run(&SimConfig::load()) {
        log::error!("Simulation failed: {}", e);
        std::process::exit(1);
    }
}

fn run(config: &SimConfig) -> error::Result<()> {
    let scenario = config.scenario()?;
    let mut simulation = Simulation::new(&scenario)?;
    let summary = simulation.run()?;

    log::info!(
        "Finished after {} ticks ({:.2}s simulated), {}/{} agents at their goal",
        summary.ticks_run,
        summary.ticks_run as f32 * scenario.dt,
        summary.arrived_count(),
        summary.outcomes.len()
    );
    for outcome in &summary.outcomes {
        let tile = simulation.system().tile_space().tile_at(outcome.position);
        log::info!(
            "  Agent {}: {} on tile {} facing {:.2} rad{}",
            outcome.id,
            outcome.position,
            tile,
            outcome.orientation,
            if outcome.unreachable { " (destination unreachable)" } else { "" }
        );
    }
    Ok(())
}
