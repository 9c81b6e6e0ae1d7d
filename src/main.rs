//! Wrenfall - demo driver
//!
//! Builds the default skill registry, feeds it some xp and prints the
//! level-up narration, standing in for the combat/activity systems
//! that drive the engine in the full game.

use anyhow::Result;

use wrenfall::data::DataManager;
use wrenfall::progression::{DepositOutcome, ScalingCurve};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting wrenfall v{}", env!("CARGO_PKG_VERSION"));

    let data = DataManager::new();
    let mut registry = data.build_registry()?;

    let deposits = [
        ("Combat", 150.0),
        ("Evasion", 650.0),
        ("Stance mastery", 2_300.0),
        ("Quick steps", 300.0),
        // enough to cross the level-5 milestone that unlocks Meditation
        ("Sleeping", 40_000.0),
        ("Meditation", 250.0),
    ];
    for (skill, amount) in deposits {
        match registry.deposit_xp(skill, amount)? {
            DepositOutcome::LeveledUp(report) => println!("{}\n", report.message),
            DepositOutcome::Progressed => {
                println!("{} gained {} xp\n", registry.display_name(skill)?, amount)
            }
            DepositOutcome::NoChange => {}
        }
    }

    println!(
        "Combat hit-chance coefficient: {}",
        registry.coefficient("Combat", ScalingCurve::Multiplicative)?
    );
    println!(
        "Quick steps catch-up multiplier: {:.3}",
        registry.catch_up_multiplier("Quick steps")?
    );
    println!(
        "Sleeping milestones so far:\n{}",
        registry.unlocked_milestone_text("Sleeping")?
    );

    Ok(())
}
