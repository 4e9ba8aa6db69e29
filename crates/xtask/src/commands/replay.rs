//! Replay a scripted damage/death scenario
//!
//! Scenario files are RON. Time is driven by the script through a manual
//! clock, so a replay is reproducible up to random message selection.
//!
//! ```ron
//! Scenario(
//!     players: [
//!         (id: 1, name: "Steve"),
//!         (id: 2, name: "Alex", location: Some((world: "world", x: 0.0, y: 64.0, z: 0.0))),
//!     ],
//!     steps: [
//!         Damage(at_ms: 0, event: (victim: 1, final_damage: 10.0, cause: PROJECTILE, source: Projectile(shooter: Some(2)))),
//!         Death(at_ms: 2000, event: (victim: 1, cause: Some(FALL), direct_killer: None)),
//!         Disconnect(at_ms: 3000, entity: 2),
//!     ],
//! )
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use obituary_content::{CatalogLoader, ConfigLoader};
use obituary_core::{DamageEvent, DeathEvent, EntityId, Location, ManualClock, ObituaryConfig};
use obituary_runtime::{DeathOutcome, Obituary, Observation, PlayerRoster};

/// Replay a scenario against a catalog
#[derive(Parser)]
pub struct Replay {
    /// Path to the scenario file (RON)
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,

    /// Message catalog to compose deaths from
    #[arg(short, long, value_name = "FILE")]
    catalog: PathBuf,

    /// Configuration file (defaults are used if omitted)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also print what happened to every damage event
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    players: Vec<ScenarioPlayer>,
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct ScenarioPlayer {
    id: EntityId,
    name: String,
    #[serde(default)]
    location: Option<Location>,
}

#[derive(Debug, Deserialize)]
enum Step {
    Damage { at_ms: u64, event: DamageEvent },
    Death { at_ms: u64, event: DeathEvent },
    Disconnect { at_ms: u64, entity: EntityId },
}

impl Step {
    fn at_ms(&self) -> u64 {
        match self {
            Step::Damage { at_ms, .. } | Step::Death { at_ms, .. } | Step::Disconnect { at_ms, .. } => {
                *at_ms
            }
        }
    }
}

impl Replay {
    pub fn execute(self) -> Result<()> {
        let content = std::fs::read_to_string(&self.scenario)
            .with_context(|| format!("Failed to read scenario: {}", self.scenario.display()))?;
        let scenario: Scenario = ron::from_str(&content)
            .with_context(|| format!("Failed to parse scenario: {}", self.scenario.display()))?;

        let config = match &self.config {
            Some(path) => ConfigLoader::load(path)?,
            None => ObituaryConfig::default(),
        };
        let loaded = CatalogLoader::load(&self.catalog)?;

        let roster = Arc::new(PlayerRoster::new());
        for player in &scenario.players {
            roster.join(player.id, player.name.clone());
            if let Some(location) = &player.location {
                roster.move_to(player.id, location.clone());
            }
        }

        let clock = Arc::new(ManualClock::new());
        let obituary = Obituary::builder()
            .config(config)
            .catalog(loaded.catalog)
            .oracle(roster.clone())
            .clock(clock.clone())
            .build()?;

        println!(
            "{} {} ({} players, {} steps)",
            style("Scenario:").bold().cyan(),
            self.scenario.display(),
            scenario.players.len(),
            scenario.steps.len()
        );
        println!();

        let mut deaths = 0usize;
        let mut announced = 0usize;

        for step in &scenario.steps {
            let at = Duration::from_millis(step.at_ms());
            if at < clock.elapsed() {
                tracing::warn!(
                    at_ms = step.at_ms(),
                    now_ms = clock.elapsed().as_millis() as u64,
                    "Step is earlier than the previous one, replaying at current time"
                );
            }
            clock.set_elapsed(at);
            let stamp = style(format!("[{:>6}ms]", clock.elapsed().as_millis())).dim();

            match step {
                Step::Damage { event, .. } => {
                    let observation = obituary.on_damage(event);
                    if self.verbose {
                        println!("{} damage {} → {}", stamp, event.victim, describe(&observation));
                    }
                }
                Step::Death { event, .. } => {
                    deaths += 1;
                    match obituary.on_death(event) {
                        DeathOutcome::Message(message) => {
                            announced += 1;
                            println!("{} {}", stamp, style(&message.text).bold());
                        }
                        DeathOutcome::Defer(reason) => {
                            println!(
                                "{} {} {}",
                                stamp,
                                event.victim,
                                style(format!("(host default: {reason})")).yellow()
                            );
                        }
                    }
                }
                Step::Disconnect { entity, .. } => {
                    obituary.on_disconnect(*entity);
                    roster.leave(*entity);
                    if self.verbose {
                        println!("{} {} disconnected", stamp, entity);
                    }
                }
            }
        }

        println!();
        println!(
            "{} {} deaths, {} custom messages, {} victims still tracked",
            style("Done:").bold().green(),
            deaths,
            announced,
            obituary.tracker().tracked_victims()
        );
        Ok(())
    }
}

fn describe(observation: &Observation) -> String {
    match observation {
        Observation::Recorded {
            aggressor,
            damage_type,
        } => format!("recorded {damage_type} by {aggressor}"),
        Observation::Dropped(reason) => format!("dropped ({reason:?})"),
    }
}
