//! Tank Arena headless runner
//!
//! Loads a level, drives the simulation at a fixed step with a scripted demo
//! pilot standing in for keyboard input, and prints a JSON summary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use tank_arena::Tuning;
use tank_arena::levels;
use tank_arena::sim::{Direction, Game, GamePhase, LevelDefinition, TickInput};

#[derive(Debug, Parser)]
#[command(name = "tank-arena", about = "Run a tank battle simulation headlessly")]
struct Args {
    /// Level file (JSON) to play
    #[arg(long, conflicts_with = "builtin")]
    level: Option<PathBuf>,

    /// Built-in level number
    #[arg(long)]
    builtin: Option<u32>,

    /// Tuning file (JSON); defaults apply to missing fields
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// RNG seed for enemy behavior and the demo pilot
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Maximum number of ticks to run
    #[arg(long, default_value_t = 60 * 120)]
    ticks: u64,

    /// Print the final entity snapshot as well
    #[arg(long)]
    snapshot: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Serialize)]
struct Summary {
    level: String,
    seed: u64,
    ticks: u64,
    phase: GamePhase,
    enemies_left: usize,
    base_lives: Option<u32>,
    player_lives: Option<u32>,
}

/// Wanders like an enemy and fires whenever the gun is ready
struct DemoPilot {
    rng: Pcg32,
    direction: Direction,
    hold: u32,
}

impl DemoPilot {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15),
            direction: Direction::Up,
            hold: 0,
        }
    }

    fn next_input(&mut self) -> TickInput {
        if self.hold == 0 {
            self.direction = Direction::ALL[self.rng.random_range(0..Direction::ALL.len())];
            self.hold = self.rng.random_range(10..40);
        }
        self.hold -= 1;
        TickInput {
            direction: Some(self.direction),
            shoot: true,
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let env = env_logger::Env::default().default_filter_or(default);
    // Only fails if a logger is already installed
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn select_level(args: &Args) -> Result<Option<LevelDefinition>> {
    if let Some(path) = &args.level {
        let level = levels::load_level_file(path)
            .with_context(|| format!("loading level {}", path.display()))?;
        return Ok(Some(level));
    }
    match args.builtin {
        Some(n) => {
            let level = levels::builtin(n).with_context(|| {
                format!(
                    "no built-in level {n} (have 1..={})",
                    levels::builtin_count()
                )
            })?;
            Ok(Some(level))
        }
        None => Ok(None),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    log::info!("Tank Arena (headless) starting...");

    let tuning = match &args.tuning {
        Some(path) => {
            Tuning::load(path).with_context(|| format!("loading tuning {}", path.display()))?
        }
        None => Tuning::default(),
    };
    let level = select_level(&args)?;

    let mut game = Game::new(args.seed, tuning);
    if let Some(level) = &level {
        game.start(Some(level));
    }

    let mut pilot = DemoPilot::new(args.seed);
    while game.phase() == GamePhase::Running && game.time_ticks() < args.ticks {
        let input = pilot.next_input();
        game.step(&input);
    }

    let summary = Summary {
        level: game.world().level_name().to_string(),
        seed: args.seed,
        ticks: game.time_ticks(),
        phase: game.phase(),
        enemies_left: game.world().live_enemies().len(),
        base_lives: game.world().find_base().and_then(|b| b.lives()),
        player_lives: game.player().and_then(|p| p.lives()),
    };
    log::info!(
        "Finished after {} ticks: {:?}",
        summary.ticks,
        summary.phase
    );

    let out = if args.snapshot {
        serde_json::to_string_pretty(&serde_json::json!({
            "summary": &summary,
            "snapshot": game.snapshot(),
        }))?
    } else {
        serde_json::to_string_pretty(&summary)?
    };
    println!("{out}");

    Ok(())
}
