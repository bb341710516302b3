//! Headless autoplay runner (default binary).
//!
//! Plays a game without rendering or input: every spawned piece is turned and
//! shifted to a pseudo-random column, then hard-dropped. Prints a JSON summary
//! on stdout; status lines go to stderr.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use body_tetris::config::{EngineConfig, EventLog, LandingRecord};
use body_tetris::core::{GameState, LandingOutcome, SimpleRng};
use body_tetris::types::{GameAction, PieceKind};

/// Autoplay simulation for the body-matching puzzle engine.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of pieces to land before stopping.
    #[arg(short, long, default_value_t = 500)]
    pieces: u32,

    /// RNG seed (overrides the config file and BODY_TETRIS_SEED).
    #[arg(short, long)]
    seed: Option<u32>,

    /// JSON config file (overrides BODY_TETRIS_CONFIG).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    seed: u32,
    grid: [i32; 2],
    pieces_landed: u32,
    score: u32,
    game_over: bool,
    bodies_completed: BTreeMap<String, u32>,
    bombs: u32,
    pieces_destroyed: usize,
    spawn_stats: BTreeMap<&'static str, u32>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = EngineConfig::from_env().context("loading configuration from environment")?;
    if let Some(path) = &args.config {
        let log_path = config.log_path.take();
        config = EngineConfig::load(path).with_context(|| format!("loading config {}", path.display()))?;
        config.log_path = log_path;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut log = match &config.log_path {
        Some(path) => {
            eprintln!("[Sim] Logging landings to {}", path.display());
            Some(EventLog::open(path).with_context(|| format!("opening log {}", path.display()))?)
        }
        None => None,
    };

    eprintln!(
        "[Sim] Grid {}x{}, seed {}, {} bodies, {} pieces",
        config.grid_size.w,
        config.grid_size.h,
        config.seed,
        config.catalog.len(),
        args.pieces
    );

    let mut game = config.new_game();
    game.start();

    let summary = run(&mut game, &config, args.pieces, log.as_mut())?;

    if let Some(log) = log.as_mut() {
        log.flush().context("flushing landing log")?;
    }

    eprintln!(
        "[Sim] Finished: {} pieces, score {}{}",
        summary.pieces_landed,
        summary.score,
        if summary.game_over { " (game over)" } else { "" }
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run<W: std::io::Write>(
    game: &mut GameState,
    config: &EngineConfig,
    pieces: u32,
    mut log: Option<&mut EventLog<W>>,
) -> Result<Summary> {
    // Separate stream so that autoplay choices never shift the piece sequence.
    let mut rng = SimpleRng::new(config.seed ^ 0x9e37_79b9);
    let mut summary = Summary {
        seed: config.seed,
        grid: [config.grid_size.w, config.grid_size.h],
        ..Summary::default()
    };

    while game.pieces_landed() < pieces && !game.game_over() {
        steer(game, &mut rng);
        game.apply_action(GameAction::HardDrop);

        let Some(event) = game.take_last_event() else {
            continue;
        };

        if let LandingOutcome::Detonated(report) = &event.outcome {
            summary.bombs += 1;
            summary.pieces_destroyed += report.destroyed.len();
        }
        for body in &event.outcome.cascade().matches {
            *summary.bodies_completed.entry(body.body.clone()).or_default() += 1;
            eprintln!(
                "[Sim] Piece {}: {} +{} (round {})",
                event.piece_index, body.body, body.score, body.round
            );
        }

        if let Some(log) = log.as_mut() {
            log.append(&LandingRecord::from(&event))
                .context("writing landing log")?;
        }
    }

    summary.pieces_landed = game.pieces_landed();
    summary.score = game.score();
    summary.game_over = game.game_over();
    summary.spawn_stats = PieceKind::ALL
        .iter()
        .map(|&kind| (kind.as_str(), game.spawn_stats()[kind.index()]))
        .collect();
    Ok(summary)
}

/// Turn the active piece and walk it towards a random column
fn steer(game: &mut GameState, rng: &mut SimpleRng) {
    let width = game.grid().width();
    let turns = rng.next_range(4);
    // Columns 1..width-1 are inside the walls.
    let target = 1 + rng.next_range((width - 2) as u32) as i32;

    for _ in 0..turns {
        game.apply_action(GameAction::Rotate);
    }

    while let Some(active) = game.active() {
        let action = if active.pos.x < target {
            GameAction::MoveRight
        } else if active.pos.x > target {
            GameAction::MoveLeft
        } else {
            break;
        };
        if !game.apply_action(action) {
            break;
        }
    }
}
