//! Headless Skirmish Runner
//!
//! Runs an AI vs AI match on a small stock map and prints the event log.
//! Stands in for a real front-end: the engine itself never draws.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ironfront::ai::{self, Difficulty, StandardPolicy};
use ironfront::board::Board;
use ironfront::catalog::terrain::Terrain;
use ironfront::catalog::unit::UnitKind;
use ironfront::core::config::GameConfig;
use ironfront::core::types::{Coord, FactionId};
use ironfront::events::GameEvent;
use ironfront::state::GameState;
use ironfront::turn::Phase;

/// Headless Skirmish Runner - AI vs AI matches
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Run an AI vs AI match and print the event log")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Turn limit before the match is scored
    #[arg(long, default_value_t = 30)]
    turn_limit: u32,

    /// Bot difficulty for both factions: easy, medium, or hard
    #[arg(long, default_value = "medium")]
    difficulty: String,

    /// Print every log line instead of just the summary
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Dump the final omniscient snapshot as JSON
    #[arg(long)]
    json: bool,
}

/// Hand-built 12x8 map in place of a real generator: forests and cities
/// around the flanks, a pinch of water in the middle, headquarters in
/// opposite corners.
fn stock_board() -> Board {
    let mut board = Board::new(12, 8);

    for (x, y) in [(2, 2), (3, 2), (9, 2), (8, 2), (1, 4), (10, 4), (2, 5), (9, 5)] {
        board.set_terrain(Coord::new(x, y), Terrain::Forest);
    }
    for (x, y) in [(1, 1), (10, 1), (6, 2), (1, 6), (10, 6), (6, 5)] {
        board.set_terrain(Coord::new(x, y), Terrain::City);
    }
    for (x, y) in [(6, 0), (7, 0), (6, 7), (7, 7)] {
        board.set_terrain(Coord::new(x, y), Terrain::Water);
    }

    board.set_terrain(Coord::new(0, 0), Terrain::Hq);
    board.set_owner(Coord::new(0, 0), Some(FactionId(1)));
    board.set_terrain(Coord::new(11, 7), Terrain::Hq);
    board.set_owner(Coord::new(11, 7), Some(FactionId(2)));

    board
}

fn place_starting_units(state: &mut GameState) {
    let placements = [
        (FactionId(1), UnitKind::Infantry, Coord::new(1, 0)),
        (FactionId(1), UnitKind::Tank, Coord::new(2, 0)),
        (FactionId(1), UnitKind::Infantry, Coord::new(0, 1)),
        (FactionId(1), UnitKind::Infantry, Coord::new(1, 1)),
        (FactionId(2), UnitKind::Infantry, Coord::new(10, 7)),
        (FactionId(2), UnitKind::Tank, Coord::new(9, 7)),
        (FactionId(2), UnitKind::Infantry, Coord::new(11, 6)),
        (FactionId(2), UnitKind::Infantry, Coord::new(10, 6)),
    ];
    for (faction, kind, at) in placements {
        state
            .spawn_unit(kind, faction, at)
            .expect("stock placement on a clear board");
    }
}

fn parse_difficulty(name: &str) -> Difficulty {
    match name {
        "easy" => Difficulty::Easy,
        "hard" => Difficulty::Hard,
        _ => Difficulty::Medium,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = GameConfig {
        turn_limit: Some(args.turn_limit),
        rng_seed: args.seed,
        ..GameConfig::default()
    };
    let mut state = GameState::new(stock_board(), config).expect("stock config is valid");
    place_starting_units(&mut state);

    let policy = StandardPolicy::new(parse_difficulty(&args.difficulty));

    println!("=== Ironfront Skirmish ===");
    println!(
        "seed {}, turn limit {}, difficulty {}\n",
        args.seed, args.turn_limit, args.difficulty
    );

    while state.turn.phase == Phase::Playing {
        let faction = state.current_faction();
        if let Err(error) = ai::run_turn(&mut state, &policy) {
            eprintln!("faction {faction} turn aborted: {error}");
            break;
        }

        for event in state.drain_events() {
            match event {
                GameEvent::Log { message } if args.verbose => println!("  {message}"),
                GameEvent::TurnStarted { faction, turn } => {
                    println!("-- turn {turn}, faction {faction} --");
                }
                GameEvent::StructureCaptured { faction, terrain, at } => {
                    println!("faction {faction} captured the {} at {at}", terrain.name());
                }
                GameEvent::UnitDestroyed { kind, faction, at, .. } => {
                    println!("faction {faction} lost a {} at {at}", kind.name());
                }
                GameEvent::Victory {
                    winning_faction,
                    reason,
                } => {
                    println!("\nfaction {winning_faction} wins: {reason}");
                }
                GameEvent::Log { .. } => {}
            }
        }
    }

    let snapshot = state.snapshot(None);
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).expect("snapshot serializes")
        );
        return;
    }

    println!("\nfinal turn: {}", snapshot.turn);
    for (faction, money) in &snapshot.money {
        println!(
            "faction {faction}: {} units, {money} money",
            snapshot
                .units
                .iter()
                .filter(|u| u.faction == *faction)
                .count()
        );
    }
}
