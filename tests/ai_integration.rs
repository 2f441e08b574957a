//! Bot planning and execution tests

use std::time::Duration;

use rand_chacha::ChaCha8Rng;

use ironfront::ai::{self, BotPolicy, BuildContext, PlannedAction, StandardPolicy};
use ironfront::board::Board;
use ironfront::catalog::terrain::Terrain;
use ironfront::catalog::unit::UnitKind;
use ironfront::command::Command;
use ironfront::core::config::GameConfig;
use ironfront::core::types::{Coord, FactionId};
use ironfront::state::GameState;
use ironfront::turn::Phase;

const P1: FactionId = FactionId(1);
const P2: FactionId = FactionId(2);

/// Policy that never skips, for deterministic planning tests
struct Relentless;

impl BotPolicy for Relentless {
    fn decision_latency(&self) -> Duration {
        Duration::ZERO
    }

    fn should_skip(&self, _rng: &mut ChaCha8Rng) -> bool {
        false
    }

    fn preferred_build(
        &self,
        affordable: &[UnitKind],
        _context: BuildContext,
        _rng: &mut ChaCha8Rng,
    ) -> Option<UnitKind> {
        if affordable.contains(&UnitKind::Infantry) {
            Some(UnitKind::Infantry)
        } else {
            affordable.first().copied()
        }
    }
}

fn bot_state() -> GameState {
    let mut board = Board::new(10, 8);
    board.set_terrain(Coord::new(0, 0), Terrain::Hq);
    board.set_owner(Coord::new(0, 0), Some(P1));
    board.set_terrain(Coord::new(9, 7), Terrain::Hq);
    board.set_owner(Coord::new(9, 7), Some(P2));
    GameState::new(board, GameConfig::default()).unwrap()
}

#[test]
fn planner_prefers_adjacent_attacks() {
    let mut state = bot_state();
    let soldier = state.spawn_unit(UnitKind::Tank, P1, Coord::new(4, 4)).unwrap();
    state.spawn_unit(UnitKind::Infantry, P2, Coord::new(5, 4)).unwrap();

    let plan = ai::plan_turn(&mut state, &Relentless);
    assert!(plan.contains(&PlannedAction::Attack {
        unit: soldier,
        target: Coord::new(5, 4)
    }));
}

#[test]
fn planner_captures_in_place() {
    let mut state = bot_state();
    state.board.set_terrain(Coord::new(4, 4), Terrain::City);
    let soldier = state.spawn_unit(UnitKind::Infantry, P1, Coord::new(4, 4)).unwrap();

    let plan = ai::plan_turn(&mut state, &Relentless);
    assert!(plan.contains(&PlannedAction::Capture { unit: soldier }));
}

#[test]
fn planner_never_doubles_a_destination() {
    // Two infantry next to each other marching at the same city must not
    // pick the same tile.
    let mut state = bot_state();
    state.board.set_terrain(Coord::new(5, 1), Terrain::City);
    state.spawn_unit(UnitKind::Infantry, P1, Coord::new(1, 1)).unwrap();
    state.spawn_unit(UnitKind::Infantry, P1, Coord::new(1, 2)).unwrap();

    let plan = ai::plan_turn(&mut state, &Relentless);
    let destinations: Vec<Coord> = plan
        .iter()
        .filter_map(|action| match action {
            PlannedAction::Move { to, .. } => Some(*to),
            _ => None,
        })
        .collect();
    assert_eq!(destinations.len(), 2);
    assert_ne!(destinations[0], destinations[1]);
}

#[test]
fn planner_queues_builds_within_budget() {
    let mut state = bot_state();
    for x in 2..6 {
        state.board.set_terrain(Coord::new(x, 3), Terrain::City);
        state.board.set_owner(Coord::new(x, 3), Some(P1));
    }

    let plan = ai::plan_turn(&mut state, &Relentless);
    let builds: Vec<&PlannedAction> = plan
        .iter()
        .filter(|action| matches!(action, PlannedAction::Build { .. }))
        .collect();
    // 2000 money buys two 800-point infantry, not three
    assert_eq!(builds.len(), 2);
}

#[test]
fn run_turn_executes_and_ends_the_turn() {
    let mut state = bot_state();
    let soldier = state.spawn_unit(UnitKind::Infantry, P1, Coord::new(4, 4)).unwrap();

    ai::run_turn(&mut state, &Relentless).unwrap();

    // The bot moved its unit through the real command surface, then
    // handed the turn over
    assert_eq!(state.current_faction(), P2);
    let unit = state.units.get(soldier).unwrap();
    assert_ne!(unit.pos, Coord::new(4, 4));
    // Acted flags were cleared by the end of turn
    assert!(!unit.has_acted);
}

#[test]
fn run_turn_drives_a_capture_to_completion() {
    let mut state = bot_state();
    // Park the bot's infantry on the enemy headquarters; three bot turns
    // finish the job and end the match
    state.spawn_unit(UnitKind::Infantry, P1, Coord::new(9, 7)).unwrap();
    // Give faction 2 something far away so its turns are quick
    state.spawn_unit(UnitKind::Infantry, P2, Coord::new(0, 7)).unwrap();

    let mut guard = 0;
    while state.turn.phase == Phase::Playing {
        if state.current_faction() == P1 {
            ai::run_turn(&mut state, &Relentless).unwrap();
        } else {
            state.execute(P2, Command::EndTurn).unwrap();
        }
        guard += 1;
        assert!(guard < 20, "bot never completed the capture");
    }

    assert_eq!(state.board.tile(Coord::new(9, 7)).unwrap().owner, Some(P1));
}

#[test]
fn bots_play_a_full_match_to_verdict() {
    // Two stock bots on a tiny map must reach a verdict before the turn
    // limit guard runs out, entirely through the command surface.
    let mut board = Board::new(8, 6);
    board.set_terrain(Coord::new(0, 0), Terrain::Hq);
    board.set_owner(Coord::new(0, 0), Some(P1));
    board.set_terrain(Coord::new(7, 5), Terrain::Hq);
    board.set_owner(Coord::new(7, 5), Some(P2));
    let config = GameConfig {
        turn_limit: Some(12),
        rng_seed: 7,
        ..GameConfig::default()
    };
    let mut state = GameState::new(board, config).unwrap();
    state.spawn_unit(UnitKind::Infantry, P1, Coord::new(1, 0)).unwrap();
    state.spawn_unit(UnitKind::Infantry, P2, Coord::new(6, 5)).unwrap();

    let policy = StandardPolicy::default();
    let mut guard = 0;
    while state.turn.phase == Phase::Playing {
        ai::run_turn(&mut state, &policy).unwrap();
        guard += 1;
        assert!(guard < 100, "match never resolved");
    }
}
