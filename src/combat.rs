//! Combat resolution: damage, counter-attacks, destruction

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::terrain::Terrain;
use crate::core::types::UnitId;
use crate::movement::attackable_tiles;
use crate::state::GameState;
use crate::unit::Unit;

/// What one exchange of fire did
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackReport {
    pub damage: i32,
    pub defender_destroyed: bool,
    /// Damage dealt back by the surviving defender, if it could reach
    pub counter_damage: Option<i32>,
    pub attacker_destroyed: bool,
}

/// Damage one strike deals
///
/// Attack power scales with the attacker's remaining health; the defender
/// is shielded by its own defense plus ten points per terrain defense
/// star. A uniform roll in [0, 10) keeps outcomes uneven. At least one
/// point always lands, and damage never exceeds the defender's remaining
/// health.
pub fn compute_damage<R: Rng>(
    attacker: &Unit,
    defender: &Unit,
    defender_terrain: Terrain,
    rng: &mut R,
) -> i32 {
    let effective_attack = attacker.stats().attack_power as f64 * attacker.health_fraction();
    let effective_defense =
        (defender.stats().defense + defender_terrain.defense_bonus() * 10) as f64;

    let base = (effective_attack - effective_defense) / 10.0;
    let roll: f64 = rng.gen_range(0.0..10.0);
    let damage = ((base + roll).round() as i32).max(1);

    damage.min(defender.health)
}

/// Resolve an attack between two adjacent units
///
/// The attacker strikes first. A destroyed defender never counters; a
/// surviving one automatically fires back when the attacker stands in its
/// own attackable set, and that counter can destroy the attacker.
/// Destruction removes a unit (and any cargo aboard) from board and
/// registry atomically. Action-point and acted-flag bookkeeping belong to
/// the command layer.
pub fn resolve_attack(state: &mut GameState, attacker_id: UnitId, defender_id: UnitId) -> AttackReport {
    let attacker = state
        .units
        .get(attacker_id)
        .expect("attacker vanished before resolution");
    let defender = state
        .units
        .get(defender_id)
        .expect("defender vanished before resolution");
    let defender_terrain = state
        .board
        .tile(defender.pos)
        .expect("defender off the board")
        .terrain;

    let damage = compute_damage(attacker, defender, defender_terrain, &mut state.rng);

    let defender = state.units.get_mut(defender_id).unwrap();
    defender.health -= damage;

    if defender.health <= 0 {
        state.destroy_unit(defender_id);
        return AttackReport {
            damage,
            defender_destroyed: true,
            counter_damage: None,
            attacker_destroyed: false,
        };
    }

    // Counter-attack with roles reversed
    let defender = state.units.get(defender_id).unwrap();
    let attacker = state.units.get(attacker_id).unwrap();
    let in_reach = attackable_tiles(&state.board, defender).contains(&attacker.pos);
    if !in_reach {
        return AttackReport {
            damage,
            defender_destroyed: false,
            counter_damage: None,
            attacker_destroyed: false,
        };
    }

    let attacker_terrain = state
        .board
        .tile(attacker.pos)
        .expect("attacker off the board")
        .terrain;
    let counter = compute_damage(defender, attacker, attacker_terrain, &mut state.rng);

    let attacker = state.units.get_mut(attacker_id).unwrap();
    attacker.health -= counter;
    let attacker_destroyed = attacker.health <= 0;
    if attacker_destroyed {
        state.destroy_unit(attacker_id);
    }

    AttackReport {
        damage,
        defender_destroyed: false,
        counter_damage: Some(counter),
        attacker_destroyed,
    }
}
