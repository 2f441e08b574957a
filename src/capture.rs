//! Capture state machine
//!
//! A capture-capable unit stationed on a capturable structure chips away
//! at it one command at a time. Three increments flip ownership. Walking
//! away, or starting on a different structure, forfeits all progress.

use crate::catalog::terrain::Terrain;
use crate::core::error::{EngineError, Result};
use crate::core::types::UnitId;
use crate::state::GameState;
use crate::unit::Unit;

/// Increments needed before ownership transfers
pub const CAPTURE_THRESHOLD: u8 = 3;

/// What a capture command achieved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Still working on it
    Progress { remaining: u8 },
    /// Ownership transferred this command
    Captured { terrain: Terrain },
}

/// Drop any capture progress a unit carried away from its target tile
///
/// Called after relocation: progress only survives while the unit stands
/// on the exact structure it was taking.
pub fn reset_if_departed(unit: &mut Unit) {
    if let Some(target) = unit.capture_target {
        if target != unit.pos {
            unit.capture_progress = 0;
            unit.capture_target = None;
        }
    }
}

/// Advance a unit's capture of the structure underfoot
///
/// Validates capability and terrain, restarts the counter when the unit
/// switched structures since its last increment, and transfers ownership
/// at the threshold. The caller pays the action point and runs the
/// victory check.
pub fn advance_capture(state: &mut GameState, unit_id: UnitId) -> Result<CaptureOutcome> {
    let unit = state
        .units
        .get(unit_id)
        .ok_or_else(|| EngineError::InvalidSelection("no such unit".into()))?;

    if !unit.stats().can_capture {
        return Err(EngineError::InvalidSelection(format!(
            "{} cannot capture structures",
            unit.kind.name()
        )));
    }

    let pos = unit.pos;
    let tile = state.board.tile(pos).expect("unit off the board");
    if !tile.terrain.capturable() {
        return Err(EngineError::NotCapturable(pos));
    }
    if tile.owner == Some(unit.faction) {
        return Err(EngineError::NotCapturable(pos));
    }

    let terrain = tile.terrain;
    let faction = unit.faction;

    let unit = state.units.get_mut(unit_id).unwrap();
    if unit.capture_target != Some(pos) {
        // Switched structures: the counter starts over
        unit.capture_progress = 0;
        unit.capture_target = Some(pos);
    }
    unit.capture_progress += 1;

    if unit.capture_progress >= CAPTURE_THRESHOLD {
        unit.capture_progress = 0;
        unit.capture_target = None;
        state.board.set_owner(pos, Some(faction));
        state.push_capture_event(faction, terrain, pos);
        Ok(CaptureOutcome::Captured { terrain })
    } else {
        Ok(CaptureOutcome::Progress {
            remaining: CAPTURE_THRESHOLD - unit.capture_progress,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::unit::UnitKind;
    use crate::core::types::{Coord, FactionId};

    #[test]
    fn test_reset_only_when_departed() {
        let mut unit = Unit::new(
            UnitId(1),
            UnitKind::Infantry,
            FactionId(1),
            Coord::new(2, 2),
        );
        unit.capture_progress = 2;
        unit.capture_target = Some(Coord::new(2, 2));

        // Still standing on the target: progress stays
        reset_if_departed(&mut unit);
        assert_eq!(unit.capture_progress, 2);

        unit.pos = Coord::new(3, 2);
        reset_if_departed(&mut unit);
        assert_eq!(unit.capture_progress, 0);
        assert_eq!(unit.capture_target, None);
    }
}
