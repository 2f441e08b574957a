//! Difficulty policies for the scripted bot
//!
//! Difficulty governs three independent knobs: how long the bot pretends
//! to think (pure pacing, the engine never sleeps on it), how often it
//! deliberately skips a valid action to simulate sloppy play, and how it
//! weights unit production. Implement [`BotPolicy`] to swap in different
//! behavior per faction.

use std::time::Duration;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::catalog::unit::UnitKind;

/// Context the build preference gets to look at
#[derive(Debug, Clone, Copy)]
pub struct BuildContext {
    pub own_units: usize,
    pub enemy_units: usize,
    pub own_infantry: usize,
}

/// Pluggable decision style for an AI-controlled faction
pub trait BotPolicy {
    /// Cosmetic pause a front-end may insert before the bot acts
    fn decision_latency(&self) -> Duration;

    /// Roll whether to deliberately pass over an otherwise-valid action
    fn should_skip(&self, rng: &mut ChaCha8Rng) -> bool;

    /// Pick a unit kind out of what is currently affordable and buildable
    fn preferred_build(
        &self,
        affordable: &[UnitKind],
        context: BuildContext,
        rng: &mut ChaCha8Rng,
    ) -> Option<UnitKind>;
}

/// Preset difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Chance a decision comes out suboptimal in the first place
    fn suboptimal_chance(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.4,
            Difficulty::Medium => 0.2,
            Difficulty::Hard => 0.05,
        }
    }

    /// Bias toward combat units when spending the treasury
    fn combat_bias(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.3,
            Difficulty::Medium => 0.6,
            Difficulty::Hard => 0.9,
        }
    }
}

/// The stock policy used by the demo runner and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPolicy {
    pub difficulty: Difficulty,
}

impl StandardPolicy {
    pub fn new(difficulty: Difficulty) -> Self {
        Self { difficulty }
    }
}

impl BotPolicy for StandardPolicy {
    fn decision_latency(&self) -> Duration {
        match self.difficulty {
            Difficulty::Easy => Duration::from_millis(500),
            Difficulty::Medium => Duration::from_millis(1000),
            Difficulty::Hard => Duration::from_millis(1500),
        }
    }

    fn should_skip(&self, rng: &mut ChaCha8Rng) -> bool {
        // A suboptimal moment only sometimes turns into a full pass
        rng.gen::<f64>() < self.difficulty.suboptimal_chance() && rng.gen::<f64>() < 0.3
    }

    fn preferred_build(
        &self,
        affordable: &[UnitKind],
        context: BuildContext,
        rng: &mut ChaCha8Rng,
    ) -> Option<UnitKind> {
        if affordable.is_empty() {
            return None;
        }
        let has = |kind: UnitKind| affordable.contains(&kind);
        let fallback = || {
            if has(UnitKind::Infantry) {
                Some(UnitKind::Infantry)
            } else {
                affordable.first().copied()
            }
        };

        match self.difficulty {
            // Mostly infantry, the occasional tank
            Difficulty::Easy | Difficulty::Medium => {
                if has(UnitKind::Tank) && rng.gen::<f64>() < self.difficulty.combat_bias() {
                    Some(UnitKind::Tank)
                } else {
                    fallback()
                }
            }
            // Composition-aware: answer a larger enemy army with armor,
            // keep a couple of capture units around, then buy power
            Difficulty::Hard => {
                if context.enemy_units > context.own_units && has(UnitKind::Tank) {
                    return Some(UnitKind::Tank);
                }
                if context.own_infantry < 2 && has(UnitKind::Infantry) {
                    return Some(UnitKind::Infantry);
                }
                for kind in [
                    UnitKind::Tank,
                    UnitKind::Artillery,
                    UnitKind::Infantry,
                    UnitKind::Transport,
                ] {
                    if has(kind) {
                        return Some(kind);
                    }
                }
                affordable.first().copied()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_hard_answers_numbers_with_armor() {
        let policy = StandardPolicy::new(Difficulty::Hard);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let context = BuildContext {
            own_units: 1,
            enemy_units: 5,
            own_infantry: 3,
        };
        let pick = policy.preferred_build(
            &[UnitKind::Infantry, UnitKind::Tank],
            context,
            &mut rng,
        );
        assert_eq!(pick, Some(UnitKind::Tank));
    }

    #[test]
    fn test_hard_keeps_capture_units() {
        let policy = StandardPolicy::new(Difficulty::Hard);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let context = BuildContext {
            own_units: 3,
            enemy_units: 2,
            own_infantry: 0,
        };
        let pick = policy.preferred_build(
            &[UnitKind::Infantry, UnitKind::Tank],
            context,
            &mut rng,
        );
        assert_eq!(pick, Some(UnitKind::Infantry));
    }

    #[test]
    fn test_easy_leans_on_infantry() {
        let policy = StandardPolicy::new(Difficulty::Easy);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let context = BuildContext {
            own_units: 2,
            enemy_units: 2,
            own_infantry: 1,
        };
        let picks: Vec<_> = (0..100)
            .filter_map(|_| {
                policy.preferred_build(&[UnitKind::Infantry, UnitKind::Tank], context, &mut rng)
            })
            .collect();
        let infantry = picks.iter().filter(|&&k| k == UnitKind::Infantry).count();
        let tanks = picks.len() - infantry;
        assert!(infantry > tanks);
    }

    #[test]
    fn test_hard_skips_less_than_easy() {
        let easy = StandardPolicy::new(Difficulty::Easy);
        let hard = StandardPolicy::new(Difficulty::Hard);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let count = |policy: &StandardPolicy, rng: &mut ChaCha8Rng| {
            (0..1000).filter(|_| policy.should_skip(rng)).count()
        };
        assert!(count(&easy, &mut rng) > count(&hard, &mut rng));
    }

    #[test]
    fn test_empty_affordable_builds_nothing() {
        let policy = StandardPolicy::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let context = BuildContext {
            own_units: 0,
            enemy_units: 0,
            own_infantry: 0,
        };
        assert_eq!(policy.preferred_build(&[], context, &mut rng), None);
    }
}
