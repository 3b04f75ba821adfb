//! Target selection.
//!
//! A combatant's normalized intelligence picks one of three policies. Ties in
//! the deterministic tiers go to the first candidate in roster order.

use crate::rng::RandomSource;
use crate::state::Combatant;

/// Targeting policy tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum TargetingTier {
    /// Intelligence above 0.7: goes after the weakest opponent.
    Tactician,
    /// Intelligence above 0.4: goes after the nearest opponent.
    Brawler,
    /// Everyone else: picks an opponent at random.
    Feral,
}

impl TargetingTier {
    const TACTICIAN_ABOVE: f64 = 0.7;
    const BRAWLER_ABOVE: f64 = 0.4;

    pub fn for_intelligence(actual_intelligence: f64) -> Self {
        if actual_intelligence > Self::TACTICIAN_ABOVE {
            Self::Tactician
        } else if actual_intelligence > Self::BRAWLER_ABOVE {
            Self::Brawler
        } else {
            Self::Feral
        }
    }

    pub fn of(combatant: &Combatant) -> Self {
        Self::for_intelligence(combatant.stats().actual_intelligence)
    }
}

/// Picks a target for `attacker` among `candidates`.
///
/// `candidates` yields `(roster_index, combatant)` pairs for living opponents
/// in roster order; the caller excludes the attacker itself. Returns the
/// roster index of the chosen target, or `None` when there is nobody to fight.
///
/// Only the [`TargetingTier::Feral`] tier draws from `rng`, and only when at
/// least one candidate exists.
pub fn select_target<'a>(
    attacker: &Combatant,
    candidates: impl IntoIterator<Item = (usize, &'a Combatant)>,
    rng: &mut (impl RandomSource + ?Sized),
) -> Option<usize> {
    let candidates = candidates.into_iter();

    match TargetingTier::of(attacker) {
        TargetingTier::Tactician => first_min_by(candidates, |c| c.health),
        TargetingTier::Brawler => {
            first_min_by(candidates, |c| attacker.position.distance(c.position))
        }
        TargetingTier::Feral => {
            let pool: Vec<usize> = candidates.map(|(index, _)| index).collect();
            if pool.is_empty() {
                None
            } else {
                Some(pool[rng.pick_index(pool.len())])
            }
        }
    }
}

/// Index of the first candidate with the strictly smallest key.
fn first_min_by<'a>(
    candidates: impl Iterator<Item = (usize, &'a Combatant)>,
    key: impl Fn(&Combatant) -> f64,
) -> Option<usize> {
    candidates
        .fold(None, |best: Option<(usize, f64)>, (index, candidate)| {
            let value = key(candidate);
            match best {
                Some((_, best_value)) if best_value <= value => best,
                _ => Some((index, value)),
            }
        })
        .map(|(index, _)| index)
}
