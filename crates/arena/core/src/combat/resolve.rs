//! Single-attack resolution.

use crate::rng::RandomSource;
use crate::stats::DerivedStats;

/// Damage multiplier on a critical hit.
pub const CRITICAL_MULTIPLIER: f64 = 1.5;
/// Fraction of damage that gets through a block.
pub const BLOCK_FACTOR: f64 = 0.3;
/// Smallest damage a connecting attack can deal. Guarantees battles end.
pub const MIN_DAMAGE: f64 = 1.0;

/// How an attack landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum AttackOutcome {
    /// Full hit, reduced only by defense.
    Hit,
    /// Defender evaded; no damage.
    Dodge,
    /// Defender blocked; damage cut to 30% before defense.
    Blocked,
}

impl AttackOutcome {
    /// True when the attack dealt damage.
    pub const fn connected(&self) -> bool {
        !matches!(self, Self::Dodge)
    }
}

/// Result of one attack.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackResult {
    /// Damage to subtract from the defender. `0` on a dodge, `>= 1` otherwise.
    pub damage: f64,
    pub outcome: AttackOutcome,
    /// Whether the critical roll succeeded (reported even when dodged).
    pub critical: bool,
}

/// Resolves one attack.
///
/// Roll order is fixed and doubles as the tie-break policy:
/// 1. critical (attacker's `critical_chance`) scales damage by 1.5
/// 2. dodge (defender's `dodge_chance`) ends resolution with zero damage
/// 3. block (defender's `block_chance`) scales damage by 0.3
/// 4. defense reduction, floored at [`MIN_DAMAGE`]
///
/// A dodge short-circuits: no block roll is drawn from `rng`.
pub fn resolve_attack(
    attacker: &DerivedStats,
    defender: &DerivedStats,
    rng: &mut (impl RandomSource + ?Sized),
) -> AttackResult {
    let mut damage = attacker.actual_strength;

    let critical = rng.chance(attacker.critical_chance);
    if critical {
        damage *= CRITICAL_MULTIPLIER;
    }

    if rng.chance(defender.dodge_chance) {
        return AttackResult {
            damage: 0.0,
            outcome: AttackOutcome::Dodge,
            critical,
        };
    }

    let blocked = rng.chance(defender.block_chance);
    if blocked {
        damage *= BLOCK_FACTOR;
    }

    AttackResult {
        damage: (damage * (1.0 - defender.actual_defense)).max(MIN_DAMAGE),
        outcome: if blocked {
            AttackOutcome::Blocked
        } else {
            AttackOutcome::Hit
        },
        critical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedRng, SessionRng};
    use crate::stats::TraitSet;

    fn stats(speed: i64, strength: i64, defense: i64) -> DerivedStats {
        DerivedStats::from_traits(&TraitSet::new(speed, strength, defense, 50).unwrap())
    }

    #[test]
    fn plain_hit_applies_defense() {
        let attacker = stats(0, 80, 0);
        let defender = stats(0, 0, 40);
        // crit never (p=0), dodge never (p=0), block: 0.99 >= 0.16 fails
        let mut rng = ScriptedRng::constant(0.99);

        let result = resolve_attack(&attacker, &defender, &mut rng);

        // 20 × (1 - 0.2) = 16
        assert_eq!(result.outcome, AttackOutcome::Hit);
        assert!((result.damage - 16.0).abs() < 1e-9);
        assert!(!result.critical);
    }

    #[test]
    fn critical_then_block() {
        let attacker = stats(100, 100, 0);
        let defender = stats(0, 0, 100);
        // crit: 0.1 < 0.2, dodge: p=0 fails, block: 0.1 < 0.4
        let mut rng = ScriptedRng::constant(0.1);

        let result = resolve_attack(&attacker, &defender, &mut rng);

        // 25 × 1.5 × 0.3 × 0.5 = 5.625
        assert_eq!(result.outcome, AttackOutcome::Blocked);
        assert!(result.critical);
        assert!((result.damage - 5.625).abs() < 1e-9);
    }

    #[test]
    fn dodge_short_circuits_block_roll() {
        let attacker = stats(100, 100, 0);
        let defender = stats(100, 0, 100);
        let mut rng = ScriptedRng::new(vec![0.0, 0.0, 0.0]);

        let result = resolve_attack(&attacker, &defender, &mut rng);

        assert_eq!(result.outcome, AttackOutcome::Dodge);
        assert_eq!(result.damage, 0.0);
        assert!(result.critical);
        // critical + dodge only
        assert_eq!(rng.consumed(), 2);
    }

    #[test]
    fn damage_floor_is_one() {
        let attacker = stats(0, 0, 0);
        let defender = stats(0, 0, 100);
        let mut rng = ScriptedRng::constant(0.99);

        let result = resolve_attack(&attacker, &defender, &mut rng);

        assert_eq!(result.outcome, AttackOutcome::Hit);
        assert_eq!(result.damage, MIN_DAMAGE);
    }

    #[test]
    fn connecting_attacks_never_fall_below_floor() {
        let mut rng = SessionRng::seeded(99);
        let pairs = [
            (stats(90, 70, 40), stats(30, 50, 95)),
            (stats(10, 5, 0), stats(100, 0, 100)),
            (stats(100, 100, 100), stats(0, 0, 0)),
        ];

        for (attacker, defender) in pairs {
            for _ in 0..500 {
                let result = resolve_attack(&attacker, &defender, &mut rng);
                if result.outcome.connected() {
                    assert!(result.damage >= MIN_DAMAGE);
                } else {
                    assert_eq!(result.damage, 0.0);
                }
            }
        }
    }
}
