//! Derived combat stats.
//!
//! Linear functions of the trait set, computed once when a combatant is
//! created and cached on it. No randomness, no bonuses.

use super::traits::TraitSet;

/// Movement units per tick at speed 100.
const SPEED_SCALE: f64 = 1.4;
/// Base attack damage at strength 100.
const STRENGTH_SCALE: f64 = 25.0;
/// Fraction of damage absorbed at defense 100.
const DEFENSE_SCALE: f64 = 0.5;
/// Critical-hit probability at speed 100.
const CRITICAL_SCALE: f64 = 0.2;
/// Dodge probability at speed 100.
const DODGE_SCALE: f64 = 0.3;
/// Block probability at defense 100.
const BLOCK_SCALE: f64 = 0.4;

/// Combat statistics derived from a [`TraitSet`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedStats {
    /// Maximum movement per tick.
    pub actual_speed: f64,
    /// Base attack damage.
    pub actual_strength: f64,
    /// Fraction of incoming damage absorbed, in `[0, 0.5]`.
    pub actual_defense: f64,
    /// Normalized intelligence, in `[0, 1]`. Selects the targeting tier.
    pub actual_intelligence: f64,
    pub critical_chance: f64,
    pub dodge_chance: f64,
    pub block_chance: f64,
}

impl DerivedStats {
    /// Formulas (with `t/100` written as the normalized trait):
    /// - actual_speed: speed × 1.4
    /// - actual_strength: strength × 25
    /// - actual_defense: defense × 0.5
    /// - actual_intelligence: intelligence
    /// - critical_chance: speed × 0.2
    /// - dodge_chance: speed × 0.3
    /// - block_chance: defense × 0.4
    pub fn from_traits(traits: &TraitSet) -> Self {
        let speed = normalized(traits.speed());
        let strength = normalized(traits.strength());
        let defense = normalized(traits.defense());

        Self {
            actual_speed: speed * SPEED_SCALE,
            actual_strength: strength * STRENGTH_SCALE,
            actual_defense: defense * DEFENSE_SCALE,
            actual_intelligence: normalized(traits.intelligence()),
            critical_chance: speed * CRITICAL_SCALE,
            dodge_chance: speed * DODGE_SCALE,
            block_chance: defense * BLOCK_SCALE,
        }
    }
}

impl From<&TraitSet> for DerivedStats {
    fn from(traits: &TraitSet) -> Self {
        Self::from_traits(traits)
    }
}

fn normalized(value: u8) -> f64 {
    f64::from(value) / f64::from(TraitSet::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn fast_striker_stats() {
        let traits = TraitSet::new(90, 70, 40, 60).unwrap();
        let stats = DerivedStats::from_traits(&traits);

        // 0.9 × 1.4
        assert!(close(stats.actual_speed, 1.26));
        // 0.7 × 25
        assert!(close(stats.actual_strength, 17.5));
        // 0.4 × 0.5
        assert!(close(stats.actual_defense, 0.2));
        assert!(close(stats.actual_intelligence, 0.6));
        assert!(close(stats.critical_chance, 0.18));
        assert!(close(stats.dodge_chance, 0.27));
        assert!(close(stats.block_chance, 0.16));
    }

    #[test]
    fn zero_traits_yield_zero_stats() {
        let stats = DerivedStats::from_traits(&TraitSet::new(0, 0, 0, 0).unwrap());
        assert_eq!(stats.actual_speed, 0.0);
        assert_eq!(stats.dodge_chance, 0.0);
        assert_eq!(stats.block_chance, 0.0);
    }

    #[test]
    fn derivation_is_idempotent() {
        let traits = TraitSet::new(33, 66, 99, 12).unwrap();
        assert_eq!(
            DerivedStats::from_traits(&traits),
            DerivedStats::from(&traits)
        );
    }
}
