//! Post-tick state checks.

use crate::state::{BattleState, CombatantId};

/// Quantity that left its allowed range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Quantity {
    Health,
    Stamina,
    Position,
    Velocity,
}

/// A combatant value escaped its bounds.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{quantity} of combatant {combatant} is {value} at tick {tick}")]
pub struct InvariantViolation {
    pub tick: u64,
    pub combatant: CombatantId,
    pub quantity: Quantity,
    pub value: f64,
}

/// Checks every combatant: health in `[0, max_health]`, stamina in
/// `[0, max_stamina]`, finite position and velocity.
///
/// Reports the first violation in roster order.
pub fn check_state(state: &BattleState) -> Result<(), InvariantViolation> {
    for combatant in &state.combatants {
        let violation = |quantity, value| InvariantViolation {
            tick: state.tick,
            combatant: combatant.id,
            quantity,
            value,
        };

        if !in_range(combatant.health, combatant.max_health) {
            return Err(violation(Quantity::Health, combatant.health));
        }
        if !in_range(combatant.stamina, combatant.max_stamina) {
            return Err(violation(Quantity::Stamina, combatant.stamina));
        }
        if !combatant.position.is_finite() {
            let bad = if combatant.position.x.is_finite() {
                combatant.position.y
            } else {
                combatant.position.x
            };
            return Err(violation(Quantity::Position, bad));
        }
        if !combatant.velocity.is_finite() {
            let bad = if combatant.velocity.x.is_finite() {
                combatant.velocity.y
            } else {
                combatant.velocity.x
            };
            return Err(violation(Quantity::Velocity, bad));
        }
    }
    Ok(())
}

fn in_range(value: f64, max: f64) -> bool {
    (0.0..=max).contains(&value)
}
