//! Whole-roster tick.

use crate::config::ArenaConfig;
use crate::event::{BattleEvent, EventKind};
use crate::rng::RandomSource;
use crate::state::BattleState;

use super::effects::apply_strike;
use super::invariants::{InvariantViolation, check_state};
use super::step::step_combatant;
use super::{Conclusion, EndReason};

/// Result of advancing a battle by one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickOutcome {
    /// State after the tick; `state.tick` has been incremented.
    pub state: BattleState,
    /// Events produced during the tick, in application order.
    pub events: Vec<BattleEvent>,
    /// Set when this tick ended the battle.
    pub conclusion: Option<Conclusion>,
}

/// Advances `state` by one tick without mutating it.
///
/// All combatants observe the tick-start state. Movement is applied to a
/// working copy while each combatant steps, in roster order; attacks are
/// applied afterwards, also in roster order. Random draws therefore happen
/// in roster order, which makes a seeded battle reproducible.
///
/// The returned state has passed [`check_state`]; a violation is returned
/// instead and the working copy is discarded.
pub fn advance(
    state: &BattleState,
    config: &ArenaConfig,
    rng: &mut (impl RandomSource + ?Sized),
) -> Result<TickOutcome, InvariantViolation> {
    let view = &state.combatants;
    let mut next = state.clone();
    let mut strikes = Vec::new();

    for (index, me) in next.combatants.iter_mut().enumerate() {
        if let Some(strike) = step_combatant(index, me, view, state.tick, config, rng) {
            strikes.push(strike);
        }
    }

    next.tick = state.tick + 1;

    let mut events = Vec::new();
    for strike in &strikes {
        apply_strike(&mut next.combatants, strike, next.tick, config, &mut events);
    }

    check_state(&next)?;

    let conclusion = conclude(&next, config);
    if let Some(conclusion) = conclusion {
        events.push(BattleEvent::new(
            next.tick,
            EventKind::BattleEnded {
                winner: conclusion.winner,
                reason: conclusion.reason,
            },
        ));
    }

    Ok(TickOutcome {
        state: next,
        events,
        conclusion,
    })
}

/// Decides whether `state` ends the battle.
///
/// Knock-outs take precedence over the tick limit, and the tick limit over a
/// deadlock: if both happen on the same tick the survivor still wins.
pub fn conclude(state: &BattleState, config: &ArenaConfig) -> Option<Conclusion> {
    if state.alive_count() <= 1 {
        return Some(Conclusion {
            winner: state.sole_survivor().map(|c| c.id),
            reason: EndReason::LastStanding,
        });
    }

    if let Some(limit) = config.tick_limit {
        if state.tick >= limit {
            return Some(Conclusion::without_winner(EndReason::TickLimit));
        }
    }

    if is_frozen(state, config) {
        return Some(Conclusion::without_winner(EndReason::Deadlock));
    }

    None
}

/// True when no future tick can change anyone's health.
///
/// Every survivor has zero speed and zero velocity, so every positional
/// update is zero and nobody moves again. With no pair inside the attack
/// band nobody strikes either, and without strikes there is no knockback.
fn is_frozen(state: &BattleState, config: &ArenaConfig) -> bool {
    let living: Vec<_> = state.living().collect();

    let stranded = living
        .iter()
        .all(|c| c.stats().actual_speed == 0.0 && c.velocity.is_zero());
    if !stranded {
        return false;
    }

    living.iter().enumerate().all(|(i, a)| {
        living[i + 1..].iter().all(|b| {
            let distance = a.position.distance(b.position);
            distance <= config.retreat_range || distance > config.engage_range
        })
    })
}
