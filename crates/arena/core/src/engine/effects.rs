//! Applying resolved strikes to the roster.

use crate::combat::AttackOutcome;
use crate::config::ArenaConfig;
use crate::event::{BattleEvent, EventKind};
use crate::state::Combatant;

use super::step::Strike;

/// Applies one strike: damage, knockback, stun, tallies. Appends the
/// resulting events in order (attack, then stun, then defeat).
///
/// A target already brought to zero earlier in the same tick absorbs nothing
/// further, but the attack is still recorded.
pub fn apply_strike(
    roster: &mut [Combatant],
    strike: &Strike,
    tick: u64,
    config: &ArenaConfig,
    events: &mut Vec<BattleEvent>,
) {
    let attacker_id = roster[strike.attacker].id;
    let result = strike.result;
    let target = &mut roster[strike.target];
    let defender_id = target.id;
    let was_alive = target.is_alive();

    events.push(BattleEvent::new(
        tick,
        EventKind::Attack {
            attacker: attacker_id,
            defender: defender_id,
            outcome: result.outcome,
            damage: result.damage,
            critical: result.critical,
            at: target.position,
        },
    ));

    let mut absorbed = 0.0;
    match result.outcome {
        AttackOutcome::Dodge => target.tally.dodges += 1,
        AttackOutcome::Hit | AttackOutcome::Blocked => {
            if result.outcome == AttackOutcome::Blocked {
                target.tally.blocks += 1;
            }
            absorbed = target.take_damage(result.damage);
            target.tally.damage_taken += absorbed;
            target.velocity += strike.heading * (result.damage / config.knockback_divisor);

            if let Some(ticks) = config.stun.ticks_for(result.damage) {
                target.stunned = ticks;
                if target.is_alive() {
                    events.push(BattleEvent::new(
                        tick,
                        EventKind::Stunned {
                            combatant: defender_id,
                            ticks,
                        },
                    ));
                }
            }

            if was_alive && target.is_defeated() {
                events.push(BattleEvent::new(
                    tick,
                    EventKind::Defeated {
                        combatant: defender_id,
                        by: Some(attacker_id),
                    },
                ));
            }
        }
    }

    let tally = &mut roster[strike.attacker].tally;
    tally.attacks += 1;
    if result.outcome.connected() {
        tally.hits += 1;
        tally.damage_dealt += absorbed;
        if result.critical {
            tally.criticals += 1;
        }
    }
}
