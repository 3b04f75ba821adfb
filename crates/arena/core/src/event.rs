//! Battle events.
//!
//! Events explain a tick after the fact. They carry ids, not names; use
//! [`BattleEvent::log_line`] to render the human-readable battle log.

use crate::combat::AttackOutcome;
use crate::engine::EndReason;
use crate::state::{CombatantId, Vec2};

/// Something that happened on a given tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleEvent {
    /// Tick the event belongs to (1 for the first tick).
    pub tick: u64,
    pub kind: EventKind,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum EventKind {
    /// The battle left setup with this many combatants.
    Started { combatants: usize },
    Attack {
        attacker: CombatantId,
        defender: CombatantId,
        outcome: AttackOutcome,
        /// Damage rolled, before clamping to the defender's remaining health.
        damage: f64,
        critical: bool,
        /// Defender position at the time of the hit, for effect rendering.
        at: Vec2,
    },
    Stunned {
        combatant: CombatantId,
        ticks: u32,
    },
    Defeated {
        combatant: CombatantId,
        by: Option<CombatantId>,
    },
    BattleEnded {
        winner: Option<CombatantId>,
        reason: EndReason,
    },
}

impl BattleEvent {
    pub fn new(tick: u64, kind: EventKind) -> Self {
        Self { tick, kind }
    }

    /// Renders the event as one battle-log line.
    ///
    /// `name_of` resolves combatant ids; unknown ids fall back to `#id`.
    pub fn log_line<'a>(&self, name_of: impl Fn(CombatantId) -> Option<&'a str>) -> String {
        let name = |id: CombatantId| name_of(id).map_or_else(|| id.to_string(), str::to_owned);

        match &self.kind {
            EventKind::Started { combatants } => {
                format!("Battle started with {combatants} bugs")
            }
            EventKind::Attack {
                attacker,
                defender,
                outcome,
                damage,
                critical,
                ..
            } => {
                let (attacker, defender) = (name(*attacker), name(*defender));
                let damage = damage.floor();
                let crit = if *critical { " (CRITICAL!)" } else { "" };
                match outcome {
                    AttackOutcome::Hit => format!("{attacker} hit {defender} for {damage} damage{crit}"),
                    AttackOutcome::Blocked => {
                        format!("{defender} blocked {attacker}'s attack, taking {damage} damage{crit}")
                    }
                    AttackOutcome::Dodge => format!("{defender} dodged {attacker}'s attack!"),
                }
            }
            EventKind::Stunned { combatant, ticks } => {
                format!("{} is stunned for {ticks} ticks", name(*combatant))
            }
            EventKind::Defeated { combatant, by } => match by {
                Some(by) => format!("{} was defeated by {}", name(*combatant), name(*by)),
                None => format!("{} was defeated", name(*combatant)),
            },
            EventKind::BattleEnded { winner, reason } => match (reason, winner) {
                (EndReason::LastStanding, Some(winner)) => {
                    format!("{} wins the battle!", name(*winner))
                }
                (EndReason::LastStanding, None) => "No bug left standing: draw".to_owned(),
                (EndReason::Terminated, _) => "Battle terminated".to_owned(),
                (EndReason::TickLimit, _) => "Tick limit reached: stalemate".to_owned(),
                (EndReason::Deadlock, _) => "No bug can reach another: stalemate".to_owned(),
                (EndReason::Fault, _) => "Battle aborted after an internal fault".to_owned(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(id: CombatantId) -> Option<&'static str> {
        match id.0 {
            0 => Some("Mantis"),
            1 => Some("Beetle"),
            _ => None,
        }
    }

    fn attack(outcome: AttackOutcome, damage: f64, critical: bool) -> BattleEvent {
        BattleEvent::new(
            12,
            EventKind::Attack {
                attacker: CombatantId(0),
                defender: CombatantId(1),
                outcome,
                damage,
                critical,
                at: Vec2::ZERO,
            },
        )
    }

    #[test]
    fn attack_lines() {
        assert_eq!(
            attack(AttackOutcome::Hit, 18.75, true).log_line(names),
            "Mantis hit Beetle for 18 damage (CRITICAL!)"
        );
        assert_eq!(
            attack(AttackOutcome::Dodge, 0.0, false).log_line(names),
            "Beetle dodged Mantis's attack!"
        );
        assert_eq!(
            attack(AttackOutcome::Blocked, 4.2, false).log_line(names),
            "Beetle blocked Mantis's attack, taking 4 damage"
        );
    }

    #[test]
    fn stalemates_name_their_cause() {
        let ended = |reason| {
            BattleEvent::new(
                40,
                EventKind::BattleEnded {
                    winner: None,
                    reason,
                },
            )
            .log_line(names)
        };
        assert_eq!(ended(EndReason::TickLimit), "Tick limit reached: stalemate");
        assert_eq!(
            ended(EndReason::Deadlock),
            "No bug can reach another: stalemate"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_is_internally_tagged() {
        let event = attack(AttackOutcome::Blocked, 4.25, true);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["tick"], 12);
        assert_eq!(json["kind"]["type"], "attack");
        assert_eq!(json["kind"]["outcome"], "blocked");
        assert_eq!(json["kind"]["attacker"], 0);
        assert_eq!(json["kind"]["damage"], 4.25);

        let back: BattleEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);

        let ended = serde_json::json!({
            "tick": 7,
            "kind": { "type": "battle_ended", "winner": null, "reason": "deadlock" },
        });
        assert_eq!(
            serde_json::from_value::<BattleEvent>(ended).unwrap().kind,
            EventKind::BattleEnded {
                winner: None,
                reason: EndReason::Deadlock,
            }
        );
    }

    #[test]
    fn unknown_ids_fall_back_to_number() {
        let event = BattleEvent::new(
            3,
            EventKind::BattleEnded {
                winner: Some(CombatantId(9)),
                reason: EndReason::LastStanding,
            },
        );
        assert_eq!(event.log_line(names), "#9 wins the battle!");
    }
}
