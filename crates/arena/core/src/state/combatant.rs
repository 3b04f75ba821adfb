//! Combatant definitions and live per-combatant state.

use crate::config::ArenaConfig;
use crate::stats::{DerivedStats, TraitInput, TraitSet};

use super::types::{CombatantId, LastAction, Vec2};

/// Combatant definition supplied by a collaborator before a battle starts.
///
/// Nothing here is trusted: traits are validated and the spawn point is
/// bounds-checked when the session starts.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSpec {
    pub id: CombatantId,
    pub name: String,
    /// Display color; ignored by the simulation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub color: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub traits: TraitInput,
    /// Explicit starting point. `None` uses the arena's spawn layout.
    #[cfg_attr(feature = "serde", serde(default))]
    pub spawn: Option<Vec2>,
}

impl CombatantSpec {
    pub fn new(id: u32, name: impl Into<String>, traits: TraitInput) -> Self {
        Self {
            id: CombatantId(id),
            name: name.into(),
            color: String::new(),
            traits,
            spawn: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_spawn(mut self, spawn: Vec2) -> Self {
        self.spawn = Some(spawn);
        self
    }
}

/// Running totals kept for the post-battle report.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatTally {
    pub damage_dealt: f64,
    pub damage_taken: f64,
    /// Attacks launched.
    pub attacks: u32,
    /// Attacks that connected (hit or blocked).
    pub hits: u32,
    pub criticals: u32,
    /// Incoming attacks this combatant dodged.
    pub dodges: u32,
    /// Incoming attacks this combatant blocked.
    pub blocks: u32,
}

/// A combatant inside a running battle.
///
/// Traits and derived stats are fixed at creation; everything else is
/// advanced by the step engine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub color: String,
    traits: TraitSet,
    stats: DerivedStats,

    pub position: Vec2,
    pub velocity: Vec2,
    pub health: f64,
    pub max_health: f64,
    pub stamina: f64,
    pub max_stamina: f64,
    /// Ticks until the next attack is allowed.
    pub attack_cooldown: u32,
    /// Ticks of stun remaining.
    pub stunned: u32,
    pub last_action: LastAction,
    /// Heading in radians. Display only.
    pub facing: f64,
    pub tally: CombatTally,
}

impl Combatant {
    /// Fresh combatant at full health and stamina.
    pub fn new(
        id: CombatantId,
        name: impl Into<String>,
        traits: TraitSet,
        position: Vec2,
        config: &ArenaConfig,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            color: String::new(),
            traits,
            stats: DerivedStats::from_traits(&traits),
            position,
            velocity: Vec2::ZERO,
            health: config.max_health,
            max_health: config.max_health,
            stamina: config.max_stamina,
            max_stamina: config.max_stamina,
            attack_cooldown: 0,
            stunned: 0,
            last_action: LastAction::Idle,
            facing: 0.0,
            tally: CombatTally::default(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn traits(&self) -> &TraitSet {
        &self.traits
    }

    pub fn stats(&self) -> &DerivedStats {
        &self.stats
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_defeated(&self) -> bool {
        !self.is_alive()
    }

    pub fn is_stunned(&self) -> bool {
        self.stunned > 0
    }

    /// Re-derives the cached stats from the traits and reports whether they
    /// still agree. Used when restoring a state that bypassed [`Combatant::new`].
    pub fn stats_consistent(&self) -> bool {
        self.stats == DerivedStats::from_traits(&self.traits)
    }

    #[cfg(test)]
    pub(crate) fn with_stats(mut self, stats: DerivedStats) -> Self {
        self.stats = stats;
        self
    }

    /// Applies damage, clamped so health never drops below zero.
    ///
    /// Returns the damage actually absorbed.
    pub fn take_damage(&mut self, damage: f64) -> f64 {
        let before = self.health;
        self.health = (self.health - damage).max(0.0);
        before - self.health
    }

    pub fn regenerate_stamina(&mut self, amount: f64) {
        self.stamina = (self.stamina + amount).min(self.max_stamina);
    }

    pub fn spend_stamina(&mut self, amount: f64) {
        self.stamina = (self.stamina - amount).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bug() -> Combatant {
        Combatant::new(
            CombatantId(1),
            "Mantis",
            TraitSet::new(50, 50, 50, 50).unwrap(),
            Vec2::new(100.0, 100.0),
            &ArenaConfig::default(),
        )
    }

    #[test]
    fn starts_full_and_idle() {
        let bug = bug();
        assert_eq!(bug.health, 100.0);
        assert_eq!(bug.stamina, 100.0);
        assert_eq!(bug.last_action, LastAction::Idle);
        assert!(bug.is_alive());
        assert!(bug.stats_consistent());
    }

    #[test]
    fn damage_clamps_at_zero() {
        let mut bug = bug();
        assert_eq!(bug.take_damage(30.0), 30.0);
        assert_eq!(bug.take_damage(500.0), 70.0);
        assert_eq!(bug.health, 0.0);
        assert!(bug.is_defeated());
    }

    #[test]
    fn stamina_stays_within_bounds() {
        let mut bug = bug();
        bug.regenerate_stamina(5.0);
        assert_eq!(bug.stamina, 100.0);
        bug.spend_stamina(250.0);
        assert_eq!(bug.stamina, 0.0);
    }
}
