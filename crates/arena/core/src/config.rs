//! Arena configuration constants and tunable parameters.
use crate::state::Vec2;

/// Tunable arena rules.
///
/// Defaults reproduce the reference balance: an 800×500 arena, 100 health and
/// stamina, and the distance bands that drive the step engine. Every field can
/// be overridden from TOML via `arena-content`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArenaConfig {
    /// Arena width in world units.
    pub width: f64,
    /// Arena height in world units.
    pub height: f64,
    /// Distance from each wall that combatants may not cross.
    pub wall_margin: f64,

    pub max_health: f64,
    pub max_stamina: f64,

    /// Stamina regenerated by every living, non-defeated combatant per tick.
    pub stamina_regen: f64,
    /// Stamina spent per tick while closing distance.
    pub move_stamina_cost: f64,
    /// Stamina required (strictly above) to keep moving; below it the combatant rests.
    pub move_stamina_threshold: f64,
    /// Stamina spent per attack.
    pub attack_stamina_cost: f64,
    /// Stamina required (strictly above) to launch an attack.
    pub attack_stamina_threshold: f64,

    /// Beyond this distance combatants close in on their target.
    pub engage_range: f64,
    /// At or below this distance combatants back away.
    pub retreat_range: f64,

    /// Velocity multiplier applied while resting.
    pub rest_damping: f64,
    /// Fraction of full speed used while circling.
    pub circle_speed_factor: f64,
    /// Radians advanced along the circling path per tick.
    pub circle_angular_rate: f64,
    /// Fraction of full speed used while retreating.
    pub retreat_speed_factor: f64,
    /// Fraction of velocity kept after bouncing off a wall.
    pub bounce_damping: f64,

    pub cooldown: CooldownRules,
    pub stun: StunRules,
    /// Knockback impulse is `damage / knockback_divisor`.
    pub knockback_divisor: f64,

    pub spawn: SpawnLayout,

    /// Optional hard cap on battle length. `None` lets the battle run until at
    /// most one combatant is standing.
    pub tick_limit: Option<u64>,
}

impl ArenaConfig {
    // ===== compile-time constants used as type parameters =====
    /// Fewest combatants a battle may start with.
    pub const MIN_COMBATANTS: usize = 2;
    /// Most combatants a battle may hold.
    pub const MAX_COMBATANTS: usize = 4;

    /// Lower-left corner of the walkable area.
    pub fn min_corner(&self) -> Vec2 {
        Vec2::new(self.wall_margin, self.wall_margin)
    }

    /// Upper-right corner of the walkable area.
    pub fn max_corner(&self) -> Vec2 {
        Vec2::new(self.width - self.wall_margin, self.height - self.wall_margin)
    }

    /// Returns true when `point` lies inside the walkable area.
    pub fn contains(&self, point: Vec2) -> bool {
        let (min, max) = (self.min_corner(), self.max_corner());
        point.is_finite()
            && (min.x..=max.x).contains(&point.x)
            && (min.y..=max.y).contains(&point.y)
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 500.0,
            wall_margin: 30.0,
            max_health: 100.0,
            max_stamina: 100.0,
            stamina_regen: 0.2,
            move_stamina_cost: 0.2,
            move_stamina_threshold: 20.0,
            attack_stamina_cost: 25.0,
            attack_stamina_threshold: 30.0,
            engage_range: 80.0,
            retreat_range: 40.0,
            rest_damping: 0.8,
            circle_speed_factor: 0.5,
            circle_angular_rate: 0.1,
            retreat_speed_factor: 0.7,
            bounce_damping: 0.5,
            cooldown: CooldownRules::default(),
            stun: StunRules::default(),
            knockback_divisor: 10.0,
            spawn: SpawnLayout::default(),
            tick_limit: None,
        }
    }
}

/// Attack cooldown formula: `max(floor_ticks, base_ticks - actual_speed * speed_factor)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CooldownRules {
    pub floor_ticks: f64,
    pub base_ticks: f64,
    pub speed_factor: f64,
}

impl CooldownRules {
    /// Whole ticks until the next attack is allowed.
    ///
    /// Rounded up: a fractional cooldown still blocks the tick it lands in.
    pub fn ticks_for(&self, actual_speed: f64) -> u32 {
        let raw = (self.base_ticks - actual_speed * self.speed_factor).max(self.floor_ticks);
        raw.max(0.0).ceil() as u32
    }
}

impl Default for CooldownRules {
    fn default() -> Self {
        Self {
            floor_ticks: 60.0,
            base_ticks: 120.0,
            speed_factor: 10.0,
        }
    }
}

/// Heavy hits stun: damage above `damage_threshold` stuns for
/// `floor(damage / damage_per_tick)` ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StunRules {
    pub damage_threshold: f64,
    pub damage_per_tick: f64,
}

impl StunRules {
    /// Stun duration caused by `damage`, or `None` if the hit is too light.
    pub fn ticks_for(&self, damage: f64) -> Option<u32> {
        (damage > self.damage_threshold).then(|| (damage / self.damage_per_tick).floor() as u32)
    }
}

impl Default for StunRules {
    fn default() -> Self {
        Self {
            damage_threshold: 15.0,
            damage_per_tick: 5.0,
        }
    }
}

/// Starting line-up used when a combatant has no explicit spawn point.
///
/// Slot `i` spawns at `(origin_x + i * spacing, origin_y + U[0,1) * jitter)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpawnLayout {
    pub origin_x: f64,
    pub origin_y: f64,
    pub spacing: f64,
    pub jitter: f64,
}

impl Default for SpawnLayout {
    fn default() -> Self {
        Self {
            origin_x: 100.0,
            origin_y: 200.0,
            spacing: 150.0,
            jitter: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_rounds_up_and_respects_floor() {
        let rules = CooldownRules::default();
        // 120 - 1.4 * 10 = 106
        assert_eq!(rules.ticks_for(1.4), 106);
        // 120 - 0.42 * 10 = 115.8 -> 116
        assert_eq!(rules.ticks_for(0.42), 116);

        let fast = CooldownRules {
            speed_factor: 100.0,
            ..rules
        };
        assert_eq!(fast.ticks_for(1.4), 60);
    }

    #[test]
    fn stun_requires_damage_above_threshold() {
        let rules = StunRules::default();
        assert_eq!(rules.ticks_for(15.0), None);
        assert_eq!(rules.ticks_for(15.1), Some(3));
        assert_eq!(rules.ticks_for(37.5), Some(7));
    }

    #[test]
    fn walkable_area_excludes_margins() {
        let config = ArenaConfig::default();
        assert!(config.contains(Vec2::new(30.0, 30.0)));
        assert!(config.contains(Vec2::new(770.0, 470.0)));
        assert!(!config.contains(Vec2::new(29.9, 100.0)));
        assert!(!config.contains(Vec2::new(100.0, f64::NAN)));
    }
}
