//! Per-combatant step: one combatant, one tick.

use crate::combat::{AttackResult, resolve_attack};
use crate::config::ArenaConfig;
use crate::rng::RandomSource;
use crate::state::{Combatant, LastAction, Vec2};
use crate::targeting::select_target;

/// An attack resolved during a step, applied to the target after every
/// combatant has stepped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Strike {
    /// Roster index of the attacker.
    pub attacker: usize,
    /// Roster index of the defender.
    pub target: usize,
    /// Unit vector from attacker to target; knockback direction.
    pub heading: Vec2,
    pub result: AttackResult,
}

/// Advances the combatant at `index` by one tick.
///
/// `me` is the combatant's working copy; `view` is the tick-start roster used
/// for everything the combatant perceives about others (who is alive, where
/// they are, how hurt they are). Returns the strike to apply if the combatant
/// attacked.
///
/// Sequence:
/// 1. defeated combatants are skipped entirely
/// 2. stamina regenerates
/// 3. a stunned combatant spends the tick recovering
/// 4. pick a target; with none left, idle
/// 5. act on the distance band (move / rest, attack / circle, retreat)
/// 6. integrate velocity and bounce off the walls
/// 7. tick down the attack cooldown
pub fn step_combatant(
    index: usize,
    me: &mut Combatant,
    view: &[Combatant],
    tick: u64,
    config: &ArenaConfig,
    rng: &mut (impl RandomSource + ?Sized),
) -> Option<Strike> {
    if me.is_defeated() {
        return None;
    }

    me.regenerate_stamina(config.stamina_regen);

    if me.is_stunned() {
        me.stunned -= 1;
        return None;
    }

    let candidates = view
        .iter()
        .enumerate()
        .filter(|(other, c)| *other != index && c.is_alive());

    let Some(target_index) = select_target(me, candidates, rng) else {
        me.last_action = LastAction::Idle;
        return None;
    };
    let target = &view[target_index];

    let offset = target.position - me.position;
    let distance = offset.length();
    let heading = if distance > 0.0 {
        offset * (1.0 / distance)
    } else {
        // Overlapping: separate along a per-combatant fixed direction.
        Vec2::from_angle(f64::from(me.id.0))
    };
    let speed = me.stats().actual_speed;

    let mut strike = None;

    if distance > config.engage_range {
        if me.stamina > config.move_stamina_threshold {
            me.velocity = heading * speed;
            me.spend_stamina(config.move_stamina_cost);
            me.last_action = LastAction::Moving;
        } else {
            me.velocity = me.velocity * config.rest_damping;
            me.last_action = LastAction::Resting;
        }
    } else if distance > config.retreat_range {
        if me.attack_cooldown == 0 && me.stamina > config.attack_stamina_threshold {
            let result = resolve_attack(me.stats(), target.stats(), rng);
            strike = Some(Strike {
                attacker: index,
                target: target_index,
                heading,
                result,
            });
            me.attack_cooldown = config.cooldown.ticks_for(speed);
            me.spend_stamina(config.attack_stamina_cost);
            me.last_action = LastAction::Attacking;
        } else {
            let angle = tick as f64 * config.circle_angular_rate + f64::from(me.id.0);
            me.velocity = Vec2::from_angle(angle) * (speed * config.circle_speed_factor);
            me.last_action = LastAction::Circling;
        }
    } else {
        me.velocity = -heading * (speed * config.retreat_speed_factor);
        me.last_action = LastAction::Retreating;
    }

    integrate(me, config);

    if me.attack_cooldown > 0 {
        me.attack_cooldown -= 1;
    }

    strike
}

/// Moves by velocity, then clamps to the walkable area. A wall contact
/// reflects that velocity component inward and damps it.
fn integrate(me: &mut Combatant, config: &ArenaConfig) {
    me.position += me.velocity;

    let (min, max) = (config.min_corner(), config.max_corner());
    let damping = config.bounce_damping;

    if me.position.x < min.x {
        me.position.x = min.x;
        me.velocity.x = me.velocity.x.abs() * damping;
    }
    if me.position.x > max.x {
        me.position.x = max.x;
        me.velocity.x = -me.velocity.x.abs() * damping;
    }
    if me.position.y < min.y {
        me.position.y = min.y;
        me.velocity.y = me.velocity.y.abs() * damping;
    }
    if me.position.y > max.y {
        me.position.y = max.y;
        me.velocity.y = -me.velocity.y.abs() * damping;
    }

    if !me.velocity.is_zero() {
        me.facing = me.velocity.angle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::AttackOutcome;
    use crate::rng::ScriptedRng;
    use crate::state::CombatantId;
    use crate::stats::TraitSet;

    fn bug(id: u32, traits: (i64, i64, i64, i64), at: (f64, f64)) -> Combatant {
        Combatant::new(
            CombatantId(id),
            format!("bug-{id}"),
            TraitSet::new(traits.0, traits.1, traits.2, traits.3).unwrap(),
            Vec2::new(at.0, at.1),
            &ArenaConfig::default(),
        )
    }

    fn step(roster: &[Combatant], index: usize, rng: &mut ScriptedRng) -> (Combatant, Option<Strike>) {
        let mut me = roster[index].clone();
        let strike = step_combatant(index, &mut me, roster, 0, &ArenaConfig::default(), rng);
        (me, strike)
    }

    #[test]
    fn far_target_means_moving() {
        let roster = [
            bug(0, (50, 50, 50, 50), (100.0, 200.0)),
            bug(1, (50, 50, 50, 50), (400.0, 200.0)),
        ];
        let mut rng = ScriptedRng::constant(0.5);

        let (me, strike) = step(&roster, 0, &mut rng);

        assert!(strike.is_none());
        assert_eq!(me.last_action, LastAction::Moving);
        // 0.5 × 1.4 towards +x
        assert!((me.velocity.x - 0.7).abs() < 1e-9);
        assert!((me.position.x - 100.7).abs() < 1e-9);
        // +0.2 regen (capped at 100) then -0.2 for moving
        assert!((me.stamina - 99.8).abs() < 1e-9);
    }

    #[test]
    fn exhausted_combatant_rests() {
        let mut tired = bug(0, (50, 50, 50, 50), (100.0, 200.0));
        tired.stamina = 10.0;
        tired.velocity = Vec2::new(1.0, 0.0);
        let roster = [tired, bug(1, (50, 50, 50, 50), (400.0, 200.0))];
        let mut rng = ScriptedRng::constant(0.5);

        let (me, _) = step(&roster, 0, &mut rng);

        assert_eq!(me.last_action, LastAction::Resting);
        assert!((me.velocity.x - 0.8).abs() < 1e-9);
        assert!((me.stamina - 10.2).abs() < 1e-9);
    }

    #[test]
    fn in_band_with_ready_cooldown_attacks() {
        let roster = [
            bug(0, (50, 80, 50, 50), (100.0, 200.0)),
            bug(1, (0, 50, 0, 50), (160.0, 200.0)),
        ];
        // crit: 0.99 fails; dodge p=0 fails; block p=0 fails
        let mut rng = ScriptedRng::constant(0.99);

        let (me, strike) = step(&roster, 0, &mut rng);
        let strike = strike.expect("attacker in range should strike");

        assert_eq!(me.last_action, LastAction::Attacking);
        assert_eq!(strike.target, 1);
        assert_eq!(strike.result.outcome, AttackOutcome::Hit);
        assert!((strike.result.damage - 20.0).abs() < 1e-9);
        assert_eq!(strike.heading, Vec2::new(1.0, 0.0));
        // ceil(120 - 0.7 × 10) = 113, then ticked down once
        assert_eq!(me.attack_cooldown, 112);
        assert!((me.stamina - 75.0).abs() < 1e-9);
    }

    #[test]
    fn in_band_on_cooldown_circles() {
        let mut busy = bug(3, (50, 50, 50, 50), (100.0, 200.0));
        busy.attack_cooldown = 10;
        let roster = [busy, bug(1, (50, 50, 50, 50), (160.0, 200.0))];
        let mut rng = ScriptedRng::constant(0.5);

        let (me, strike) = step(&roster, 0, &mut rng);

        assert!(strike.is_none());
        assert_eq!(me.last_action, LastAction::Circling);
        // angle = 0 × 0.1 + 3, magnitude = 0.7 × 0.5
        let expected = Vec2::from_angle(3.0) * 0.35;
        assert!((me.velocity.x - expected.x).abs() < 1e-9);
        assert!((me.velocity.y - expected.y).abs() < 1e-9);
        assert_eq!(me.attack_cooldown, 9);
    }

    #[test]
    fn too_close_retreats() {
        let roster = [
            bug(0, (100, 50, 50, 50), (100.0, 200.0)),
            bug(1, (50, 50, 50, 50), (120.0, 200.0)),
        ];
        let mut rng = ScriptedRng::constant(0.5);

        let (me, _) = step(&roster, 0, &mut rng);

        assert_eq!(me.last_action, LastAction::Retreating);
        assert!((me.velocity.x + 1.4 * 0.7).abs() < 1e-9);
        assert!(me.position.x < 100.0);
    }

    #[test]
    fn stunned_combatant_only_recovers() {
        let mut dazed = bug(0, (50, 50, 50, 50), (100.0, 200.0));
        dazed.stunned = 3;
        dazed.attack_cooldown = 5;
        dazed.stamina = 50.0;
        dazed.last_action = LastAction::Attacking;
        let roster = [dazed, bug(1, (50, 50, 50, 50), (160.0, 200.0))];
        let mut rng = ScriptedRng::constant(0.0);

        let (me, strike) = step(&roster, 0, &mut rng);

        assert!(strike.is_none());
        assert_eq!(me.stunned, 2);
        assert_eq!(me.position, Vec2::new(100.0, 200.0));
        assert_eq!(me.attack_cooldown, 5);
        assert_eq!(me.last_action, LastAction::Attacking);
        assert!((me.stamina - 50.2).abs() < 1e-9);
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn defeated_combatant_is_frozen() {
        let mut fallen = bug(0, (50, 50, 50, 50), (100.0, 200.0));
        fallen.health = 0.0;
        fallen.stamina = 10.0;
        let roster = [fallen.clone(), bug(1, (50, 50, 50, 50), (160.0, 200.0))];
        let mut rng = ScriptedRng::constant(0.0);

        let (me, strike) = step(&roster, 0, &mut rng);

        assert!(strike.is_none());
        assert_eq!(me, fallen);
    }

    #[test]
    fn lone_survivor_idles() {
        let mut fallen = bug(1, (50, 50, 50, 50), (160.0, 200.0));
        fallen.health = 0.0;
        let roster = [bug(0, (50, 50, 50, 50), (100.0, 200.0)), fallen];
        let mut rng = ScriptedRng::constant(0.0);

        let (me, strike) = step(&roster, 0, &mut rng);

        assert!(strike.is_none());
        assert_eq!(me.last_action, LastAction::Idle);
        assert_eq!(me.position, Vec2::new(100.0, 200.0));
    }

    #[test]
    fn walls_bounce_with_damping() {
        let mut runner = bug(0, (100, 50, 50, 50), (31.0, 200.0));
        runner.velocity = Vec2::new(-3.0, 0.0);
        let config = ArenaConfig::default();

        integrate(&mut runner, &config);

        assert_eq!(runner.position.x, 30.0);
        assert_eq!(runner.velocity.x, 1.5);
    }
}
