use crate::combat::{advance_attack_mut, start_attack_mut, update_shield_mut};
use crate::physics::{apply_gravity_mut, apply_movement_mut, move_and_clamp_mut};
use crate::projectiles::{advance_projectile_mut, try_shoot_mut};
use crate::types::*;

/// Per-tick context shared by both fighters.
#[derive(Clone, Copy, Debug)]
pub struct TickContext<'a> {
    pub tick: Tick,
    pub rules: &'a RulesConfig,
    /// Face this x coordinate after movement instead of the movement direction.
    pub face_toward: Option<f64>,
}

/// What one fighter's tick produced for the match loop.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickReport {
    pub hitbox: Option<Rect>,
    pub whiffed: bool,
    pub attack_started: Option<AttackKind>,
    pub fired: bool,
}

/// Advance one fighter by one fixed tick.
///
/// Sub-step order:
///  1. Movement, facing, jump
///  2. Shield hold/release (a raised shield refuses attack entry)
///  3. Attack start
///  4. Shot
///  5. Gravity, integrate, clamp
///  6. Attack timer and hitbox
///  7. Projectile
///  8. Cooldowns
pub fn tick_fighter(f: &mut Fighter, input: &PlayerInput, ctx: &TickContext) -> TickReport {
    // 1. Movement
    apply_movement_mut(f, input);
    if let Some(x) = ctx.face_toward {
        f.facing = if x < f.center_x() {
            facing::LEFT
        } else {
            facing::RIGHT
        };
    }

    // 2. Shield
    update_shield_mut(f, input.pressed(button::SHIELD));

    // 3. Attack start, light wins if both are pressed
    let requested = if input.pressed(button::LIGHT) {
        Some(AttackKind::Light)
    } else if input.pressed(button::HEAVY) {
        Some(AttackKind::Heavy)
    } else {
        None
    };
    let attack_started = requested.filter(|&kind| start_attack_mut(f, kind, ctx.tick));

    // 4. Shot
    let fired = input.pressed(button::SHOOT) && try_shoot_mut(f, ctx.rules);

    // 5. Gravity + move
    apply_gravity_mut(f);
    move_and_clamp_mut(f);

    // 6. Attack state machine
    let attack = advance_attack_mut(f);

    // 7. Projectile
    advance_projectile_mut(f);

    // 8. Cooldowns
    f.shoot_anim = f.shoot_anim.saturating_sub(1);
    f.shield_cooldown = f.shield_cooldown.saturating_sub(1);
    f.shot_cooldown = f.shot_cooldown.saturating_sub(1);

    TickReport {
        hitbox: attack.hitbox,
        whiffed: attack.whiffed,
        attack_started,
        fired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::init::spawn_fighter;
    use proptest::prelude::*;

    fn ctx(tick: Tick, rules: &RulesConfig) -> TickContext<'_> {
        TickContext {
            tick,
            rules,
            face_toward: None,
        }
    }

    #[test]
    fn attack_input_starts_attack() {
        let rules = RulesConfig::default();
        let mut f = spawn_fighter(Side::Player, 100.0, facing::RIGHT);
        let report = tick_fighter(&mut f, &PlayerInput::new(button::HEAVY), &ctx(1, &rules));
        assert_eq!(report.attack_started, Some(AttackKind::Heavy));
        assert!(report.hitbox.is_none()); // still winding up
        assert_eq!(f.attack().unwrap().timer, ATTACK_DURATION_TICKS - 1);
    }

    #[test]
    fn shield_input_blocks_attack_entry() {
        let rules = RulesConfig::default();
        let mut f = spawn_fighter(Side::Player, 100.0, facing::RIGHT);
        let input = PlayerInput::new(button::SHIELD | button::LIGHT);
        let report = tick_fighter(&mut f, &input, &ctx(1, &rules));
        assert!(report.attack_started.is_none());
        assert!(f.is_shielding());
    }

    #[test]
    fn held_attack_button_does_not_restart() {
        let rules = RulesConfig::default();
        let mut f = spawn_fighter(Side::Player, 100.0, facing::RIGHT);
        let input = PlayerInput::new(button::LIGHT);
        let mut starts = 0;
        for t in 1..=ATTACK_DURATION_TICKS {
            starts += tick_fighter(&mut f, &input, &ctx(t, &rules)).attack_started.is_some() as u32;
        }
        assert_eq!(starts, 1);
        assert!(!f.is_attacking());
    }

    #[test]
    fn face_toward_overrides_movement_facing() {
        let rules = RulesConfig::default();
        let mut f = spawn_fighter(Side::Opponent, 600.0, facing::LEFT);
        let c = TickContext {
            tick: 1,
            rules: &rules,
            face_toward: Some(200.0),
        };
        tick_fighter(&mut f, &PlayerInput::new(button::RIGHT), &c);
        assert_eq!(f.facing, facing::LEFT);
        assert_eq!(f.x, 600.0 + RUN_SPEED);
    }

    #[test]
    fn shooting_sets_busy_window() {
        let rules = RulesConfig::default();
        let mut f = spawn_fighter(Side::Player, 100.0, facing::RIGHT);
        let report = tick_fighter(&mut f, &PlayerInput::new(button::SHOOT), &ctx(1, &rules));
        assert!(report.fired);
        assert!(f.is_shooting());
        assert!(f.live_projectile().is_some());
    }

    #[test]
    fn shield_cooldown_blocks_until_zero() {
        let rules = RulesConfig::default();
        let mut f = spawn_fighter(Side::Player, 100.0, facing::RIGHT);
        let hold = PlayerInput::new(button::SHIELD);
        let mut t = 0;
        while f.shield_cooldown == 0 {
            t += 1;
            tick_fighter(&mut f, &hold, &ctx(t, &rules));
        }
        while f.shield_cooldown > 0 {
            t += 1;
            tick_fighter(&mut f, &hold, &ctx(t, &rules));
            if f.shield_cooldown > 0 {
                assert!(!f.is_shielding());
            }
        }
    }

    proptest! {
        /// Health and gauge stay in range under any button mash, with damage
        /// landing on arbitrary ticks.
        #[test]
        fn resources_stay_in_bounds(
            inputs in prop::collection::vec(0u8..128, 1..300),
            damage in prop::collection::vec((0i32..60, any::<bool>()), 1..300),
        ) {
            let rules = RulesConfig::default();
            let mut f = spawn_fighter(Side::Player, 500.0, facing::RIGHT);
            for (t, buttons) in inputs.iter().enumerate() {
                tick_fighter(&mut f, &PlayerInput::new(*buttons), &ctx(t as Tick, &rules));
                let (amount, unblockable) = damage[t % damage.len()];
                if t % 7 == 0 {
                    f.take_damage(amount, unblockable);
                }
                prop_assert!(f.health >= 0 && f.health <= MAX_HEALTH);
                prop_assert!(f.shield_gauge >= 0.0 && f.shield_gauge <= SHIELD_MAX);
                prop_assert!(f.x >= 0.0 && f.x + FIGHTER_WIDTH <= ARENA_WIDTH);
                prop_assert!(f.bottom() <= FLOOR_Y);
            }
        }
    }
}
