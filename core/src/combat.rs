use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageOutcome {
    Blocked,
    Hit,
}

/// Result of advancing an attack by one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AttackTick {
    pub hitbox: Option<Rect>,
    /// The active window just closed without connecting.
    pub whiffed: bool,
}

/// Begin an attack unless the fighter is already attacking or shielding.
///
/// Consecutive starts less than `COMBO_WINDOW_TICKS` apart raise the combo
/// tier (capped at `MAX_COMBO`); a longer gap resets it to 1.
pub fn start_attack_mut(f: &mut Fighter, kind: AttackKind, tick: Tick) -> bool {
    if f.mode != Mode::Idle {
        return false;
    }

    let chained = f
        .last_attack_tick
        .is_some_and(|last| tick.saturating_sub(last) < COMBO_WINDOW_TICKS);
    f.combo_count = if chained {
        (f.combo_count + 1).min(MAX_COMBO)
    } else {
        1
    };
    f.last_attack_tick = Some(tick);
    f.mode = Mode::Attacking(Attack {
        kind,
        timer: ATTACK_DURATION_TICKS,
        combo: f.combo_count,
        has_hit: false,
    });
    true
}

/// Hitbox in front of the fighter on the side it faces.
pub fn attack_hitbox(f: &Fighter, attack: &Attack) -> Rect {
    let reach = attack.reach();
    let body = f.rect();
    let x = if f.facing == facing::RIGHT {
        body.right()
    } else {
        body.left() - reach
    };
    Rect::new(x, body.top() + HITBOX_OFFSET_Y, reach, HITBOX_HEIGHT)
}

/// Count the attack timer down; the hitbox exists only in the active window.
pub fn advance_attack_mut(f: &mut Fighter) -> AttackTick {
    let Mode::Attacking(mut attack) = f.mode else {
        return AttackTick::default();
    };

    attack.timer = attack.timer.saturating_sub(1);
    let hitbox = (attack.phase() == AttackPhase::Active).then(|| attack_hitbox(f, &attack));
    let whiffed = attack.timer == ACTIVE_WINDOW_LAST - 1 && !attack.has_hit;

    f.mode = if attack.timer == 0 {
        Mode::Idle
    } else {
        Mode::Attacking(attack)
    };

    AttackTick { hitbox, whiffed }
}

/// Test a live hitbox against the defender's body.
///
/// On the first connection of the attack the has-hit latch is set and the
/// attack kind and damage are returned. Later ticks of the same attack return
/// `None` even if the hitbox still overlaps.
pub fn connect_hitbox(
    attacker: &mut Fighter,
    hitbox: &Rect,
    defender: &Fighter,
) -> Option<(AttackKind, i32)> {
    let Mode::Attacking(attack) = &mut attacker.mode else {
        return None;
    };
    if attack.has_hit || !hitbox.overlaps(&defender.rect()) {
        return None;
    }
    attack.has_hit = true;
    Some((attack.kind, attack.damage()))
}

/// Hold or release the shield for this tick.
///
/// Holding drains the gauge; an empty gauge breaks the shield and starts the
/// cooldown. While the cooldown runs the shield cannot be raised and the gauge
/// does not regenerate. Not holding regenerates up to `SHIELD_MAX`.
pub fn update_shield_mut(f: &mut Fighter, held: bool) {
    if f.shield_cooldown > 0 {
        if f.is_shielding() {
            f.mode = Mode::Idle;
        }
        return;
    }

    if held && f.shield_gauge > 0.0 && !f.is_attacking() {
        f.mode = Mode::Shielding;
        f.shield_gauge = (f.shield_gauge - SHIELD_DRAIN).max(0.0);
        if f.shield_gauge <= 0.0 {
            break_shield(f);
        }
    } else {
        if f.is_shielding() {
            f.mode = Mode::Idle;
        }
        f.shield_gauge = (f.shield_gauge + SHIELD_REGEN).min(SHIELD_MAX);
    }
}

fn break_shield(f: &mut Fighter) {
    if f.is_shielding() {
        f.mode = Mode::Idle;
    }
    f.shield_cooldown = SHIELD_COOLDOWN_TICKS;
}

impl Fighter {
    /// The one damage path for melee and ranged hits.
    ///
    /// A raised shield absorbs blockable damage at `BLOCK_DRAIN_FACTOR` gauge
    /// per point and leaves health untouched. Everything else comes off
    /// health, which never drops below zero.
    pub fn take_damage(&mut self, amount: i32, unblockable: bool) -> DamageOutcome {
        let amount = amount.max(0);
        if self.is_shielding() && !unblockable {
            self.shield_gauge = (self.shield_gauge - amount as f64 * BLOCK_DRAIN_FACTOR).max(0.0);
            if self.shield_gauge <= 0.0 {
                break_shield(self);
            }
            DamageOutcome::Blocked
        } else {
            self.health = (self.health - amount).max(0);
            DamageOutcome::Hit
        }
    }
}
