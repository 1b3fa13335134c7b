use crate::constants::*;
use crate::types::*;

/// Spawn a projectile at the fighter's leading edge, mid-body, travelling
/// the way it faces.
pub fn spawn_projectile(f: &Fighter) -> Projectile {
    let body = f.rect();
    let x = if f.facing == facing::RIGHT {
        body.right()
    } else {
        body.left()
    };
    Projectile {
        x,
        y: body.center_y(),
        direction: f.facing,
        speed: PROJECTILE_SPEED,
        active: true,
    }
}

/// Whether the fighter may fire this tick under the given rules.
/// At most one projectile per fighter is ever live.
pub fn can_shoot(f: &Fighter, rules: &RulesConfig) -> bool {
    if f.is_attacking() || f.is_shielding() || f.live_projectile().is_some() {
        return false;
    }
    match rules.shot_rule {
        ShotRule::SingleUse => !f.shot_spent,
        ShotRule::Cooldown(_) => f.shot_cooldown == 0,
    }
}

/// Fire if allowed. Returns whether a projectile was spawned.
pub fn try_shoot_mut(f: &mut Fighter, rules: &RulesConfig) -> bool {
    if !can_shoot(f, rules) {
        return false;
    }
    f.projectile = Some(spawn_projectile(f));
    f.shoot_anim = SHOOT_ANIM_TICKS;
    match rules.shot_rule {
        ShotRule::SingleUse => f.shot_spent = true,
        ShotRule::Cooldown(ticks) => f.shot_cooldown = ticks,
    }
    true
}

/// Check if a projectile has left the arena horizontally.
pub fn is_out_of_bounds(proj: &Projectile) -> bool {
    proj.x < 0.0 || proj.x > ARENA_WIDTH
}

/// Move the fighter's projectile and drop it once it is spent.
pub fn advance_projectile_mut(f: &mut Fighter) {
    if let Some(proj) = f.projectile.as_mut() {
        proj.x += proj.speed * proj.direction as f64;
        if is_out_of_bounds(proj) {
            proj.active = false;
        }
    }
    if f.projectile.is_some_and(|p| !p.active) {
        f.projectile = None;
    }
}

/// Projectile travelling toward `target` (it has not yet passed the target's left edge).
pub fn is_inbound(proj: &Projectile, target: &Fighter) -> bool {
    proj.active
        && ((proj.direction == facing::RIGHT && proj.x < target.x)
            || (proj.direction == facing::LEFT && proj.x > target.x))
}

/// Horizontal distance from the projectile to the nearest edge of the target's body.
pub fn distance_to(proj: &Projectile, target: &Fighter) -> f64 {
    let body = target.rect();
    if proj.x < body.left() {
        body.left() - proj.x
    } else if proj.x > body.right() {
        proj.x - body.right()
    } else {
        0.0
    }
}

/// Test the shooter's live projectile against the target's body and consume it
/// on contact.
pub fn take_projectile_hit(shooter: &mut Fighter, target: &Fighter) -> bool {
    let hit = shooter
        .live_projectile()
        .is_some_and(|p| p.rect().overlaps(&target.rect()));
    if hit {
        shooter.projectile = None;
    }
    hit
}
