use crate::types::AttackKind;

// All values are per-tick at 60 Hz unless noted.

// Arena
pub const ARENA_WIDTH: f64 = 1200.0;
pub const FLOOR_Y: f64 = 550.0;

// Physics
pub const GRAVITY: f64 = 0.8;
pub const RUN_SPEED: f64 = 5.0;
pub const JUMP_VELOCITY: f64 = -22.0;

// Fighter body
pub const FIGHTER_WIDTH: f64 = 50.0;
pub const FIGHTER_HEIGHT: f64 = 100.0;

// Spawn (x of the body's left edge)
pub const PLAYER_SPAWN_X: f64 = 200.0;
pub const OPPONENT_SPAWN_X: f64 = 600.0;

// Health
pub const MAX_HEALTH: i32 = 100;

// Shield
pub const SHIELD_MAX: f64 = 100.0;
pub const SHIELD_DRAIN: f64 = 2.0;
pub const SHIELD_REGEN: f64 = 0.5;
pub const SHIELD_COOLDOWN_TICKS: u32 = 180;
/// Gauge drained per point of blocked damage.
pub const BLOCK_DRAIN_FACTOR: f64 = 2.0;

// Melee
pub const ATTACK_DURATION_TICKS: u32 = 20;
/// Remaining-timer values (after the per-tick decrement) during which the
/// hitbox is live. Everything above is windup, everything below is recovery.
pub const ACTIVE_WINDOW_FIRST: u32 = 17;
pub const ACTIVE_WINDOW_LAST: u32 = 11;
pub const LIGHT_REACH: f64 = 40.0;
pub const HEAVY_REACH: f64 = 60.0;
pub const LIGHT_DAMAGE: i32 = 5;
pub const HEAVY_DAMAGE: i32 = 8;
pub const MAX_COMBO: u8 = 3;
pub const COMBO_REACH_BONUS: f64 = 20.0;
pub const COMBO_DAMAGE_MULTIPLIER: i32 = 2;
/// 800 ms at 60 Hz.
pub const COMBO_WINDOW_TICKS: u32 = 48;
pub const HITBOX_OFFSET_Y: f64 = 10.0;
pub const HITBOX_HEIGHT: f64 = 50.0;

// Distance buckets, derived from reach so legality matches the state
pub const CLOSE_MARGIN: f64 = 10.0;
pub const MID_MARGIN: f64 = 20.0;
pub const CLOSE_THRESHOLD: f64 = LIGHT_REACH + CLOSE_MARGIN;
pub const MID_THRESHOLD: f64 = HEAVY_REACH + MID_MARGIN;

// Projectile
pub const PROJECTILE_WIDTH: f64 = 20.0;
pub const PROJECTILE_HEIGHT: f64 = 10.0;
pub const PROJECTILE_SPEED: f64 = 15.0;
pub const PROJECTILE_DAMAGE: i32 = 40;
pub const SHOOT_ANIM_TICKS: u32 = 20;

// Body collision
pub const PUSH_STRENGTH: f64 = 5.0;

// Tick rate
pub const TICK_RATE: u32 = 60;

pub fn reach(kind: AttackKind) -> f64 {
    match kind {
        AttackKind::Light => LIGHT_REACH,
        AttackKind::Heavy => HEAVY_REACH,
    }
}

pub fn base_damage(kind: AttackKind) -> i32 {
    match kind {
        AttackKind::Light => LIGHT_DAMAGE,
        AttackKind::Heavy => HEAVY_DAMAGE,
    }
}

/// Largest gap at which an attack of this kind is considered able to connect.
pub fn legal_gap(kind: AttackKind) -> f64 {
    match kind {
        AttackKind::Light => CLOSE_THRESHOLD,
        AttackKind::Heavy => MID_THRESHOLD,
    }
}
