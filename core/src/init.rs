use crate::constants::*;
use crate::reward::RewardShaping;
use crate::types::*;

/// A fresh, grounded fighter with full health and gauge.
pub fn spawn_fighter(side: Side, x: f64, facing: i32) -> Fighter {
    Fighter {
        side,
        x,
        y: FLOOR_Y - FIGHTER_HEIGHT,
        vx: 0.0,
        vy: 0.0,
        facing,
        health: MAX_HEALTH,
        mode: Mode::Idle,
        shield_gauge: SHIELD_MAX,
        shield_cooldown: 0,
        combo_count: 0,
        last_attack_tick: None,
        shot_spent: false,
        shot_cooldown: 0,
        shoot_anim: 0,
        projectile: None,
    }
}

pub fn spawn_player() -> Fighter {
    spawn_fighter(Side::Player, PLAYER_SPAWN_X, facing::RIGHT)
}

pub fn spawn_opponent() -> Fighter {
    spawn_fighter(Side::Opponent, OPPONENT_SPAWN_X, facing::LEFT)
}

/// Default match config: standard rules, tabular Medium opponent.
pub fn default_config(seed: Seed) -> MatchConfig {
    MatchConfig {
        seed,
        rules: RulesConfig::default(),
        opponent: OpponentConfig::default(),
        rewards: RewardShaping::default(),
    }
}
