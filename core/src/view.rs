//! Read-only views for renderers and tooling. Nothing here feeds back into
//! the simulation.

use serde::{Deserialize, Serialize};

use crate::types::*;

/// What a fighter looks like this tick, highest priority first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pose {
    Shield,
    Shoot,
    LightAttack,
    HeavyAttack,
    Airborne,
    Run,
    Idle,
}

impl Pose {
    pub fn of(f: &Fighter) -> Pose {
        if f.is_shielding() {
            Pose::Shield
        } else if f.is_shooting() {
            Pose::Shoot
        } else if let Some(attack) = f.attack() {
            match attack.kind {
                AttackKind::Light => Pose::LightAttack,
                AttackKind::Heavy => Pose::HeavyAttack,
            }
        } else if !f.grounded() {
            Pose::Airborne
        } else if f.vx != 0.0 {
            Pose::Run
        } else {
            Pose::Idle
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FighterView {
    pub side: Side,
    pub body: Rect,
    pub facing: i32,
    pub health: i32,
    pub shield_gauge: f64,
    pub shield_cooldown: u32,
    pub combo: u8,
    pub pose: Pose,
    pub projectile: Option<Rect>,
}

impl From<&Fighter> for FighterView {
    fn from(f: &Fighter) -> Self {
        Self {
            side: f.side,
            body: f.rect(),
            facing: f.facing,
            health: f.health,
            shield_gauge: f.shield_gauge,
            shield_cooldown: f.shield_cooldown,
            combo: f.combo_count,
            pose: Pose::of(f),
            projectile: f.live_projectile().map(|p| p.rect()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub tick: Tick,
    pub outcome: Outcome,
    pub player: FighterView,
    pub opponent: FighterView,
}

/// Collision rectangles for debug overlays.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugBoxes {
    pub bodies: Vec<Rect>,
    pub attacks: Vec<Rect>,
    pub projectiles: Vec<Rect>,
}
