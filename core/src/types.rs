use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::reward::RewardShaping;

// ── Primitives ──────────────────────────────────────────────

pub type Tick = u32;
pub type Seed = u64;

/// Axis-aligned rectangle, y grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
    pub fn left(&self) -> f64 {
        self.x
    }
    pub fn right(&self) -> f64 {
        self.x + self.w
    }
    pub fn top(&self) -> f64 {
        self.y
    }
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
    pub fn center_x(&self) -> f64 {
        self.x + self.w / 2.0
    }
    pub fn center_y(&self) -> f64 {
        self.y + self.h / 2.0
    }
    /// Strict overlap; touching edges do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

// ── Input ───────────────────────────────────────────────────

/// Button bitmask constants.
pub mod button {
    pub const LEFT: u8 = 1;
    pub const RIGHT: u8 = 2;
    pub const JUMP: u8 = 4;
    pub const LIGHT: u8 = 8;
    pub const HEAVY: u8 = 16;
    pub const SHIELD: u8 = 32;
    pub const SHOOT: u8 = 64;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerInput {
    pub buttons: u8,
}

pub const NULL_INPUT: PlayerInput = PlayerInput { buttons: 0 };

impl PlayerInput {
    pub const fn new(buttons: u8) -> Self {
        Self { buttons }
    }
    pub fn pressed(&self, b: u8) -> bool {
        self.buttons & b != 0
    }
    /// -1, 0 or 1. Opposite directions cancel.
    pub fn horizontal(&self) -> i32 {
        let mut dir = 0;
        if self.pressed(button::LEFT) {
            dir -= 1;
        }
        if self.pressed(button::RIGHT) {
            dir += 1;
        }
        dir
    }
}

// ── Fighter ─────────────────────────────────────────────────

/// Facing direction: Right = 1, Left = -1.
pub mod facing {
    pub const RIGHT: i32 = 1;
    pub const LEFT: i32 = -1;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackKind {
    Light,
    Heavy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackPhase {
    Windup,
    Active,
    Recovery,
}

/// One attack instance, from start until its timer expires.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    pub kind: AttackKind,
    /// Ticks remaining, counting down from `ATTACK_DURATION_TICKS`.
    pub timer: u32,
    /// Combo tier at the moment the attack started (1..=3).
    pub combo: u8,
    /// Latched on the first successful hit so a lingering hitbox lands once.
    pub has_hit: bool,
}

impl Attack {
    pub fn phase(&self) -> AttackPhase {
        if self.timer > ACTIVE_WINDOW_FIRST {
            AttackPhase::Windup
        } else if self.timer >= ACTIVE_WINDOW_LAST {
            AttackPhase::Active
        } else {
            AttackPhase::Recovery
        }
    }

    pub fn reach(&self) -> f64 {
        let base = reach(self.kind);
        if self.combo >= MAX_COMBO {
            base + COMBO_REACH_BONUS
        } else {
            base
        }
    }

    pub fn damage(&self) -> i32 {
        let base = base_damage(self.kind);
        if self.combo >= MAX_COMBO {
            base * COMBO_DAMAGE_MULTIPLIER
        } else {
            base
        }
    }
}

/// Attack and shield are mutually exclusive; the enum makes the invariant structural.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Idle,
    Attacking(Attack),
    Shielding,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub x: f64,
    pub y: f64,
    pub direction: i32,
    pub speed: f64,
    pub active: bool,
}

impl Projectile {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, PROJECTILE_WIDTH, PROJECTILE_HEIGHT)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Opponent,
}

/// A combatant. Replaced wholesale on reset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    pub side: Side,
    /// Top-left of the body box.
    pub x: f64,
    pub y: f64,
    /// Horizontal displacement applied this tick (movement intent).
    pub vx: f64,
    pub vy: f64,
    pub facing: i32,
    pub health: i32,
    pub mode: Mode,
    pub shield_gauge: f64,
    pub shield_cooldown: u32,
    pub combo_count: u8,
    pub last_attack_tick: Option<Tick>,
    pub shot_spent: bool,
    pub shot_cooldown: u32,
    pub shoot_anim: u32,
    pub projectile: Option<Projectile>,
}

impl Fighter {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, FIGHTER_WIDTH, FIGHTER_HEIGHT)
    }
    pub fn center_x(&self) -> f64 {
        self.x + FIGHTER_WIDTH / 2.0
    }
    pub fn center_y(&self) -> f64 {
        self.y + FIGHTER_HEIGHT / 2.0
    }
    pub fn bottom(&self) -> f64 {
        self.y + FIGHTER_HEIGHT
    }
    pub fn grounded(&self) -> bool {
        self.bottom() >= FLOOR_Y
    }
    pub fn attack(&self) -> Option<&Attack> {
        match &self.mode {
            Mode::Attacking(a) => Some(a),
            _ => None,
        }
    }
    pub fn is_attacking(&self) -> bool {
        matches!(self.mode, Mode::Attacking(_))
    }
    pub fn is_shielding(&self) -> bool {
        matches!(self.mode, Mode::Shielding)
    }
    pub fn is_shooting(&self) -> bool {
        self.shoot_anim > 0
    }
    /// The live projectile, if any.
    pub fn live_projectile(&self) -> Option<&Projectile> {
        self.projectile.as_ref().filter(|p| p.active)
    }
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

// ── Actions ─────────────────────────────────────────────────

/// The opponent's fixed action set. Declaration order is the tie-break order
/// used by value-table lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    LightAttack,
    HeavyAttack,
    Shield,
    Shoot,
    Idle,
}

impl Action {
    pub const COUNT: usize = 8;
    pub const ALL: [Action; Action::COUNT] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
        Action::LightAttack,
        Action::HeavyAttack,
        Action::Shield,
        Action::Shoot,
        Action::Idle,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::MoveLeft => "move_left",
            Action::MoveRight => "move_right",
            Action::Jump => "jump",
            Action::LightAttack => "light_attack",
            Action::HeavyAttack => "heavy_attack",
            Action::Shield => "shield",
            Action::Shoot => "shoot",
            Action::Idle => "idle",
        }
    }

    /// Movement toward `dir` (-1 or 1).
    pub fn toward(dir: i32) -> Action {
        if dir < 0 {
            Action::MoveLeft
        } else {
            Action::MoveRight
        }
    }

    pub fn attack_kind(self) -> Option<AttackKind> {
        match self {
            Action::LightAttack => Some(AttackKind::Light),
            Action::HeavyAttack => Some(AttackKind::Heavy),
            _ => None,
        }
    }

    pub fn is_movement(self) -> bool {
        matches!(self, Action::MoveLeft | Action::MoveRight)
    }

    /// Attacks and shots commit the fighter to an animation.
    pub fn is_committed(self) -> bool {
        matches!(self, Action::LightAttack | Action::HeavyAttack | Action::Shoot)
    }

    /// Held actions keep repeating while a decision is locked in.
    pub fn persists_under_lock(self) -> bool {
        self.is_movement() || self == Action::Shield
    }

    pub fn to_input(self) -> PlayerInput {
        let buttons = match self {
            Action::MoveLeft => button::LEFT,
            Action::MoveRight => button::RIGHT,
            Action::Jump => button::JUMP,
            Action::LightAttack => button::LIGHT,
            Action::HeavyAttack => button::HEAVY,
            Action::Shield => button::SHIELD,
            Action::Shoot => button::SHOOT,
            Action::Idle => 0,
        };
        PlayerInput::new(buttons)
    }
}

// ── Outcome ─────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    #[default]
    Ongoing,
    PlayerWon,
    OpponentWon,
}

impl Outcome {
    pub fn is_over(self) -> bool {
        self != Outcome::Ongoing
    }
}

// ── Config ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    Tabular,
    Scripted,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentConfig {
    pub kind: PolicyKind,
    pub difficulty: Difficulty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotRule {
    /// One shot per round.
    SingleUse,
    /// Re-arms this many ticks after firing.
    Cooldown(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyCollision {
    /// Both bodies shoved apart by `strength` each tick they overlap.
    Push { strength: f64 },
    /// Whoever walks into the other stops at contact.
    HardStop,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub projectile_blockable: bool,
    pub shot_rule: ShotRule,
    pub body_collision: BodyCollision,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            projectile_blockable: true,
            shot_rule: ShotRule::SingleUse,
            body_collision: BodyCollision::Push {
                strength: PUSH_STRENGTH,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub seed: Seed,
    pub rules: RulesConfig,
    pub opponent: OpponentConfig,
    pub rewards: RewardShaping,
}

impl Default for MatchConfig {
    fn default() -> Self {
        crate::init::default_config(0)
    }
}
