use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{DecisionLock, OpponentPolicy};
use crate::constants::*;
use crate::discretize::*;
use crate::projectiles::{can_shoot, distance_to, is_inbound};
use crate::types::*;

/// An attack this close interrupts whatever the policy was committed to.
pub const REFLEX_GAP: f64 = 60.0;
/// An attack in windup or active within this gap counts as a threat.
pub const THREAT_GAP: f64 = 90.0;
/// Inbound projectiles closer than this are noticed (Hard sees them at any range).
pub const PROJECTILE_ALERT_RADIUS: f64 = 300.0;
/// Distance from the wall that counts as cornered.
pub const CORNER_MARGIN: f64 = 40.0;
/// Gauge kept in reserve; below it the shield is not raised.
pub const SHIELD_RESERVE: f64 = 20.0;

pub fn reaction_delay(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 24,
        Difficulty::Medium => 12,
        Difficulty::Hard => 5,
    }
}

/// What the reflex policy reads off the two fighters each decision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub gap: f64,
    /// -1 or 1, pointing at the other fighter.
    pub toward: i32,
    pub cornered: bool,
    pub attack_threat: bool,
    pub attack_in_reflex_range: bool,
    pub counter_window: bool,
    pub projectile_threat: bool,
    /// Inbound projectile inside the alert radius, whatever the tier.
    pub projectile_in_reflex_range: bool,
    pub shield_ready: bool,
    pub shot_ready: bool,
}

impl Reading {
    pub fn take(me: &Fighter, other: &Fighter, difficulty: Difficulty, rules: &RulesConfig) -> Self {
        let gap = gap(me, other);
        let toward = if other.center_x() < me.center_x() {
            facing::LEFT
        } else {
            facing::RIGHT
        };
        let cornered = if toward == facing::RIGHT {
            me.x <= CORNER_MARGIN
        } else {
            me.x + FIGHTER_WIDTH >= ARENA_WIDTH - CORNER_MARGIN
        };

        let live_phase = other.attack().map(|a| a.phase());
        let swinging = matches!(live_phase, Some(AttackPhase::Windup | AttackPhase::Active));

        let inbound = other.live_projectile().filter(|p| is_inbound(p, me));
        let projectile_in_reflex_range =
            inbound.is_some_and(|p| distance_to(p, me) <= PROJECTILE_ALERT_RADIUS);
        let projectile_threat =
            projectile_in_reflex_range || (inbound.is_some() && difficulty == Difficulty::Hard);

        Self {
            gap,
            toward,
            cornered,
            attack_threat: swinging && gap <= THREAT_GAP,
            attack_in_reflex_range: swinging && gap <= REFLEX_GAP,
            counter_window: live_phase == Some(AttackPhase::Recovery),
            projectile_threat,
            projectile_in_reflex_range,
            shield_ready: me.shield_cooldown == 0 && me.shield_gauge > SHIELD_RESERVE,
            shot_ready: can_shoot(me, rules),
        }
    }

    pub fn approach(&self) -> Action {
        Action::toward(self.toward)
    }

    pub fn retreat(&self) -> Action {
        Action::toward(-self.toward)
    }
}

/// Hand-written opponent: fixed priorities per tier, seeded coin flips, and a
/// reaction delay that stands in for human reaction time.
pub struct ScriptedReflex {
    difficulty: Difficulty,
    rules: RulesConfig,
    lock: DecisionLock,
    /// Follow-up issued on the next free decision.
    queued: Option<Action>,
    rng: ChaCha8Rng,
}

impl ScriptedReflex {
    pub fn new(difficulty: Difficulty, rules: RulesConfig, seed: Seed) -> Self {
        Self {
            difficulty,
            rules,
            lock: DecisionLock::default(),
            queued: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn should_interrupt(&self, r: &Reading) -> bool {
        if self.lock.held_action() == Some(Action::Shield) {
            return false;
        }
        r.attack_in_reflex_range
            || (self.difficulty == Difficulty::Hard && r.projectile_in_reflex_range)
    }

    fn decide(&mut self, distance: DistanceBucket, r: &Reading) -> Action {
        match self.difficulty {
            Difficulty::Easy => self.decide_easy(r),
            Difficulty::Medium => self.decide_medium(distance, r),
            Difficulty::Hard => self.decide_hard(distance, r),
        }
    }

    fn decide_easy(&mut self, r: &Reading) -> Action {
        if (r.attack_threat || r.projectile_threat) && r.shield_ready {
            Action::Shield
        } else if self.rng.gen_bool(0.05) {
            r.retreat()
        } else {
            Action::Idle
        }
    }

    fn decide_medium(&mut self, distance: DistanceBucket, r: &Reading) -> Action {
        if r.attack_threat || r.projectile_threat {
            return if r.shield_ready {
                Action::Shield
            } else if r.cornered || self.rng.gen_bool(0.5) {
                Action::Jump
            } else {
                r.retreat()
            };
        }
        if r.counter_window && r.gap <= CLOSE_THRESHOLD {
            return Action::LightAttack;
        }
        let opener = match distance {
            DistanceBucket::Close => self.rng.gen_bool(0.5).then_some(Action::LightAttack),
            DistanceBucket::Mid => self.rng.gen_bool(0.3).then_some(Action::HeavyAttack),
            DistanceBucket::Far => {
                (r.shot_ready && self.rng.gen_bool(0.1)).then_some(Action::Shoot)
            }
        };
        opener.unwrap_or_else(|| {
            if self.rng.gen_bool(0.4) {
                r.approach()
            } else {
                Action::Idle
            }
        })
    }

    fn decide_hard(&mut self, distance: DistanceBucket, r: &Reading) -> Action {
        if r.projectile_threat {
            return if r.shield_ready {
                Action::Shield
            } else {
                Action::Jump
            };
        }
        if r.attack_threat {
            if r.shield_ready {
                return Action::Shield;
            }
            if r.cornered {
                // Hop over and keep running past the attacker
                self.queued = Some(r.approach());
                return Action::Jump;
            }
            return r.retreat();
        }
        if r.counter_window && r.gap <= CLOSE_THRESHOLD {
            return Action::LightAttack;
        }
        match distance {
            DistanceBucket::Close => {
                if self.rng.gen_bool(0.8) {
                    Action::LightAttack
                } else {
                    Action::Idle
                }
            }
            DistanceBucket::Mid => {
                if self.rng.gen_bool(0.7) {
                    Action::HeavyAttack
                } else {
                    r.approach()
                }
            }
            DistanceBucket::Far => {
                let roll: f64 = self.rng.gen();
                if roll < 0.5 {
                    r.approach()
                } else if roll < 0.75 {
                    if r.shot_ready {
                        Action::Shoot
                    } else {
                        r.approach()
                    }
                } else {
                    Action::Idle
                }
            }
        }
    }
}

impl OpponentPolicy for ScriptedReflex {
    fn name(&self) -> &str {
        "scripted_reflex"
    }

    fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    fn select_action(&mut self, state: &DiscreteState, me: &Fighter, other: &Fighter) -> Action {
        let reading = Reading::take(me, other, self.difficulty, &self.rules);

        if self.lock.is_engaged() {
            if self.should_interrupt(&reading) {
                log::debug!("reflex override, dropping {:?}", self.lock.held_action());
                self.lock.release();
                self.queued = None;
            } else if let Some(held) = self.lock.hold() {
                return held;
            }
        }

        if me.is_attacking() || me.is_shooting() {
            return Action::Idle;
        }

        let action = match self.queued.take() {
            Some(follow_up) if !reading.attack_threat => follow_up,
            _ => self.decide(state.distance, &reading),
        };
        self.lock.engage(action, reaction_delay(self.difficulty));
        action
    }

    fn on_reset(&mut self) {
        self.lock.release();
        self.queued = None;
    }
}
