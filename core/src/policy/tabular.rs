use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::{CombatEvent, DecisionLock, OpponentPolicy, Transition};
use crate::constants::*;
use crate::discretize::*;
use crate::types::*;

/// Lock length after an attack or shot, long enough to see the animation out.
pub const COMMITTED_LOCK_TICKS: u32 = 25;
/// Lock length after movement, shield, jump or idle.
pub const REACTIVE_LOCK_TICKS: u32 = 5;

/// Probability that Easy misses the shield against an inbound projectile.
const EASY_PROJECTILE_SHIELD_MISS: f64 = 0.7;
/// Probability that Medium holds its shot at range.
const MEDIUM_FAR_SHOT_SKIP: f64 = 0.7;

// ── Value table ─────────────────────────────────────────────

/// One value per action, indexed in `Action` order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionValues(pub [f64; Action::COUNT]);

impl ActionValues {
    pub fn get(&self, action: Action) -> f64 {
        self.0[action.index()]
    }

    pub fn set(&mut self, action: Action, value: f64) {
        self.0[action.index()] = value;
    }

    pub fn max(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Learned action values per discrete state. Rows appear on first write and
/// are never removed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueTable {
    rows: BTreeMap<DiscreteState, ActionValues>,
}

impl ValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, state: &DiscreteState) -> Option<&ActionValues> {
        self.rows.get(state)
    }

    /// Value of `action` in `state`, 0 for unseen states.
    pub fn value(&self, state: &DiscreteState, action: Action) -> f64 {
        self.get(state).map_or(0.0, |row| row.get(action))
    }

    /// Row for `state`, materialized with zeros if absent.
    pub fn row_mut(&mut self, state: DiscreteState) -> &mut ActionValues {
        self.rows.entry(state).or_default()
    }

    pub fn insert(&mut self, state: DiscreteState, values: ActionValues) {
        self.rows.insert(state, values);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DiscreteState, &ActionValues)> {
        self.rows.iter()
    }
}

// ── Learner ─────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LearningParams {
    pub alpha: f64,
    pub gamma: f64,
    pub epsilon: f64,
}

impl LearningParams {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let epsilon = match difficulty {
            Difficulty::Easy => 0.30,
            Difficulty::Medium => 0.15,
            Difficulty::Hard => 0.05,
        };
        Self {
            alpha: 0.1,
            gamma: 0.95,
            epsilon,
        }
    }
}

/// Tabular Q-learning opponent with tier-specific priors and an action gate.
pub struct QLearner {
    difficulty: Difficulty,
    params: LearningParams,
    table: ValueTable,
    lock: DecisionLock,
    /// The last fresh decision. Held ticks are credited to it.
    decision: Option<Action>,
    knows_heavy: bool,
    knows_shoot: bool,
    rng: ChaCha8Rng,
}

impl QLearner {
    pub fn new(difficulty: Difficulty, seed: Seed) -> Self {
        Self::with_table(difficulty, seed, seeded_table(difficulty))
    }

    /// Start from a previously learned table instead of the priors.
    pub fn with_table(difficulty: Difficulty, seed: Seed, table: ValueTable) -> Self {
        // Easy starts without the heavy attack and the shot
        let gated = difficulty == Difficulty::Easy;
        Self {
            difficulty,
            params: LearningParams::for_difficulty(difficulty),
            table,
            lock: DecisionLock::default(),
            decision: None,
            knows_heavy: !gated,
            knows_shoot: !gated,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn params(&self) -> &LearningParams {
        &self.params
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn knows(&self, action: Action) -> bool {
        match action {
            Action::HeavyAttack => self.knows_heavy,
            Action::Shoot => self.knows_shoot,
            _ => true,
        }
    }

    /// Actions the learner may pick in `state` with the bodies `gap` apart.
    /// Always contains `Idle`.
    pub fn legal_actions(&mut self, state: &DiscreteState, gap: f64) -> Vec<Action> {
        let mut legal: Vec<Action> = Action::ALL.to_vec();

        // Reach
        legal.retain(|a| a.attack_kind().map_or(true, |kind| gap <= legal_gap(kind)));
        // Shield lockout
        if state.shield == ShieldBucket::No {
            legal.retain(|&a| a != Action::Shield);
        }
        // Learning gate
        let (knows_heavy, knows_shoot) = (self.knows_heavy, self.knows_shoot);
        legal.retain(|&a| match a {
            Action::HeavyAttack => knows_heavy,
            Action::Shoot => knows_shoot,
            _ => true,
        });

        match self.difficulty {
            Difficulty::Easy => {
                if state.threat == ThreatBucket::Projectile
                    && self.rng.gen_bool(EASY_PROJECTILE_SHIELD_MISS)
                {
                    legal.retain(|&a| a != Action::Shield);
                }
            }
            Difficulty::Medium => {
                if state.distance == DistanceBucket::Far
                    && legal.contains(&Action::Shoot)
                    && self.rng.gen_bool(MEDIUM_FAR_SHOT_SKIP)
                {
                    legal.retain(|&a| a != Action::Shoot);
                }
            }
            Difficulty::Hard => {}
        }
        legal
    }

    /// Epsilon-greedy over the legal set. Ties go to the earliest action.
    fn choose(&mut self, state: &DiscreteState, legal: &[Action]) -> Action {
        if self.rng.gen_bool(self.params.epsilon) {
            return legal.choose(&mut self.rng).copied().unwrap_or(Action::Idle);
        }
        let Some(row) = self.table.get(state) else {
            return legal.choose(&mut self.rng).copied().unwrap_or(Action::Idle);
        };
        let mut best: Option<(Action, f64)> = None;
        for &action in legal {
            let value = row.get(action);
            if best.map_or(true, |(_, v)| value > v) {
                best = Some((action, value));
            }
        }
        best.map_or(Action::Idle, |(a, _)| a)
    }

    /// One Q-learning backup for a completed transition.
    pub fn update(&mut self, t: &Transition) {
        let next_max = self.table.row_mut(t.next_state).max();
        let LearningParams { alpha, gamma, .. } = self.params;
        let row = self.table.row_mut(t.state);
        let old = row.get(t.action);
        row.set(t.action, old + alpha * (t.reward + gamma * next_max - old));
    }

    fn unlock(&mut self, action: Action) {
        let flag = match action {
            Action::HeavyAttack => &mut self.knows_heavy,
            Action::Shoot => &mut self.knows_shoot,
            _ => return,
        };
        if !*flag {
            *flag = true;
            log::info!("opponent learned {}", action.name());
        }
    }
}

impl OpponentPolicy for QLearner {
    fn name(&self) -> &str {
        "q_learner"
    }

    fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    fn select_action(&mut self, state: &DiscreteState, me: &Fighter, other: &Fighter) -> Action {
        if let Some(held) = self.lock.hold() {
            return held;
        }
        let legal = self.legal_actions(state, gap(me, other));
        let action = self.choose(state, &legal);
        let ticks = if action.is_committed() {
            COMMITTED_LOCK_TICKS
        } else {
            REACTIVE_LOCK_TICKS
        };
        self.lock.engage(action, ticks);
        self.decision = Some(action);
        log::debug!("{} -> {}", state.label(), action.name());
        action
    }

    /// Rewards that arrive while the lock degrades an attack to `Idle` still
    /// belong to the attack, so the update uses the locked decision.
    fn record_outcome(&mut self, transition: &Transition) {
        let action = self.decision.unwrap_or(transition.action);
        self.update(&Transition {
            action,
            ..*transition
        });
    }

    fn observe(&mut self, event: &CombatEvent) {
        match event {
            CombatEvent::StruckBy {
                kind: AttackKind::Heavy,
                ..
            } => self.unlock(Action::HeavyAttack),
            CombatEvent::ShotBy { .. } => self.unlock(Action::Shoot),
            _ => {}
        }
    }

    fn on_reset(&mut self) {
        self.lock.release();
        self.decision = None;
    }

    fn value_table(&self) -> Option<&ValueTable> {
        Some(&self.table)
    }
}

// ── Priors ──────────────────────────────────────────────────

/// Every state with the tier's hand-written starting values.
pub fn seeded_table(difficulty: Difficulty) -> ValueTable {
    let mut table = ValueTable::new();
    for state in all_states() {
        table.insert(state, prior(difficulty, &state));
    }
    table
}

fn prior(difficulty: Difficulty, s: &DiscreteState) -> ActionValues {
    use Action::*;

    let mut v = ActionValues::default();
    let shield_ready = s.shield == ShieldBucket::Yes;

    if s.threat == ThreatBucket::Projectile && shield_ready {
        v.set(Shield, 5.0);
        v.set(Jump, 4.0);
    }

    match difficulty {
        // Blocks sometimes, jabs up close, wanders at range
        Difficulty::Easy => {
            if s.threat == ThreatBucket::Attack && shield_ready {
                v.set(Shield, 2.0);
            }
            if s.distance == DistanceBucket::Close && s.threat == ThreatBucket::Idle {
                v.set(LightAttack, 3.0);
            }
            if s.distance == DistanceBucket::Far {
                v.set(MoveLeft, 1.0);
                v.set(MoveRight, 1.0);
            }
        }
        // Defensive: blocks or jumps out of attacks, pokes from mid range
        Difficulty::Medium => {
            if s.threat == ThreatBucket::Attack {
                if shield_ready {
                    v.set(Shield, 8.0);
                } else {
                    v.set(Jump, 5.0);
                }
            }
            if s.distance == DistanceBucket::Mid && s.threat == ThreatBucket::Idle {
                v.set(HeavyAttack, 4.0);
            }
            if s.distance == DistanceBucket::Close && s.threat == ThreatBucket::Idle {
                v.set(LightAttack, 3.0);
                v.set(Shield, 2.0);
            }
        }
        // Aggressive: blocks every shot, anti-airs, presses up close, zones at range
        Difficulty::Hard => {
            if s.threat == ThreatBucket::Projectile {
                v.set(Shield, 10.0);
            }
            if s.vertical == VerticalBucket::Air {
                v.set(HeavyAttack, 6.0);
            }
            if s.distance == DistanceBucket::Close {
                v.set(LightAttack, 8.0);
            }
            if s.distance == DistanceBucket::Far {
                v.set(Shoot, 5.0);
            }
        }
    }
    v
}
