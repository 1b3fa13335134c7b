//! Opponent decision policies.
//!
//! A policy sees the opponent's discrete view plus both fighters each tick and
//! answers with one [`Action`]. Learning policies additionally receive the
//! shaped reward of every completed transition and the combat events that
//! unlock new moves.

pub mod lock;
pub mod reflex;
pub mod tabular;

pub use lock::DecisionLock;
pub use reflex::ScriptedReflex;
pub use tabular::{ActionValues, LearningParams, QLearner, ValueTable};

use crate::combat::DamageOutcome;
use crate::discretize::DiscreteState;
use crate::types::*;

/// One completed step of experience from the opponent's point of view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub state: DiscreteState,
    pub action: Action,
    pub reward: f64,
    pub next_state: DiscreteState,
}

/// Something that happened to the opponent this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatEvent {
    /// A melee attack of this kind reached the opponent.
    StruckBy {
        kind: AttackKind,
        outcome: DamageOutcome,
    },
    /// The player's projectile reached the opponent.
    ShotBy { outcome: DamageOutcome },
}

pub trait OpponentPolicy: Send {
    fn name(&self) -> &str;

    fn difficulty(&self) -> Difficulty;

    /// Pick this tick's action. Called exactly once per simulated tick, so
    /// policies can run their decision lock off it.
    fn select_action(&mut self, state: &DiscreteState, me: &Fighter, other: &Fighter) -> Action;

    fn record_outcome(&mut self, _transition: &Transition) {}

    fn observe(&mut self, _event: &CombatEvent) {}

    /// Drop per-round state (locks, queued moves). Learned values persist.
    fn on_reset(&mut self) {}

    fn value_table(&self) -> Option<&ValueTable> {
        None
    }
}

/// Build the policy named by the config, seeded from the match seed.
pub fn build_policy(config: &MatchConfig) -> Box<dyn OpponentPolicy> {
    let OpponentConfig { kind, difficulty } = config.opponent;
    log::debug!("building {kind:?} opponent at {difficulty:?}");
    match kind {
        PolicyKind::Tabular => Box::new(QLearner::new(difficulty, config.seed)),
        PolicyKind::Scripted => Box::new(ScriptedReflex::new(difficulty, config.rules, config.seed)),
    }
}
