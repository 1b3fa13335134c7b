pub mod combat;
pub mod constants;
pub mod discretize;
pub mod hash;
pub mod init;
pub mod physics;
pub mod policy;
pub mod projectiles;
pub mod reward;
pub mod snapshot;
pub mod step;
pub mod tick;
pub mod types;
pub mod view;

pub use combat::DamageOutcome;
pub use constants::*;
pub use discretize::{discretize, DiscreteState};
pub use hash::*;
pub use init::*;
pub use policy::{
    build_policy, CombatEvent, OpponentPolicy, QLearner, ScriptedReflex, Transition, ValueTable,
};
pub use reward::RewardShaping;
pub use snapshot::{SnapshotError, TableSnapshot};
pub use step::{Match, MatchStats, SideStats, TickSummary};
pub use tick::{tick_fighter, TickContext, TickReport};
pub use types::*;
pub use view::{DebugBoxes, FighterView, MatchSnapshot, Pose};
