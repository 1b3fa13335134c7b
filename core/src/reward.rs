use serde::{Deserialize, Serialize};

use crate::combat::DamageOutcome;

/// Per-tick reward terms for the opponent, all configurable.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardShaping {
    /// Applied every tick to discourage stalling.
    pub step: f64,
    /// Own attack's active window closed without connecting.
    pub whiff: f64,
    pub landed_hit: f64,
    pub landed_hit_blocked: f64,
    pub landed_shot: f64,
    pub landed_shot_blocked: f64,
    pub took_hit: f64,
    pub blocked_hit: f64,
    pub took_shot: f64,
    pub blocked_shot: f64,
}

impl Default for RewardShaping {
    fn default() -> Self {
        Self {
            step: -0.1,
            whiff: -2.0,
            landed_hit: 10.0,
            landed_hit_blocked: -1.0,
            landed_shot: 20.0,
            landed_shot_blocked: -1.0,
            took_hit: -10.0,
            blocked_hit: 5.0,
            took_shot: -15.0,
            blocked_shot: 10.0,
        }
    }
}

/// What happened this tick, from the opponent's side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickEvents {
    pub whiffed: bool,
    pub dealt_melee: Option<DamageOutcome>,
    pub dealt_shot: Option<DamageOutcome>,
    pub received_melee: Option<DamageOutcome>,
    pub received_shot: Option<DamageOutcome>,
}

impl RewardShaping {
    pub fn score(&self, events: &TickEvents) -> f64 {
        use DamageOutcome::*;

        let mut reward = self.step;
        if events.whiffed {
            reward += self.whiff;
        }
        reward += match events.dealt_melee {
            Some(Hit) => self.landed_hit,
            Some(Blocked) => self.landed_hit_blocked,
            None => 0.0,
        };
        reward += match events.dealt_shot {
            Some(Hit) => self.landed_shot,
            Some(Blocked) => self.landed_shot_blocked,
            None => 0.0,
        };
        reward += match events.received_melee {
            Some(Hit) => self.took_hit,
            Some(Blocked) => self.blocked_hit,
            None => 0.0,
        };
        reward += match events.received_shot {
            Some(Hit) => self.took_shot,
            Some(Blocked) => self.blocked_shot,
            None => 0.0,
        };
        reward
    }
}
