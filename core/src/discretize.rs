use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::projectiles::is_inbound;
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceBucket {
    Close,
    Mid,
    Far,
}

impl DistanceBucket {
    pub const ALL: [DistanceBucket; 3] = [Self::Close, Self::Mid, Self::Far];

    pub fn name(self) -> &'static str {
        match self {
            Self::Close => "close",
            Self::Mid => "mid",
            Self::Far => "far",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalBucket {
    Ground,
    Air,
}

impl VerticalBucket {
    pub const ALL: [VerticalBucket; 2] = [Self::Ground, Self::Air];

    pub fn name(self) -> &'static str {
        match self {
            Self::Ground => "ground",
            Self::Air => "air",
        }
    }
}

/// What the other fighter is doing, highest priority first when several apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatBucket {
    Idle,
    Attack,
    Shield,
    Projectile,
}

impl ThreatBucket {
    pub const ALL: [ThreatBucket; 4] = [Self::Idle, Self::Attack, Self::Shield, Self::Projectile];

    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Attack => "attack",
            Self::Shield => "shield",
            Self::Projectile => "projectile",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShieldBucket {
    Yes,
    No,
}

impl ShieldBucket {
    pub const ALL: [ShieldBucket; 2] = [Self::Yes, Self::No];

    pub fn name(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

/// The fighter's view of the fight, reduced to a handful of buckets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DiscreteState {
    pub distance: DistanceBucket,
    pub vertical: VerticalBucket,
    pub threat: ThreatBucket,
    pub shield: ShieldBucket,
}

impl DiscreteState {
    pub const fn new(
        distance: DistanceBucket,
        vertical: VerticalBucket,
        threat: ThreatBucket,
        shield: ShieldBucket,
    ) -> Self {
        Self {
            distance,
            vertical,
            threat,
            shield,
        }
    }

    /// `close/ground/idle/yes`
    pub fn label(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.distance.name(),
            self.vertical.name(),
            self.threat.name(),
            self.shield.name()
        )
    }
}

pub const STATE_COUNT: usize = 3 * 2 * 4 * 2;

/// Horizontal edge-to-edge distance between the two bodies, 0 when they overlap.
pub fn gap(me: &Fighter, other: &Fighter) -> f64 {
    ((me.center_x() - other.center_x()).abs() - FIGHTER_WIDTH).max(0.0)
}

pub fn distance_bucket(gap: f64) -> DistanceBucket {
    if gap <= CLOSE_THRESHOLD {
        DistanceBucket::Close
    } else if gap <= MID_THRESHOLD {
        DistanceBucket::Mid
    } else {
        DistanceBucket::Far
    }
}

pub fn threat_bucket(me: &Fighter, other: &Fighter) -> ThreatBucket {
    if other.live_projectile().is_some_and(|p| is_inbound(p, me)) {
        ThreatBucket::Projectile
    } else if other.is_attacking() {
        ThreatBucket::Attack
    } else if other.is_shielding() {
        ThreatBucket::Shield
    } else {
        ThreatBucket::Idle
    }
}

/// `Air` when the other fighter's feet are above my vertical center.
pub fn vertical_bucket(me: &Fighter, other: &Fighter) -> VerticalBucket {
    if other.bottom() < me.center_y() {
        VerticalBucket::Air
    } else {
        VerticalBucket::Ground
    }
}

pub fn shield_bucket(me: &Fighter) -> ShieldBucket {
    if me.shield_cooldown > 0 {
        ShieldBucket::No
    } else {
        ShieldBucket::Yes
    }
}

/// Reduce the continuous state to `me`'s discrete view. Pure.
pub fn discretize(me: &Fighter, other: &Fighter) -> DiscreteState {
    DiscreteState {
        distance: distance_bucket(gap(me, other)),
        vertical: vertical_bucket(me, other),
        threat: threat_bucket(me, other),
        shield: shield_bucket(me),
    }
}

/// Every discrete state, in ascending order.
pub fn all_states() -> impl Iterator<Item = DiscreteState> {
    DistanceBucket::ALL.into_iter().flat_map(|distance| {
        VerticalBucket::ALL.into_iter().flat_map(move |vertical| {
            ThreatBucket::ALL.into_iter().flat_map(move |threat| {
                ShieldBucket::ALL
                    .into_iter()
                    .map(move |shield| DiscreteState::new(distance, vertical, threat, shield))
            })
        })
    })
}
