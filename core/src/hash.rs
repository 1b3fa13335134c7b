use sha2::{Digest, Sha256};

use crate::discretize::*;
use crate::policy::ValueTable;
use crate::types::{Action, PlayerInput};

/// SHA-256 hash of the full input transcript, `[player, opponent]` per tick.
pub fn hash_transcript(transcript: &[[PlayerInput; 2]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for tick_inputs in transcript {
        for input in tick_inputs {
            hasher.update(input.buttons.to_le_bytes());
        }
    }
    hasher.finalize().into()
}

/// SHA-256 over every bucket and action name, in declaration order.
/// Changes whenever the discretization or the action set changes.
pub fn scheme_fingerprint() -> [u8; 32] {
    let mut hasher = Sha256::new();
    let mut section = |tag: &str, names: &[&str]| {
        hasher.update(tag.as_bytes());
        for name in names {
            hasher.update([0u8]);
            hasher.update(name.as_bytes());
        }
        hasher.update([0xffu8]);
    };
    section("distance", &DistanceBucket::ALL.map(DistanceBucket::name));
    section("vertical", &VerticalBucket::ALL.map(VerticalBucket::name));
    section("threat", &ThreatBucket::ALL.map(ThreatBucket::name));
    section("shield", &ShieldBucket::ALL.map(ShieldBucket::name));
    section("action", &Action::ALL.map(Action::name));
    hasher.finalize().into()
}

/// SHA-256 of a value table's contents, for comparing learned tables.
pub fn hash_table(table: &ValueTable) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for (state, values) in table.iter() {
        hasher.update(state.label().as_bytes());
        for v in values.0 {
            hasher.update(v.to_le_bytes());
        }
    }
    hasher.finalize().into()
}
