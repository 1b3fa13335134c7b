use serde::{Deserialize, Serialize};

use crate::discretize::DiscreteState;
use crate::hash::scheme_fingerprint;
use crate::policy::{ActionValues, ValueTable};
use crate::types::Action;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot was saved under state scheme {found}, current scheme is {expected}")]
    SchemeMismatch { expected: String, found: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    pub state: DiscreteState,
    pub values: [f64; Action::COUNT],
}

/// Portable copy of a learned value table. Only loadable under the same
/// discretization and action set it was saved with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// Hex SHA-256 of the state and action naming scheme.
    pub scheme: String,
    pub entries: Vec<TableEntry>,
}

pub fn current_scheme() -> String {
    hex::encode(scheme_fingerprint())
}

impl TableSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl ValueTable {
    pub fn to_snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            scheme: current_scheme(),
            entries: self
                .iter()
                .map(|(state, values)| TableEntry {
                    state: *state,
                    values: values.0,
                })
                .collect(),
        }
    }

    pub fn from_snapshot(snapshot: &TableSnapshot) -> Result<Self, SnapshotError> {
        let expected = current_scheme();
        if snapshot.scheme != expected {
            return Err(SnapshotError::SchemeMismatch {
                expected,
                found: snapshot.scheme.clone(),
            });
        }
        let mut table = ValueTable::new();
        for entry in &snapshot.entries {
            table.insert(entry.state, ActionValues(entry.values));
        }
        Ok(table)
    }
}
