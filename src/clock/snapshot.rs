use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};

use super::node_id::NodeName;
use crate::error::ClockError;

/// Untrusted wire form of a snapshot, before validation
pub type RawSnapshot = BTreeMap<String, serde_json::Value>;

/// Anything that can hand out a node -> counter mapping.
///
/// Both live clocks and wire snapshots implement this, so merging and
/// comparing never needs to know which one it was given.
pub trait CausalHistory {
    fn counters(&self) -> &BTreeMap<NodeName, u64>;

    /// Counter for `node`, treating absent nodes as 0
    fn counter(&self, node: &NodeName) -> u64 {
        self.counters().get(node).copied().unwrap_or(0)
    }
}

/// Immutable, point-in-time copy of a vector clock, as carried on RPC messages.
///
/// Deserializing validates every entry: a snapshot with a blank key or a
/// counter that is not a non-negative integer never comes into existence.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawSnapshot")]
pub struct ClockSnapshot {
    counters: BTreeMap<NodeName, u64>,
}

impl ClockSnapshot {
    pub(crate) fn from_counters(counters: BTreeMap<NodeName, u64>) -> Self {
        Self { counters }
    }

    /// Build a snapshot from `(node, counter)` pairs, validating node names
    pub fn from_pairs<I, K>(pairs: I) -> Result<Self, ClockError>
    where
        I: IntoIterator<Item = (K, u64)>,
        K: Into<String>,
    {
        let mut counters = BTreeMap::new();
        for (node, counter) in pairs {
            let node = NodeName::new(node).map_err(|_| {
                ClockError::MalformedSnapshot("node id must not be empty".to_string())
            })?;
            counters.insert(node, counter);
        }
        Ok(Self { counters })
    }

    /// Counter for a node given by name; 0 when absent or blank
    pub fn get(&self, node: &str) -> u64 {
        NodeName::new(node)
            .map(|name| self.counter(&name))
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeName, &u64)> {
        self.counters.iter()
    }
}

impl CausalHistory for ClockSnapshot {
    fn counters(&self) -> &BTreeMap<NodeName, u64> {
        &self.counters
    }
}

impl TryFrom<RawSnapshot> for ClockSnapshot {
    type Error = ClockError;

    // Validates everything before building anything, so a bad entry anywhere
    // rejects the whole snapshot.
    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        let mut counters = BTreeMap::new();
        for (key, value) in raw {
            let counter = value.as_u64().ok_or_else(|| {
                ClockError::MalformedSnapshot(format!(
                    "counter for '{}' must be a non-negative integer, got {}",
                    key, value
                ))
            })?;
            let node = NodeName::new(key).map_err(|_| {
                ClockError::MalformedSnapshot("node id must not be empty".to_string())
            })?;
            counters.insert(node, counter);
        }
        Ok(Self { counters })
    }
}

impl Serialize for ClockSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.counters.serialize(serializer)
    }
}

impl std::fmt::Display for ClockSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (node, counter)) in self.counters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", node, counter)?;
        }
        write!(f, "}}")
    }
}
