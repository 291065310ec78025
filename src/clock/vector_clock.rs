use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::node_id::NodeName;
use super::snapshot::{CausalHistory, ClockSnapshot, RawSnapshot};
use crate::error::ClockError;

/// How two clocks relate under the pointwise partial order
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Relation {
    HappensBefore,
    HappensAfter,
    Concurrent,
    Equal,
}

impl Relation {
    /// The same relation seen from the other side
    pub fn reverse(self) -> Self {
        match self {
            Relation::HappensBefore => Relation::HappensAfter,
            Relation::HappensAfter => Relation::HappensBefore,
            other => other,
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Relation::HappensBefore => write!(f, "happens-before"),
            Relation::HappensAfter => write!(f, "happens-after"),
            Relation::Concurrent => write!(f, "concurrent"),
            Relation::Equal => write!(f, "equal"),
        }
    }
}

/// VectorClock tracks causality between distributed events.
///
/// Each clock belongs to exactly one node and always holds an entry for it.
/// Counters only ever move up: `increment` bumps the owner's entry and
/// `merge` takes the pointwise maximum with another node's history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VectorClock {
    node_id: NodeName,
    clocks: BTreeMap<NodeName, u64>, // node_id -> logical_timestamp
}

impl VectorClock {
    /// Create a clock for `node_id` with its own entry at 0
    pub fn new(node_id: NodeName) -> Self {
        let mut clocks = BTreeMap::new();
        clocks.insert(node_id.clone(), 0);
        Self { node_id, clocks }
    }

    /// Create a clock from an unvalidated identity
    pub fn try_new(node_id: &str) -> Result<Self, ClockError> {
        Ok(Self::new(NodeName::new(node_id)?))
    }

    pub fn node_id(&self) -> &NodeName {
        &self.node_id
    }

    /// Increment this node's logical timestamp and return the new value.
    ///
    /// Fails without changing anything once the counter is at `u64::MAX`.
    pub fn increment(&mut self) -> Result<u64, ClockError> {
        let counter = self.clocks.entry(self.node_id.clone()).or_insert(0);
        let next = counter.checked_add(1).ok_or_else(|| {
            ClockError::CounterOverflow(format!("counter for '{}' is exhausted", self.node_id))
        })?;
        *counter = next;
        Ok(next)
    }

    /// Merge `other` (if given) and then count a local event, as one step.
    ///
    /// The increment is checked against the post-merge value before anything
    /// is written, so an overflow leaves the clock exactly as it was.
    pub fn merge_and_increment(
        &mut self,
        other: Option<&ClockSnapshot>,
    ) -> Result<u64, ClockError> {
        let own_after_merge = other
            .map(|remote| remote.counter(&self.node_id))
            .unwrap_or(0)
            .max(self.counter(&self.node_id));
        if own_after_merge == u64::MAX {
            return Err(ClockError::CounterOverflow(format!(
                "counter for '{}' is exhausted",
                self.node_id
            )));
        }
        if let Some(remote) = other {
            self.merge(remote);
        }
        self.increment()
    }

    /// Take the maximum of each timestamp against another node's history.
    /// Nodes known only locally are left alone.
    pub fn merge(&mut self, other: &impl CausalHistory) {
        for (node_id, &timestamp) in other.counters() {
            let entry = self.clocks.entry(node_id.clone()).or_insert(0);
            *entry = (*entry).max(timestamp);
        }
    }

    /// Validate an untrusted wire snapshot and merge it.
    ///
    /// Nothing is applied unless every entry is well formed.
    pub fn try_merge(&mut self, raw: RawSnapshot) -> Result<(), ClockError> {
        let snapshot = ClockSnapshot::try_from(raw)?;
        self.merge(&snapshot);
        Ok(())
    }

    /// Classify this clock against another history
    pub fn compare(&self, other: &impl CausalHistory) -> Relation {
        compare_histories(self, other)
    }

    /// Copy of the current state, detached from this clock
    pub fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot::from_counters(self.clocks.clone())
    }

    /// Get the timestamp for a node by name
    pub fn get_timestamp(&self, node_id: &str) -> u64 {
        NodeName::new(node_id)
            .map(|name| self.counter(&name))
            .unwrap_or(0)
    }

    /// Get the total number of nodes with timestamps in this vector clock
    pub fn len(&self) -> usize {
        self.clocks.len()
    }

    /// Never true: the owner's entry is always present
    pub fn is_empty(&self) -> bool {
        self.clocks.is_empty()
    }
}

impl CausalHistory for VectorClock {
    fn counters(&self) -> &BTreeMap<NodeName, u64> {
        &self.clocks
    }
}

impl std::fmt::Display for VectorClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.snapshot())
    }
}

/// Pointwise comparison of two histories; missing entries count as 0
pub fn compare_histories(local: &impl CausalHistory, remote: &impl CausalHistory) -> Relation {
    let mut less = false;
    let mut greater = false;

    let all_nodes = local.counters().keys().chain(remote.counters().keys());
    for node_id in all_nodes {
        let local_time = local.counter(node_id);
        let remote_time = remote.counter(node_id);

        if local_time < remote_time {
            less = true;
        } else if local_time > remote_time {
            greater = true;
        }
        if less && greater {
            return Relation::Concurrent;
        }
    }

    match (less, greater) {
        (true, false) => Relation::HappensBefore,
        (false, true) => Relation::HappensAfter,
        (true, true) => Relation::Concurrent,
        (false, false) => Relation::Equal,
    }
}
