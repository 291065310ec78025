use serde::{Deserialize, Serialize};

use crate::error::ClockError;

/// Stable, non-empty identifier for a node taking part in an exchange
#[derive(
    Clone, Debug, Deserialize, Serialize, PartialEq, PartialOrd, Ord, Eq, Hash,
)]
#[serde(try_from = "String", into = "String")]
pub struct NodeName(String);

impl NodeName {
    /// Build a node name, rejecting blank identities
    pub fn new(id: impl Into<String>) -> Result<Self, ClockError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ClockError::MissingNodeId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NodeName {
    type Error = ClockError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        NodeName::new(id)
    }
}

impl TryFrom<&str> for NodeName {
    type Error = ClockError;

    fn try_from(id: &str) -> Result<Self, Self::Error> {
        NodeName::new(id)
    }
}

impl From<NodeName> for String {
    fn from(name: NodeName) -> Self {
        name.0
    }
}

impl std::str::FromStr for NodeName {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeName::new(s)
    }
}

impl std::fmt::Display for NodeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
