pub mod agent;

pub use agent::NodeAgent;

/// Which side of an exchange a node plays
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRole {
    Client,
    Server,
}

impl std::fmt::Display for NodeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeRole::Client => write!(f, "client"),
            NodeRole::Server => write!(f, "server"),
        }
    }
}
