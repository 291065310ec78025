use crate::api::paths;
use crate::error::Result;
use crate::operation_error;

/// The arithmetic calls a server exposes, addressed by endpoint name
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Multiply,
}

impl Operation {
    pub const ALL: [Operation; 2] = [Operation::Add, Operation::Multiply];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Multiply => "multiply",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Operation::Add => paths::operations::ADD,
            Operation::Multiply => paths::operations::MULTIPLY,
        }
    }

    /// Evaluate the operation, refusing results that do not fit in an i64
    pub fn apply(&self, x: i64, y: i64) -> Result<i64> {
        let result = match self {
            Operation::Add => x.checked_add(y),
            Operation::Multiply => x.checked_mul(y),
        };
        result.ok_or_else(|| operation_error!("{}({}, {}) overflows", self.name(), x, y))
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "add" => Ok(Operation::Add),
            "multiply" => Ok(Operation::Multiply),
            _ => Err(format!("Unknown operation: {}", s)),
        }
    }
}
