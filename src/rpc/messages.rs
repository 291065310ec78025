//! Wire types for the JSON RPC exchange
use serde::{Deserialize, Serialize};

use crate::clock::{ClockSnapshot, NodeName};

/// Arguments for an arithmetic call plus the caller's history, if it has one
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct OperationRequest {
    pub x: i64,
    pub y: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock: Option<ClockSnapshot>,
}

impl OperationRequest {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y, clock: None }
    }

    pub fn with_clock(mut self, clock: ClockSnapshot) -> Self {
        self.clock = Some(clock);
        self
    }
}

/// Operation result and the responder's clock after handling the call
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct OperationResponse {
    pub result: i64,
    pub clock: ClockSnapshot,
}

/// Read-only view of a node's clock
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ClockResponse {
    pub node_id: NodeName,
    pub clock: ClockSnapshot,
}

/// JSON body produced for every error response
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ErrorDetail {
    pub code: u16,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
}
