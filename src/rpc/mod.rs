//! The RPC exchange contract: what a request and a response carry.
pub mod messages;
pub mod operations;

pub use messages::{ClockResponse, ErrorBody, ErrorDetail, OperationRequest, OperationResponse};
pub use operations::Operation;
