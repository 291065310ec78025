use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{event, instrument, Level};

use crate::error::{Result, VclockError};
use crate::node::NodeAgent;
use crate::rpc::{ClockResponse, Operation, OperationRequest, OperationResponse};

#[instrument(skip(state, payload), level = "debug")]
pub async fn add(
    State(state): State<NodeAgent>,
    payload: std::result::Result<Json<OperationRequest>, JsonRejection>,
) -> Result<Json<OperationResponse>> {
    perform(Operation::Add, &state, payload)
}

#[instrument(skip(state, payload), level = "debug")]
pub async fn multiply(
    State(state): State<NodeAgent>,
    payload: std::result::Result<Json<OperationRequest>, JsonRejection>,
) -> Result<Json<OperationResponse>> {
    perform(Operation::Multiply, &state, payload)
}

#[instrument(skip(state), level = "debug")]
pub async fn clock(State(state): State<NodeAgent>) -> Result<Json<ClockResponse>> {
    Ok(Json(ClockResponse {
        node_id: state.node_id().clone(),
        clock: state.snapshot()?,
    }))
}

/// Unparseable bodies (including malformed snapshots) are turned away before
/// the agent sees them, so they never touch the clock.
fn perform(
    operation: Operation,
    agent: &NodeAgent,
    payload: std::result::Result<Json<OperationRequest>, JsonRejection>,
) -> Result<Json<OperationResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        event!(
            Level::WARN,
            message = "Rejected request body",
            operation = operation.name(),
            err = rejection.body_text()
        );
        VclockError::Api(rejection.body_text())
    })?;

    agent.serve(operation, &request).map(Json)
}
