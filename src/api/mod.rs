mod base;
mod operations;

use std::borrow::Cow;

use axum::{
    error_handling::HandleErrorLayer, http::StatusCode, response::IntoResponse, routing, Router,
};
use tokio::time::Duration;
use tower::{BoxError, ServiceBuilder};
use tower_http::trace::TraceLayer;

pub mod paths;

pub use base::AboutResponse;

use crate::error::Result;
use crate::node::NodeAgent;
use crate::settings::STANDARD_REQUEST_TIMEOUT_SECS;

/// Build the RPC API around a server-role agent
pub async fn api(agent: NodeAgent) -> Result<Router> {
    api_with_timeout(agent, Duration::from_secs(STANDARD_REQUEST_TIMEOUT_SECS)).await
}

/// Build the RPC API with a custom per-request timeout
pub async fn api_with_timeout(agent: NodeAgent, request_timeout: Duration) -> Result<Router> {
    // Every handler shares the one agent, and through it the one clock

    // Endpoints
    let api = Router::new()
        .route(paths::base::ROOT, routing::get(base::root))
        .route(paths::base::HEALTH, routing::get(base::health))
        .route(paths::base::ABOUT, routing::get(base::about))
        .route(paths::CLOCK, routing::get(operations::clock))
        // Arithmetic calls carrying clock snapshots
        .route(paths::operations::ADD, routing::post(operations::add))
        .route(paths::operations::MULTIPLY, routing::post(operations::multiply))
        .layer(
            ServiceBuilder::new()
                // Handle errors from middleware
                .layer(HandleErrorLayer::new(handle_error))
                .load_shed()
                .timeout(request_timeout),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(agent);

    Ok(api)
}

async fn handle_error(error: BoxError) -> impl IntoResponse {
    if error.is::<tower::timeout::error::Elapsed>() {
        return (StatusCode::REQUEST_TIMEOUT, Cow::from("request timed out"));
    }

    if error.is::<tower::load_shed::error::Overloaded>() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Cow::from("service is overloaded, try again later"),
        );
    }

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Cow::from(format!("Unhandled internal error: {}", error)),
    )
}
