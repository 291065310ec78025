//! Router-level tests: requests go through the full axum stack without a
//! network listener.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use vclock_rpc::api;
use vclock_rpc::clock::ClockSnapshot;
use vclock_rpc::node::NodeAgent;
use vclock_rpc::rpc::{ClockResponse, ErrorBody, OperationResponse};

/// Helper to create a server agent and an API around it
async fn setup_test_server() -> (NodeAgent, axum::Router) {
    let agent = NodeAgent::server("server").unwrap();
    let api = api::api(agent.clone()).await.unwrap();
    (agent, api)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn read_body<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

#[cfg(test)]
mod base_tests {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let (_agent, app) = setup_test_server().await;
        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_about() {
        let (_agent, app) = setup_test_server().await;
        let response = app.oneshot(get("/about")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let about: api::AboutResponse = read_body(response).await;
        assert_eq!(about.name, "vclock-rpc");
    }

    #[tokio::test]
    async fn test_clock_endpoint_is_read_only() {
        let (agent, app) = setup_test_server().await;

        for _ in 0..2 {
            let response = app.clone().oneshot(get("/clock")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let clock: ClockResponse = read_body(response).await;
            assert_eq!(clock.node_id.as_str(), "server");
            assert_eq!(clock.clock.get("server"), 0);
        }
        assert_eq!(agent.snapshot().unwrap().get("server"), 0);
    }
}

#[cfg(test)]
mod operation_tests {
    use super::*;

    #[tokio::test]
    async fn test_add_without_clock_still_increments() {
        let (_agent, app) = setup_test_server().await;

        let response = app
            .oneshot(post_json("/add", json!({"x": 50, "y": 50})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: OperationResponse = read_body(response).await;
        assert_eq!(body.result, 100);
        assert_eq!(body.clock, ClockSnapshot::from_pairs([("server", 1)]).unwrap());
    }

    #[tokio::test]
    async fn test_multiply_merges_then_increments() {
        let (agent, app) = setup_test_server().await;

        let response = app
            .oneshot(post_json(
                "/multiply",
                json!({"x": 50, "y": 2, "clock": {"A": 3}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: OperationResponse = read_body(response).await;
        assert_eq!(body.result, 100);
        assert_eq!(
            body.clock,
            ClockSnapshot::from_pairs([("A", 3), ("server", 1)]).unwrap()
        );
        assert_eq!(agent.snapshot().unwrap(), body.clock);
    }

    #[tokio::test]
    async fn test_response_json_shape() {
        let (_agent, app) = setup_test_server().await;

        let response = app
            .oneshot(post_json("/add", json!({"x": 1, "y": 2, "clock": {"A": 1}})))
            .await
            .unwrap();
        let body: Value = read_body(response).await;
        assert_eq!(body, json!({"result": 3, "clock": {"A": 1, "server": 1}}));
    }
}

#[cfg(test)]
mod rejection_tests {
    use super::*;

    async fn assert_rejected_without_clock_change(body: Value) {
        let (agent, app) = setup_test_server().await;

        let response = app.oneshot(post_json("/add", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ErrorBody = read_body(response).await;
        assert_eq!(error.error.code, 400);

        assert_eq!(
            agent.snapshot().unwrap(),
            ClockSnapshot::from_pairs([("server", 0)]).unwrap()
        );
    }

    #[tokio::test]
    async fn test_negative_counter_rejected() {
        assert_rejected_without_clock_change(json!({"x": 1, "y": 1, "clock": {"A": 2, "B": -1}}))
            .await;
    }

    #[tokio::test]
    async fn test_fractional_counter_rejected() {
        assert_rejected_without_clock_change(json!({"x": 1, "y": 1, "clock": {"A": 0.5}})).await;
    }

    #[tokio::test]
    async fn test_blank_node_id_rejected() {
        assert_rejected_without_clock_change(json!({"x": 1, "y": 1, "clock": {"": 1}})).await;
    }

    #[tokio::test]
    async fn test_missing_arguments_rejected() {
        assert_rejected_without_clock_change(json!({"x": 1})).await;
    }

    #[tokio::test]
    async fn test_overflow_rejected() {
        let (agent, app) = setup_test_server().await;

        let response = app
            .oneshot(post_json(
                "/add",
                json!({"x": i64::MAX, "y": 1, "clock": {"A": 1}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ErrorBody = read_body(response).await;
        assert_eq!(error.error.kind, "operation_error");
        assert_eq!(agent.snapshot().unwrap().get("A"), 0);
    }

    #[tokio::test]
    async fn test_exhausted_server_counter_rejected() {
        assert_rejected_without_clock_change(
            json!({"x": 1, "y": 1, "clock": {"server": u64::MAX, "A": 1}}),
        )
        .await;
    }

    #[tokio::test]
    async fn test_server_keeps_serving_after_exhausted_counter() {
        let (agent, app) = setup_test_server().await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/add",
                json!({"x": 1, "y": 1, "clock": {"server": u64::MAX}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ErrorBody = read_body(response).await;
        assert_eq!(error.error.kind, "clock_error");

        let response = app
            .oneshot(post_json("/add", json!({"x": 1, "y": 1})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: OperationResponse = read_body(response).await;
        assert_eq!(body.result, 2);
        assert_eq!(
            body.clock,
            ClockSnapshot::from_pairs([("server", 1)]).unwrap()
        );
        assert_eq!(agent.snapshot().unwrap(), body.clock);
    }
}
