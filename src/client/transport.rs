use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;

use crate::api::paths;
use crate::error::{Result, VclockError};
use crate::node::NodeAgent;
use crate::rpc::{ClockResponse, ErrorBody, Operation, OperationRequest, OperationResponse};
use crate::settings;

/// Carries one request to a server and brings back its response.
///
/// Implementations own reliability concerns (timeouts, connection errors)
/// and report them as `VclockError::Timeout` / `VclockError::Transport`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        operation: Operation,
        request: &OperationRequest,
    ) -> Result<OperationResponse>;
}

/// JSON over HTTP via reqwest
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: settings::base_url(base_url),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(paths::drop_leading_slash(path))
            .map_err(Into::into)
    }

    /// Read the server's current clock without taking part in its history
    pub async fn fetch_clock(&self) -> Result<ClockResponse> {
        let url = self.endpoint(paths::CLOCK)?;
        let resp = self.http.get(url).send().await?;
        read_json(resp).await
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), level = "debug")]
    async fn send(
        &self,
        operation: Operation,
        request: &OperationRequest,
    ) -> Result<OperationResponse> {
        let url = self.endpoint(operation.path())?;
        debug!("POST {}", url);
        let resp = self.http.post(url).json(request).send().await?;
        read_json(resp).await
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
        return resp.json().await.map_err(Into::into);
    }

    // Error bodies are ours when well formed; fall back to raw text otherwise
    let text = resp.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.error.message,
        Err(_) => text,
    };
    Err(VclockError::Remote {
        status: status.as_u16(),
        message,
    })
}

/// Delivers requests straight to an in-process server agent
#[derive(Clone, Debug)]
pub struct LoopbackTransport {
    server: NodeAgent,
}

impl LoopbackTransport {
    pub fn new(server: NodeAgent) -> Self {
        Self { server }
    }
}

#[async_trait]
impl Transport for LoopbackTransport {
    async fn send(
        &self,
        operation: Operation,
        request: &OperationRequest,
    ) -> Result<OperationResponse> {
        self.server.serve(operation, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_resolve_against_base_url() {
        let transport = HttpTransport::new(
            Url::parse("http://127.0.0.1:8080").unwrap(),
            Duration::from_secs(2),
        )
        .unwrap();
        assert_eq!(
            transport.endpoint(Operation::Add.path()).unwrap().as_str(),
            "http://127.0.0.1:8080/add"
        );

        let nested = HttpTransport::new(
            Url::parse("http://rpc.internal/v1/").unwrap(),
            Duration::from_secs(2),
        )
        .unwrap();
        assert_eq!(
            nested.endpoint(Operation::Multiply.path()).unwrap().as_str(),
            "http://rpc.internal/v1/multiply"
        );

        // a prefix given without its trailing slash is still kept
        let unslashed = HttpTransport::new(
            Url::parse("http://rpc.internal/v1").unwrap(),
            Duration::from_secs(2),
        )
        .unwrap();
        assert_eq!(
            unslashed.endpoint(Operation::Multiply.path()).unwrap().as_str(),
            "http://rpc.internal/v1/multiply"
        );
        assert_eq!(
            unslashed.endpoint(paths::CLOCK).unwrap().as_str(),
            "http://rpc.internal/v1/clock"
        );
    }

    #[tokio::test]
    async fn test_loopback_serves_in_process() {
        let transport = LoopbackTransport::new(NodeAgent::server("server").unwrap());
        let response = transport
            .send(Operation::Add, &OperationRequest::new(2, 3))
            .await
            .unwrap();
        assert_eq!(response.result, 5);
        assert_eq!(response.clock.get("server"), 1);
    }
}
