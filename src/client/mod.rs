//! Client side of the exchange: a client-role agent plus a transport.
use tracing::{info, warn};

pub mod transport;

pub use transport::{HttpTransport, LoopbackTransport, Transport};

use crate::clock::{ClockSnapshot, Relation};
use crate::error::Result;
use crate::node::NodeAgent;
use crate::rpc::{Operation, OperationRequest, OperationResponse};
use crate::settings::ClientSettings;

#[derive(Clone, Debug)]
pub struct RpcClient<T: Transport = HttpTransport> {
    agent: NodeAgent,
    transport: T,
}

impl RpcClient<HttpTransport> {
    /// Client that talks HTTP to the configured server
    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        let agent = NodeAgent::client(settings.node_name()?.as_str())?;
        let transport = HttpTransport::new(settings.server_url.clone(), settings.timeout())?;
        Ok(Self::new(agent, transport))
    }
}

impl<T: Transport> RpcClient<T> {
    pub fn new(agent: NodeAgent, transport: T) -> Self {
        Self { agent, transport }
    }

    pub fn agent(&self) -> &NodeAgent {
        &self.agent
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn add(&self, x: i64, y: i64) -> Result<OperationResponse> {
        self.call(Operation::Add, x, y).await
    }

    pub async fn multiply(&self, x: i64, y: i64) -> Result<OperationResponse> {
        self.call(Operation::Multiply, x, y).await
    }

    /// Issue one call.
    ///
    /// The send is counted as a local event before dispatch and stays counted
    /// even if the call fails. The server's history is merged only when a
    /// response actually arrives.
    pub async fn call(&self, operation: Operation, x: i64, y: i64) -> Result<OperationResponse> {
        let outgoing = self.agent.begin_call()?;
        self.dispatch(operation, x, y, outgoing).await
    }

    /// Send a call whose send event was already recorded by
    /// [`NodeAgent::begin_call`], merging the reply if one arrives.
    pub async fn dispatch(
        &self,
        operation: Operation,
        x: i64,
        y: i64,
        outgoing: ClockSnapshot,
    ) -> Result<OperationResponse> {
        let request = OperationRequest::new(x, y).with_clock(outgoing);

        match self.transport.send(operation, &request).await {
            Ok(response) => {
                self.agent.complete_call(&response.clock)?;
                info!(
                    "[{}] {}({}, {}) = {}, server clock {}",
                    self.agent.node_id(),
                    operation,
                    x,
                    y,
                    response.result,
                    response.clock
                );
                Ok(response)
            }
            Err(err) => {
                warn!(
                    "[{}] {}({}, {}) failed: {}",
                    self.agent.node_id(),
                    operation,
                    x,
                    y,
                    err
                );
                Err(err)
            }
        }
    }

    pub fn clock(&self) -> Result<ClockSnapshot> {
        self.agent.snapshot()
    }

    /// How this client's history relates to another client's
    pub fn relation_to<U: Transport>(&self, other: &RpcClient<U>) -> Result<Relation> {
        self.agent.relation_to(other.agent())
    }
}
