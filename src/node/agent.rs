use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, instrument};

use super::NodeRole;
use crate::clock::{CausalHistory, ClockSnapshot, NodeName, Relation, VectorClock};
use crate::concurrency_error;
use crate::error::Result;
use crate::rpc::{Operation, OperationRequest, OperationResponse};

/// Owns a node's identity and clock, and applies the clock protocol around
/// each RPC exchange.
///
/// Cloning is cheap and every clone shares the same clock, so one agent can
/// be handed to any number of request handlers or in-flight calls. Mutations
/// hold the write lock for the whole update; reads take the read lock.
#[derive(Clone, Debug)]
pub struct NodeAgent {
    role: NodeRole,
    node_id: NodeName,
    clock: Arc<RwLock<VectorClock>>,
}

impl NodeAgent {
    pub fn new(role: NodeRole, node_id: NodeName) -> Self {
        Self {
            role,
            clock: Arc::new(RwLock::new(VectorClock::new(node_id.clone()))),
            node_id,
        }
    }

    pub fn client(node_id: &str) -> Result<Self> {
        Ok(Self::new(NodeRole::Client, NodeName::new(node_id)?))
    }

    pub fn server(node_id: &str) -> Result<Self> {
        Ok(Self::new(NodeRole::Server, NodeName::new(node_id)?))
    }

    pub fn node_id(&self) -> &NodeName {
        &self.node_id
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    /// Record the send event for an outgoing call and return the snapshot to
    /// attach to the request.
    #[instrument(skip(self), fields(node = %self.node_id), level = "debug")]
    pub fn begin_call(&self) -> Result<ClockSnapshot> {
        let mut clock = self.write()?;
        clock.increment()?;
        let snapshot = clock.snapshot();
        debug!(clock = %snapshot, "prepared outgoing call");
        Ok(snapshot)
    }

    /// Absorb the responder's history once a reply arrives.
    ///
    /// Merging is not itself a local event, so the own counter is left alone.
    #[instrument(skip(self, remote), fields(node = %self.node_id), level = "debug")]
    pub fn complete_call(&self, remote: &impl CausalHistory) -> Result<()> {
        let mut clock = self.write()?;
        clock.merge(remote);
        debug!(clock = %clock, "merged reply");
        Ok(())
    }

    /// Serve one incoming request: merge the caller's history (if any), count
    /// the handling as a local event, and return the snapshot for the reply.
    ///
    /// A request whose history would leave no room for that event is refused
    /// and the clock stays as it was.
    #[instrument(skip(self, incoming), fields(node = %self.node_id), level = "debug")]
    pub fn handle_request(&self, incoming: Option<&ClockSnapshot>) -> Result<ClockSnapshot> {
        let mut clock = self.write()?;
        clock.merge_and_increment(incoming)?;
        let snapshot = clock.snapshot();
        debug!(clock = %snapshot, "handled request");
        Ok(snapshot)
    }

    /// Answer one arithmetic call from the server side.
    ///
    /// The operation is evaluated first: a call that fails (overflow) never
    /// completed, so it leaves the clock untouched.
    pub fn serve(
        &self,
        operation: Operation,
        request: &OperationRequest,
    ) -> Result<OperationResponse> {
        let result = operation.apply(request.x, request.y)?;
        let clock = self.handle_request(request.clock.as_ref())?;
        info!(
            "[{}] {}({}, {}) = {} with clock {}",
            self.node_id, operation, request.x, request.y, result, clock
        );
        Ok(OperationResponse { result, clock })
    }

    pub fn snapshot(&self) -> Result<ClockSnapshot> {
        Ok(self.read()?.snapshot())
    }

    pub fn compare(&self, other: &impl CausalHistory) -> Result<Relation> {
        Ok(self.read()?.compare(other))
    }

    /// Compare against another agent's current clock
    pub fn relation_to(&self, other: &NodeAgent) -> Result<Relation> {
        // Snapshot first so the two locks are never held together.
        let theirs = other.snapshot()?;
        self.compare(&theirs)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, VectorClock>> {
        self.clock.read().map_err(|e| {
            tracing::error!("Failed to acquire clock read lock: {}", e);
            concurrency_error!("Failed to acquire clock read lock for {}", self.node_id)
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, VectorClock>> {
        self.clock.write().map_err(|e| {
            tracing::error!("Failed to acquire clock write lock: {}", e);
            concurrency_error!("Failed to acquire clock write lock for {}", self.node_id)
        })
    }
}
