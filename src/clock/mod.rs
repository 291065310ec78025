//! Causality tracking shared by every node role.
//!
//! A [`VectorClock`] is owned by one node and records how many local events
//! that node has seen from everyone it has heard about. Clocks travel between
//! nodes as [`ClockSnapshot`]s and are compared with [`Relation`] to decide
//! whether two events are causally ordered or concurrent.
pub mod node_id;
pub mod snapshot;
pub mod vector_clock;

pub use node_id::NodeName;
pub use snapshot::{CausalHistory, ClockSnapshot, RawSnapshot};
pub use vector_clock::{compare_histories, Relation, VectorClock};
