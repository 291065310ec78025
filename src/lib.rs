pub mod api;
pub mod cli;
pub mod client;
pub mod clock;
pub mod error;
pub mod node;
pub mod rpc;
pub mod settings;
