//! CLI for this application
//!
use url::Url;

use crate::rpc::Operation;
use crate::settings;

#[derive(Clone, Debug, clap::Parser)]
#[command(name = "vclock-server", about = "Arithmetic RPC server that tracks causality with vector clocks")]
pub struct Cli {
    // Server listen address
    #[clap(
        long,
        default_value = "0.0.0.0",
        env("VCLOCK_LISTEN_ADDRESS"),
        help = "IP Address to listen on"
    )]
    pub listen_address: String,

    // HTTP API listen port
    #[clap(
        long,
        default_value = settings::DEFAULT_PORT_HTTP,
        env("VCLOCK_HTTP_LISTEN_PORT"),
        help = "Port to bind the HTTP API server to"
    )]
    pub listen_port: u16,

    // Clock identity of this server
    #[clap(
        long,
        default_value = settings::DEFAULT_SERVER_NODE_ID,
        env("VCLOCK_NODE_ID"),
        help = "Node ID this server records in vector clocks"
    )]
    pub node_id: String,

    #[clap(
        long,
        default_value = settings::DEFAULT_REQUEST_TIMEOUT_SECS,
        env("VCLOCK_REQUEST_TIMEOUT_SECS"),
        help = "Seconds before an in-flight request is abandoned"
    )]
    pub request_timeout_secs: u64,
}

impl Cli {
    pub fn into_settings(self) -> settings::Settings {
        settings::Settings {
            listen_address: self.listen_address,
            listen_port: self.listen_port,
            node_id: self.node_id,
            request_timeout_secs: self.request_timeout_secs,
        }
    }
}

#[derive(Clone, Debug, clap::Parser)]
#[command(name = "vclock-client", about = "Call a vclock-rpc server and report vector clocks")]
pub struct ClientCli {
    #[clap(
        long,
        default_value = settings::DEFAULT_SERVER_URL,
        env("VCLOCK_SERVER_URL"),
        help = "Base URL of the server"
    )]
    pub server_url: Url,

    #[clap(
        long,
        env("VCLOCK_NODE_ID"),
        help = "Node ID this client records in vector clocks"
    )]
    pub node_id: String,

    #[clap(
        long,
        default_value = settings::DEFAULT_CLIENT_TIMEOUT_MS,
        env("VCLOCK_CLIENT_TIMEOUT_MS"),
        help = "Milliseconds before a call is reported as timed out"
    )]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: ClientCommand,
}

#[derive(Clone, Debug, clap::Subcommand)]
pub enum ClientCommand {
    /// Add two numbers on the server
    Add { x: i64, y: i64 },
    /// Multiply two numbers on the server
    Multiply { x: i64, y: i64 },
    /// Call add(50, 50) then multiply(50, 2)
    Demo,
    /// Run two client agents against the server and report how their clocks relate
    Scenario {
        /// Node ID of the second client
        #[arg(long, default_value = "B")]
        other_node_id: String,
        /// Milliseconds to wait between the two clients' calls
        #[arg(long, default_value = "0")]
        delay_ms: u64,
    },
}

impl ClientCommand {
    /// Single-call commands as an operation and its arguments
    pub fn as_call(&self) -> Option<(Operation, i64, i64)> {
        match self {
            ClientCommand::Add { x, y } => Some((Operation::Add, *x, *y)),
            ClientCommand::Multiply { x, y } => Some((Operation::Multiply, *x, *y)),
            _ => None,
        }
    }
}

impl ClientCli {
    pub fn into_settings(self) -> (settings::ClientSettings, ClientCommand) {
        (
            settings::ClientSettings {
                server_url: settings::base_url(self.server_url),
                node_id: self.node_id,
                timeout_ms: self.timeout_ms,
            },
            self.command,
        )
    }
}
