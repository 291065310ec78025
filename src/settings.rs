//! vclock-rpc application settings
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use url::Url;

use crate::clock::NodeName;
use crate::config_error;
use crate::error::Result;

pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const STANDARD_PORT_HTTP: u16 = 8080;
pub const DEFAULT_PORT_HTTP: &str = "8080";
pub const DEFAULT_SERVER_NODE_ID: &str = "server";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";
pub const STANDARD_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: &str = "10";
pub const STANDARD_CLIENT_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_CLIENT_TIMEOUT_MS: &str = "2000";

#[derive(Clone, Debug)]
pub struct Settings {
    // Server listen address
    pub listen_address: String,

    // HTTP API listen port
    pub listen_port: u16,

    // Identity used as this server's key in every vector clock
    pub node_id: String,

    // Upper bound on handling a single request
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0".to_string(),
            listen_port: STANDARD_PORT_HTTP,
            node_id: DEFAULT_SERVER_NODE_ID.to_string(),
            request_timeout_secs: STANDARD_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    pub fn node_name(&self) -> Result<NodeName> {
        NodeName::new(self.node_id.as_str())
            .map_err(|_| config_error!("node id must not be empty"))
    }

    pub fn socket_address(&self) -> Result<SocketAddr> {
        let ip = self
            .listen_address
            .parse::<IpAddr>()
            .map_err(|e| config_error!("Invalid listen address '{}': {}", self.listen_address, e))?;
        Ok(SocketAddr::from((ip, self.listen_port)))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Clone, Debug)]
pub struct ClientSettings {
    // Base URL of the server to call
    pub server_url: Url,

    // Identity used as this client's key in every vector clock
    pub node_id: String,

    // Per-call timeout; an expired call is reported as a transport failure
    pub timeout_ms: u64,
}

impl ClientSettings {
    pub fn new(server_url: &str, node_id: &str) -> Result<Self> {
        Ok(Self {
            server_url: base_url(Url::parse(server_url)?),
            node_id: node_id.to_string(),
            timeout_ms: STANDARD_CLIENT_TIMEOUT_MS,
        })
    }

    pub fn node_name(&self) -> Result<NodeName> {
        NodeName::new(self.node_id.as_str())
            .map_err(|_| config_error!("node id must not be empty"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Give a server URL the trailing slash that makes relative endpoint paths
/// resolve beneath it rather than beside its last segment.
pub fn base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_server_settings() {
        let settings = Settings::default();
        assert_eq!(settings.node_name().unwrap().as_str(), "server");
        assert_eq!(
            settings.socket_address().unwrap(),
            "0.0.0.0:8080".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(settings.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_settings_are_config_errors() {
        let settings = Settings {
            listen_address: "not-an-ip".to_string(),
            node_id: "".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.socket_address().unwrap_err().error_type(), "configuration_error");
        assert_eq!(settings.node_name().unwrap_err().error_type(), "configuration_error");
    }

    #[test]
    fn test_client_settings() {
        let settings = ClientSettings::new(DEFAULT_SERVER_URL, "A").unwrap();
        assert_eq!(settings.timeout(), Duration::from_millis(2000));
        assert_eq!(settings.node_name().unwrap().as_str(), "A");
        assert!(ClientSettings::new("not a url", "A").is_err());
    }

    #[test]
    fn test_textual_defaults_match_numeric_ones() {
        assert_eq!(DEFAULT_PORT_HTTP.parse::<u16>().unwrap(), STANDARD_PORT_HTTP);
        assert_eq!(
            DEFAULT_REQUEST_TIMEOUT_SECS.parse::<u64>().unwrap(),
            STANDARD_REQUEST_TIMEOUT_SECS
        );
        assert_eq!(
            DEFAULT_CLIENT_TIMEOUT_MS.parse::<u64>().unwrap(),
            STANDARD_CLIENT_TIMEOUT_MS
        );
    }

    #[test]
    fn test_server_url_keeps_its_path_prefix() {
        let settings = ClientSettings::new("http://rpc.internal/v1", "A").unwrap();
        assert_eq!(settings.server_url.as_str(), "http://rpc.internal/v1/");
        assert_eq!(
            settings.server_url.join("multiply").unwrap().as_str(),
            "http://rpc.internal/v1/multiply"
        );

        let bare = ClientSettings::new(DEFAULT_SERVER_URL, "A").unwrap();
        assert_eq!(bare.server_url.as_str(), "http://127.0.0.1:8080/");
        assert_eq!(
            base_url(Url::parse("http://rpc.internal/v1/").unwrap()).as_str(),
            "http://rpc.internal/v1/"
        );
    }
}
