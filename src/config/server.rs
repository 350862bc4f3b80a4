//! Server configuration types.
//!
//! Listen address and port for the HTTP adapter. Defaults are sourced from
//! `crate::constants`.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

use super::ConfigError;
use crate::constants::{DEFAULT_LISTEN_ADDRESS, DEFAULT_LISTEN_PORT};

fn default_address() -> String {
    DEFAULT_LISTEN_ADDRESS.to_string()
}

fn default_port() -> u16 {
    DEFAULT_LISTEN_PORT
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// IP address to bind (default: 0.0.0.0)
    #[serde(default = "default_address")]
    pub address: String,
    /// TCP port to bind (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Combine address and port into a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .address
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                name: "server.address".to_string(),
                value: self.address.clone(),
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
