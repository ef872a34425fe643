//! Server configuration module.
//!
//! This module provides configuration loading for the kivi server from
//! environment variables.
//!
//! # Environment Variables
//!
//! - `KIVI_LISTEN_ADDRESS`: IP address to bind (default: `127.0.0.1`)
//! - `KIVI_LISTEN_PORT`: Port to listen on (default: `8080`)
//!
//! # Invariants
//!
//! - `listen_address` is always a parsed IP address
//! - `listen_port` is always a valid port number (0-65535)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KiviConfig {
    /// Address the HTTP listener binds to.
    pub listen_address: IpAddr,
    /// Port to listen on for HTTP connections.
    pub listen_port: u16,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for KiviConfig {
    fn default() -> Self {
        Self {
            listen_address: Self::DEFAULT_ADDRESS,
            listen_port: Self::DEFAULT_PORT,
        }
    }
}

impl KiviConfig {
    /// Default port for the server.
    pub const DEFAULT_PORT: u16 = 8080;
    /// Default bind address.
    pub const DEFAULT_ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    const ADDRESS_VAR: &'static str = "KIVI_LISTEN_ADDRESS";
    const PORT_VAR: &'static str = "KIVI_LISTEN_PORT";

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `KIVI_LISTEN_ADDRESS` or `KIVI_LISTEN_PORT` is set
    /// but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset variables fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let listen_address = match lookup(Self::ADDRESS_VAR) {
            Some(value) => value
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidValue {
                    name: Self::ADDRESS_VAR.to_string(),
                    message: format!("'{value}' is not a valid IP address"),
                })?,
            None => Self::DEFAULT_ADDRESS,
        };

        let listen_port = match lookup(Self::PORT_VAR) {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: Self::PORT_VAR.to_string(),
                message: format!("'{value}' is not a valid port number (must be 0-65535)"),
            })?,
            None => Self::DEFAULT_PORT,
        };

        Ok(Self {
            listen_address,
            listen_port,
        })
    }

    /// Socket address the server binds to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen_address, self.listen_port)
    }
}
