//! HTTP Server Configuration
//!
//! Configuration for the HTTP server including host, port, API prefix and
//! CORS settings.

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 9090)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins (default: empty, which allows any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Prefix the object and status routes are mounted under
    /// (default: "/apis/v1")
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9090
}

fn default_api_prefix() -> String {
    "/apis/v1".to_string()
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            api_prefix: default_api_prefix(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check the fields serde cannot
    pub fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("server.host must not be empty".to_string());
        }
        if !self.api_prefix.is_empty() && !self.api_prefix.starts_with('/') {
            return Err(format!(
                "server.api_prefix must start with '/': {}",
                self.api_prefix
            ));
        }
        Ok(())
    }
}
