use crate::error::{Error, Result};
use envconfig::Envconfig;
use std::net::SocketAddr;
use std::time::Duration;

/// URL scheme for the backend target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// Immutable description of the backend a pool's workers connect to.
///
/// Validated at construction; every worker reads it without synchronization.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    host: String,
    port: u16,
    scheme: Scheme,
    timeout: Duration,
}

impl ConnectionConfig {
    /// Default per-request timeout when neither the config nor the descriptor
    /// overrides it.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(
        host: impl Into<String>,
        port: u16,
        scheme: Scheme,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(Error::InvalidConfig("blank hostname given".to_string()));
        }
        if port == 0 {
            return Err(Error::InvalidConfig("invalid port number given".to_string()));
        }
        Ok(Self {
            host,
            port,
            scheme,
            timeout: timeout.unwrap_or(Self::DEFAULT_TIMEOUT),
        })
    }

    /// Plain HTTP target with the default timeout.
    pub fn http(host: impl Into<String>, port: u16) -> Result<Self> {
        Self::new(host, port, Scheme::Http, None)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL for an endpoint path such as `/text/anagrams`.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!(
            "{}://{}:{}{}",
            self.scheme.as_str(),
            self.host,
            self.port,
            endpoint
        )
    }
}

/// REST server configuration, loaded from the environment.
#[derive(Debug, Envconfig, Clone)]
pub struct ServerConfig {
    /// Server bind address
    #[envconfig(from = "BIND_ADDR", default = "127.0.0.1:8081")]
    pub bind_addr: SocketAddr,

    /// Default tracing filter level
    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> std::result::Result<Self, envconfig::Error> {
        ServerConfig::init_from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_hostname() {
        let result = ConnectionConfig::http("", 8081);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_port_zero() {
        let result = ConnectionConfig::http("localhost", 0);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn builds_endpoint_urls() {
        let config = ConnectionConfig::http("localhost", 8081).unwrap();
        assert_eq!(
            config.url_for("/text/anagrams"),
            "http://localhost:8081/text/anagrams"
        );
    }

    #[test]
    fn applies_default_timeout() {
        let config = ConnectionConfig::http("localhost", 8081).unwrap();
        assert_eq!(config.timeout(), ConnectionConfig::DEFAULT_TIMEOUT);

        let config = ConnectionConfig::new(
            "localhost",
            8081,
            Scheme::Https,
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.url_for("/"), "https://localhost:8081/");
    }
}
