use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderName;

const DEFAULT_OWNER_HEADER: &str = "x-owner-id";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub identity: IdentityConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let owner_header = env::var("APP_OWNER_HEADER")
            .unwrap_or_else(|_| DEFAULT_OWNER_HEADER.to_string());
        let identity = IdentityConfig::new(&owner_header)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            identity,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the router reads the authenticated owner from.
///
/// An upstream gateway is expected to authenticate the caller and forward the owner id in
/// this header; requests without it are treated as anonymous.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub owner_header: HeaderName,
}

impl IdentityConfig {
    pub fn new(owner_header: &str) -> Result<Self, ConfigError> {
        let owner_header = HeaderName::from_bytes(owner_header.trim().as_bytes())
            .map_err(|_| ConfigError::InvalidOwnerHeader(owner_header.to_string()))?;
        Ok(Self { owner_header })
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            owner_header: HeaderName::from_static(DEFAULT_OWNER_HEADER),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidOwnerHeader(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidOwnerHeader(value) => {
                write!(f, "APP_OWNER_HEADER '{value}' is not a valid header name")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidOwnerHeader(_) => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
