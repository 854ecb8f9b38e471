use axum::http::HeaderValue;
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;

pub const HOST_VAR: &str = "INVESTOROS_HOST";
pub const PORT_VAR: &str = "INVESTOROS_PORT";
pub const CORS_ORIGINS_VAR: &str = "INVESTOROS_CORS_ORIGINS";
pub const LOG_JSON_VAR: &str = "INVESTOROS_LOG_JSON";

const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be an IP address, got '{value}'")]
    InvalidHost { var: &'static str, value: String },

    #[error("{var} must be a port number, got '{value}'")]
    InvalidPort { var: &'static str, value: String },

    #[error("{var} contains an invalid origin '{value}'")]
    InvalidOrigin { var: &'static str, value: String },
}

/// Origins allowed to call the API from a browser.
#[derive(Debug, Clone, PartialEq)]
pub enum CorsOrigins {
    Any,
    List(Vec<HeaderValue>),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub cors_origins: CorsOrigins,
    /// Emit JSON log lines instead of human-readable output
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            cors_origins: CorsOrigins::Any,
            log_json: false,
        }
    }
}

impl ServerConfig {
    /// Load `.env` if present, then read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();

        if let Some(value) = lookup(HOST_VAR) {
            config.host = value.trim().parse().map_err(|_| ConfigError::InvalidHost {
                var: HOST_VAR,
                value: value.clone(),
            })?;
        }

        if let Some(value) = lookup(PORT_VAR) {
            config.port = value.trim().parse().map_err(|_| ConfigError::InvalidPort {
                var: PORT_VAR,
                value: value.clone(),
            })?;
        }

        if let Some(value) = lookup(CORS_ORIGINS_VAR) {
            config.cors_origins = parse_origins(&value)?;
        }

        if let Some(value) = lookup(LOG_JSON_VAR) {
            config.log_json = matches!(value.trim(), "1" | "true" | "TRUE" | "yes");
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_origins(raw: &str) -> Result<CorsOrigins, ConfigError> {
    let entries: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if entries.is_empty() || entries.contains(&"*") {
        return Ok(CorsOrigins::Any);
    }

    entries
        .into_iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidOrigin {
                var: CORS_ORIGINS_VAR,
                value: origin.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(CorsOrigins::List)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8000");
        assert_eq!(config.cors_origins, CorsOrigins::Any);
        assert!(!config.log_json);
    }

    #[test]
    fn test_overrides_from_environment() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            (HOST_VAR, "127.0.0.1"),
            (PORT_VAR, "9090"),
            (CORS_ORIGINS_VAR, "http://localhost:8081, https://app.investoros.com"),
            (LOG_JSON_VAR, "true"),
        ]))
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9090");
        assert!(config.log_json);
        match config.cors_origins {
            CorsOrigins::List(origins) => assert_eq!(origins.len(), 2),
            CorsOrigins::Any => panic!("expected explicit origins"),
        }
    }

    #[test]
    fn test_wildcard_origin_means_any() {
        let config =
            ServerConfig::from_lookup(lookup_from(&[(CORS_ORIGINS_VAR, "http://a.test,*")]))
                .unwrap();
        assert_eq!(config.cors_origins, CorsOrigins::Any);
    }

    #[test]
    fn test_invalid_port_rejected() {
        let err = ServerConfig::from_lookup(lookup_from(&[(PORT_VAR, "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
        assert_eq!(
            err.to_string(),
            "INVESTOROS_PORT must be a port number, got 'eighty'"
        );
    }

    #[test]
    fn test_invalid_host_rejected() {
        let err = ServerConfig::from_lookup(lookup_from(&[(HOST_VAR, "localhost")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHost { .. }));
    }
}
