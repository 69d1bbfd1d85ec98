use serde::Deserialize;
use std::net::SocketAddr;

use crate::router::Router;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub resources: ResourcesConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResourcesConfig {
    pub home_page: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.access_log", true)?
            .set_default("resources.home_page", "home.html")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Per-process state shared by all request handlers.
///
/// The route table and configuration are fixed at startup; nothing here is
/// mutated after the server starts, so handlers share it through a plain
/// `Arc` with no locking.
pub struct AppState {
    pub config: Config,
    pub router: Router,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            router: Router::with_default_routes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                workers: None,
            },
            logging: LoggingConfig { access_log: true },
            resources: ResourcesConfig {
                home_page: "home.html".to_string(),
            },
        }
    }

    #[test]
    fn test_socket_addr() {
        let cfg = test_config();
        let addr = cfg.get_socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
        assert!(addr.is_ipv4());
    }

    #[test]
    fn test_socket_addr_invalid_host() {
        let mut cfg = test_config();
        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
