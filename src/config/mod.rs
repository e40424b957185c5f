// Configuration module entry point
// Built-in defaults with environment overrides; no configuration file is read

mod state;
mod types;

use std::net::{Ipv4Addr, SocketAddr};

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

/// Listen port, not configurable
pub const PORT: u16 = 8000;

/// Environment variable prefix for overrides, e.g. `NOCACHE_LOGGING__ACCESS_LOG=false`
pub const ENV_PREFIX: &str = "NOCACHE";

/// Address the server listens on: all interfaces, port 8000
pub const fn bind_addr() -> SocketAddr {
    SocketAddr::new(std::net::IpAddr::V4(Ipv4Addr::UNSPECIFIED), PORT)
}

impl Config {
    /// Load configuration from defaults and `NOCACHE_*` environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with_prefix(ENV_PREFIX)
    }

    /// Load configuration, reading overrides from variables with the given prefix
    pub fn load_with_prefix(prefix: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 0)?
            .set_default(
                "http.server_name",
                concat!("NoCacheHTTP/", env!("CARGO_PKG_VERSION")),
            )?
            .add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_addr() {
        let addr = bind_addr();
        assert_eq!(addr.port(), 8000);
        assert!(addr.ip().is_unspecified());
        assert_eq!(addr.to_string(), "0.0.0.0:8000");
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::load_with_prefix("NOCACHE_DEFAULTS_TEST").unwrap();
        assert!(cfg.server.workers.is_none());
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "common");
        assert!(cfg.logging.access_log_file.is_none());
        assert!(cfg.performance.keep_alive);
        assert_eq!(cfg.performance.connection_timeout, 0);
        assert!(cfg.http.server_name.starts_with("NoCacheHTTP/"));
    }

    #[test]
    fn test_environment_override() {
        std::env::set_var("NOCACHE_ENV_TEST_LOGGING__ACCESS_LOG", "false");
        std::env::set_var("NOCACHE_ENV_TEST_PERFORMANCE__CONNECTION_TIMEOUT", "30");
        let cfg = Config::load_with_prefix("NOCACHE_ENV_TEST").unwrap();
        assert!(!cfg.logging.access_log);
        assert_eq!(cfg.performance.connection_timeout, 30);
    }
}
