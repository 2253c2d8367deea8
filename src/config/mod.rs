// Configuration module entry point
// Layers the optional config file, DOCINTAKE_* environment variables and defaults

mod types;

use std::net::SocketAddr;

// Re-export public types
pub use types::{Config, HttpConfig};

/// Prefix for environment overrides, e.g. `DOCINTAKE_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "DOCINTAKE";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.backlog", 128)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "docintake/0.1")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("http.health_path", "/healthz")?
            .set_default("database.url_env", "DATABASE_URL")?
            .set_default("database.init_schema", false)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
