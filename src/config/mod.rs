// Configuration module entry point
// Loads layered configuration and builds the shared application state

mod state;
mod types;

use std::net::SocketAddr;
use std::path::PathBuf;

pub use state::AppState;
pub use types::Config;

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (extension optional).
    /// A missing file is not an error: defaults and environment still apply.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("WIKI"))
            .build()?
            .try_deserialize()
    }

    /// Parse configuration from an in-memory TOML document
    #[cfg(test)]
    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.shutdown_timeout", 10)?
            .set_default("storage.data_dir", ".")?
            .set_default("templates.dir", "templates")?
            .set_default("templates.dev_mode", false)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("http.server_name", "rust_wiki")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.storage.data_dir)
    }

    pub fn templates_dir(&self) -> PathBuf {
        PathBuf::from(&self.templates.dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("definitely-not-a-config-file").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.shutdown_timeout, 10);
        assert_eq!(cfg.storage.data_dir, ".");
        assert_eq!(cfg.templates.dir, "templates");
        assert!(!cfg.templates.dev_mode);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.http.max_body_size, 10_485_760);
        assert_eq!(cfg.performance.max_connections, None);
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let cfg = Config::from_toml_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9090
            workers = 2
            shutdown_timeout = 3

            [storage]
            data_dir = "/var/lib/wiki"

            [logging]
            level = "debug"
            access_log = false

            [performance]
            max_connections = 64
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.workers, Some(2));
        assert_eq!(cfg.server.shutdown_timeout, 3);
        assert_eq!(cfg.data_dir(), PathBuf::from("/var/lib/wiki"));
        assert_eq!(cfg.logging.level, "debug");
        assert!(!cfg.logging.access_log);
        assert_eq!(cfg.performance.max_connections, Some(64));
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:9090".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_invalid_host_is_reported() {
        let cfg = Config::from_toml_str("[server]\nhost = \"not an ip\"\n").unwrap();
        assert!(cfg.get_socket_addr().is_err());
    }
}
