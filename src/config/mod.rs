// Configuration module entry point
// Manages application configuration and shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, ServerConfig, SiteConfig, SyncConfig};

impl Config {
    /// Load configuration from "config.toml" in the working directory.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the specified file path (without extension).
    /// The file is optional; every field has a default, and any value can be
    /// overridden with a `SERVER_`-prefixed environment variable.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("site.root", ".")?
            .set_default("site.data_dir", "data")?
            .set_default("site.uploads_dir", "uploads")?
            .set_default("site.index_files", vec!["index.html"])?
            .set_default("http.server_name", "SiteDev/0.1")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("sync.command", vec!["python3", "scripts/sync_reviews.py"])?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_config_file() {
        let config = Config::load_from("does-not-exist").expect("defaults should load");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.site.data_dir, "data");
        assert_eq!(config.site.index_files, vec!["index.html".to_string()]);
        assert_eq!(config.http.server_name, "SiteDev/0.1");
        assert_eq!(config.sync.command[0], "python3");
        assert!(config.logging.access_log);
    }

    #[test]
    fn socket_addr_parses_from_host_and_port() {
        let config = Config::load_from("does-not-exist").expect("defaults should load");
        let addr = config.get_socket_addr().expect("valid address");
        assert_eq!(addr.port(), 8000);
    }
}
