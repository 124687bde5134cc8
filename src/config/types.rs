// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
    pub sync: SyncConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Site layout: where static files, admin documents, and uploads live
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Root directory served to the browser
    pub root: String,
    /// Directory holding the JSON documents written by the admin endpoints,
    /// relative to `root`
    pub data_dir: String,
    /// Directory receiving decoded uploads, relative to `root`
    pub uploads_dir: String,
    /// Files tried when a directory path is requested
    pub index_files: Vec<String>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Value of the `Server` response header
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
}

/// Review sync subprocess invocation: program followed by its arguments
#[derive(Debug, Deserialize, Clone)]
pub struct SyncConfig {
    pub command: Vec<String>,
}
