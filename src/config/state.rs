// Application state module
// Shared runtime state derived from the configuration

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use super::types::Config;

/// Application state shared across connection tasks
pub struct AppState {
    pub config: Config,
    /// Resolved path of the JSON document directory
    pub data_dir: PathBuf,
    /// Resolved path of the upload directory
    pub uploads_dir: PathBuf,
    /// Cached access-log flag for lock-free reads on the request path
    pub cached_access_log: AtomicBool,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let root = PathBuf::from(&config.site.root);
        Self {
            data_dir: root.join(&config.site.data_dir),
            uploads_dir: root.join(&config.site.uploads_dir),
            cached_access_log: AtomicBool::new(config.logging.access_log),
            config: config.clone(),
        }
    }
}
