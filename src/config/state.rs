// Application state module
// Read-only values shared by every connection

use std::io;
use std::path::{Path, PathBuf};

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Canonical serving root; every served path must stay under it
    pub root: PathBuf,
}

impl AppState {
    /// Resolve the configured root against the current directory.
    /// Fails if the root does not exist.
    pub fn new(config: &Config) -> io::Result<Self> {
        let root = Path::new(&config.server.root).canonicalize()?;
        Ok(Self {
            config: config.clone(),
            root,
        })
    }

    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
