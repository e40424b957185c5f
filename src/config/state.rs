// Application state module
// Read-only state shared by every connection

use std::io;
use std::path::PathBuf;

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Canonical directory that requests are served from
    pub root: PathBuf,
}

impl AppState {
    pub const fn new(config: Config, root: PathBuf) -> Self {
        Self { config, root }
    }

    /// Serve the process' working directory as it is at startup
    pub fn from_current_dir(config: Config) -> io::Result<Self> {
        let root = std::env::current_dir()?.canonicalize()?;
        Ok(Self::new(config, root))
    }
}
