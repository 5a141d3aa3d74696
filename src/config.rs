//! Configuration management for plansmith.
//!
//! Configuration can be set via environment variables:
//! - `WORKSPACE_PATH` - Optional. Working directory for tool file
//!   operations. Defaults to the current directory.

use std::path::PathBuf;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for tool file operations.
    pub workspace_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let workspace_path = std::env::var("WORKSPACE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

        Self { workspace_path }
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(workspace_path: impl Into<PathBuf>) -> Self {
        Self {
            workspace_path: workspace_path.into(),
        }
    }
}
