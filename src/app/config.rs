//! Application configuration
//!
//! Settings that belong to the process rather than to a vault.

use anyhow::Result;
use std::path::PathBuf;

/// Application configuration structure
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Verbosity level for logging
    pub verbose: u8,
    /// Vault root that relative paths are resolved against
    pub vault_dir: PathBuf,
}

impl AppConfig {
    /// Create a configuration rooted at the current directory
    pub fn new(verbose: u8) -> Result<Self> {
        let vault_dir = std::env::current_dir()
            .map_err(|e| anyhow::anyhow!("Failed to get current directory: {}", e))?;

        Ok(Self { verbose, vault_dir })
    }

    /// Set the vault root
    pub fn with_vault_dir(mut self, dir: PathBuf) -> Self {
        self.vault_dir = dir;
        self
    }

    /// Get the log filter based on verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            verbose: 0,
            vault_dir: PathBuf::from("."),
        }
    }
}
