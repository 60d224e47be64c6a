use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::{ToolkitSettings, SETTINGS_FILE};
use crate::error::{ErrorCode, Result, ToolkitError};

/// Loads [`ToolkitSettings`] for one vault
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    vault: PathBuf,
}

impl ConfigLoader {
    pub fn new(vault: impl Into<PathBuf>) -> Self {
        Self {
            vault: vault.into(),
        }
    }

    pub fn vault(&self) -> &Path {
        &self.vault
    }

    /// Load settings from `explicit`, or from the vault's settings file when
    /// none is given, then apply environment overrides.
    ///
    /// A missing vault settings file means defaults; a missing explicit file
    /// is an error.
    pub async fn load(&self, explicit: Option<&Path>) -> Result<ToolkitSettings> {
        let mut settings = match explicit {
            Some(path) => {
                if !fs::try_exists(path).await.unwrap_or(false) {
                    return Err(ToolkitError::config_with_code(
                        ErrorCode::CONFIG_NOT_FOUND,
                        format!("Settings file not found: {}", path.display()),
                    ));
                }
                self.load_file(path).await?
            }
            None => {
                let path = self.vault.join(SETTINGS_FILE);
                if fs::try_exists(&path).await.unwrap_or(false) {
                    self.load_file(&path).await?
                } else {
                    debug!("No settings file at {}, using defaults", path.display());
                    ToolkitSettings::default()
                }
            }
        };

        settings.merge_env_vars();
        Ok(settings)
    }

    async fn load_file(&self, path: &Path) -> Result<ToolkitSettings> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            ToolkitError::config_with_code(
                ErrorCode::CONFIG_PATH_ERROR,
                format!("Failed to read settings file {}", path.display()),
            )
            .with_source(e)
        })?;
        let settings: ToolkitSettings = toml::from_str(&content)
            .map_err(|e| ToolkitError::from(e).with_context(path.display()))?;
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}
