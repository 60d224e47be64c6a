//! Toolkit settings
//!
//! Settings come from an optional `dnd-ui-toolkit.toml` in the vault root,
//! overridden by `DND_UI_TOOLKIT_*` environment variables.

pub mod loader;


pub use loader::ConfigLoader;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default name of the persisted state file, relative to the vault root
pub const DEFAULT_STATE_FILE: &str = ".dnd-ui-toolkit-state.json";

/// Default name of the settings file, relative to the vault root
pub const SETTINGS_FILE: &str = "dnd-ui-toolkit.toml";

pub const ENV_STATE_PATH: &str = "DND_UI_TOOLKIT_STATE_PATH";
pub const ENV_THEME: &str = "DND_UI_TOOLKIT_THEME";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitSettings {
    /// Location of the state file; relative paths are resolved against the vault
    pub state_path: PathBuf,
    pub selected_theme: String,
}

impl Default for ToolkitSettings {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(DEFAULT_STATE_FILE),
            selected_theme: "default".to_string(),
        }
    }
}

impl ToolkitSettings {
    /// Apply overrides from the process environment
    pub fn merge_env_vars(&mut self) {
        self.merge_env_with(|name| std::env::var(name).ok());
    }

    /// Apply overrides from `lookup`, which maps variable names to values
    pub fn merge_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(ENV_STATE_PATH).filter(|p| !p.is_empty()) {
            self.state_path = PathBuf::from(path);
        }
        if let Some(theme) = lookup(ENV_THEME).filter(|t| !t.is_empty()) {
            self.selected_theme = theme;
        }
    }

    /// Absolute (or vault-relative) location of the state file
    pub fn resolve_state_path(&self, vault: &Path) -> PathBuf {
        if self.state_path.is_absolute() {
            self.state_path.clone()
        } else {
            vault.join(&self.state_path)
        }
    }
}
