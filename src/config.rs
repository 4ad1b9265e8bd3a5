//! Editor configuration persistence
//!
//! Stores user preferences in `~/.config/stylus/config.yaml`

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Editor configuration that persists across sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Console log level when RUST_LOG is unset (e.g., "warn", "stylus=debug")
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Quiet period before the command preview re-runs, in milliseconds
    #[serde(default = "default_preview_debounce_ms")]
    pub preview_debounce_ms: u64,
    /// Preview output cap in bytes; larger results show a placeholder
    #[serde(default = "default_preview_cap_bytes")]
    pub preview_cap_bytes: usize,
    /// Command provider to load (e.g., "line-script")
    #[serde(default = "default_provider")]
    pub provider: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_preview_debounce_ms() -> u64 {
    1000
}

fn default_preview_cap_bytes() -> usize {
    4096
}

fn default_provider() -> String {
    "line-script".to_string()
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            preview_debounce_ms: default_preview_debounce_ms(),
            preview_cap_bytes: default_preview_cap_bytes(),
            provider: default_provider(),
        }
    }
}

impl EditorConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(&path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn preview_debounce(&self) -> Duration {
        Duration::from_millis(self.preview_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: EditorConfig = serde_yaml::from_str("log_level: debug\n").unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.preview_debounce_ms, 1000);
        assert_eq!(config.preview_cap_bytes, 4096);
        assert_eq!(config.provider, "line-script");
    }

    #[test]
    fn test_round_trips_through_yaml() {
        let config = EditorConfig {
            preview_debounce_ms: 250,
            ..EditorConfig::default()
        };
        let back: EditorConfig =
            serde_yaml::from_str(&serde_yaml::to_string(&config).unwrap()).unwrap();
        assert_eq!(back.preview_debounce_ms, 250);
        assert_eq!(back.preview_debounce(), Duration::from_millis(250));
    }
}
