// Config file adapter - Loads TOML or YAML configuration files

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config_initialization::AppConfig;
use crate::error::{MediaPrepError, MediaPrepResult};
use crate::utils::path::{extension_lower, resolve_under};

/// Names looked for in the website root, in order
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["mediaprep.toml", "mediaprep.yaml", "mediaprep.yml"];

/// Config file adapter
pub struct ConfigFileAdapter {
    root: PathBuf,
}

impl ConfigFileAdapter {
    /// Create new config file adapter rooted at the website directory
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Pick the config file to load.
    ///
    /// An explicit path must exist; otherwise the first default name found in
    /// the root is used, if any.
    pub fn discover(&self, explicit: Option<&Path>) -> MediaPrepResult<Option<PathBuf>> {
        if let Some(path) = explicit {
            let resolved = resolve_under(&self.root, path);
            if !resolved.is_file() {
                return Err(MediaPrepError::ConfigError {
                    path: resolved.display().to_string(),
                    message: "Config file does not exist".to_string(),
                });
            }
            return Ok(Some(resolved));
        }

        for name in DEFAULT_CONFIG_NAMES {
            let candidate = self.root.join(name);
            debug!("Looking for config at {}", candidate.display());
            if candidate.is_file() {
                return Ok(Some(candidate));
            }
        }

        Ok(None)
    }

    /// Read and parse a config file according to its extension
    pub fn load(&self, path: &Path) -> MediaPrepResult<AppConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| MediaPrepError::ConfigError {
            path: path.display().to_string(),
            message: format!("Failed to read config file: {}", e),
        })?;
        Self::parse(path, &content)
    }

    /// Parse config text; the extension of `path` selects the format
    pub fn parse(path: &Path, content: &str) -> MediaPrepResult<AppConfig> {
        let with_path = |message: String| MediaPrepError::ConfigError {
            path: path.display().to_string(),
            message,
        };

        match extension_lower(path).as_deref() {
            Some("toml") => toml::from_str(content).map_err(|e| with_path(e.to_string())),
            Some("yaml") | Some("yml") => {
                if content.trim().is_empty() {
                    return Ok(AppConfig::default());
                }
                serde_yaml::from_str(content).map_err(|e| with_path(e.to_string()))
            }
            _ => Err(MediaPrepError::UnsupportedConfigFormat {
                path: path.display().to_string(),
            }),
        }
    }
}
