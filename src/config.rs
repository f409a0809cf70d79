use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::models::QualityTier;
use crate::select::DEFAULT_PREFERENCE;
use crate::vocabulary::CustomTagConfig;

/// Application configuration loaded from TOML config file.
/// All fields have defaults; the config file is optional.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Quality tier used when the CLI doesn't pass `--quality`.
    pub quality: QualityTier,
    /// Codec preference for preview streams, best first.
    pub preview_codecs: Vec<String>,
    /// Directory of `<id>.info.json` files used by `lookup` and `search`.
    pub info_json_dir: Option<PathBuf>,
    /// Extra decorative tags (merged after the built-in vocabulary).
    #[serde(rename = "tags")]
    pub custom_tags: Vec<CustomTagConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            quality: QualityTier::Hifi,
            preview_codecs: DEFAULT_PREFERENCE.iter().map(|c| c.to_string()).collect(),
            info_json_dir: None,
            custom_tags: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load config from `~/.config/tubetag/config.toml`.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Load config from an explicit path. Logs a warning and falls back to
    /// defaults if the file can't be read or parsed.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
                Self::default()
            }
        }
    }

    /// Info-JSON directory: configured path, else the XDG data dir.
    pub fn resolve_info_json_dir(&self) -> PathBuf {
        if let Some(dir) = &self.info_json_dir {
            return dir.clone();
        }
        match ProjectDirs::from("", "", crate::APP_NAME) {
            Some(dirs) => dirs.data_dir().join("info"),
            // Fallback: current directory
            None => PathBuf::from("."),
        }
    }

    /// Get the config file path.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
