use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::hotkey::{parse_hotkey, HotkeyError, KeyCombo};
use crate::search::{FieldWeights, SearchOptions, MAX_RESULTS};
use crate::similarity::DEFAULT_THRESHOLD;
use crate::storage::StorageKind;

const APP_DIR_NAME: &str = "calcfind";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("invalid {field}: {source}")]
    Hotkey {
        field: &'static str,
        source: HotkeyError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_results: u16,
    pub match_threshold: f64,
    pub search_hotkey: String,
    pub theme_hotkey: String,
    pub storage: StorageKind,
    pub data_dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
    pub weights: FieldWeights,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let base = stable_app_data_dir();
        Self {
            max_results: MAX_RESULTS as u16,
            match_threshold: DEFAULT_THRESHOLD,
            weights: FieldWeights::default(),
            search_hotkey: "Mod+K".to_string(),
            theme_hotkey: "T".to_string(),
            storage: StorageKind::File,
            config_path: base.join(CONFIG_FILE_NAME),
            data_dir: base,
            catalog_path: None,
        }
    }
}

impl Config {
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            max_results: self.max_results as usize,
            threshold: self.match_threshold,
            weights: self.weights,
        }
    }

    pub fn search_combo(&self) -> Result<KeyCombo, ConfigError> {
        parse_hotkey(&self.search_hotkey).map_err(|source| ConfigError::Hotkey {
            field: "search_hotkey",
            source,
        })
    }

    pub fn theme_combo(&self) -> Result<KeyCombo, ConfigError> {
        parse_hotkey(&self.theme_hotkey).map_err(|source| ConfigError::Hotkey {
            field: "theme_hotkey",
            source,
        })
    }
}

pub fn stable_app_data_dir() -> PathBuf {
    if let Some(dir) = non_empty_env("CALCFIND_DATA_DIR") {
        return PathBuf::from(dir);
    }

    let platform_base = non_empty_env("APPDATA")
        .map(PathBuf::from)
        .or_else(|| non_empty_env("XDG_DATA_HOME").map(PathBuf::from))
        .or_else(|| non_empty_env("HOME").map(|home| PathBuf::from(home).join(".local").join("share")));

    platform_base
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.max_results == 0 || cfg.max_results > 50 {
        return Err(invalid("max_results", "must be between 1 and 50"));
    }

    if !(cfg.match_threshold > 0.0 && cfg.match_threshold <= 1.0) {
        return Err(invalid("match_threshold", "must be in (0, 1]"));
    }

    let weights = [
        cfg.weights.title,
        cfg.weights.keywords,
        cfg.weights.description,
        cfg.weights.category_title,
    ];
    if weights.iter().any(|w| !(*w > 0.0 && *w <= 1.0)) {
        return Err(invalid("weights", "each weight must be in (0, 1]"));
    }

    let w = &cfg.weights;
    if w.title < w.keywords.max(w.description) {
        return Err(invalid("weights", "title must be weighted at least as high as any other field"));
    }
    if w.category_title > w.keywords.min(w.description) {
        return Err(invalid("weights", "category_title must be weighted lowest"));
    }

    cfg.search_combo()?;
    cfg.theme_combo()?;

    if cfg.data_dir.as_os_str().is_empty() {
        return Err(invalid("data_dir", "is required"));
    }

    if cfg.config_path.as_os_str().is_empty() {
        return Err(invalid("config_path", "is required"));
    }

    Ok(())
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

/// Reads `path` (or the default location). A missing file yields defaults.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Config::default().config_path);

    let mut cfg = match std::fs::read_to_string(&config_path) {
        Ok(raw) => toml::from_str::<Config>(&raw)?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Config::default(),
        Err(err) => return Err(err.into()),
    };
    cfg.config_path = config_path;

    validate(&cfg)?;
    Ok(cfg)
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    validate(cfg)?;
    if let Some(parent) = cfg.config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let encoded = toml::to_string_pretty(cfg)?;
    std::fs::write(&cfg.config_path, encoded)?;
    Ok(())
}
