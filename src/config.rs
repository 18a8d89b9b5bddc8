use crate::constants::{DEFAULT_API_BASE_URL, DEFAULT_SYSTEMS, DEFAULT_TIMEOUT_SECS};
use crate::errors::{MedmapError, MedmapResult};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub const API_URL_ENV: &str = "MEDMAP_API_URL";

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub systems: Vec<String>,
    pub chat_history_limit: usize,
    pub log_level: String,
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            systems: DEFAULT_SYSTEMS.iter().map(|s| s.to_string()).collect(),
            chat_history_limit: 20,
            log_level: "info".to_string(),
            tick_rate_ms: 120,
        }
    }
}

/// Loads the config file (creating it with defaults on first run) and applies
/// the environment override.
pub fn initialize_config() -> MedmapResult<Config> {
    let config_path = get_config_path()?;
    let mut config = load_or_create(&config_path)?;
    apply_env_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

pub fn load_or_create(config_path: &Path) -> MedmapResult<Config> {
    if config_path.exists() {
        let config_str = fs::read_to_string(config_path).map_err(|e| {
            MedmapError::config_error(format!("Failed to read config file: {}", e))
        })?;

        serde_json::from_str(&config_str)
            .map_err(|e| MedmapError::config_error(format!("Failed to parse config: {}", e)))
    } else {
        let config = Config::default();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                MedmapError::config_error(format!("Failed to create config directory: {}", e))
            })?;
        }

        let config_str = serde_json::to_string_pretty(&config).map_err(|e| {
            MedmapError::config_error(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(config_path, config_str).map_err(|e| {
            MedmapError::config_error(format!("Failed to write config file: {}", e))
        })?;

        Ok(config)
    }
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(url) = env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            config.api_base_url = url.trim().to_string();
        }
    }
}

fn get_config_path() -> MedmapResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| MedmapError::config_error("Could not determine home directory"))?;

    Ok(home_dir.join(".config").join("medmap").join("config.json"))
}

pub fn validate_config(config: &Config) -> MedmapResult<()> {
    let url = config.api_base_url.trim();
    if url.is_empty() {
        return Err(MedmapError::config_error("api_base_url is required"));
    }
    match reqwest::Url::parse(url) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
        Ok(parsed) => {
            return Err(MedmapError::config_error(format!(
                "api_base_url must use http or https, got {}",
                parsed.scheme()
            )))
        }
        Err(e) => {
            return Err(MedmapError::config_error(format!(
                "api_base_url is not a valid URL: {}",
                e
            )))
        }
    }

    if config.request_timeout_secs == 0 {
        return Err(MedmapError::config_error(
            "request_timeout_secs must be greater than 0",
        ));
    }

    if config.systems.is_empty() {
        return Err(MedmapError::config_error(
            "systems must list at least one NAMASTE system",
        ));
    }

    if config.chat_history_limit == 0 {
        return Err(MedmapError::config_error(
            "chat_history_limit must be greater than 0",
        ));
    }

    if !LOG_LEVELS.contains(&config.log_level.to_lowercase().as_str()) {
        return Err(MedmapError::config_error(format!(
            "Unknown log_level '{}'",
            config.log_level
        )));
    }

    if config.tick_rate_ms == 0 {
        return Err(MedmapError::config_error("tick_rate_ms must be greater than 0"));
    }

    Ok(())
}
