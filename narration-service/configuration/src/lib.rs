use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use validator::Validate;

use narration_domain::PacingWeights;

pub type AppConfig = NarrationConfig;

const CONFIG_PREFIX: &str = "NARRATION_SERVICE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {key}: {value}")]
    Env { key: String, value: String },

    #[error("invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NarrationConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    #[validate(nested)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub with_target: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlaybackConfig {
    #[serde(default = "default_scroll_debounce_ms")]
    #[validate(range(min = 100, max = 10_000))]
    pub scroll_debounce_ms: u64,
    #[serde(default = "default_tick_interval_ms")]
    #[validate(range(min = 5, max = 1_000))]
    pub tick_interval_ms: u64,
    #[serde(default = "default_scroll_safe_margin_px")]
    #[validate(range(min = 0.0))]
    pub scroll_safe_margin_px: f64,
    #[serde(default = "default_viewport_height_px")]
    #[validate(range(min = 1.0))]
    pub viewport_height_px: f64,
    #[serde(default = "default_line_height_px")]
    #[validate(range(min = 1.0))]
    pub line_height_px: f64,
    #[serde(default = "default_tokens_per_line")]
    #[validate(range(min = 1))]
    pub tokens_per_line: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    #[serde(default = "default_long_word_threshold")]
    pub long_word_threshold: f64,
    #[serde(default = "default_long_word_compression")]
    pub long_word_compression: f64,
    #[serde(default = "default_clause_pause")]
    pub clause_pause: f64,
    #[serde(default = "default_sentence_pause")]
    pub sentence_pause: f64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            with_target: false,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            scroll_debounce_ms: default_scroll_debounce_ms(),
            tick_interval_ms: default_tick_interval_ms(),
            scroll_safe_margin_px: default_scroll_safe_margin_px(),
            viewport_height_px: default_viewport_height_px(),
            line_height_px: default_line_height_px(),
            tokens_per_line: default_tokens_per_line(),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            long_word_threshold: default_long_word_threshold(),
            long_word_compression: default_long_word_compression(),
            clause_pause: default_clause_pause(),
            sentence_pause: default_sentence_pause(),
        }
    }
}

impl From<&PacingConfig> for PacingWeights {
    fn from(config: &PacingConfig) -> Self {
        PacingWeights {
            long_word_threshold: config.long_word_threshold,
            long_word_compression: config.long_word_compression,
            clause_pause: config.clause_pause,
            sentence_pause: config.sentence_pause,
        }
    }
}

impl NarrationConfig {
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(level) = env_var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(value) = env_var("SCROLL_DEBOUNCE_MS") {
            self.playback.scroll_debounce_ms = parse_env("SCROLL_DEBOUNCE_MS", value)?;
        }
        if let Some(value) = env_var("TICK_INTERVAL_MS") {
            self.playback.tick_interval_ms = parse_env("TICK_INTERVAL_MS", value)?;
        }
        Ok(())
    }
}

/// Defaults, then the JSON file named by `NARRATION_SERVICE_CONFIG`, then
/// `NARRATION_SERVICE_*` overrides.
pub fn load_config() -> Result<NarrationConfig, ConfigError> {
    let mut config = match env_var("CONFIG") {
        Some(path) => load_config_file(PathBuf::from(path))?,
        None => NarrationConfig::default(),
    };
    config.apply_env_overrides()?;
    config.validate()?;
    Ok(config)
}

pub fn load_config_file(path: PathBuf) -> Result<NarrationConfig, ConfigError> {
    let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let config: NarrationConfig =
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })?;
    config.validate()?;
    Ok(config)
}

/// Installs the global fmt subscriber. `RUST_LOG` wins over the configured level.
pub fn setup_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .try_init();
}

fn env_var(key: &str) -> Option<String> {
    env::var(format!("{CONFIG_PREFIX}_{key}"))
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn parse_env(key: &str, value: String) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Env {
        key: format!("{CONFIG_PREFIX}_{key}"),
        value,
    })
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_scroll_debounce_ms() -> u64 {
    1_500
}

fn default_tick_interval_ms() -> u64 {
    50
}

fn default_scroll_safe_margin_px() -> f64 {
    80.0
}

fn default_viewport_height_px() -> f64 {
    480.0
}

fn default_line_height_px() -> f64 {
    28.0
}

fn default_tokens_per_line() -> usize {
    10
}

fn default_long_word_threshold() -> f64 {
    8.0
}

fn default_long_word_compression() -> f64 {
    0.3
}

fn default_clause_pause() -> f64 {
    2.5
}

fn default_sentence_pause() -> f64 {
    3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_are_deterministic() {
        let cfg = NarrationConfig::default();
        assert_eq!(cfg.playback.scroll_debounce_ms, 1_500);
        assert_eq!(cfg.playback.tick_interval_ms, 50);
        assert_eq!(cfg.playback.scroll_safe_margin_px, 80.0);
        assert_eq!(cfg.playback.tokens_per_line, 10);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(PacingWeights::from(&cfg.pacing), PacingWeights::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_field_defaults() {
        let cfg: NarrationConfig =
            serde_json::from_str(r#"{"playback":{"tick_interval_ms":20}}"#).expect("parses");
        assert_eq!(cfg.playback.tick_interval_ms, 20);
        assert_eq!(cfg.playback.scroll_debounce_ms, 1_500);
        assert_eq!(cfg.pacing.sentence_pause, 3.0);
    }

    #[test]
    fn out_of_range_debounce_is_rejected() {
        let mut cfg = NarrationConfig::default();
        cfg.playback.scroll_debounce_ms = 20;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_tokens_per_line_is_rejected() {
        let mut cfg = NarrationConfig::default();
        cfg.playback.tokens_per_line = 0;
        assert!(cfg.validate().is_err());
    }
}
