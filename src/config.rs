//! Process entry configuration
//!
//! One object describes the whole game: viewport, gravity and the stages to
//! register. The browser host reads it as JSON from the canvas element's
//! `data-config` attribute; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::consts::{GRAVITY_Y, HEIGHT, WIDTH};
use crate::sim::StageKey;

/// Configuration could not be used
#[derive(Debug)]
pub enum ConfigError {
    /// Not valid JSON or wrong field types
    Parse(serde_json::Error),
    /// Parsed, but describes a game that cannot run
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "config parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Viewport size in pixels
    pub width: f32,
    pub height: f32,
    /// Downward gravity (pixels/s²)
    pub gravity_y: f32,
    /// Registered stages; the first one starts
    pub stages: Vec<StageKey>,
    /// `log` level name for the browser console logger
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            gravity_y: GRAVITY_Y,
            stages: StageKey::all(),
            log_level: "info".to_string(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse `json` if given, falling back to defaults on any problem
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(config)) => {
                log::info!("Loaded config: {}x{}, {} stages", config.width, config.height, config.stages.len());
                config
            }
            Some(Err(e)) => {
                log::warn!("{}; using default config", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "viewport must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.stages.is_empty() {
            return Err(ConfigError::Invalid("no stages registered".to_string()));
        }
        Ok(())
    }

    /// Parsed log level, `Info` when unrecognised
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{"gravity_y": 450}"#).unwrap();
        assert_eq!(config.gravity_y, 450.0);
        assert_eq!(config.width, 800.0);
        assert_eq!(config.stages.first(), Some(&StageKey::Preload));
    }

    #[test]
    fn test_stage_list_from_json() {
        let config = GameConfig::from_json(r#"{"stages": ["Level2", "Level3", "Win"]}"#).unwrap();
        assert_eq!(config.stages, vec![StageKey::Level2, StageKey::Level3, StageKey::Win]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            GameConfig::from_json(r#"{"stages": []}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(GameConfig::from_json_or_default(Some(r#"{"width": -5}"#)), GameConfig::default());
    }

    #[test]
    fn test_log_level() {
        let config = GameConfig {
            log_level: "debug".to_string(),
            ..GameConfig::default()
        };
        assert_eq!(config.log_level(), log::Level::Debug);
        assert_eq!(GameConfig::default().log_level(), log::Level::Info);
    }
}
