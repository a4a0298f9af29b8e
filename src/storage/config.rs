use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::calendar::CalendarOwner;

pub const API_URL_ENV: &str = "PLANIFY_API_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub api: ApiConfig,
    pub ui: UiConfig,
    pub week: WeekConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub token_cache: PathBuf,
    pub calendar_owner: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiConfig {
    pub theme: String,
    pub default_view: String,
}

/// Visible hour range and scale of the week grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeekConfig {
    pub day_start_hour: u32,
    pub day_end_hour: u32,
    pub rows_per_hour: u32,
    pub min_block_minutes: u32,
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_or_create() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)?
        } else {
            let config = Self::default();
            config.save()?;
            config
        };

        if let Ok(url) = std::env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            tracing::info!("Using API url from {}", API_URL_ENV);
            config.api.base_url = url;
        }

        Ok(config)
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("planify")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let week = &self.week;
        if week.day_end_hour > 24 {
            return Err(ConfigError::Invalid(format!(
                "week.day_end_hour must be at most 24, got {}",
                week.day_end_hour
            )));
        }
        if week.day_start_hour >= week.day_end_hour {
            return Err(ConfigError::Invalid(format!(
                "week.day_start_hour ({}) must be before week.day_end_hour ({})",
                week.day_start_hour, week.day_end_hour
            )));
        }
        if week.rows_per_hour == 0 {
            return Err(ConfigError::Invalid("week.rows_per_hour must be positive".to_string()));
        }
        if CalendarOwner::parse(&self.api.calendar_owner).is_none() {
            return Err(ConfigError::Invalid(format!(
                "api.calendar_owner must be \"me\" or a user id, got {:?}",
                self.api.calendar_owner
            )));
        }
        Ok(())
    }

    pub fn calendar_owner(&self) -> CalendarOwner {
        CalendarOwner::parse(&self.api.calendar_owner).unwrap_or(CalendarOwner::Me)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:8000".to_string(),
                token_cache: Self::config_dir().join("token.json"),
                calendar_owner: "me".to_string(),
                request_timeout_secs: 15,
            },
            ui: UiConfig {
                theme: "default".to_string(),
                default_view: "Month".to_string(),
            },
            week: WeekConfig::default(),
        }
    }
}

impl Default for WeekConfig {
    fn default() -> Self {
        Self {
            day_start_hour: 7,
            day_end_hour: 23,
            rows_per_hour: 2,
            min_block_minutes: 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_TOML: &str = r#"
        [api]
        base_url = "https://planify.example.com"
        token_cache = "/tmp/planify-token.json"
        calendar_owner = "me"
        request_timeout_secs = 30

        [ui]
        theme = "nord"
        default_view = "Week"

        [week]
        day_start_hour = 6
        day_end_hour = 22
        rows_per_hour = 4
        min_block_minutes = 10
    "#;

    #[test]
    fn default_week_range_is_seven_to_twenty_three() {
        let config = Config::default();
        assert_eq!(config.week.day_start_hour, 7);
        assert_eq!(config.week.day_end_hour, 23);
        assert_eq!(config.week.min_block_minutes, 15);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn parse_valid_toml_config() {
        let config = Config::from_toml(VALID_TOML).unwrap();

        assert_eq!(config.api.base_url, "https://planify.example.com");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.ui.default_view, "Week");
        assert_eq!(config.week.rows_per_hour, 4);
        assert_eq!(config.calendar_owner(), CalendarOwner::Me);
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let result = Config::from_toml("this is not valid toml");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn inverted_hour_range_is_rejected() {
        let content = VALID_TOML.replace("day_start_hour = 6", "day_start_hour = 22");
        let result = Config::from_toml(&content);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn unknown_owner_is_rejected() {
        let content = VALID_TOML.replace("calendar_owner = \"me\"", "calendar_owner = \"bob\"");
        let result = Config::from_toml(&content);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn config_survives_toml_round_trip() {
        let config = Config::default();
        let content = toml::to_string_pretty(&config).unwrap();
        assert_eq!(Config::from_toml(&content).unwrap(), config);
    }
}
