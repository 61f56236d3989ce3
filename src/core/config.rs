use std::env;

use crate::errors::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "text" => Ok(LogFormat::Text),
            _ => Err(ConfigError::InvalidLogFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_format: LogFormat,
    /// Filter directive used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable source, so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => defaults.log_format,
        };

        let log_level = lookup("LOG_LEVEL")
            .filter(|level| !level.trim().is_empty())
            .unwrap_or(defaults.log_level);

        Ok(Self {
            log_format,
            log_level,
        })
    }
}
