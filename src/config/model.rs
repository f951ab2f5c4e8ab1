use crate::gemini::model::Location;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub models: ModelConfig,
    pub favorites_path: PathBuf,
    /// Link appended to shared events
    pub app_url: String,
    /// Fixed position used in place of device geolocation, if any.
    pub location: Option<Location>,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub max_retries: u32,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub events: String,
    pub places: String,
    pub chat: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            events: "gemini-3-flash-preview".to_string(),
            places: "gemini-2.5-flash".to_string(),
            chat: "gemini-3-flash-preview".to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid config '{name}': {reason}")]
    Invalid { name: &'static str, reason: String },
}
