use crate::config::model::{Config, ConfigError, GeminiConfig, ModelConfig};
use crate::gemini::model::Location;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_FAVORITES_PATH: &str = "escale_favorites.json";
const DEFAULT_APP_URL: &str = "http://localhost:3000";

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(|name| env::var(name).ok())
}

/// Builds the config from any variable lookup, so it can be driven without
/// touching the process environment.
pub fn load_config_from<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = lookup("GEMINI_API_KEY")
        .or_else(|| lookup("API_KEY"))
        .filter(|key| !key.trim().is_empty())
        .ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;

    let defaults = ModelConfig::default();

    Ok(Config {
        gemini: GeminiConfig {
            api_key,
            base_url: lookup("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            max_retries: load_parsed_config(&lookup, "ESCALE_MAX_RETRIES")?.unwrap_or(0),
        },
        models: ModelConfig {
            events: lookup("ESCALE_EVENTS_MODEL").unwrap_or(defaults.events),
            places: lookup("ESCALE_PLACES_MODEL").unwrap_or(defaults.places),
            chat: lookup("ESCALE_CHAT_MODEL").unwrap_or(defaults.chat),
        },
        favorites_path: lookup("ESCALE_FAVORITES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FAVORITES_PATH)),
        app_url: lookup("ESCALE_APP_URL").unwrap_or_else(|| DEFAULT_APP_URL.to_string()),
        location: load_location_config(&lookup)?,
    })
}

fn load_location_config<F>(lookup: &F) -> Result<Option<Location>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let lat = load_parsed_config::<f64, F>(lookup, "ESCALE_LATITUDE")?;
    let lng = load_parsed_config::<f64, F>(lookup, "ESCALE_LONGITUDE")?;

    match (lat, lng) {
        (Some(lat), Some(lng)) => Ok(Some(Location { lat, lng })),
        (None, None) => Ok(None),
        _ => Err(ConfigError::Invalid {
            name: "ESCALE_LATITUDE",
            reason: "latitude and longitude must be set together".to_string(),
        }),
    }
}

fn load_parsed_config<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|err: T::Err| ConfigError::Invalid {
                name,
                reason: err.to_string(),
            }),
        None => Ok(None),
    }
}
