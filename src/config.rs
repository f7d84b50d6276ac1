use std::env;

use anyhow::{Context, Result};

use crate::constants::{
    FORECAST_DAYS, OPENWEATHER_API_BASE, TEXT_GENERATION_API_BASE, TEXT_GENERATION_MAX_TOKENS,
    TEXT_GENERATION_MODEL, TEXT_GENERATION_TEMPERATURE, TEXT_GENERATION_TIMEOUT_SECS,
    WEATHER_TIMEOUT_SECS,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub weather: WeatherConfig,
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub forecast_days: usize,
}

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Whether recommendations may be requested from the external service
    pub enabled: bool,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl WeatherConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: OPENWEATHER_API_BASE.to_string(),
            timeout_secs: WEATHER_TIMEOUT_SECS,
            forecast_days: FORECAST_DAYS,
        }
    }
}

impl GenerationConfig {
    /// Configuration that never calls out and always uses the fallback table
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// The API key, if external generation is switched on and a key is present
    pub fn credential(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            base_url: TEXT_GENERATION_API_BASE.to_string(),
            model: TEXT_GENERATION_MODEL.to_string(),
            max_tokens: TEXT_GENERATION_MAX_TOKENS,
            temperature: TEXT_GENERATION_TEMPERATURE,
            timeout_secs: TEXT_GENERATION_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("API_KEY")
            .or_else(|_| env::var("OPENWEATHER_API_KEY"))
            .context("API_KEY (OpenWeatherMap) must be set")?;

        let mut weather = WeatherConfig::new(api_key);
        if let Ok(base_url) = env::var("OPENWEATHER_BASE_URL") {
            weather.base_url = base_url;
        }
        if let Some(secs) = parse_env::<u64>("WEATHER_TIMEOUT_SECS")? {
            weather.timeout_secs = secs;
        }

        let mut generation = GenerationConfig {
            enabled: env::var("USE_EXTERNAL_AI")
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            api_key: env::var("OPENAI_API_KEY")
                .or_else(|_| env::var("OPENAI_KEY"))
                .ok(),
            ..GenerationConfig::default()
        };
        if let Ok(base_url) = env::var("AI_BASE_URL") {
            generation.base_url = base_url;
        }
        if let Ok(model) = env::var("AI_MODEL") {
            generation.model = model;
        }
        if let Some(secs) = parse_env::<u64>("AI_TIMEOUT_SECS")? {
            generation.timeout_secs = secs;
        }

        Ok(Self {
            weather,
            generation,
        })
    }
}

fn parse_env<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} has an invalid value: {raw}")),
        Err(_) => Ok(None),
    }
}
