use chrono::{DateTime, FixedOffset};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::WeatherError;

// ============================================================================
// OpenWeatherMap API Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    #[serde(default)]
    pub cod: Value,
    #[serde(default)]
    pub name: String,
    pub coord: Option<Coord>,
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub main: Option<MainReadings>,
    pub wind: Option<Wind>,
    pub rain: Option<Rain>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct MainReadings {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: f64,
}

#[derive(Debug, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub speed: f64,
}

#[derive(Debug, Deserialize)]
pub struct Rain {
    #[serde(rename = "1h")]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h")]
    pub three_hours: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub cod: Value,
    pub city: Option<ForecastCity>,
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastCity {
    /// Shift in seconds from UTC
    #[serde(default)]
    pub timezone: i32,
}

#[derive(Debug, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: Option<MainReadings>,
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub wind: Option<Wind>,
    pub rain: Option<Rain>,
}

#[derive(Debug, Deserialize)]
pub struct UvIndexResponse {
    #[serde(default)]
    pub value: f64,
}

/// The provider reports its status both as an integer (current weather) and
/// as a string (forecast).
pub fn is_success_code(cod: &Value) -> bool {
    match cod {
        Value::Number(n) => n.as_i64() == Some(200),
        Value::String(s) => s.trim() == "200",
        _ => false,
    }
}

// ============================================================================
// Domain Models
// ============================================================================

/// Snapshot of current conditions for one city
#[derive(Debug, Clone, Serialize)]
pub struct WeatherObservation {
    pub city: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_max: f64,
    pub temp_min: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub condition: String,
    pub description: String,
    pub rain_1h: Option<f64>,
    pub coord: Coord,
}

impl TryFrom<CurrentWeatherResponse> for WeatherObservation {
    type Error = WeatherError;

    fn try_from(data: CurrentWeatherResponse) -> Result<Self, Self::Error> {
        let main = data
            .main
            .ok_or_else(|| WeatherError::MalformedPayload("missing `main` readings".into()))?;
        let temperature = main
            .temp
            .ok_or_else(|| WeatherError::MalformedPayload("missing `main.temp`".into()))?;
        let coord = data
            .coord
            .ok_or_else(|| WeatherError::MalformedPayload("missing `coord`".into()))?;
        let condition = data.weather.into_iter().next().ok_or_else(|| {
            WeatherError::MalformedPayload("missing `weather` conditions".into())
        })?;

        Ok(Self {
            city: data.name,
            temperature,
            feels_like: main.feels_like.unwrap_or(temperature),
            temp_max: main.temp_max,
            temp_min: main.temp_min,
            humidity: main.humidity,
            wind_speed: data.wind.map(|w| w.speed).unwrap_or_default(),
            condition: condition.main,
            description: condition.description,
            rain_1h: data.rain.and_then(|r| r.one_hour),
            coord,
        })
    }
}

/// One 3-hourly forecast sample
#[derive(Debug, Clone, Serialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<FixedOffset>,
    pub temp_max: f64,
    pub temp_min: f64,
    pub humidity: f64,
    /// 3h accumulation, zero when the provider omits it
    pub precipitation: f64,
    pub wind_speed: f64,
    pub condition: String,
    pub description: String,
}

impl ForecastPoint {
    pub fn from_entry(entry: ForecastEntry, offset: FixedOffset) -> Result<Self, WeatherError> {
        let timestamp = DateTime::from_timestamp(entry.dt, 0)
            .ok_or_else(|| WeatherError::MalformedPayload(format!("bad timestamp {}", entry.dt)))?
            .with_timezone(&offset);
        let main = entry.main.ok_or_else(|| {
            WeatherError::MalformedPayload(format!("forecast point {} has no readings", entry.dt))
        })?;
        let condition = entry.weather.into_iter().next();

        Ok(Self {
            timestamp,
            temp_max: main.temp_max,
            temp_min: main.temp_min,
            humidity: main.humidity,
            precipitation: entry.rain.and_then(|r| r.three_hours).unwrap_or(0.0),
            wind_speed: entry.wind.map(|w| w.speed).unwrap_or_default(),
            condition: condition.as_ref().map(|c| c.main.clone()).unwrap_or_default(),
            description: condition.map(|c| c.description).unwrap_or_default(),
        })
    }
}

/// Convert a provider forecast into points, all-or-nothing
pub fn forecast_points(data: ForecastResponse) -> Result<Vec<ForecastPoint>, WeatherError> {
    let offset_secs = data.city.map(|c| c.timezone).unwrap_or_default();
    let offset = FixedOffset::east_opt(offset_secs).ok_or_else(|| {
        WeatherError::MalformedPayload(format!("bad timezone offset {offset_secs}"))
    })?;

    data.list
        .into_iter()
        .map(|entry| ForecastPoint::from_entry(entry, offset))
        .collect()
}

// ============================================================================
// MCP Tool Request Models
// ============================================================================

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetDashboardRequest {
    /// City name, e.g. "Fargo" or "Fresno,US"
    pub city: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetCurrentWeatherRequest {
    pub city: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetRecommendationsRequest {
    /// City name used as context for the recommendations
    pub city: String,
    /// Weather condition such as "Rain", "Clear" or "Snow"
    #[serde(default)]
    pub condition: String,
    /// Current temperature in °F
    pub temperature: f64,
}
