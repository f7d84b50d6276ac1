use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::config::WeatherConfig;
use crate::constants::{FORECAST_POINTS_PER_DAY, USER_AGENT};
use crate::error::WeatherError;
use crate::models::{
    forecast_points, is_success_code, Coord, CurrentWeatherResponse, ForecastPoint,
    ForecastResponse, UvIndexResponse, WeatherObservation,
};

/// OpenWeatherMap client for current conditions, forecast and UV index
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
    forecast_days: usize,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            forecast_days: config.forecast_days,
        })
    }

    /// Makes an HTTP GET request and deserializes the JSON response.
    ///
    /// Non-success statuses are reported as `Ok(Err(status))` so callers can
    /// map them to their own "not found" semantics.
    async fn make_request<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Result<T, StatusCode>, WeatherError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .query(query)
            .query(&[("appid", &self.api_key)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(Err(response.status()));
        }

        let data = response.json::<T>().await?;
        Ok(Ok(data))
    }

    /// Current conditions in imperial units
    pub async fn current_weather(&self, city: &str) -> Result<WeatherObservation, WeatherError> {
        let url = format!("{}/weather", self.base_url);
        let query = [("q", city.to_string()), ("units", "imperial".to_string())];

        let data = match self.make_request::<CurrentWeatherResponse>(&url, &query).await? {
            Ok(data) => data,
            Err(status) => {
                tracing::info!("Current weather for {} returned {}", city, status);
                return Err(WeatherError::CityNotFound(city.to_string()));
            }
        };

        if !is_success_code(&data.cod) {
            return Err(WeatherError::CityNotFound(city.to_string()));
        }

        WeatherObservation::try_from(data)
    }

    /// 3-hourly forecast points.
    ///
    /// A payload that does not convert cleanly yields no points rather than
    /// an error.
    pub async fn forecast(&self, city: &str) -> Result<Vec<ForecastPoint>, WeatherError> {
        let url = format!("{}/forecast", self.base_url);
        let count = self.forecast_days * FORECAST_POINTS_PER_DAY;
        let query = [
            ("q", city.to_string()),
            ("units", "imperial".to_string()),
            ("cnt", count.to_string()),
        ];

        let raw = match self.make_request::<Value>(&url, &query).await? {
            Ok(raw) => raw,
            Err(status) => {
                tracing::info!("Forecast for {} returned {}", city, status);
                return Err(WeatherError::CityNotFound(city.to_string()));
            }
        };

        let data = match serde_json::from_value::<ForecastResponse>(raw) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Ignoring malformed forecast for {}: {}", city, e);
                return Ok(Vec::new());
            }
        };

        if !is_success_code(&data.cod) {
            return Err(WeatherError::CityNotFound(city.to_string()));
        }

        Ok(forecast_points(data).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed forecast for {}: {}", city, e);
            Vec::new()
        }))
    }

    /// UV index at the coordinates, `0.0` on any failure
    pub async fn uv_index(&self, coord: Coord) -> f64 {
        let url = format!("{}/uvi", self.base_url);
        let query = [("lat", coord.lat.to_string()), ("lon", coord.lon.to_string())];

        match self.make_request::<UvIndexResponse>(&url, &query).await {
            Ok(Ok(data)) => data.value,
            Ok(Err(status)) => {
                tracing::warn!("UV index request returned {}", status);
                0.0
            }
            Err(e) => {
                tracing::warn!("UV index unavailable: {}", e);
                0.0
            }
        }
    }
}
