use serde::Serialize;

use crate::alerts::{compose_alerts, Alert};
use crate::client::WeatherClient;
use crate::climate::{classify, weather_icon, ClimateLabel};
use crate::constants::DEFAULT_CROP_STAGE;
use crate::error::WeatherError;
use crate::forecast::{reduce_forecast, ForecastSummary};
use crate::metrics::{
    frost_risk, growing_degree_days_default, irrigation_need, FrostRisk, IrrigationNeed,
};
use crate::models::{ForecastPoint, WeatherObservation};
use crate::recommendation::{AnalysisResult, PrioritizedAnalysis, RecommendationGenerator};

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub city: String,
    pub current: WeatherObservation,
    pub climate: ClimateLabel,
    pub weather_icon: &'static str,
    pub uv_index: f64,
    pub current_gdd: f64,
    pub frost_risk: FrostRisk,
    pub irrigation_need: IrrigationNeed,
    pub crop_stage: &'static str,
    pub forecast: ForecastSummary,
    pub alerts: Vec<Alert>,
    pub analysis: PrioritizedAnalysis,
}

/// Metrics for the current observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentMetrics {
    pub gdd: f64,
    pub frost_risk: FrostRisk,
    pub irrigation_need: IrrigationNeed,
}

impl CurrentMetrics {
    pub fn derive(observation: &WeatherObservation) -> Self {
        Self {
            gdd: growing_degree_days_default(observation.temp_max, observation.temp_min),
            frost_risk: frost_risk(observation.temp_min, observation.humidity),
            irrigation_need: irrigation_need(
                observation.humidity,
                observation.rain_1h.unwrap_or(0.0),
                observation.temperature,
            ),
        }
    }
}

/// Assemble a dashboard from already fetched data
pub fn compose_dashboard(
    current: WeatherObservation,
    points: &[ForecastPoint],
    uv_index: f64,
    analysis: &AnalysisResult,
) -> Dashboard {
    let metrics = CurrentMetrics::derive(&current);

    Dashboard {
        city: current.city.clone(),
        climate: classify(&current.condition, current.temperature),
        weather_icon: weather_icon(&current.condition),
        uv_index,
        current_gdd: metrics.gdd,
        frost_risk: metrics.frost_risk,
        irrigation_need: metrics.irrigation_need,
        crop_stage: DEFAULT_CROP_STAGE,
        forecast: reduce_forecast(points),
        alerts: compose_alerts(metrics.frost_risk, uv_index),
        analysis: analysis.prioritized(),
        current,
    }
}

/// Runs the analysis pipeline for one city, one request at a time
#[derive(Clone)]
pub struct Advisor {
    weather: WeatherClient,
    recommendations: RecommendationGenerator,
}

impl Advisor {
    pub fn new(weather: WeatherClient, recommendations: RecommendationGenerator) -> Self {
        Self {
            weather,
            recommendations,
        }
    }

    pub async fn current_weather(&self, city: &str) -> Result<WeatherObservation, WeatherError> {
        self.weather.current_weather(city).await
    }

    pub async fn recommend(&self, label: &ClimateLabel, city: &str) -> AnalysisResult {
        self.recommendations.generate(label, city).await
    }

    /// Fetch current weather, forecast and UV index, then derive everything.
    /// Only weather provider failures abort.
    pub async fn dashboard(&self, city: &str) -> Result<Dashboard, WeatherError> {
        let current = self.weather.current_weather(city).await?;
        let points = self.weather.forecast(city).await?;
        let uv_index = self.weather.uv_index(current.coord).await;

        let label = classify(&current.condition, current.temperature);
        let analysis = self.recommendations.generate(&label, city).await;

        tracing::info!(
            city = %current.city,
            climate = %label,
            forecast_points = points.len(),
            "Dashboard composed"
        );

        Ok(compose_dashboard(current, &points, uv_index, &analysis))
    }
}
