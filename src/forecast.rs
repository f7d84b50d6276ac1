use serde::Serialize;

use crate::climate::weather_icon;
use crate::constants::{FORECAST_DAYS, FORECAST_POINTS_PER_DAY};
use crate::metrics::{frost_risk, growing_degree_days_default, FrostRisk};
use crate::models::ForecastPoint;

/// One sampled forecast point per day with its derived metrics
#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    /// ISO date, `YYYY-MM-DD`
    pub date: String,
    /// e.g. `Wed, Jun 12`
    pub date_formatted: String,
    /// e.g. `06/12`
    pub label: String,
    pub temp_max: f64,
    pub temp_min: f64,
    pub humidity: f64,
    pub precipitation: f64,
    pub wind_speed: f64,
    pub gdd: f64,
    pub frost_risk: FrostRisk,
    pub weather: String,
    pub weather_icon: &'static str,
}

/// Parallel series aligned index-for-index with the daily summaries
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
    pub gdd: Vec<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ForecastSummary {
    pub days: Vec<DailySummary>,
    pub chart: ChartSeries,
}

impl ForecastSummary {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Sample the first point of each day (every 8th point) for up to seven days.
pub fn reduce_forecast(points: &[ForecastPoint]) -> ForecastSummary {
    let limit = points.len().min(FORECAST_DAYS * FORECAST_POINTS_PER_DAY);
    let mut summary = ForecastSummary::default();

    for point in points[..limit].iter().step_by(FORECAST_POINTS_PER_DAY) {
        let gdd = growing_degree_days_default(point.temp_max, point.temp_min);
        let label = point.timestamp.format("%m/%d").to_string();

        summary.chart.labels.push(label.clone());
        summary
            .chart
            .temperature
            .push(round_one((point.temp_max + point.temp_min) / 2.0));
        summary.chart.humidity.push(point.humidity);
        summary.chart.gdd.push(round_one(gdd));

        summary.days.push(DailySummary {
            date: point.timestamp.format("%Y-%m-%d").to_string(),
            date_formatted: point.timestamp.format("%a, %b %d").to_string(),
            label,
            temp_max: point.temp_max,
            temp_min: point.temp_min,
            humidity: point.humidity,
            precipitation: point.precipitation,
            wind_speed: point.wind_speed,
            gdd,
            frost_risk: frost_risk(point.temp_min, point.humidity),
            weather: point.description.clone(),
            weather_icon: weather_icon(&point.condition),
        });
    }

    summary
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
