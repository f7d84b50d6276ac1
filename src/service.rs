use anyhow::Result;
use rmcp::{
    handler::server::{wrapper::Parameters, ServerHandler, tool::ToolRouter},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    ErrorData as McpError,
};
use serde::Serialize;

use crate::client::WeatherClient;
use crate::climate::classify;
use crate::config::Config;
use crate::dashboard::Advisor;
use crate::error::WeatherError;
use crate::formatters::{format_current_weather, format_dashboard, format_recommendations};
use crate::models::{GetCurrentWeatherRequest, GetDashboardRequest, GetRecommendationsRequest};
use crate::recommendation::RecommendationGenerator;

/// Agricultural weather service that handles MCP requests
#[derive(Clone)]
pub struct AgriWeather {
    advisor: Advisor,
    tool_router: ToolRouter<Self>,
}

impl AgriWeather {
    /// Creates a new service instance from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let weather = WeatherClient::new(&config.weather)?;
        let recommendations = RecommendationGenerator::new(&config.generation);

        if recommendations.is_external() {
            tracing::info!("External recommendations enabled ({})", config.generation.model);
        } else {
            tracing::info!("External recommendations disabled, using built-in guidance");
        }

        Ok(Self::with_advisor(Advisor::new(weather, recommendations)))
    }

    pub fn with_advisor(advisor: Advisor) -> Self {
        Self {
            advisor,
            tool_router: Self::tool_router(),
        }
    }
}

fn weather_error(err: WeatherError) -> McpError {
    match err {
        WeatherError::CityNotFound(city) => {
            McpError::invalid_params(format!("City not found: {}", city), None)
        }
        other => McpError::internal_error(format!("Failed to fetch weather: {}", other), None),
    }
}

fn json_content<T: Serialize>(value: &T) -> Result<Content, McpError> {
    serde_json::to_string_pretty(value)
        .map(Content::text)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize result: {}", e), None))
}

#[tool_handler]
impl ServerHandler for AgriWeather {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "agri-weather".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "Agricultural weather guidance powered by OpenWeatherMap. Provides growing degree \
                days, frost risk, irrigation need, a 7-day field forecast and recommendations \
                for irrigation, pests, field operations and crops."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl AgriWeather {
    /// Full agricultural dashboard for a city
    #[tool(description = "Get an agricultural weather dashboard for a city (e.g., 'Fargo' or 'Fresno,US'). Includes growing degree days, frost risk, irrigation need, UV alerts, a daily forecast with chart series, and farm recommendations.")]
    async fn get_agricultural_dashboard(
        &self,
        Parameters(request): Parameters<GetDashboardRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Getting agricultural dashboard for: {}", request.city);

        let dashboard = self
            .advisor
            .dashboard(&request.city)
            .await
            .map_err(weather_error)?;

        Ok(CallToolResult::success(vec![
            Content::text(format_dashboard(&dashboard)),
            json_content(&dashboard)?,
        ]))
    }

    /// Recommendations for a given weather condition
    #[tool(description = "Get farm recommendations for a weather condition. Provide the city, the condition (e.g., 'Rain', 'Clear', 'Snow') and the current temperature in Fahrenheit.")]
    async fn get_crop_recommendations(
        &self,
        Parameters(request): Parameters<GetRecommendationsRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(
            "Getting recommendations for {}: {} at {}\u{00b0}F",
            request.city,
            request.condition,
            request.temperature
        );

        let label = classify(&request.condition, request.temperature);
        let analysis = self
            .advisor
            .recommend(&label, &request.city)
            .await
            .prioritized();

        Ok(CallToolResult::success(vec![
            Content::text(format_recommendations(&request.city, &label, &analysis)),
            json_content(&analysis)?,
        ]))
    }

    /// Basic current weather for a city
    #[tool(description = "Get current weather conditions for a city: status, temperature and feels-like temperature in Fahrenheit.")]
    async fn get_current_weather(
        &self,
        Parameters(request): Parameters<GetCurrentWeatherRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Getting current weather for: {}", request.city);

        let observation = self
            .advisor
            .current_weather(&request.city)
            .await
            .map_err(weather_error)?;

        Ok(CallToolResult::success(vec![Content::text(
            format_current_weather(&observation),
        )]))
    }
}
