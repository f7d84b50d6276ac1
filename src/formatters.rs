use crate::alerts::AlertSeverity;
use crate::climate::ClimateLabel;
use crate::dashboard::Dashboard;
use crate::models::WeatherObservation;
use crate::recommendation::PrioritizedAnalysis;

/// Formats the agricultural dashboard into a human-readable string
pub fn format_dashboard(dashboard: &Dashboard) -> String {
    let current = &dashboard.current;
    let mut output = format!(
        "Agricultural Dashboard: {}\n\n\
         Current Conditions ({}):\n  Temperature: {:.1}\u{00b0}F (feels like {:.1}\u{00b0}F)\n  \
         Range: {:.1}\u{00b0}F - {:.1}\u{00b0}F\n  Humidity: {}%\n  Wind Speed: {:.1} mph\n  \
         UV Index: {}\n\n",
        dashboard.city,
        title_case(&current.description),
        current.temperature,
        current.feels_like,
        current.temp_min,
        current.temp_max,
        current.humidity,
        current.wind_speed,
        dashboard.uv_index,
    );

    output.push_str(&format!(
        "Field Metrics:\n  Growing Degree Days: {:.1}\n  Frost Risk: {}\n  Irrigation Need: {}\n  \
         Crop Stage: {}\n  Climate: {}\n\n",
        dashboard.current_gdd,
        dashboard.frost_risk,
        dashboard.irrigation_need,
        dashboard.crop_stage,
        dashboard.climate,
    ));

    if !dashboard.alerts.is_empty() {
        output.push_str("Alerts:\n");
        for alert in &dashboard.alerts {
            let severity = match alert.severity {
                AlertSeverity::Danger => "DANGER",
                AlertSeverity::Warning => "WARNING",
            };
            output.push_str(&format!("  [{}] {}\n", severity, alert.message));
        }
        output.push('\n');
    }

    output.push_str(&format_analysis(&dashboard.analysis));

    if dashboard.forecast.is_empty() {
        output.push_str("Forecast: unavailable\n");
        return output;
    }

    output.push_str("Forecast:\n");
    for day in &dashboard.forecast.days {
        output.push_str(&format!(
            "{}:\n  Temperature: {:.1}\u{00b0}F - {:.1}\u{00b0}F\n  Conditions: {}\n  Humidity: {}%\n  \
             Precipitation: {:.2}\n  GDD: {:.1}\n  Frost Risk: {}\n\n",
            day.date_formatted,
            day.temp_min,
            day.temp_max,
            day.weather,
            day.humidity,
            day.precipitation,
            day.gdd,
            day.frost_risk,
        ));
    }
    output
}

/// Formats the four recommendation categories
pub fn format_analysis(analysis: &PrioritizedAnalysis) -> String {
    let sections = [
        ("Irrigation", &analysis.irrigation_analysis),
        ("Pest Management", &analysis.pest_analysis),
        ("Field Operations", &analysis.field_analysis),
        ("Crop Status", &analysis.crop_analysis),
    ];

    let mut output = String::from("Recommendations:\n");
    for (title, rec) in sections {
        output.push_str(&format!(
            "  {} ({} priority, {}% confidence):\n    {}\n",
            title,
            rec.priority.as_str(),
            rec.confidence,
            rec.recommendation
        ));
    }
    output.push('\n');
    output
}

pub fn format_recommendations(
    city: &str,
    climate: &ClimateLabel,
    analysis: &PrioritizedAnalysis,
) -> String {
    format!(
        "Crop recommendations for {} (climate: {})\n\n{}",
        city,
        climate,
        format_analysis(analysis)
    )
}

/// Formats the basic current weather view
pub fn format_current_weather(observation: &WeatherObservation) -> String {
    format!(
        "{}\n  Status: {}\n  Temperature: {:.1}\u{00b0}F\n  Feels Like: {:.1}\u{00b0}F\n",
        observation.city,
        title_case(&observation.description),
        observation.temperature,
        observation.feels_like
    )
}

/// "light snow" -> "Light Snow"
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coord;
    use crate::recommendation::fallback_analysis;

    #[test]
    fn title_cases_description() {
        assert_eq!(title_case("light snow"), "Light Snow");
        assert_eq!(title_case("OVERCAST clouds"), "Overcast Clouds");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn current_weather_view() {
        let observation = WeatherObservation {
            city: "Fresno".to_string(),
            temperature: 91.26,
            feels_like: 89.0,
            temp_max: 93.0,
            temp_min: 70.0,
            humidity: 20.0,
            wind_speed: 6.0,
            condition: "Clear".to_string(),
            description: "clear sky".to_string(),
            rain_1h: None,
            coord: Coord {
                lat: 36.74,
                lon: -119.79,
            },
        };
        let text = format_current_weather(&observation);
        assert!(text.starts_with("Fresno\n"));
        assert!(text.contains("Status: Clear Sky"));
        assert!(text.contains("Temperature: 91.3\u{00b0}F"));
        assert!(text.contains("Feels Like: 89.0\u{00b0}F"));
    }

    #[test]
    fn analysis_lists_all_categories() {
        let text = format_analysis(&fallback_analysis("sunny").prioritized());
        for title in ["Irrigation", "Pest Management", "Field Operations", "Crop Status"] {
            assert!(text.contains(title));
        }
        assert!(text.contains("High priority, 95% confidence"));
    }
}
