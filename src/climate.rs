use std::fmt;

use serde::{Serialize, Serializer};

/// Temperature at or below which conditions count as winter (°F)
const WINTER_TEMP_F: f64 = 36.0;

/// Summary of current weather used to pick a recommendation bucket.
///
/// Weather magnitudes are deliberately dropped here; only the label and city
/// reach the recommendation generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClimateLabel {
    Rain,
    Winter,
    Sunny,
    Moderate,
    /// Lowercased provider condition that matched no other rule
    Other(String),
}

impl ClimateLabel {
    pub fn as_str(&self) -> &str {
        match self {
            ClimateLabel::Rain => "rain",
            ClimateLabel::Winter => "winter",
            ClimateLabel::Sunny => "sunny",
            ClimateLabel::Moderate => "moderate",
            ClimateLabel::Other(raw) => raw,
        }
    }
}

impl fmt::Display for ClimateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ClimateLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Classify a provider condition ("Rain", "Clear", ...) and the current
/// temperature. Rules are evaluated in order and the first match wins.
pub fn classify(condition: &str, temperature: f64) -> ClimateLabel {
    let condition = condition.trim().to_lowercase();

    if ["rain", "drizzle", "thunderstorm"]
        .iter()
        .any(|term| condition.contains(term))
    {
        ClimateLabel::Rain
    } else if condition.contains("snow") || temperature <= WINTER_TEMP_F {
        ClimateLabel::Winter
    } else if condition.contains("clear") || condition.contains("sun") {
        ClimateLabel::Sunny
    } else if condition.is_empty() {
        ClimateLabel::Moderate
    } else {
        ClimateLabel::Other(condition)
    }
}

/// Icon key for a provider condition
pub fn weather_icon(condition: &str) -> &'static str {
    match condition.trim().to_lowercase().as_str() {
        "clear" => "sun",
        "clouds" => "cloud",
        "rain" => "cloud-rain",
        "snow" => "snowflake",
        "thunderstorm" => "bolt",
        _ => "cloud-sun",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rain_family() {
        assert_eq!(classify("light rain", 60.0), ClimateLabel::Rain);
        assert_eq!(classify("Drizzle", 30.0), ClimateLabel::Rain);
        assert_eq!(classify("Thunderstorm", 85.0), ClimateLabel::Rain);
    }

    #[test]
    fn snow_is_winter_at_any_temperature() {
        assert_eq!(classify("snow", 90.0), ClimateLabel::Winter);
        assert_eq!(classify("Snow", 10.0), ClimateLabel::Winter);
    }

    #[test]
    fn cold_clear_day_is_winter() {
        assert_eq!(classify("Clear", 36.0), ClimateLabel::Winter);
    }

    #[test]
    fn clear_warm_day_is_sunny() {
        assert_eq!(classify("clear", 70.0), ClimateLabel::Sunny);
        assert_eq!(classify("Sunny", 70.0), ClimateLabel::Sunny);
    }

    #[test]
    fn empty_condition_is_moderate() {
        assert_eq!(classify("", 50.0), ClimateLabel::Moderate);
        assert_eq!(classify("", 50.0).as_str(), "moderate");
        assert_eq!(classify("   ", 50.0), ClimateLabel::Moderate);
    }

    #[test]
    fn unmatched_condition_passes_through_lowercased() {
        let label = classify("Clouds", 65.0);
        assert_eq!(label, ClimateLabel::Other("clouds".to_string()));
        assert_eq!(label.to_string(), "clouds");
    }

    #[test]
    fn icon_lookup() {
        assert_eq!(weather_icon("Clear"), "sun");
        assert_eq!(weather_icon("Thunderstorm"), "bolt");
        assert_eq!(weather_icon("Mist"), "cloud-sun");
    }
}
