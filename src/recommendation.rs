use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::climate::ClimateLabel;
use crate::config::GenerationConfig;
use crate::constants::DEFAULT_CONFIDENCE;
use crate::error::GenerationFailure;
use crate::llm::{OpenAiCompatibleClient, TextGenerator, TextRequest};

const SYSTEM_PROMPT: &str = "You are an agricultural advisor. You receive a short climate label \
such as 'rain', 'winter' or 'sunny' and reply with practical precautions for farmers. \
Reply with a single JSON object with exactly these keys: irrigation_analysis, pest_analysis, \
field_analysis, crop_analysis. Each value is an object with 'recommendation' (a short text) \
and 'confidence' (an integer from 0 to 100). Output nothing except the JSON object.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "recommendation")]
    pub text: String,
    pub confidence: u8,
}

impl Recommendation {
    pub fn new(text: impl Into<String>, confidence: u8) -> Self {
        Self {
            text: text.into(),
            confidence: confidence.min(100),
        }
    }

    pub fn priority(&self) -> Priority {
        Priority::from_confidence(self.confidence)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn from_confidence(confidence: u8) -> Self {
        match confidence {
            80.. => Priority::High,
            60..=79 => Priority::Medium,
            _ => Priority::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

/// The four recommendation categories. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub irrigation_analysis: Recommendation,
    pub pest_analysis: Recommendation,
    pub field_analysis: Recommendation,
    pub crop_analysis: Recommendation,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrioritizedRecommendation {
    pub recommendation: String,
    pub confidence: u8,
    pub priority: Priority,
}

impl From<&Recommendation> for PrioritizedRecommendation {
    fn from(rec: &Recommendation) -> Self {
        Self {
            recommendation: rec.text.clone(),
            confidence: rec.confidence,
            priority: rec.priority(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PrioritizedAnalysis {
    pub irrigation_analysis: PrioritizedRecommendation,
    pub pest_analysis: PrioritizedRecommendation,
    pub field_analysis: PrioritizedRecommendation,
    pub crop_analysis: PrioritizedRecommendation,
}

impl AnalysisResult {
    /// Pair each recommendation with the priority derived from its confidence
    pub fn prioritized(&self) -> PrioritizedAnalysis {
        PrioritizedAnalysis {
            irrigation_analysis: (&self.irrigation_analysis).into(),
            pest_analysis: (&self.pest_analysis).into(),
            field_analysis: (&self.field_analysis).into(),
            crop_analysis: (&self.crop_analysis).into(),
        }
    }
}

// ============================================================================
// Fallback table
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackCategory {
    Rain,
    Winter,
    Sunny,
    Moderate,
}

impl FallbackCategory {
    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();

        if contains_any(&label, &["rain", "drizzle", "thunderstorm"]) {
            FallbackCategory::Rain
        } else if contains_any(&label, &["winter", "snow", "cold"]) {
            FallbackCategory::Winter
        } else if contains_any(&label, &["sunny", "clear"]) {
            FallbackCategory::Sunny
        } else {
            FallbackCategory::Moderate
        }
    }

    /// (text, confidence) for irrigation, pest, field and crop, in that order
    fn entries(self) -> [(&'static str, u8); 4] {
        match self {
            FallbackCategory::Rain => [
                ("Delay irrigation for 3-5 days. Check soil moisture at 4-6 inch depth before resuming watering schedule.", 92),
                ("Apply fungicide preventively. Inspect for slug damage and use baits in problem areas. Increase scouting frequency during warm, humid periods.", 88),
                ("Avoid field operations until soil dries. Wait 24-48 hours after rain stops before using heavy machinery to prevent soil compaction.", 95),
                ("Ensure proper drainage in low areas. Delay nitrogen application until drier conditions. Monitor for signs of waterlogging stress.", 90),
            ],
            FallbackCategory::Winter => [
                ("Drain and winterize irrigation systems. Protect pipes from freezing. Only water if temperatures consistently above 40°F and soil is dry.", 95),
                ("Inspect stored grain weekly. Remove crop residue to eliminate pest habitat. Apply dormant oil sprays on fruit trees if temperatures above 40°F.", 88),
                ("Suspend all field operations when ground is frozen or snow-covered. Cover sensitive equipment. Service machinery indoors during downtime.", 95),
                ("Cover sensitive crops with row covers or mulch before freeze. Protect young trees with trunk wraps. Delay pruning until late winter.", 92),
            ],
            FallbackCategory::Sunny => [
                ("Increase watering frequency. Irrigate early morning (4-8 AM) or evening to minimize evaporation. Apply 1-1.5 inches per week for most crops.", 92),
                ("Scout for spider mites and aphids twice weekly. Apply insecticidal soap early if pest threshold reached. Maintain beneficial insect habitat with cover crops.", 88),
                ("Complete spraying, harvesting and planting operations now. Schedule work before 10 AM or after 4 PM. Provide shade and water breaks for workers.", 95),
                ("Apply shade cloth for heat-sensitive crops. Increase mulch depth to 3-4 inches. Monitor for wilting and apply supplemental water as needed.", 90),
            ],
            FallbackCategory::Moderate => [
                ("Water when top 2 inches of soil is dry. Apply 0.75-1 inch per week. Install moisture sensors for precise scheduling.", 85),
                ("Scout fields twice weekly. Set up yellow sticky traps to monitor pest populations. Apply treatments only when thresholds are exceeded.", 82),
                ("Proceed with planned field operations. Check 3-day forecast before critical activities. Avoid spraying if rain expected within 24 hours.", 88),
                ("Apply balanced fertilizer based on soil test results. Monitor crop growth stage weekly. Adjust nitrogen rates according to leaf color and vigor.", 85),
            ],
        }
    }
}

fn contains_any(label: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| label.contains(term))
}

/// Pre-authored recommendations for a climate label. Never fails.
pub fn fallback_analysis(label: &str) -> AnalysisResult {
    let [irrigation, pest, field, crop] = FallbackCategory::from_label(label).entries();
    AnalysisResult {
        irrigation_analysis: Recommendation::new(irrigation.0, irrigation.1),
        pest_analysis: Recommendation::new(pest.0, pest.1),
        field_analysis: Recommendation::new(field.0, field.1),
        crop_analysis: Recommendation::new(crop.0, crop.1),
    }
}

// ============================================================================
// Response parsing
// ============================================================================

/// Remove a Markdown code fence (with or without a language tag) around the
/// JSON payload. Text without a fence is returned trimmed.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    if !text.starts_with("```") {
        return text;
    }

    text.split("```")
        .map(|part| {
            let part = part.trim();
            part.strip_prefix("json")
                .or_else(|| part.strip_prefix("JSON"))
                .map_or(part, str::trim_start)
        })
        .find(|part| part.starts_with('{'))
        .unwrap_or(text)
}

/// Parse and normalize a generated answer. Any missing category or
/// wrongly shaped value rejects the whole answer.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, GenerationFailure> {
    let value: Value = serde_json::from_str(strip_code_fences(text))?;
    let Value::Object(data) = value else {
        return Err(GenerationFailure::InvalidShape {
            key: "response",
            reason: "expected a JSON object".to_string(),
        });
    };

    Ok(AnalysisResult {
        irrigation_analysis: normalize(&data, "irrigation_analysis")?,
        pest_analysis: normalize(&data, "pest_analysis")?,
        field_analysis: normalize(&data, "field_analysis")?,
        crop_analysis: normalize(&data, "crop_analysis")?,
    })
}

fn normalize(
    data: &Map<String, Value>,
    key: &'static str,
) -> Result<Recommendation, GenerationFailure> {
    let entry = data
        .get(key)
        .ok_or(GenerationFailure::MissingKey(key))?
        .as_object()
        .ok_or_else(|| GenerationFailure::InvalidShape {
            key,
            reason: "expected an object".to_string(),
        })?;

    let text = match entry.get("recommendation") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.trim().to_string(),
        Some(other) => {
            return Err(GenerationFailure::InvalidShape {
                key,
                reason: format!("recommendation must be a string, got {other}"),
            })
        }
    };

    Ok(Recommendation::new(
        text,
        coerce_confidence(entry.get("confidence")),
    ))
}

/// Integer confidence clamped into 0..=100. Fractions are truncated; anything
/// missing or unparsable becomes the neutral default.
pub fn coerce_confidence(value: Option<&Value>) -> u8 {
    let raw = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        _ => None,
    };

    raw.map_or(DEFAULT_CONFIDENCE, |c| c.clamp(0, 100) as u8)
}

// ============================================================================
// Generator
// ============================================================================

#[derive(Clone)]
enum Backend {
    Disabled,
    MissingCredential,
    External(Arc<dyn TextGenerator>),
}

#[derive(Clone)]
pub struct RecommendationGenerator {
    backend: Backend,
    max_tokens: u32,
    temperature: f32,
}

impl RecommendationGenerator {
    /// Build a generator from configuration. External generation is used
    /// only when it is enabled and a credential is present.
    pub fn new(config: &GenerationConfig) -> Self {
        let backend = if !config.enabled {
            Backend::Disabled
        } else {
            match config.credential() {
                None => Backend::MissingCredential,
                Some(api_key) => match OpenAiCompatibleClient::new(config, api_key) {
                    Ok(client) => Backend::External(Arc::new(client)),
                    Err(e) => {
                        tracing::warn!("Text generation client unavailable: {}", e);
                        Backend::Disabled
                    }
                },
            }
        };

        Self {
            backend,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Generator backed by a caller-supplied text generation client
    pub fn with_client(client: Arc<dyn TextGenerator>, config: &GenerationConfig) -> Self {
        Self {
            backend: Backend::External(client),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Generator that always answers from the fallback table
    pub fn disabled() -> Self {
        Self::new(&GenerationConfig::disabled())
    }

    pub fn is_external(&self) -> bool {
        matches!(self.backend, Backend::External(_))
    }

    /// Four recommendations for the label. Falls back to the fixed table on
    /// any generation failure.
    pub async fn generate(&self, label: &ClimateLabel, city: &str) -> AnalysisResult {
        match self.try_generate(label, city).await {
            Ok(analysis) => analysis,
            Err(GenerationFailure::Disabled) => fallback_analysis(label.as_str()),
            Err(reason) => {
                tracing::warn!(
                    climate = %label,
                    city,
                    "Using fallback recommendations: {}",
                    reason
                );
                fallback_analysis(label.as_str())
            }
        }
    }

    /// The external path alone, with the reason it failed
    pub async fn try_generate(
        &self,
        label: &ClimateLabel,
        city: &str,
    ) -> Result<AnalysisResult, GenerationFailure> {
        let client = match &self.backend {
            Backend::Disabled => return Err(GenerationFailure::Disabled),
            Backend::MissingCredential => return Err(GenerationFailure::MissingCredential),
            Backend::External(client) => client,
        };

        let request = TextRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: user_prompt(label, city),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let text = client
            .complete(&request)
            .await
            .map_err(|e| GenerationFailure::Provider(format!("{e:#}")))?;
        if text.trim().is_empty() {
            return Err(GenerationFailure::EmptyResponse);
        }

        parse_analysis(&text)
    }
}

fn user_prompt(label: &ClimateLabel, city: &str) -> String {
    format!(
        "City: {city}\nClimate label: {label}\n\n\
         Focus on practical farm actions such as watering, covering crops, \
         delaying field operations and pest scouting."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn priority_thresholds() {
        assert_eq!(Priority::from_confidence(100), Priority::High);
        assert_eq!(Priority::from_confidence(80), Priority::High);
        assert_eq!(Priority::from_confidence(79), Priority::Medium);
        assert_eq!(Priority::from_confidence(60), Priority::Medium);
        assert_eq!(Priority::from_confidence(59), Priority::Low);
        assert_eq!(Priority::from_confidence(0), Priority::Low);
    }

    #[test]
    fn fallback_categories() {
        assert_eq!(FallbackCategory::from_label("rain"), FallbackCategory::Rain);
        assert_eq!(FallbackCategory::from_label("drizzle"), FallbackCategory::Rain);
        assert_eq!(FallbackCategory::from_label("winter"), FallbackCategory::Winter);
        assert_eq!(FallbackCategory::from_label("cold snap"), FallbackCategory::Winter);
        assert_eq!(FallbackCategory::from_label("sunny"), FallbackCategory::Sunny);
        assert_eq!(FallbackCategory::from_label("clouds"), FallbackCategory::Moderate);
        assert_eq!(FallbackCategory::from_label("moderate"), FallbackCategory::Moderate);
    }

    #[test]
    fn winter_fallback_confidences() {
        let analysis = fallback_analysis("winter");
        assert_eq!(analysis.irrigation_analysis.confidence, 95);
        assert_eq!(analysis.pest_analysis.confidence, 88);
        assert_eq!(analysis.field_analysis.confidence, 95);
        assert_eq!(analysis.crop_analysis.confidence, 92);
    }

    #[test]
    fn moderate_fallback_confidences() {
        let analysis = fallback_analysis("haze");
        assert_eq!(analysis.irrigation_analysis.confidence, 85);
        assert_eq!(analysis.pest_analysis.confidence, 82);
        assert_eq!(analysis.field_analysis.confidence, 88);
        assert_eq!(analysis.crop_analysis.confidence, 85);
    }

    #[test]
    fn fallback_text_per_category() {
        assert_eq!(
            fallback_analysis("rain").pest_analysis.text,
            "Apply fungicide preventively. Inspect for slug damage and use baits in problem areas. Increase scouting frequency during warm, humid periods."
        );
        assert_eq!(
            fallback_analysis("winter").irrigation_analysis.text,
            "Drain and winterize irrigation systems. Protect pipes from freezing. Only water if temperatures consistently above 40°F and soil is dry."
        );
        assert_eq!(
            fallback_analysis("clear").field_analysis.text,
            "Complete spraying, harvesting and planting operations now. Schedule work before 10 AM or after 4 PM. Provide shade and water breaks for workers."
        );
        assert_eq!(
            fallback_analysis("clouds").crop_analysis.text,
            "Apply balanced fertilizer based on soil test results. Monitor crop growth stage weekly. Adjust nitrogen rates according to leaf color and vigor."
        );
    }

    #[test]
    fn strips_fences_with_language_tag() {
        let text = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(text), "{\"a\": 1}");
        let bare = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(bare), "{\"a\": 1}");
        assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    fn full_response() -> Value {
        json!({
            "irrigation_analysis": {"recommendation": "  Water lightly. ", "confidence": 70},
            "pest_analysis": {"recommendation": "Scout weekly.", "confidence": 85},
            "field_analysis": {"recommendation": "Proceed.", "confidence": 40},
            "crop_analysis": {"recommendation": "Fertilize.", "confidence": 90}
        })
    }

    #[test]
    fn parses_and_trims_valid_response() {
        let analysis = parse_analysis(&full_response().to_string()).unwrap();
        assert_eq!(analysis.irrigation_analysis.text, "Water lightly.");
        assert_eq!(analysis.irrigation_analysis.priority(), Priority::Medium);
        assert_eq!(analysis.field_analysis.priority(), Priority::Low);
    }

    #[test]
    fn missing_category_rejects_response() {
        let mut data = full_response();
        data.as_object_mut().unwrap().remove("crop_analysis");
        assert!(matches!(
            parse_analysis(&data.to_string()),
            Err(GenerationFailure::MissingKey("crop_analysis"))
        ));
    }

    #[test]
    fn non_object_category_rejects_response() {
        let mut data = full_response();
        data["pest_analysis"] = json!("scout weekly");
        assert!(matches!(
            parse_analysis(&data.to_string()),
            Err(GenerationFailure::InvalidShape { key: "pest_analysis", .. })
        ));
    }

    #[test]
    fn missing_sub_keys_default() {
        let mut data = full_response();
        data["pest_analysis"] = json!({});
        data["crop_analysis"] = json!({"recommendation": "Mulch.", "confidence": null});
        let analysis = parse_analysis(&data.to_string()).unwrap();
        assert_eq!(analysis.pest_analysis.text, "");
        assert_eq!(analysis.pest_analysis.confidence, 50);
        assert_eq!(analysis.crop_analysis.confidence, 50);
    }

    #[test]
    fn non_json_is_rejected() {
        assert!(matches!(
            parse_analysis("Here are my thoughts on farming"),
            Err(GenerationFailure::InvalidJson(_))
        ));
        assert!(parse_analysis("[1, 2, 3]").is_err());
    }

    #[test]
    fn confidence_coercion() {
        assert_eq!(coerce_confidence(Some(&json!(72))), 72);
        assert_eq!(coerce_confidence(Some(&json!(72.9))), 72);
        assert_eq!(coerce_confidence(Some(&json!("64"))), 64);
        assert_eq!(coerce_confidence(Some(&json!("high"))), 50);
        assert_eq!(coerce_confidence(Some(&json!(true))), 50);
        assert_eq!(coerce_confidence(Some(&Value::Null)), 50);
        assert_eq!(coerce_confidence(None), 50);
        assert_eq!(coerce_confidence(Some(&json!(250))), 100);
        assert_eq!(coerce_confidence(Some(&json!(-5))), 0);
    }

    #[test]
    fn prioritized_view_keeps_text() {
        let view = fallback_analysis("rain").prioritized();
        assert_eq!(view.field_analysis.priority, Priority::High);
        assert_eq!(view.field_analysis.confidence, 95);
        assert!(!view.field_analysis.recommendation.is_empty());
    }

    #[test]
    fn generator_without_credential_is_not_external() {
        let config = GenerationConfig {
            enabled: true,
            api_key: None,
            ..GenerationConfig::default()
        };
        assert!(!RecommendationGenerator::new(&config).is_external());
        assert!(!RecommendationGenerator::disabled().is_external());
    }
}
