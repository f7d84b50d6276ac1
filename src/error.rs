use thiserror::Error;

/// Errors raised while talking to the weather provider.
///
/// These are the only errors that abort a dashboard request.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Weather service unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed weather payload: {0}")]
    MalformedPayload(String),
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            WeatherError::MalformedPayload(err.to_string())
        } else {
            WeatherError::Unavailable(err.to_string())
        }
    }
}

/// Reasons the external recommendation path was not used.
///
/// Every variant is recovered locally by the fallback table.
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error("external text generation is disabled")]
    Disabled,

    #[error("no text generation credential configured")]
    MissingCredential,

    #[error("text generation request failed: {0}")]
    Provider(String),

    #[error("text generation returned no content")]
    EmptyResponse,

    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("response is missing `{0}`")]
    MissingKey(&'static str),

    #[error("`{key}` has an invalid shape: {reason}")]
    InvalidShape { key: &'static str, reason: String },
}
