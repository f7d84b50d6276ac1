/// User agent string for HTTP requests
pub const USER_AGENT: &str = "agri-weather-server/0.1.0";

/// OpenWeatherMap API base URL
pub const OPENWEATHER_API_BASE: &str = "https://api.openweathermap.org/data/2.5";

/// OpenAI-compatible text generation endpoint (DeepSeek)
pub const TEXT_GENERATION_API_BASE: &str = "https://api.deepseek.com";

/// Default chat model for recommendations
pub const TEXT_GENERATION_MODEL: &str = "deepseek-chat";

/// Output bound for a single recommendation call
pub const TEXT_GENERATION_MAX_TOKENS: u32 = 400;

/// Low sampling temperature keeps recommendations close to deterministic
pub const TEXT_GENERATION_TEMPERATURE: f32 = 0.2;

/// Forecast horizon in days
pub const FORECAST_DAYS: usize = 7;

/// The provider forecast has a 3-hour cadence
pub const FORECAST_POINTS_PER_DAY: usize = 8;

/// GDD base temperature in Fahrenheit
pub const GDD_BASE_TEMP_F: f64 = 50.0;

/// Confidence used when the generated value is missing or unusable
pub const DEFAULT_CONFIDENCE: u8 = 50;

/// UV index above which a field work alert is raised
pub const HIGH_UV_THRESHOLD: f64 = 7.0;

/// Crop stage reported on the dashboard
pub const DEFAULT_CROP_STAGE: &str = "Vegetative";

/// Per-request timeout for the weather provider
pub const WEATHER_TIMEOUT_SECS: u64 = 15;

/// Per-request timeout for text generation
pub const TEXT_GENERATION_TIMEOUT_SECS: u64 = 30;
