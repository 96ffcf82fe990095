/// Configuration for tracing initialization.
pub struct TracingConfig {
    pub environment: String,
    pub level: String,
    pub json_format: bool,
}

impl TracingConfig {
    pub fn new(level: String, json_format: bool) -> Self {
        Self {
            environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            level,
            json_format,
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::new(
            "info".to_string(),
            std::env::var("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
        )
    }
}
