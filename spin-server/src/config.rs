use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub notification_target_url: String,
    pub notification_interval_minutes: u64,
    pub notification_request_timeout_seconds: u64,
    pub dispatch_api_key: Option<String>,
    pub history_limit_default: u64,
    pub history_limit_max: u64,
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("Invalid PORT"),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://spinon.db?mode=rwc".to_string()),
            notification_target_url: env::var("NOTIFICATION_TARGET_URL")
                .unwrap_or_else(|_| "https://www.spinon.xyz".to_string()),
            notification_interval_minutes: env::var("NOTIFICATION_INTERVAL_MINUTES")
                .unwrap_or_else(|_| "1440".to_string())
                .parse()
                .expect("Invalid NOTIFICATION_INTERVAL_MINUTES"),
            notification_request_timeout_seconds: env::var("NOTIFICATION_REQUEST_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("Invalid NOTIFICATION_REQUEST_TIMEOUT_SECONDS"),
            dispatch_api_key: env::var("DISPATCH_API_KEY").ok().filter(|key| !key.is_empty()),
            history_limit_default: env::var("HISTORY_LIMIT_DEFAULT")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .expect("Invalid HISTORY_LIMIT_DEFAULT"),
            history_limit_max: env::var("HISTORY_LIMIT_MAX")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .expect("Invalid HISTORY_LIMIT_MAX"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
