use crate::constant::{
    DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT_SECS, DEFAULT_COPIED_FEEDBACK_MS,
    DEFAULT_MIN_VISIBLE_CHARS, DEFAULT_PATIENTS_LIMIT, DEFAULT_TRANSACTIONS_LIMIT,
};
use crate::utils::errors::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub app_name: String,
    pub environment: Environment,
    pub api_base_url: String,
    pub api_timeout_secs: u64,
    #[serde(skip_serializing)]
    pub wallet_private_key: Option<String>,
    pub patients_page_size: u32,
    pub transactions_limit: u32,
    pub identifier_min_chars: usize,
    pub copied_feedback_ms: u64,
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Testing,
    Production,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "AI Health Chains".to_string(),
            environment: Environment::Development,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            wallet_private_key: None,
            patients_page_size: DEFAULT_PATIENTS_LIMIT,
            transactions_limit: DEFAULT_TRANSACTIONS_LIMIT,
            identifier_min_chars: DEFAULT_MIN_VISIBLE_CHARS,
            copied_feedback_ms: DEFAULT_COPIED_FEEDBACK_MS,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    pub fn copied_feedback(&self) -> Duration {
        Duration::from_millis(self.copied_feedback_ms)
    }

    /// Build settings from an explicit variable map. Missing keys fall back to defaults.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let defaults = Settings::default();
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let environment = match get("ENVIRONMENT").unwrap_or("development").to_lowercase().as_str() {
            "production" => Environment::Production,
            "testing" => Environment::Testing,
            _ => Environment::Development,
        };

        Ok(Settings {
            app_name: get("APP_NAME").map(str::to_string).unwrap_or(defaults.app_name),
            environment,
            api_base_url: get("API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            api_timeout_secs: parse_or("API_TIMEOUT_SECS", get("API_TIMEOUT_SECS"), defaults.api_timeout_secs)?,
            wallet_private_key: get("WALLET_PRIVATE_KEY").map(str::to_string),
            patients_page_size: parse_or("PATIENTS_PAGE_SIZE", get("PATIENTS_PAGE_SIZE"), defaults.patients_page_size)?,
            transactions_limit: parse_or("TRANSACTIONS_LIMIT", get("TRANSACTIONS_LIMIT"), defaults.transactions_limit)?,
            identifier_min_chars: parse_or(
                "IDENTIFIER_MIN_CHARS",
                get("IDENTIFIER_MIN_CHARS"),
                defaults.identifier_min_chars,
            )?,
            copied_feedback_ms: parse_or("COPIED_FEEDBACK_MS", get("COPIED_FEEDBACK_MS"), defaults.copied_feedback_ms)?,
            log_level: get("LOG_LEVEL").map(str::to_string).unwrap_or(defaults.log_level),
        })
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<&str>, default: T) -> Result<T> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse::<T>()
            .map_err(|_| DashboardError::Config(format!("{} must be a valid number, got '{}'", key, value))),
    }
}

// Load configuration from environment variables or .env file
pub fn load_config() -> Result<Settings> {
    if Path::new(".env").exists() {
        dotenv::dotenv().ok();
    }

    let vars: HashMap<String, String> = env::vars().collect();
    Settings::from_vars(&vars)
}
