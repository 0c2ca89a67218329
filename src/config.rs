//! Configuration module

use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Scaling parameters artifact (JSON)
    pub scaler_path: PathBuf,

    /// Classifier weights artifact (JSON)
    pub model_path: PathBuf,

    /// Use 4xx/5xx statuses for error payloads instead of 200
    pub strict_error_status: bool,

    /// Evaluate the classifier under a single lock
    pub serialize_scoring: bool,

    /// Log format (json, pretty)
    pub log_format: String,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),

            scaler_path: env::var("SCALER_PATH")
                .unwrap_or_else(|_| "artifacts/scaler.json".to_string())
                .into(),

            model_path: env::var("MODEL_PATH")
                .unwrap_or_else(|_| "artifacts/model.json".to_string())
                .into(),

            strict_error_status: env_flag("STRICT_ERROR_STATUS", false),

            serialize_scoring: env_flag("SERIALIZE_SCORING", false),

            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            scaler_path: "artifacts/scaler.json".into(),
            model_path: "artifacts/model.json".into(),
            strict_error_status: false,
            serialize_scoring: false,
            log_format: "pretty".to_string(),
            environment: "development".to_string(),
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| parse_flag(&v))
        .unwrap_or(default)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
