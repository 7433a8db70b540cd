//! Environment configuration
//!
//! This module reads server and import settings from environment variables.
//! Optional values fall back to defaults.

use std::env;
use std::str::FromStr;

use crate::services::vehicle_import_service::DEFAULT_MAX_IMPORT_FILE_BYTES;

/// Environment settings
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub import_max_file_bytes: usize,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
            import_max_file_bytes: DEFAULT_MAX_IMPORT_FILE_BYTES,
        }
    }
}

impl EnvironmentConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_var("PORT").unwrap_or(defaults.port),
            host: env::var("HOST").unwrap_or(defaults.host),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| parse_origins(&origins))
                .unwrap_or(defaults.cors_origins),
            import_max_file_bytes: parse_var("IMPORT_MAX_FILE_BYTES")
                .unwrap_or(defaults.import_max_file_bytes),
        }
    }

    /// Address the server binds to
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.trim().parse().ok())
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EnvironmentConfig::default();
        assert_eq!(config.environment, "development");
        assert_eq!(config.server_url(), "0.0.0.0:3000");
        assert_eq!(config.import_max_file_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("http://localhost:5173, https://backoffice.example.com,"),
            vec!["http://localhost:5173", "https://backoffice.example.com"]
        );
        assert!(parse_origins(" ").is_empty());
    }
}
