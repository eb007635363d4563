//! Configuration for the detector proxy.

use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use config::{Config as ConfigLoader, Environment, File, Map};
use serde::Deserialize;

/// Origins allowed to call the proxy when `CORS_ORIGINS` is not set.
pub const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://127.0.0.1:5500",
    "http://localhost:5500",
    "http://localhost:3000",
];

/// Immutable configuration, built once at startup and shared with handlers.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub watson: WatsonConfig,
    /// Browser origins allowed by CORS.
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Upstream Watson services and the credential used against them.
#[derive(Debug, Clone)]
pub struct WatsonConfig {
    pub api_key: String,
    /// Scoring endpoint of the deployed classifier.
    pub scoring_url: String,
    /// IAM endpoint exchanging the API key for a bearer token.
    pub token_url: String,
    pub predict_timeout: Duration,
    pub token_timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

/// Flat view of the sources before validation; keys are lowercased env names.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    ibm_api_key: Option<String>,
    #[serde(default)]
    watson_ml_url: Option<String>,
    #[serde(default)]
    iam_token_url: Option<String>,
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    port: Option<String>,
    #[serde(default)]
    cors_origins: Option<String>,
    #[serde(default)]
    predict_timeout_secs: Option<String>,
    #[serde(default)]
    token_timeout_secs: Option<String>,
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3001
}
fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. Environment variables (IBM_API_KEY, WATSON_ML_URL, ...)
    /// 2. config.toml file (if present)
    /// 3. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::default())
    }

    /// Load configuration from an explicit set of variables instead of the
    /// process environment.
    pub fn from_vars(vars: Map<String, String>) -> Result<Self, ConfigError> {
        Self::from_environment(Environment::default().source(Some(vars)))
    }

    fn from_environment(env: Environment) -> Result<Self, ConfigError> {
        // Defaults are applied in `validate` so that empty values fall back too
        let raw: RawConfig = ConfigLoader::builder()
            // Load from config.toml if exists
            .add_source(File::with_name("config").required(false))
            .add_source(env)
            .build()?
            .try_deserialize()?;

        raw.validate()
    }
}

impl RawConfig {
    fn validate(self) -> Result<Config, ConfigError> {
        let api_key = required(self.ibm_api_key, "IBM_API_KEY")?;
        let scoring_url = required(self.watson_ml_url, "WATSON_ML_URL")?;
        let token_url = required(self.iam_token_url, "IAM_TOKEN_URL")?;

        let mut server = ServerConfig::default();
        if let Some(host) = optional(self.host) {
            server.host = host;
        }
        server.port = parse_or(self.port, "PORT", default_port())?;

        let predict_timeout_secs = parse_or(
            self.predict_timeout_secs,
            "PREDICT_TIMEOUT_SECS",
            default_timeout_secs(),
        )?;
        let token_timeout_secs =
            parse_or(self.token_timeout_secs, "TOKEN_TIMEOUT_SECS", default_timeout_secs())?;

        if predict_timeout_secs == 0 || token_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeouts must be at least one second".to_string(),
            ));
        }

        let cors_origins = match optional(self.cors_origins) {
            Some(list) => parse_origins(&list)?,
            None => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Config {
            server,
            watson: WatsonConfig {
                api_key,
                scoring_url,
                token_url,
                predict_timeout: Duration::from_secs(predict_timeout_secs),
                token_timeout: Duration::from_secs(token_timeout_secs),
            },
            cors_origins,
        })
    }
}

/// Trimmed value, or `None` when unset or empty.
fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T: FromStr>(value: Option<String>, name: &str, default: T) -> Result<T, ConfigError> {
    match optional(value) {
        Some(v) => v
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("{} is not a valid number: {}", name, v))),
        None => Ok(default),
    }
}

/// Unset and empty values are both treated as missing.
fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    optional(value).ok_or(ConfigError::MissingEnvVar(name))
}

/// Origins must be usable as `Access-Control-Allow-Origin` values.
fn parse_origins(list: &str) -> Result<Vec<String>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|o| {
            let origin = o.trim_end_matches('/');
            HeaderValue::from_str(origin)
                .map(|_| origin.to_string())
                .map_err(|_| ConfigError::Invalid(format!("invalid CORS origin: {}", o)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn required_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            ("IBM_API_KEY", "test-key-0123456789"),
            ("WATSON_ML_URL", "https://ml.example.com/v4/deployments/x/predictions"),
            ("IAM_TOKEN_URL", "https://iam.example.com/identity/token"),
        ]
    }

    #[test]
    fn test_default_server_config() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 3001);
    }

    #[test]
    fn test_load_with_required_vars_uses_defaults() {
        let config = Config::from_vars(vars(&required_vars())).unwrap();
        assert_eq!(config.watson.api_key, "test-key-0123456789");
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.watson.predict_timeout, Duration::from_secs(30));
        assert_eq!(config.watson.token_timeout, Duration::from_secs(30));
        assert_eq!(config.cors_origins, DEFAULT_CORS_ORIGINS.to_vec());
    }

    #[test]
    fn test_each_required_var_is_enforced() {
        for missing in ["IBM_API_KEY", "WATSON_ML_URL", "IAM_TOKEN_URL"] {
            let pairs: Vec<_> = required_vars()
                .into_iter()
                .filter(|(k, _)| *k != missing)
                .collect();
            let err = Config::from_vars(vars(&pairs)).unwrap_err();
            match err {
                ConfigError::MissingEnvVar(name) => assert_eq!(name, missing),
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let mut pairs = required_vars();
        pairs[0] = ("IBM_API_KEY", "");
        let err = Config::from_vars(vars(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar("IBM_API_KEY")));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = required_vars();
        pairs.push(("PORT", "8088"));
        pairs.push(("PREDICT_TIMEOUT_SECS", "5"));
        pairs.push(("CORS_ORIGINS", "https://app.example.com/, http://localhost:8000"));
        let config = Config::from_vars(vars(&pairs)).unwrap();
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.watson.predict_timeout, Duration::from_secs(5));
        assert_eq!(
            config.cors_origins,
            vec!["https://app.example.com", "http://localhost:8000"]
        );
    }

    #[test]
    fn test_empty_optional_vars_use_defaults() {
        let mut pairs = required_vars();
        pairs.push(("PORT", ""));
        pairs.push(("HOST", " "));
        pairs.push(("PREDICT_TIMEOUT_SECS", ""));
        pairs.push(("TOKEN_TIMEOUT_SECS", ""));
        pairs.push(("CORS_ORIGINS", ""));
        let config = Config::from_vars(vars(&pairs)).unwrap();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.watson.predict_timeout, Duration::from_secs(30));
        assert_eq!(config.watson.token_timeout, Duration::from_secs(30));
        assert_eq!(config.cors_origins, DEFAULT_CORS_ORIGINS.to_vec());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut pairs = required_vars();
        pairs.push(("PORT", "not-a-port"));
        let err = Config::from_vars(vars(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_invalid_origin_is_rejected() {
        let mut pairs = required_vars();
        pairs.push(("CORS_ORIGINS", "http://localhost:3000,bad\norigin"));
        let err = Config::from_vars(vars(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut pairs = required_vars();
        pairs.push(("TOKEN_TIMEOUT_SECS", "0"));
        let err = Config::from_vars(vars(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
