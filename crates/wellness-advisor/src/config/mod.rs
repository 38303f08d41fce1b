use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub storage: StorageConfig,
    pub recommendation: RecommendationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let profile_store = env::var("APP_PROFILE_STORE")
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        let mut recommendation = RecommendationConfig::default();
        if let Ok(raw) = env::var("APP_RECOMMENDATION_LIMIT") {
            recommendation.top_n = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|limit| (1..=MAX_RECOMMENDATIONS).contains(limit))
                .ok_or(ConfigError::InvalidRecommendationLimit)?;
        }
        if let Ok(raw) = env::var("APP_ENSEMBLE_WEIGHTS") {
            recommendation.weights = EnsembleWeights::parse(&raw)?;
        }
        if let Ok(raw) = env::var("APP_MAX_AGE_YEARS") {
            recommendation.max_age_years = raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidMaxAge)?;
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            storage: StorageConfig { profile_store },
            recommendation,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where user profiles live. `None` keeps them in process memory.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    pub profile_store: Option<PathBuf>,
}

/// Upper bound on the final shortlist length.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Per-heuristic weights applied by the ensemble combiner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnsembleWeights {
    pub weighted_attribute: f64,
    pub profile_match: f64,
    pub rule_engine: f64,
}

impl EnsembleWeights {
    /// Parses `"<weighted>,<profile>,<rules>"`. The rule-engine weight must be positive: it is the
    /// only heuristic that always answers, so it keeps the essential set in every ranking.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let values = raw
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ConfigError::InvalidEnsembleWeights(raw.to_string()))?;

        match values.as_slice() {
            [weighted, profile, rules]
                if values.iter().all(|value| value.is_finite() && *value >= 0.0)
                    && *rules > 0.0 =>
            {
                Ok(Self {
                    weighted_attribute: *weighted,
                    profile_match: *profile,
                    rule_engine: *rules,
                })
            }
            _ => Err(ConfigError::InvalidEnsembleWeights(raw.to_string())),
        }
    }
}

impl Default for EnsembleWeights {
    fn default() -> Self {
        Self {
            weighted_attribute: 0.5,
            profile_match: 0.3,
            rule_engine: 0.2,
        }
    }
}

/// Knobs for the recommendation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationConfig {
    pub weights: EnsembleWeights,
    pub top_n: usize,
    pub max_age_years: u16,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            weights: EnsembleWeights::default(),
            top_n: 5,
            max_age_years: 120,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRecommendationLimit,
    InvalidEnsembleWeights(String),
    InvalidMaxAge,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRecommendationLimit => {
                write!(
                    f,
                    "APP_RECOMMENDATION_LIMIT must be an integer between 1 and {}",
                    MAX_RECOMMENDATIONS
                )
            }
            ConfigError::InvalidEnsembleWeights(raw) => write!(
                f,
                "APP_ENSEMBLE_WEIGHTS must be three non-negative numbers with a positive rule weight, got '{}'",
                raw
            ),
            ConfigError::InvalidMaxAge => write!(f, "APP_MAX_AGE_YEARS must be a valid u16"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidRecommendationLimit
            | ConfigError::InvalidEnsembleWeights(_)
            | ConfigError::InvalidMaxAge => None,
        }
    }
}
