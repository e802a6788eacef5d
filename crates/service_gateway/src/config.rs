//! Gateway configuration management
//!
//! Handles loading configuration from TOML files, `BLD_SERVER_*` environment
//! variables and CLI arguments.

use std::path::PathBuf;
use std::str::FromStr;

use adapter_loader::TrendScorerConfig;
use density_engine::{DensityParams, PipelineConfig};
use serde::Deserialize;
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid port number: {0}. Must be between 1 and 65535")]
    InvalidPort(u16),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),

    #[error("Invalid setting: {0}")]
    Invalid(String),

    #[error("Data source error: {0}")]
    Data(String),
}

/// Log levels supported by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

/// Gateway configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Add a permissive CORS layer
    pub allow_cors: bool,
    /// Option-chain CSV; a synthetic history is served when unset
    pub data_path: Option<PathBuf>,
    /// News JSON file
    pub news_path: Option<PathBuf>,
    /// Trading days in the synthetic history
    pub synthetic_days: usize,
    /// Largest `n_days` accepted by `/run_pipeline`
    pub max_n_days: usize,
    /// Pipeline settings
    pub pipeline: PipelineConfig,
    /// Default estimation parameters
    pub density: DensityParams,
    /// Trend scorer settings
    pub scorer: TrendScorerConfig,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: LogLevel::Info,
            allow_cors: false,
            data_path: None,
            news_path: None,
            synthetic_days: 30,
            max_n_days: 500,
            pipeline: PipelineConfig::default(),
            density: DensityParams::default(),
            scorer: TrendScorerConfig::default(),
        }
    }
}

/// Environment variables read by [`ServerConfig::apply_env`].
const ENV_VARS: [&str; 7] = [
    "BLD_SERVER_HOST",
    "BLD_SERVER_PORT",
    "BLD_SERVER_LOG_LEVEL",
    "BLD_SERVER_ALLOW_CORS",
    "BLD_SERVER_DATA_PATH",
    "BLD_SERVER_NEWS_PATH",
    "BLD_SERVER_SYNTHETIC_DAYS",
];

impl ServerConfig {
    /// Create a new ServerConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;
        toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Override fields from `BLD_SERVER_*` variables through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_VARS[0]) {
            self.host = host;
        }
        if let Some(port) = lookup(ENV_VARS[1]) {
            self.port = port
                .parse()
                .map_err(|_| ConfigError::EnvError(format!("{}={}", ENV_VARS[1], port)))?;
        }
        if let Some(level) = lookup(ENV_VARS[2]) {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(cors) = lookup(ENV_VARS[3]) {
            self.allow_cors = cors.eq_ignore_ascii_case("true") || cors == "1";
        }
        if let Some(path) = lookup(ENV_VARS[4]) {
            self.data_path = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup(ENV_VARS[5]) {
            self.news_path = Some(PathBuf::from(path));
        }
        if let Some(days) = lookup(ENV_VARS[6]) {
            self.synthetic_days = days
                .parse()
                .map_err(|_| ConfigError::EnvError(format!("{}={}", ENV_VARS[6], days)))?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }
        if self.max_n_days == 0 {
            return Err(ConfigError::Invalid("max_n_days must be > 0".to_string()));
        }
        if self.data_path.is_none() && self.synthetic_days < 2 {
            return Err(ConfigError::Invalid(
                "synthetic_days must be >= 2".to_string(),
            ));
        }
        self.pipeline
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.density
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(log_level) = &cli.log_level {
            self.log_level = LogLevel::from_str(log_level)?;
        }
        if let Some(path) = &cli.data {
            self.data_path = Some(path.clone());
        }
        Ok(())
    }
}

/// CLI arguments structure
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Host address override
    pub host: Option<String>,
    /// Port override
    pub port: Option<u16>,
    /// Log level override
    pub log_level: Option<String>,
    /// Option-chain CSV override
    pub data: Option<PathBuf>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<ServerConfig, ConfigError> {
    let mut config = match &cli.config_file {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    config.apply_env(|name| std::env::var(name).ok())?;
    config.merge_with_cli(cli)?;
    config.validate()?;
    Ok(config)
}
