//! CLI settings.
//!
//! Layered with the `config` crate: built-in defaults, then the TOML file
//! (optional), then `BLD_*` environment variables. Nested keys use a double
//! underscore, e.g. `BLD_PIPELINE__TICKER=QQQ` or
//! `BLD_DENSITY__SMOOTHING_FACTOR=0.01`. Command-line flags are applied on
//! top by each command.

use adapter_loader::TrendScorerConfig;
use density_engine::{DensityParams, PipelineConfig};
use serde::{Deserialize, Serialize};

use crate::{CliError, Result};

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "BLD";

/// Effective CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Multi-day pipeline settings
    pub pipeline: PipelineConfig,
    /// Estimation parameters
    pub density: DensityParams,
    /// Thresholds and weights of the trend scorer
    pub scorer: TrendScorerConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            pipeline: PipelineConfig::default(),
            density: DensityParams::default(),
            scorer: TrendScorerConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load from `path` (missing file is fine) and the environment.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(CliError::InvalidArgument(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, valid_log_levels
            )));
        }
        self.pipeline.validate()?;
        self.density.validate()?;
        Ok(())
    }
}
