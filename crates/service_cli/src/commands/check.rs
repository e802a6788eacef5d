//! Check command implementation
//!
//! Validates the effective configuration and prints it.

use tracing::info;

use crate::config::CliConfig;
use crate::Result;

/// Run the check command
pub fn run(config: &CliConfig, path: &str) -> Result<()> {
    println!("{}", execute(config, path)?);
    Ok(())
}

/// Validate and render, without printing.
pub fn execute(config: &CliConfig, path: &str) -> Result<String> {
    config.validate()?;
    info!(path, "configuration valid");
    let settings = serde_json::to_string_pretty(config)?;
    Ok(format!(
        "bl-dynamics {}\nConfiguration file: {}\nStatus: OK\n\n{}",
        env!("CARGO_PKG_VERSION"),
        path,
        settings
    ))
}
