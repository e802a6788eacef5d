//! BL Dynamics CLI - Risk-Neutral Density Dynamics from the Command Line
//!
//! # Commands
//!
//! - `bl-dynamics estimate --strikes .. --prices .. --dte N` - One density
//!   and its moments
//! - `bl-dynamics run --data <file>` - Day-over-day moment comparisons and
//!   sentiment over an option-chain history
//! - `bl-dynamics check` - Validate and print the effective configuration
//!
//! # Configuration
//!
//! Settings come from `bl_dynamics.toml` (or `--config`), overridden by
//! `BLD_*` environment variables, overridden by flags. `RUST_LOG` takes
//! precedence over the configured log level.

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use commands::{estimate::EstimateArgs, run::RunArgs, OutputFormat, ScorerKind};
use config::CliConfig;

/// Breeden-Litzenberger density dynamics
#[derive(Parser)]
#[command(name = "bl-dynamics")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "bl_dynamics.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate one density and its moments
    Estimate {
        /// Strikes, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        strikes: Vec<f64>,

        /// Option prices aligned with the strikes, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        prices: Vec<f64>,

        /// Days to expiry
        #[arg(short, long)]
        dte: f64,

        /// Risk-free rate
        #[arg(short, long, allow_negative_numbers = true)]
        rate: Option<f64>,

        /// Smoothing factor (0 interpolates)
        #[arg(long)]
        smoothing: Option<f64>,

        /// Spline degree
        #[arg(long)]
        degree: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Run the multi-day pipeline over an option-chain CSV
    Run {
        /// Path to the option-chain CSV
        #[arg(long)]
        data: String,

        /// Number of most recent trading days to process
        #[arg(short = 'n', long)]
        days: Option<usize>,

        /// Path to a news JSON file
        #[arg(long)]
        news: Option<String>,

        /// Sentiment scorer
        #[arg(short, long, value_enum, default_value = "trend")]
        scorer: ScorerKind,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Check configuration
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(&cli.config)?;

    // Initialise tracing
    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
    debug!(config = %cli.config, "loaded configuration");

    match cli.command {
        Commands::Estimate {
            strikes,
            prices,
            dte,
            rate,
            smoothing,
            degree,
            format,
        } => commands::estimate::run(
            &config,
            &EstimateArgs {
                strikes,
                prices,
                dte,
                rate,
                smoothing,
                degree,
                format,
            },
        )?,
        Commands::Run {
            data,
            days,
            news,
            scorer,
            format,
        } => commands::run::run(
            &config,
            &RunArgs {
                data,
                days,
                news,
                scorer,
                format,
            },
        )?,
        Commands::Check => commands::check::run(&config, &cli.config)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_estimate() {
        let cli = Cli::try_parse_from([
            "bl-dynamics",
            "estimate",
            "--strikes",
            "90,100,110,120",
            "--prices",
            "12,5,1.5,0.3",
            "--dte",
            "7",
            "--rate",
            "-0.005",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Estimate {
                strikes,
                rate,
                format,
                ..
            } => {
                assert_eq!(strikes, vec![90.0, 100.0, 110.0, 120.0]);
                assert_eq!(rate, Some(-0.005));
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected estimate"),
        }
        assert_eq!(cli.config, "bl_dynamics.toml");
    }

    #[test]
    fn test_parse_run_defaults() {
        let cli = Cli::try_parse_from(["bl-dynamics", "-v", "run", "--data", "chains.csv"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Run {
                data,
                days,
                scorer,
                format,
                ..
            } => {
                assert_eq!(data, "chains.csv");
                assert_eq!(days, None);
                assert_eq!(scorer, ScorerKind::Trend);
                assert_eq!(format, OutputFormat::Table);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_run_requires_data() {
        assert!(Cli::try_parse_from(["bl-dynamics", "run"]).is_err());
    }
}
