//! `bl-gateway`: REST front end for the density pipeline.

use clap::Parser;
use service_gateway::config::{build_config, CliArgs, ServerConfig};
use service_gateway::server::Server;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Serve `/run_pipeline` and `/api/v1/density` over an option-chain history
#[derive(Parser, Debug)]
#[command(name = "bl-gateway")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Host address to bind to
    #[arg(long, env = "BLD_SERVER_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "BLD_SERVER_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "BLD_SERVER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Option-chain CSV; a synthetic history is served when absent
    #[arg(short, long, value_name = "FILE")]
    data: Option<PathBuf>,
}

impl Args {
    fn into_cli_args(self) -> CliArgs {
        CliArgs {
            config_file: self.config,
            host: self.host,
            port: self.port,
            log_level: self.log_level,
            data: self.data,
        }
    }
}

fn init_tracing(config: &ServerConfig) {
    let fallback = config.log_level.as_filter_str();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = build_config(&Args::parse().into_cli_args())?;
    init_tracing(&config);

    tracing::info!(
        version = service_gateway::VERSION,
        data = ?config.data_path,
        news = ?config.news_path,
        n_days = config.pipeline.n_days,
        max_n_days = config.max_n_days,
        allow_cors = config.allow_cors,
        "starting bl-gateway"
    );

    Server::new(config)?.run().await
}
