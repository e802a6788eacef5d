//! Run command implementation
//!
//! Multi-day pipeline over a CSV of end-of-day option chains, with optional
//! news from a JSON file.

use std::path::Path;

use adapter_loader::{CsvQuoteSource, JsonNewsSource, MomentTrendScorer, NeutralScorer};
use density_engine::{
    CancellationToken, DailyPipeline, DailySummary, QuoteSource, SentimentScorer,
};
use tracing::info;

use super::{fmt_opt, OutputFormat, ScorerKind};
use crate::config::CliConfig;
use crate::{CliError, Result};

/// Flags of the `run` command.
#[derive(Debug, Clone, PartialEq)]
pub struct RunArgs {
    /// Option-chain CSV
    pub data: String,
    /// Trading days to process, defaults to the configured `n_days`
    pub days: Option<usize>,
    /// News JSON file
    pub news: Option<String>,
    /// Scorer to use
    pub scorer: ScorerKind,
    /// Output format
    pub format: OutputFormat,
}

/// Run the run command
pub fn run(config: &CliConfig, args: &RunArgs) -> Result<()> {
    println!("{}", execute(config, args)?);
    Ok(())
}

/// Run the pipeline and render, without printing.
pub fn execute(config: &CliConfig, args: &RunArgs) -> Result<String> {
    let quotes = CsvQuoteSource::from_path(existing(&args.data)?)?;
    let news = match &args.news {
        Some(path) => JsonNewsSource::from_path(existing(path)?)?,
        None => JsonNewsSource::default(),
    };
    let n_days = args.days.unwrap_or(config.pipeline.n_days);

    let rows = match args.scorer {
        ScorerKind::Neutral => pipeline(config, quotes, news, NeutralScorer, n_days)?,
        ScorerKind::Trend => pipeline(
            config,
            quotes,
            news,
            MomentTrendScorer::new(config.scorer),
            n_days,
        )?,
    };

    match args.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&rows)?),
        OutputFormat::Table => Ok(render_table(&rows)),
    }
}

fn existing(path: &str) -> Result<&str> {
    if Path::new(path).exists() {
        Ok(path)
    } else {
        Err(CliError::FileNotFound(path.to_string()))
    }
}

fn pipeline<Q, S>(
    config: &CliConfig,
    quotes: Q,
    news: JsonNewsSource,
    scorer: S,
    n_days: usize,
) -> Result<Vec<DailySummary>>
where
    Q: QuoteSource,
    S: SentimentScorer,
{
    let pipeline = DailyPipeline::new(quotes, news, scorer, config.pipeline.clone())
        .with_density_params(config.density);
    let mut progress = |percent: u8| info!(percent, "progress");
    Ok(pipeline.run(n_days, &CancellationToken::new(), Some(&mut progress))?)
}

fn render_table(rows: &[DailySummary]) -> String {
    let mut out = String::new();
    out.push_str(
        "┌────────────┬──────────┬──────────┬──────────┬──────────┬──────────┬────────┬─────────┐\n",
    );
    out.push_str(
        "│ Date       │ Close    │ Return   │ Cum ret  │ Score    │ Cum score│ PCR    │ Curves  │\n",
    );
    out.push_str(
        "├────────────┼──────────┼──────────┼──────────┼──────────┼──────────┼────────┼─────────┤\n",
    );
    for row in rows {
        let complete = row
            .comparisons
            .iter()
            .filter(|c| c.result.is_complete())
            .count();
        out.push_str(&format!(
            "│ {} │ {:>8.2} │ {:>8} │ {:>8} │ {:>8.3} │ {:>8.3} │ {:>6} │ {:>3}/{:<3} │\n",
            row.quote_date,
            row.underlying_last,
            fmt_opt(row.daily_return, 4),
            fmt_opt(row.cumulative_return, 4),
            row.daily_sentiment,
            row.cumulative_sentiment,
            fmt_opt(row.put_call_ratio, 2),
            complete,
            row.comparisons.len(),
        ));
    }
    out.push_str(
        "└────────────┴──────────┴──────────┴──────────┴──────────┴──────────┴────────┴─────────┘",
    );
    out
}
