//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod check;
pub mod estimate;
pub mod run;

use clap::ValueEnum;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Box-drawn table
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Which sentiment scorer the `run` command uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScorerKind {
    /// Always `(0, 0)`
    Neutral,
    /// Moment trends, news keywords and put/call tilt
    Trend,
}

/// `"n/a"` for missing values, fixed precision otherwise.
pub(crate) fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "n/a".to_string(),
    }
}
