//! End-of-day option chains from CSV.
//!
//! Expected columns (order free, extra columns ignored):
//! `quote_date, expire_date, strike, c_last, p_last, dte, underlying_last,
//! c_volume, p_volume`. Header names are matched case-insensitively after
//! stripping whitespace and square brackets, so vendor exports with headers
//! such as ` [QUOTE_DATE]` load unchanged. Blank price or volume cells read
//! as missing: prices become NaN, volumes zero.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use density_engine::{QuoteRow, QuoteSource, SourceError};
use serde::Deserialize;
use tracing::info;

use crate::error::LoaderError;

#[derive(Debug, Deserialize)]
struct RawRow {
    quote_date: String,
    expire_date: String,
    strike: f64,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    c_last: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    p_last: Option<f64>,
    dte: f64,
    underlying_last: f64,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    c_volume: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    p_volume: Option<f64>,
}

/// Quote source backed by an in-memory copy of a CSV file.
#[derive(Debug, Clone, Default)]
pub struct CsvQuoteSource {
    by_day: BTreeMap<NaiveDate, Vec<QuoteRow>>,
}

impl CsvQuoteSource {
    /// Load from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let source = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            days = source.by_day.len(),
            rows = source.len(),
            "loaded option chains"
        );
        Ok(source)
    }

    /// Load from any reader producing CSV with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoaderError> {
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let headers: StringRecord = reader.headers()?.iter().map(normalise_header).collect();

        let mut by_day: BTreeMap<NaiveDate, Vec<QuoteRow>> = BTreeMap::new();
        for (i, record) in reader.records().enumerate() {
            let record_no = i + 1;
            let raw: RawRow = record?.deserialize(Some(&headers)).map_err(|e| LoaderError::Parse {
                record: record_no,
                message: e.to_string(),
            })?;
            let row = QuoteRow {
                quote_date: parse_date(&raw.quote_date, record_no)?,
                expire_date: parse_date(&raw.expire_date, record_no)?,
                strike: raw.strike,
                call_last: raw.c_last.unwrap_or(f64::NAN),
                put_last: raw.p_last.unwrap_or(f64::NAN),
                dte: raw.dte,
                underlying_last: raw.underlying_last,
                call_volume: raw.c_volume.unwrap_or(0.0),
                put_volume: raw.p_volume.unwrap_or(0.0),
            };
            by_day.entry(row.quote_date).or_default().push(row);
        }

        for rows in by_day.values_mut() {
            rows.sort_by(|a, b| a.strike.total_cmp(&b.strike));
        }
        Ok(Self { by_day })
    }

    /// Total number of rows.
    pub fn len(&self) -> usize {
        self.by_day.values().map(Vec::len).sum()
    }

    /// True when no rows were loaded.
    pub fn is_empty(&self) -> bool {
        self.by_day.is_empty()
    }
}

impl QuoteSource for CsvQuoteSource {
    fn trading_days(&self) -> Result<Vec<NaiveDate>, SourceError> {
        Ok(self.by_day.keys().copied().collect())
    }

    fn quotes_on(&self, date: NaiveDate) -> Result<Vec<QuoteRow>, SourceError> {
        Ok(self.by_day.get(&date).cloned().unwrap_or_default())
    }
}

fn normalise_header(name: &str) -> String {
    name.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim()
        .to_ascii_lowercase()
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time component.
fn parse_date(value: &str, record: usize) -> Result<NaiveDate, LoaderError> {
    let day = value.trim().get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| LoaderError::Parse {
        record,
        message: format!("invalid date '{}': {}", value, e),
    })
}
