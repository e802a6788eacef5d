//! Collaborator interfaces of the multi-day pipeline.
//!
//! The engine never touches files, networks or language models directly;
//! it consumes option chains, news and sentiment through these traits.
//! Implementations live in the adapter crates.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::SourceError;
use crate::parallel::KeyedComparison;

/// Call or put side of an option chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionSide {
    /// Call options
    Call,
    /// Put options
    Put,
}

impl OptionSide {
    /// Both sides, calls first.
    pub const ALL: [OptionSide; 2] = [OptionSide::Call, OptionSide::Put];

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionSide::Call => "call",
            OptionSide::Put => "put",
        }
    }
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One strike of an end-of-day option chain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuoteRow {
    /// Trading day of the quote
    pub quote_date: NaiveDate,
    /// Expiration of the contract
    pub expire_date: NaiveDate,
    /// Strike price
    pub strike: f64,
    /// Last traded call price
    pub call_last: f64,
    /// Last traded put price
    pub put_last: f64,
    /// Days to expiry
    pub dte: f64,
    /// Underlying close
    pub underlying_last: f64,
    /// Call volume
    pub call_volume: f64,
    /// Put volume
    pub put_volume: f64,
}

impl QuoteRow {
    /// Last price on `side`.
    pub fn last(&self, side: OptionSide) -> f64 {
        match side {
            OptionSide::Call => self.call_last,
            OptionSide::Put => self.put_last,
        }
    }
}

/// End-of-day option chains indexed by trading day.
pub trait QuoteSource {
    /// Distinct trading days, ascending.
    fn trading_days(&self) -> Result<Vec<NaiveDate>, SourceError>;

    /// All rows quoted on `date`, ordered by strike.
    fn quotes_on(&self, date: NaiveDate) -> Result<Vec<QuoteRow>, SourceError>;
}

/// Headlines and bodies for a day.
pub trait NewsSource {
    /// News keyed by title. Returns an empty map on any failure.
    fn fetch(&self, date: NaiveDate, ticker: &str) -> BTreeMap<String, String>;
}

impl<T: QuoteSource + ?Sized> QuoteSource for Arc<T> {
    fn trading_days(&self) -> Result<Vec<NaiveDate>, SourceError> {
        (**self).trading_days()
    }

    fn quotes_on(&self, date: NaiveDate) -> Result<Vec<QuoteRow>, SourceError> {
        (**self).quotes_on(date)
    }
}

impl<T: NewsSource + ?Sized> NewsSource for Arc<T> {
    fn fetch(&self, date: NaiveDate, ticker: &str) -> BTreeMap<String, String> {
        (**self).fetch(date, ticker)
    }
}

/// Everything a scorer sees for one trading day.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    /// Day being scored
    pub quote_date: NaiveDate,
    /// Underlying symbol
    pub ticker: &'a str,
    /// Comparisons of this day against the previous one
    pub comparisons: &'a [KeyedComparison],
    /// Output of [`SentimentScorer::digest_news`]
    pub news_digest: &'a str,
    /// Put volume over call volume, `None` when call volume is zero
    pub put_call_ratio: Option<f64>,
    /// Total call volume
    pub call_volume: f64,
    /// Total put volume
    pub put_volume: f64,
}

/// Daily sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SentimentScore {
    /// Score of the news alone, in `[-1, 1]`
    pub news_score: f64,
    /// Score combining moments, volumes and news, in `[-1, 1]`
    pub combined_score: f64,
}

impl SentimentScore {
    /// `(0, 0)`, the score of a failed or empty analysis.
    pub const NEUTRAL: SentimentScore = SentimentScore {
        news_score: 0.0,
        combined_score: 0.0,
    };
}

/// Turns news and moment changes into a daily score.
///
/// Implementations swallow their own failures and return
/// [`SentimentScore::NEUTRAL`].
pub trait SentimentScorer {
    /// Condense raw news into the text passed back through
    /// [`ScoringInput::news_digest`].
    fn digest_news(&self, news: &BTreeMap<String, String>, ticker: &str) -> String;

    /// Score one day.
    fn score(&self, input: &ScoringInput<'_>) -> SentimentScore;
}
