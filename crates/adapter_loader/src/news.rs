//! News sources.
//!
//! [`JsonNewsSource`] serves pre-fetched headlines from a JSON file shaped as
//! `{ "YYYY-MM-DD": { "<title>": "<body>", ... }, ... }`. Days absent from
//! the file yield no news.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use density_engine::NewsSource;
use tracing::info;

use crate::error::LoaderError;

/// Headlines by day, keyed by title.
#[derive(Debug, Clone, Default)]
pub struct JsonNewsSource {
    by_day: BTreeMap<NaiveDate, BTreeMap<String, String>>,
}

impl JsonNewsSource {
    /// Load from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let source = Self::from_json(&text)?;
        info!(path = %path.display(), days = source.by_day.len(), "loaded news");
        Ok(source)
    }

    /// Parse from a JSON string.
    pub fn from_json(text: &str) -> Result<Self, LoaderError> {
        let by_day = serde_json::from_str(text)?;
        Ok(Self { by_day })
    }

    /// Number of days with news.
    pub fn len(&self) -> usize {
        self.by_day.len()
    }

    /// True when no day has news.
    pub fn is_empty(&self) -> bool {
        self.by_day.is_empty()
    }
}

impl NewsSource for JsonNewsSource {
    fn fetch(&self, date: NaiveDate, _ticker: &str) -> BTreeMap<String, String> {
        self.by_day.get(&date).cloned().unwrap_or_default()
    }
}

/// A source that never has news.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyNewsSource;

impl NewsSource for EmptyNewsSource {
    fn fetch(&self, _date: NaiveDate, _ticker: &str) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "2024-03-01": {
            "Fed holds rates": "Markets rally on steady policy.",
            "Chipmaker beats": "Strong growth in data-centre sales."
        },
        "2024-03-04": {}
    }"#;

    #[test]
    fn test_fetch_known_day() {
        let source = JsonNewsSource::from_json(SAMPLE).unwrap();
        assert_eq!(source.len(), 2);
        let news = source.fetch(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), "SPY");
        assert_eq!(news.len(), 2);
        assert_eq!(news["Fed holds rates"], "Markets rally on steady policy.");
    }

    #[test]
    fn test_fetch_unknown_day_is_empty() {
        let source = JsonNewsSource::from_json(SAMPLE).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert!(source.fetch(date, "SPY").is_empty());
        assert!(EmptyNewsSource.fetch(date, "SPY").is_empty());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            JsonNewsSource::from_json("{\"not-a-date\": {}}"),
            Err(LoaderError::Json(_))
        ));
        assert!(matches!(
            JsonNewsSource::from_json("[1, 2]"),
            Err(LoaderError::Json(_))
        ));
    }
}
