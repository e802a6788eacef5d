//! Deterministic sentiment scorers.
//!
//! [`MomentTrendScorer`] reads the day-over-day change of the implied
//! moments for every expiration and side:
//!
//! | Moment   | Delta          | Rising reads as |
//! |----------|----------------|-----------------|
//! | variance | relative       | bearish         |
//! | skewness | absolute       | bullish         |
//! | kurtosis | absolute       | bearish         |
//!
//! Each delta is bucketed into `{-1, -0.5, 0, 0.5, 1}` by a small and a
//! large threshold. Per-comparison scores are averaged with weight
//! `1 / (1 + days to expiry)`, then blended with a keyword news score and a
//! put/call-ratio tilt.

use std::collections::BTreeMap;

use density_engine::{KeyedComparison, MomentRecord, ScoringInput, SentimentScore, SentimentScorer};
use serde::{Deserialize, Serialize};
use tracing::debug;

const POSITIVE_WORDS: &[&str] = &[
    "beat", "beats", "bullish", "gain", "gains", "growth", "rally", "rallies", "record", "rise",
    "rises", "strong", "surge", "surges", "upgrade", "upgraded",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bearish", "cut", "cuts", "decline", "declines", "downgrade", "downgraded", "drop", "drops",
    "fall", "falls", "lawsuit", "loss", "losses", "miss", "misses", "plunge", "plunges", "weak",
];

/// Keyword polarity above which news counts as directional.
const NEWS_POLARITY_CUTOFF: f64 = 0.2;

/// Scorer that always returns [`SentimentScore::NEUTRAL`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralScorer;

impl SentimentScorer for NeutralScorer {
    fn digest_news(&self, _news: &BTreeMap<String, String>, _ticker: &str) -> String {
        String::new()
    }

    fn score(&self, _input: &ScoringInput<'_>) -> SentimentScore {
        SentimentScore::NEUTRAL
    }
}

/// Small/large cut-offs for one moment's delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Deltas below this magnitude score 0
    pub small: f64,
    /// Deltas at or above this magnitude score ±1
    pub large: f64,
}

impl Thresholds {
    /// Map a delta onto `{-1, -0.5, 0, 0.5, 1}`.
    pub fn bucket(&self, delta: f64) -> f64 {
        let size = delta.abs();
        if !size.is_finite() || size < self.small {
            0.0
        } else if size < self.large {
            0.5 * delta.signum()
        } else {
            delta.signum()
        }
    }
}

/// Settings of [`MomentTrendScorer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendScorerConfig {
    /// Relative change of variance
    pub variance: Thresholds,
    /// Absolute change of skewness
    pub skewness: Thresholds,
    /// Absolute change of kurtosis
    pub kurtosis: Thresholds,
    /// Weight of the moment score in the blend
    pub moment_weight: f64,
    /// Weight of the news score in the blend
    pub news_weight: f64,
    /// Weight of the put/call tilt in the blend
    pub volume_weight: f64,
}

impl Default for TrendScorerConfig {
    fn default() -> Self {
        Self {
            variance: Thresholds {
                small: 0.02,
                large: 0.10,
            },
            skewness: Thresholds {
                small: 0.05,
                large: 0.25,
            },
            kurtosis: Thresholds {
                small: 0.10,
                large: 0.50,
            },
            moment_weight: 0.5,
            news_weight: 0.3,
            volume_weight: 0.2,
        }
    }
}

/// Rule-based scorer over moment trends, news keywords and volumes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MomentTrendScorer {
    config: TrendScorerConfig,
}

impl MomentTrendScorer {
    /// Scorer with the given settings.
    pub fn new(config: TrendScorerConfig) -> Self {
        Self { config }
    }

    /// Current settings.
    pub fn config(&self) -> &TrendScorerConfig {
        &self.config
    }

    /// Score of one `(current, previous)` pair, in `[-1, 1]`.
    pub fn pair_score(&self, current: &MomentRecord, previous: &MomentRecord) -> f64 {
        let prev_var = previous.variance();
        let var_delta = if prev_var > 0.0 {
            (current.variance() - prev_var) / prev_var
        } else {
            0.0
        };
        let var = self.config.variance.bucket(var_delta);
        let skew = self
            .config
            .skewness
            .bucket(current.skewness - previous.skewness);
        let kurt = self
            .config
            .kurtosis
            .bucket(current.kurtosis - previous.kurtosis);
        (-var + skew - kurt) / 3.0
    }

    /// Expiry-weighted mean of the pair scores. Incomplete comparisons are
    /// ignored; 0 when none is complete.
    pub fn moment_score(&self, comparisons: &[KeyedComparison]) -> f64 {
        let mut total = 0.0;
        let mut weight_sum = 0.0;
        for c in comparisons {
            let Some((current, previous)) = c.result.pair() else {
                continue;
            };
            let days = (c.key.expiration - c.key.quote_date).num_days().max(0) as f64;
            let w = 1.0 / (1.0 + days);
            total += w * self.pair_score(current, previous);
            weight_sum += w;
        }
        if weight_sum > 0.0 {
            total / weight_sum
        } else {
            0.0
        }
    }
}

/// Keyword polarity of `text` in `[-1, 1]`; 0 without any keyword.
pub fn keyword_polarity(text: &str) -> f64 {
    let (mut pos, mut neg) = (0usize, 0usize);
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let word = word.to_lowercase();
        if POSITIVE_WORDS.contains(&word.as_str()) {
            pos += 1;
        } else if NEGATIVE_WORDS.contains(&word.as_str()) {
            neg += 1;
        }
    }
    let total = pos + neg;
    if total == 0 {
        return 0.0;
    }
    (pos as f64 - neg as f64) / total as f64
}

/// News score in `{-1, 0, 1}`.
pub fn news_score(digest: &str) -> f64 {
    let polarity = keyword_polarity(digest);
    if polarity.abs() > NEWS_POLARITY_CUTOFF {
        polarity.signum()
    } else {
        0.0
    }
}

/// `1 - PCR` clamped to `[-1, 1]`; 0 without a ratio.
pub fn put_call_tilt(put_call_ratio: Option<f64>) -> f64 {
    match put_call_ratio {
        Some(pcr) if pcr.is_finite() => (1.0 - pcr).clamp(-1.0, 1.0),
        _ => 0.0,
    }
}

impl SentimentScorer for MomentTrendScorer {
    fn digest_news(&self, news: &BTreeMap<String, String>, _ticker: &str) -> String {
        news.iter()
            .map(|(title, body)| format!("{}: {}", title, body).to_lowercase())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn score(&self, input: &ScoringInput<'_>) -> SentimentScore {
        let moments = self.moment_score(input.comparisons);
        let news = news_score(input.news_digest);
        let tilt = put_call_tilt(input.put_call_ratio);
        let combined = self.config.moment_weight * moments
            + self.config.news_weight * news
            + self.config.volume_weight * tilt;
        if !combined.is_finite() {
            return SentimentScore::NEUTRAL;
        }
        debug!(
            date = %input.quote_date,
            moments,
            news,
            tilt,
            "scored day"
        );
        SentimentScore {
            news_score: news,
            combined_score: combined.clamp(-1.0, 1.0),
        }
    }
}
