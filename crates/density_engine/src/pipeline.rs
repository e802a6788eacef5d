//! Multi-day comparison pipeline.
//!
//! For each of the last `n_days` trading days `t`, every near-term
//! expiration and side is compared against day `t - 1`. All comparisons
//! are dispatched in one parallel batch; news, volumes and the scorer are
//! then applied day by day in order. Returns and cumulative sentiment are
//! computed over the full history and reported for the processed window.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::comparison::Snapshot;
use crate::config::{DensityParams, PipelineConfig};
use crate::error::PipelineError;
use crate::parallel::{
    run_comparisons, CancellationToken, ComparisonKey, ComparisonTask, KeyedComparison,
    ParallelConfig,
};
use crate::sources::{NewsSource, OptionSide, QuoteRow, QuoteSource, ScoringInput, SentimentScorer};

/// One output row per processed trading day.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DailySummary {
    /// Trading day
    pub quote_date: NaiveDate,
    /// Underlying close
    pub underlying_last: f64,
    /// Close-to-close return, `None` on the first day of history
    pub daily_return: Option<f64>,
    /// Compounded return since the first day of history
    pub cumulative_return: Option<f64>,
    /// Combined score of the day
    pub daily_sentiment: f64,
    /// Running sum of daily sentiment over the full history
    pub cumulative_sentiment: f64,
    /// Put volume over call volume, `None` when call volume is zero
    pub put_call_ratio: Option<f64>,
    /// News-only score of the day
    pub news_score: f64,
    /// Comparisons against the previous day
    pub comparisons: Vec<KeyedComparison>,
}

/// Drives quote loading, comparisons and scoring across trading days.
pub struct DailyPipeline<Q, N, S> {
    quotes: Q,
    news: N,
    scorer: S,
    config: PipelineConfig,
    params: DensityParams,
    parallel: ParallelConfig,
}

/// Per-day result of the scoring pass.
struct DayScore {
    put_call_ratio: Option<f64>,
    news_score: f64,
    combined_score: f64,
    comparisons: Vec<KeyedComparison>,
}

impl<Q, N, S> DailyPipeline<Q, N, S>
where
    Q: QuoteSource,
    N: NewsSource,
    S: SentimentScorer,
{
    /// Pipeline with default density parameters and parallel settings.
    pub fn new(quotes: Q, news: N, scorer: S, config: PipelineConfig) -> Self {
        Self {
            quotes,
            news,
            scorer,
            config,
            params: DensityParams::default(),
            parallel: ParallelConfig::default(),
        }
    }

    /// Override the density parameters.
    pub fn with_density_params(mut self, params: DensityParams) -> Self {
        self.params = params;
        self
    }

    /// Override the parallel settings.
    pub fn with_parallel_config(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    /// Pipeline settings.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process the last `n_days` trading days.
    ///
    /// `progress` receives the percentage of days scored so far.
    ///
    /// # Errors
    ///
    /// * `NotEnoughDays` - fewer than two trading days
    /// * `InvalidConfig` - configuration or density parameters fail validation
    /// * `Source` - the quote source failed
    ///
    /// Failures of individual comparisons are recorded in the output rows.
    pub fn run(
        &self,
        n_days: usize,
        token: &CancellationToken,
        mut progress: Option<&mut dyn FnMut(u8)>,
    ) -> Result<Vec<DailySummary>, PipelineError> {
        self.config.validate()?;
        self.params
            .validate()
            .map_err(|e| PipelineError::InvalidConfig(e.to_string()))?;

        let days = self.quotes.trading_days()?;
        if days.len() < 2 {
            return Err(PipelineError::NotEnoughDays { got: days.len() });
        }
        let start = days.len().saturating_sub(n_days).max(1);
        let rows: Vec<Vec<QuoteRow>> = days
            .iter()
            .map(|&d| self.quotes.quotes_on(d))
            .collect::<Result<_, _>>()?;

        let mut tasks = Vec::new();
        for i in start..days.len() {
            tasks.extend(self.build_tasks(days[i], &rows[i], &rows[i - 1]));
        }
        info!(
            days = days.len() - start,
            comparisons = tasks.len(),
            "dispatching comparisons"
        );
        let mut results = run_comparisons(&tasks, &self.params, token, &self.parallel)
            .into_iter()
            .peekable();

        let total = days.len() - start;
        let mut scores: Vec<Option<DayScore>> = (0..days.len()).map(|_| None).collect();
        for (done, i) in (start..days.len()).enumerate() {
            let mut comparisons = Vec::new();
            while let Some(next) = results.next_if(|r| r.key.quote_date == days[i]) {
                comparisons.push(next);
            }
            scores[i] = Some(self.score_day(days[i], &rows[i], comparisons));
            if let Some(callback) = progress.as_mut() {
                callback(((done + 1) * 100 / total) as u8);
            }
        }

        Ok(summarise(&days, &rows, scores, start))
    }

    fn build_tasks(
        &self,
        date: NaiveDate,
        today: &[QuoteRow],
        yesterday: &[QuoteRow],
    ) -> Vec<ComparisonTask> {
        let mut expirations: Vec<NaiveDate> = today
            .iter()
            .filter(|r| r.dte <= f64::from(self.config.max_dte))
            .map(|r| r.expire_date)
            .collect();
        expirations.sort();
        expirations.dedup();

        let mut tasks = Vec::new();
        for expiration in expirations {
            let current: Vec<&QuoteRow> =
                today.iter().filter(|r| r.expire_date == expiration).collect();
            let previous: Vec<&QuoteRow> =
                yesterday.iter().filter(|r| r.expire_date == expiration).collect();
            if previous.is_empty() {
                warn!(%date, %expiration, "expiration missing on previous day, skipped");
                continue;
            }
            for side in OptionSide::ALL {
                tasks.push(ComparisonTask {
                    key: ComparisonKey {
                        quote_date: date,
                        expiration,
                        side,
                    },
                    previous: self.snapshot(&previous, side),
                    current: self.snapshot(&current, side),
                });
            }
        }
        tasks
    }

    fn snapshot(&self, rows: &[&QuoteRow], side: OptionSide) -> Snapshot {
        let dte = rows.last().map_or(0.0, |r| r.dte);
        Snapshot::new(
            rows.iter().map(|r| r.last(side)).collect(),
            rows.iter().map(|r| r.strike).collect(),
            dte / self.config.trading_days_per_year,
        )
    }

    fn score_day(
        &self,
        date: NaiveDate,
        rows: &[QuoteRow],
        comparisons: Vec<KeyedComparison>,
    ) -> DayScore {
        let ticker = self.config.ticker.as_str();
        let news = self.news.fetch(date, ticker);
        let digest = self.scorer.digest_news(&news, ticker);

        let call_volume: f64 = rows.iter().map(|r| r.call_volume).sum();
        let put_volume: f64 = rows.iter().map(|r| r.put_volume).sum();
        let put_call_ratio = (call_volume != 0.0).then(|| put_volume / call_volume);

        let score = self.scorer.score(&ScoringInput {
            quote_date: date,
            ticker,
            comparisons: &comparisons,
            news_digest: &digest,
            put_call_ratio,
            call_volume,
            put_volume,
        });
        info!(
            %date,
            pcr = ?put_call_ratio,
            news_score = score.news_score,
            combined_score = score.combined_score,
            comparisons = comparisons.len(),
            "scored trading day"
        );

        DayScore {
            put_call_ratio,
            news_score: score.news_score,
            combined_score: score.combined_score,
            comparisons,
        }
    }
}

/// Returns and sentiment over the full history, emitted for `days[start..]`.
fn summarise(
    days: &[NaiveDate],
    rows: &[Vec<QuoteRow>],
    scores: Vec<Option<DayScore>>,
    start: usize,
) -> Vec<DailySummary> {
    let mut out = Vec::with_capacity(days.len() - start);
    let mut previous_close: Option<f64> = None;
    let mut growth: Option<f64> = None;
    let mut cumulative_sentiment = 0.0;

    for (i, score) in scores.into_iter().enumerate() {
        let close = rows[i].first().map_or(f64::NAN, |r| r.underlying_last);
        let daily_return = previous_close
            .map(|p| close / p - 1.0)
            .filter(|r| r.is_finite());
        if let Some(r) = daily_return {
            growth = Some(growth.unwrap_or(1.0) * (1.0 + r));
        }
        if close.is_finite() {
            previous_close = Some(close);
        }

        let daily_sentiment = score.as_ref().map_or(0.0, |s| s.combined_score);
        cumulative_sentiment += daily_sentiment;

        if i >= start {
            let (put_call_ratio, news_score, comparisons) = match score {
                Some(s) => (s.put_call_ratio, s.news_score, s.comparisons),
                None => (None, 0.0, Vec::new()),
            };
            out.push(DailySummary {
                quote_date: days[i],
                underlying_last: close,
                daily_return,
                cumulative_return: daily_return.and(growth.map(|g| g - 1.0)),
                daily_sentiment,
                cumulative_sentiment,
                put_call_ratio,
                news_score,
                comparisons,
            });
        }
    }
    out
}
