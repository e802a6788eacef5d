//! Synthetic option chains.
//!
//! The underlying follows a seeded geometric Brownian motion over weekdays;
//! each day lists Black-Scholes call and put prices for weekly (Friday)
//! expirations on a fixed strike grid. Deterministic for a given seed.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use density_core::analytical::BlackScholes;
use density_engine::{QuoteRow, QuoteSource, SourceError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

use crate::error::LoaderError;

/// Generator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticConfig {
    /// First trading day (weekends are skipped)
    pub start: NaiveDate,
    /// Number of trading days
    pub n_days: usize,
    /// Underlying level on the first day
    pub initial_spot: f64,
    /// Risk-free rate used for pricing
    pub rate: f64,
    /// Volatility of both the path and the option prices
    pub volatility: f64,
    /// Annual drift of the path
    pub drift: f64,
    /// Strikes as fractions of spot, e.g. `0.8..=1.2`
    pub moneyness: Vec<f64>,
    /// Longest expiration listed, in calendar days
    pub max_expiry_days: i64,
    /// Days-to-expiry divisor used for pricing
    pub trading_days_per_year: f64,
    /// RNG seed
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap_or_default(),
            n_days: 15,
            initial_spot: 100.0,
            rate: 0.01,
            volatility: 0.2,
            drift: 0.0,
            moneyness: (0..=40).map(|i| 0.8 + 0.01 * f64::from(i)).collect(),
            max_expiry_days: 21,
            trading_days_per_year: 252.0,
            seed: 7,
        }
    }
}

impl SyntheticConfig {
    /// Check ranges.
    pub fn validate(&self) -> Result<(), LoaderError> {
        if self.n_days == 0 {
            return Err(LoaderError::InvalidConfig("n_days must be > 0".to_string()));
        }
        if !self.initial_spot.is_finite() || self.initial_spot <= 0.0 {
            return Err(LoaderError::InvalidConfig(format!(
                "initial_spot must be positive, got {}",
                self.initial_spot
            )));
        }
        if self.moneyness.iter().any(|m| !m.is_finite() || *m <= 0.0) {
            return Err(LoaderError::InvalidConfig(
                "moneyness values must be positive".to_string(),
            ));
        }
        if self.max_expiry_days < 1 {
            return Err(LoaderError::InvalidConfig(
                "max_expiry_days must be >= 1".to_string(),
            ));
        }
        if !self.trading_days_per_year.is_finite() || self.trading_days_per_year <= 0.0 {
            return Err(LoaderError::InvalidConfig(
                "trading_days_per_year must be positive".to_string(),
            ));
        }
        BlackScholes::new(self.initial_spot, self.rate, self.volatility)
            .map_err(|e| LoaderError::InvalidConfig(e.to_string()))?;
        Ok(())
    }
}

/// Quote source over a generated history.
#[derive(Debug, Clone)]
pub struct SyntheticQuoteSource {
    by_day: BTreeMap<NaiveDate, Vec<QuoteRow>>,
}

impl SyntheticQuoteSource {
    /// Generate the full history up front.
    pub fn generate(config: &SyntheticConfig) -> Result<Self, LoaderError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let dt = 1.0 / config.trading_days_per_year;
        let drift = (config.drift - 0.5 * config.volatility * config.volatility) * dt;
        let diffusion = config.volatility * dt.sqrt();

        let mut by_day = BTreeMap::new();
        let mut spot = config.initial_spot;
        for (i, date) in weekdays(config.start).take(config.n_days).enumerate() {
            if i > 0 {
                let z: f64 = StandardNormal.sample(&mut rng);
                spot *= (drift + diffusion * z).exp();
            }
            by_day.insert(date, Self::chain(config, date, spot)?);
        }
        Ok(Self { by_day })
    }

    fn chain(
        config: &SyntheticConfig,
        date: NaiveDate,
        spot: f64,
    ) -> Result<Vec<QuoteRow>, LoaderError> {
        let model = BlackScholes::new(spot, config.rate, config.volatility)
            .map_err(|e| LoaderError::InvalidConfig(e.to_string()))?;
        let mut strikes: Vec<f64> = config
            .moneyness
            .iter()
            .map(|m| (m * spot).round())
            .collect();
        strikes.sort_by(f64::total_cmp);
        strikes.dedup();

        let mut rows = Vec::new();
        for expiry in fridays_within(date, config.max_expiry_days) {
            let dte = (expiry - date).num_days() as f64;
            let tau = dte / config.trading_days_per_year;
            for &strike in &strikes {
                let activity = 1000.0 * (-((strike - spot) / (0.05 * spot)).powi(2)).exp();
                rows.push(QuoteRow {
                    quote_date: date,
                    expire_date: expiry,
                    strike,
                    call_last: model.price_call(strike, tau).max(0.0),
                    put_last: model.price_put(strike, tau).max(0.0),
                    dte,
                    underlying_last: spot,
                    call_volume: activity.round(),
                    put_volume: (activity * if strike < spot { 1.3 } else { 0.7 }).round(),
                });
            }
        }
        rows.sort_by(|a, b| a.strike.total_cmp(&b.strike));
        Ok(rows)
    }
}

impl QuoteSource for SyntheticQuoteSource {
    fn trading_days(&self) -> Result<Vec<NaiveDate>, SourceError> {
        Ok(self.by_day.keys().copied().collect())
    }

    fn quotes_on(&self, date: NaiveDate) -> Result<Vec<QuoteRow>, SourceError> {
        Ok(self.by_day.get(&date).cloned().unwrap_or_default())
    }
}

fn weekdays(start: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start
        .iter_days()
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
}

/// Fridays strictly after `date` and at most `horizon` days away.
fn fridays_within(date: NaiveDate, horizon: i64) -> Vec<NaiveDate> {
    (1..=horizon)
        .map(|k| date + Duration::days(k))
        .filter(|d| d.weekday() == Weekday::Fri)
        .collect()
}
