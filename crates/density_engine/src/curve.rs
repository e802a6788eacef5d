//! Strike-ordered price curves.
//!
//! [`StrikeCurveBuilder`] turns parallel `prices`/`strikes` slices in any
//! order into a [`StrikeCurve`]: strictly ascending strikes, one price per
//! strike, at least `degree + 1` points.

use crate::error::DensityError;

/// A single observed option price.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quote {
    /// Strike price
    pub strike: f64,
    /// Observed option price (`>= 0`)
    pub price: f64,
}

/// How the builder resolves repeated strikes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DuplicatePolicy {
    /// Fail with [`DensityError::DuplicateStrike`].
    #[default]
    Reject,
    /// Keep the price that appeared first in the input.
    KeepFirst,
    /// Keep the price that appeared last in the input.
    KeepLast,
    /// Average all prices quoted at the strike.
    Average,
}

/// Quotes sorted strictly ascending by strike.
///
/// Only [`StrikeCurveBuilder`] constructs this type.
#[derive(Debug, Clone, PartialEq)]
pub struct StrikeCurve {
    strikes: Vec<f64>,
    prices: Vec<f64>,
}

impl StrikeCurve {
    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.strikes.len()
    }

    /// Always false for a built curve; provided for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strikes.is_empty()
    }

    /// Strictly increasing strikes.
    #[inline]
    pub fn strikes(&self) -> &[f64] {
        &self.strikes
    }

    /// Prices aligned with [`strikes`](Self::strikes).
    #[inline]
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    /// Iterate the curve as quotes.
    pub fn quotes(&self) -> impl Iterator<Item = Quote> + '_ {
        self.strikes
            .iter()
            .zip(&self.prices)
            .map(|(&strike, &price)| Quote { strike, price })
    }

    /// `(min strike, max strike)`.
    pub fn domain(&self) -> (f64, f64) {
        (self.strikes[0], self.strikes[self.strikes.len() - 1])
    }
}

/// Validating constructor for [`StrikeCurve`].
///
/// # Examples
/// ```
/// use density_engine::{DuplicatePolicy, StrikeCurveBuilder};
///
/// let curve = StrikeCurveBuilder::new(3)
///     .with_duplicate_policy(DuplicatePolicy::KeepLast)
///     .build(&[1.0, 5.0, 3.0, 8.0, 12.0], &[110.0, 100.0, 105.0, 95.0, 90.0])
///     .unwrap();
/// assert_eq!(curve.strikes(), &[90.0, 95.0, 100.0, 105.0, 110.0]);
/// assert_eq!(curve.prices(), &[12.0, 8.0, 5.0, 3.0, 1.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeCurveBuilder {
    degree: usize,
    duplicate_policy: DuplicatePolicy,
}

impl StrikeCurveBuilder {
    /// Builder for curves that will be fitted with a spline of `degree`.
    pub fn new(degree: usize) -> Self {
        Self {
            degree,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }

    /// Set the duplicate-strike policy.
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Minimum number of distinct strikes.
    #[inline]
    pub fn min_points(&self) -> usize {
        self.degree + 1
    }

    /// Validate, sort and deduplicate.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - length mismatch, non-finite strike, non-finite or negative price
    /// * `DuplicateStrike` - repeated strike under [`DuplicatePolicy::Reject`]
    /// * `InsufficientData` - fewer than `degree + 1` distinct strikes
    pub fn build(&self, prices: &[f64], strikes: &[f64]) -> Result<StrikeCurve, DensityError> {
        if prices.len() != strikes.len() {
            return Err(DensityError::InvalidInput(format!(
                "prices and strikes differ in length ({} vs {})",
                prices.len(),
                strikes.len()
            )));
        }
        for (i, (&price, &strike)) in prices.iter().zip(strikes).enumerate() {
            if !strike.is_finite() {
                return Err(DensityError::InvalidInput(format!(
                    "strike at index {} is not finite: {}",
                    i, strike
                )));
            }
            if !price.is_finite() || price < 0.0 {
                return Err(DensityError::InvalidInput(format!(
                    "price at index {} must be finite and non-negative, got {}",
                    i, price
                )));
            }
        }

        let mut order: Vec<usize> = (0..strikes.len()).collect();
        order.sort_by(|&a, &b| strikes[a].total_cmp(&strikes[b]));

        let mut out_strikes = Vec::with_capacity(order.len());
        let mut out_prices = Vec::with_capacity(order.len());
        let mut start = 0;
        while start < order.len() {
            let strike = strikes[order[start]];
            let mut end = start + 1;
            while end < order.len() && strikes[order[end]] == strike {
                end += 1;
            }
            let group = &order[start..end];
            let price = if group.len() == 1 {
                prices[group[0]]
            } else {
                self.resolve(strike, group, prices)?
            };
            out_strikes.push(strike);
            out_prices.push(price);
            start = end;
        }

        let need = self.min_points();
        if out_strikes.len() < need {
            return Err(DensityError::InsufficientData {
                got: out_strikes.len(),
                need,
            });
        }

        Ok(StrikeCurve {
            strikes: out_strikes,
            prices: out_prices,
        })
    }

    /// `group` holds input indices of one strike in input order (stable sort).
    fn resolve(&self, strike: f64, group: &[usize], prices: &[f64]) -> Result<f64, DensityError> {
        match self.duplicate_policy {
            DuplicatePolicy::Reject => Err(DensityError::DuplicateStrike { strike }),
            DuplicatePolicy::KeepFirst => Ok(prices[group[0]]),
            DuplicatePolicy::KeepLast => Ok(prices[group[group.len() - 1]]),
            DuplicatePolicy::Average => {
                Ok(group.iter().map(|&i| prices[i]).sum::<f64>() / group.len() as f64)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DensityErrorKind;

    const STRIKES: [f64; 5] = [90.0, 95.0, 100.0, 105.0, 110.0];
    const PRICES: [f64; 5] = [12.0, 8.0, 5.0, 2.5, 1.0];

    // ========================================
    // Ordering
    // ========================================

    #[test]
    fn test_sorted_input_is_unchanged() {
        let curve = StrikeCurveBuilder::new(3).build(&PRICES, &STRIKES).unwrap();
        assert_eq!(curve.strikes(), &STRIKES);
        assert_eq!(curve.prices(), &PRICES);
        assert_eq!(curve.len(), 5);
        assert!(!curve.is_empty());
        assert_eq!(curve.domain(), (90.0, 110.0));
    }

    #[test]
    fn test_reversed_input_is_sorted() {
        let strikes: Vec<f64> = STRIKES.iter().rev().copied().collect();
        let prices: Vec<f64> = PRICES.iter().rev().copied().collect();
        let curve = StrikeCurveBuilder::new(3).build(&prices, &strikes).unwrap();
        assert_eq!(curve.strikes(), &STRIKES);
        assert_eq!(curve.prices(), &PRICES);
    }

    #[test]
    fn test_quotes_iterator() {
        let curve = StrikeCurveBuilder::new(3).build(&PRICES, &STRIKES).unwrap();
        let quotes: Vec<Quote> = curve.quotes().collect();
        assert_eq!(quotes.len(), 5);
        assert_eq!(
            quotes[2],
            Quote {
                strike: 100.0,
                price: 5.0
            }
        );
    }

    // ========================================
    // Duplicates
    // ========================================

    fn with_duplicate() -> (Vec<f64>, Vec<f64>) {
        let strikes = vec![100.0, 90.0, 95.0, 100.0, 105.0, 110.0];
        let prices = vec![4.0, 12.0, 8.0, 6.0, 2.5, 1.0];
        (prices, strikes)
    }

    #[test]
    fn test_duplicate_rejected_by_default() {
        let (prices, strikes) = with_duplicate();
        let err = StrikeCurveBuilder::new(3).build(&prices, &strikes).unwrap_err();
        assert_eq!(err, DensityError::DuplicateStrike { strike: 100.0 });
    }

    #[test]
    fn test_duplicate_policies() {
        let (prices, strikes) = with_duplicate();
        let price_at_100 = |policy| {
            let curve = StrikeCurveBuilder::new(3)
                .with_duplicate_policy(policy)
                .build(&prices, &strikes)
                .unwrap();
            assert_eq!(curve.len(), 5);
            curve.prices()[2]
        };
        assert_eq!(price_at_100(DuplicatePolicy::KeepFirst), 4.0);
        assert_eq!(price_at_100(DuplicatePolicy::KeepLast), 6.0);
        assert_eq!(price_at_100(DuplicatePolicy::Average), 5.0);
    }

    #[test]
    fn test_duplicates_count_once_toward_minimum() {
        let strikes = [100.0, 100.0, 105.0, 105.0, 110.0];
        let prices = [5.0, 5.0, 3.0, 3.0, 1.0];
        let err = StrikeCurveBuilder::new(3)
            .with_duplicate_policy(DuplicatePolicy::KeepFirst)
            .build(&prices, &strikes)
            .unwrap_err();
        assert_eq!(err, DensityError::InsufficientData { got: 3, need: 4 });
    }

    // ========================================
    // Validation
    // ========================================

    #[test]
    fn test_insufficient_data() {
        let err = StrikeCurveBuilder::new(3)
            .build(&[5.0, 3.0, 1.0], &[100.0, 105.0, 110.0])
            .unwrap_err();
        assert_eq!(err, DensityError::InsufficientData { got: 3, need: 4 });

        // A lower degree needs fewer points.
        assert!(StrikeCurveBuilder::new(2)
            .build(&[5.0, 3.0, 1.0], &[100.0, 105.0, 110.0])
            .is_ok());
    }

    #[test]
    fn test_length_mismatch() {
        let err = StrikeCurveBuilder::new(3)
            .build(&PRICES[..4], &STRIKES)
            .unwrap_err();
        assert_eq!(err.kind(), DensityErrorKind::InvalidInput);
    }

    #[test]
    fn test_bad_values_rejected() {
        let builder = StrikeCurveBuilder::new(3);

        let mut prices = PRICES;
        prices[1] = f64::NAN;
        assert_eq!(
            builder.build(&prices, &STRIKES).unwrap_err().kind(),
            DensityErrorKind::InvalidInput
        );

        prices[1] = -0.5;
        assert_eq!(
            builder.build(&prices, &STRIKES).unwrap_err().kind(),
            DensityErrorKind::InvalidInput
        );

        prices[2] = f64::INFINITY;
        assert_eq!(
            builder.build(&prices, &STRIKES).unwrap_err().kind(),
            DensityErrorKind::InvalidInput
        );

        let mut strikes = STRIKES;
        strikes[3] = f64::INFINITY;
        assert_eq!(
            builder.build(&PRICES, &strikes).unwrap_err().kind(),
            DensityErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_zero_prices_allowed() {
        let prices = [3.0, 1.0, 0.0, 0.0, 0.0];
        assert!(StrikeCurveBuilder::new(3).build(&prices, &STRIKES).is_ok());
    }
}
