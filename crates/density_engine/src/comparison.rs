//! Two-point comparison of implied moments.

use tracing::warn;

use crate::config::DensityParams;
use crate::error::DensityError;
use crate::estimate::estimate_density_and_moments;
use crate::moments::MomentRecord;

/// Option prices for one expiration and side at one point in time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// Option prices aligned with `strikes`
    pub prices: Vec<f64>,
    /// Strikes in any order
    pub strikes: Vec<f64>,
    /// Time to maturity in years
    pub time_to_maturity: f64,
}

impl Snapshot {
    /// Snapshot from parallel price and strike vectors.
    pub fn new(prices: Vec<f64>, strikes: Vec<f64>, time_to_maturity: f64) -> Self {
        Self {
            prices,
            strikes,
            time_to_maturity,
        }
    }

    /// Run the single-invocation estimate on this snapshot.
    pub fn estimate(&self, params: &DensityParams) -> Result<MomentRecord, DensityError> {
        estimate_density_and_moments(&self.prices, &self.strikes, self.time_to_maturity, params)
    }
}

/// Outcomes at `t` and `t - 1`, each independent of the other.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComparisonResult {
    /// Moments at `t`
    pub current: Result<MomentRecord, DensityError>,
    /// Moments at `t - 1`
    pub previous: Result<MomentRecord, DensityError>,
}

impl ComparisonResult {
    /// Both sides cancelled.
    pub fn cancelled() -> Self {
        Self {
            current: Err(DensityError::Cancelled),
            previous: Err(DensityError::Cancelled),
        }
    }

    /// Both sides succeeded.
    pub fn is_complete(&self) -> bool {
        self.current.is_ok() && self.previous.is_ok()
    }

    /// `(current, previous)` when both sides succeeded.
    pub fn pair(&self) -> Option<(&MomentRecord, &MomentRecord)> {
        match (&self.current, &self.previous) {
            (Ok(c), Ok(p)) => Some((c, p)),
            _ => None,
        }
    }
}

/// Estimate both snapshots. A failure on one side is logged and returned
/// without affecting the other.
pub fn compare_snapshots(
    previous: &Snapshot,
    current: &Snapshot,
    params: &DensityParams,
) -> ComparisonResult {
    let current = current.estimate(params);
    if let Err(e) = &current {
        warn!(side = "current", kind = %e.kind(), error = %e, "density estimation failed");
    }
    let previous = previous.estimate(params);
    if let Err(e) = &previous {
        warn!(side = "previous", kind = %e.kind(), error = %e, "density estimation failed");
    }
    ComparisonResult { current, previous }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DensityErrorKind;

    fn scenario() -> Snapshot {
        Snapshot::new(
            vec![12.0, 8.0, 5.0, 2.5, 1.0],
            vec![90.0, 95.0, 100.0, 105.0, 110.0],
            10.0 / 252.0,
        )
    }

    #[test]
    fn test_both_sides_succeed() {
        let result = compare_snapshots(&scenario(), &scenario(), &DensityParams::default());
        assert!(result.is_complete());
        let (current, previous) = result.pair().unwrap();
        assert_eq!(current, previous);
    }

    #[test]
    fn test_failure_is_isolated() {
        // Linear prices have no curvature, so the implied density has no mass.
        let mut flat = scenario();
        flat.prices = flat.strikes.iter().map(|k| 120.0 - k).collect();
        let result = compare_snapshots(&flat, &scenario(), &DensityParams::default());
        assert!(result.current.is_ok());
        assert_eq!(
            result.previous.as_ref().unwrap_err().kind(),
            DensityErrorKind::DegenerateDensity
        );
        assert!(result.pair().is_none());
    }

    #[test]
    fn test_infinite_price_is_invalid_input() {
        let mut broken = scenario();
        broken.prices[2] = f64::INFINITY;
        let result = compare_snapshots(&scenario(), &broken, &DensityParams::default());
        assert!(result.previous.is_ok());
        assert_eq!(
            result.current.as_ref().unwrap_err().kind(),
            DensityErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_cancelled_result() {
        let result = ComparisonResult::cancelled();
        assert_eq!(result.current, Err(DensityError::Cancelled));
        assert!(!result.is_complete());
    }
}
