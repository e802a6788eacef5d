//! Black-Scholes pricing under lognormal terminal prices.
//!
//! Used to synthesise option curves whose risk-neutral density is known in
//! closed form, which makes it the reference for end-to-end density recovery.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T
//!
//! The terminal price S_T is lognormal with
//! E[S_T] = S·e^(rT) and Var[S_T] = E[S_T]²·(e^(σ²T) - 1).

use super::distributions::norm_cdf;
use super::error::AnalyticalError;

/// Expiries below this are priced at intrinsic value.
const EXPIRY_EPSILON: f64 = 1e-10;

/// Black-Scholes model for European option pricing.
///
/// # Examples
/// ```
/// use density_core::analytical::BlackScholes;
///
/// let bs = BlackScholes::new(100.0, 0.05, 0.2).unwrap();
/// let call = bs.price_call(100.0, 1.0);
/// let put = bs.price_put(100.0, 1.0);
///
/// // Put-call parity: C - P = S - K*exp(-rT)
/// let parity = call - put - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholes {
    spot: f64,
    rate: f64,
    volatility: f64,
}

impl BlackScholes {
    /// Creates a new Black-Scholes model.
    ///
    /// # Errors
    /// - `AnalyticalError::InvalidSpot` if spot is not a positive finite number
    /// - `AnalyticalError::InvalidVolatility` if volatility is not a positive finite number
    pub fn new(spot: f64, rate: f64, volatility: f64) -> Result<Self, AnalyticalError> {
        if !(spot.is_finite() && spot > 0.0) {
            return Err(AnalyticalError::InvalidSpot { spot });
        }
        if !(volatility.is_finite() && volatility > 0.0) {
            return Err(AnalyticalError::InvalidVolatility { volatility });
        }
        Ok(Self {
            spot,
            rate,
            volatility,
        })
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// d₁ = (ln(S/K) + (r + σ²/2)T) / (σ√T)
    #[inline]
    pub fn d1(&self, strike: f64, expiry: f64) -> f64 {
        let vol_sqrt_t = self.volatility * expiry.sqrt();
        ((self.spot / strike).ln() + (self.rate + 0.5 * self.volatility * self.volatility) * expiry)
            / vol_sqrt_t
    }

    /// d₂ = d₁ - σ√T
    #[inline]
    pub fn d2(&self, strike: f64, expiry: f64) -> f64 {
        self.d1(strike, expiry) - self.volatility * expiry.sqrt()
    }

    /// European call price.
    pub fn price_call(&self, strike: f64, expiry: f64) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return (self.spot - strike).max(0.0);
        }
        let discount = (-self.rate * expiry).exp();
        self.spot * norm_cdf(self.d1(strike, expiry))
            - strike * discount * norm_cdf(self.d2(strike, expiry))
    }

    /// European put price.
    pub fn price_put(&self, strike: f64, expiry: f64) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return (strike - self.spot).max(0.0);
        }
        let discount = (-self.rate * expiry).exp();
        strike * discount * norm_cdf(-self.d2(strike, expiry))
            - self.spot * norm_cdf(-self.d1(strike, expiry))
    }

    /// Mean of the risk-neutral terminal price, S·e^(rT).
    pub fn terminal_mean(&self, expiry: f64) -> f64 {
        self.spot * (self.rate * expiry).exp()
    }

    /// Standard deviation of the risk-neutral terminal price.
    pub fn terminal_std_dev(&self, expiry: f64) -> f64 {
        let variance_factor = (self.volatility * self.volatility * expiry).exp_m1();
        self.terminal_mean(expiry) * variance_factor.sqrt()
    }

    /// Lognormal risk-neutral density of the terminal price at `x`.
    pub fn terminal_density(&self, x: f64, expiry: f64) -> f64 {
        if x <= 0.0 || expiry <= EXPIRY_EPSILON {
            return 0.0;
        }
        let s = self.volatility * expiry.sqrt();
        let mu = self.spot.ln() + (self.rate - 0.5 * self.volatility * self.volatility) * expiry;
        let z = (x.ln() - mu) / s;
        (-0.5 * z * z).exp() / (x * s * (2.0 * std::f64::consts::PI).sqrt())
    }
}
