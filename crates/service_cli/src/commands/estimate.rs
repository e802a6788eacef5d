//! Estimate command implementation
//!
//! One density/moment estimation from strikes and prices given on the
//! command line.

use density_engine::{estimate_density_and_moments, DensityParams, MomentRecord};
use serde::Serialize;
use tracing::info;

use super::OutputFormat;
use crate::config::CliConfig;
use crate::{CliError, Result};

/// Flags of the `estimate` command.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateArgs {
    /// Strike grid
    pub strikes: Vec<f64>,
    /// Option prices aligned with `strikes`
    pub prices: Vec<f64>,
    /// Days to expiry
    pub dte: f64,
    /// Risk-free rate override
    pub rate: Option<f64>,
    /// Smoothing factor override
    pub smoothing: Option<f64>,
    /// Spline degree override
    pub degree: Option<usize>,
    /// Output format
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct EstimateOutput {
    time_to_maturity: f64,
    params: DensityParams,
    moments: MomentRecord,
}

/// Run the estimate command
pub fn run(config: &CliConfig, args: &EstimateArgs) -> Result<()> {
    println!("{}", execute(config, args)?);
    Ok(())
}

/// Estimate and render, without printing.
pub fn execute(config: &CliConfig, args: &EstimateArgs) -> Result<String> {
    if !args.dte.is_finite() || args.dte <= 0.0 {
        return Err(CliError::InvalidArgument(format!(
            "dte must be positive, got {}",
            args.dte
        )));
    }
    if args.strikes.len() != args.prices.len() {
        return Err(CliError::InvalidArgument(format!(
            "{} strikes but {} prices",
            args.strikes.len(),
            args.prices.len()
        )));
    }

    let mut params = config.density;
    if let Some(rate) = args.rate {
        params.risk_free_rate = rate;
    }
    if let Some(smoothing) = args.smoothing {
        params.smoothing_factor = smoothing;
    }
    if let Some(degree) = args.degree {
        params.spline_degree = degree;
    }
    params.validate()?;

    let tau = args.dte / config.pipeline.trading_days_per_year;
    info!(strikes = args.strikes.len(), tau, "estimating density");
    let moments = estimate_density_and_moments(&args.prices, &args.strikes, tau, &params)?;

    match args.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&EstimateOutput {
            time_to_maturity: tau,
            params,
            moments,
        })?),
        OutputFormat::Table => Ok(render_table(tau, &moments)),
    }
}

fn render_table(tau: f64, m: &MomentRecord) -> String {
    let rows = [
        ("τ (years)", tau),
        ("Mean", m.mean),
        ("Std dev", m.std_dev),
        ("Skewness", m.skewness),
        ("Kurtosis", m.kurtosis),
    ];
    let mut out = String::new();
    out.push_str("┌────────────┬──────────────┐\n");
    out.push_str("│ Moment     │ Value        │\n");
    out.push_str("├────────────┼──────────────┤\n");
    for (name, value) in rows {
        out.push_str(&format!("│ {:<10} │ {:>12.6} │\n", name, value));
    }
    out.push_str("└────────────┴──────────────┘");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    // Decreasing convex prices whose second derivative is symmetric about 100.
    fn args(format: OutputFormat) -> EstimateArgs {
        let strikes: Vec<f64> = (60..=140).step_by(2).map(f64::from).collect();
        let prices = strikes
            .iter()
            .map(|&k| {
                let x = (k - 100.0) / 10.0;
                10.0 * ((x * x + 1.0).sqrt() - x)
            })
            .collect();
        EstimateArgs {
            strikes,
            prices,
            dte: 30.0,
            rate: Some(0.0),
            smoothing: None,
            degree: None,
            format,
        }
    }

    #[test]
    fn test_json_output() {
        let out = execute(&CliConfig::default(), &args(OutputFormat::Json)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let mean = value["moments"]["mean"].as_f64().unwrap();
        let skewness = value["moments"]["skewness"].as_f64().unwrap();
        let tau = value["time_to_maturity"].as_f64().unwrap();
        assert_abs_diff_eq!(mean, 100.0, epsilon = 1.0);
        assert_abs_diff_eq!(skewness, 0.0, epsilon = 0.05);
        assert_relative_eq!(tau, 30.0 / 252.0, max_relative = 1e-12);
        assert_eq!(value["params"]["risk_free_rate"], 0.0);
    }

    #[test]
    fn test_json_matches_engine() {
        let a = args(OutputFormat::Json);
        let out = execute(&CliConfig::default(), &a).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        let params = DensityParams {
            risk_free_rate: 0.0,
            ..CliConfig::default().density
        };
        let direct =
            estimate_density_and_moments(&a.prices, &a.strikes, 30.0 / 252.0, &params).unwrap();
        for (field, expected) in [
            ("mean", direct.mean),
            ("std_dev", direct.std_dev),
            ("skewness", direct.skewness),
            ("kurtosis", direct.kurtosis),
        ] {
            let got = value["moments"][field].as_f64().unwrap();
            assert_relative_eq!(got, expected, max_relative = 1e-12, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_table_output() {
        let out = execute(&CliConfig::default(), &args(OutputFormat::Table)).unwrap();
        assert!(out.contains("Skewness"));
        assert_eq!(out.lines().count(), 9);
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        let mut a = args(OutputFormat::Table);
        a.prices.pop();
        assert!(matches!(
            execute(&CliConfig::default(), &a),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rejects_bad_degree() {
        let mut a = args(OutputFormat::Table);
        a.degree = Some(0);
        assert!(matches!(
            execute(&CliConfig::default(), &a),
            Err(CliError::Density(_))
        ));
    }

    #[test]
    fn test_too_few_strikes() {
        let a = EstimateArgs {
            strikes: vec![90.0, 100.0],
            prices: vec![10.0, 5.0],
            ..args(OutputFormat::Table)
        };
        assert!(matches!(
            execute(&CliConfig::default(), &a),
            Err(CliError::Density(_))
        ));
    }
}
