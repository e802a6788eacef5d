//! Property-based tests of the extraction pipeline.

use density_core::analytical::BlackScholes;
use density_engine::{
    estimate_density_and_moments, extract_density, DensityParams, SmoothCurve, SmoothingParams,
    StrikeCurveBuilder,
};
use proptest::prelude::*;

fn strikes() -> Vec<f64> {
    (25..=100).map(|i| 2.0 * f64::from(i)).collect()
}

fn lognormal_calls(vol: f64, expiry: f64) -> Vec<f64> {
    let model = BlackScholes::new(100.0, 0.01, vol).unwrap();
    strikes().iter().map(|&k| model.price_call(k, expiry)).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Strike order in the input never changes the result.
    #[test]
    fn prop_sort_invariance(
        order in Just((0..12).collect::<Vec<usize>>()).prop_shuffle(),
    ) {
        let strikes: Vec<f64> = (0..12).map(|i| 80.0 + 4.0 * f64::from(i)).collect();
        let model = BlackScholes::new(100.0, 0.01, 0.25).unwrap();
        let prices: Vec<f64> = strikes.iter().map(|&k| model.price_call(k, 0.25)).collect();
        let params = DensityParams::default();

        let sorted = estimate_density_and_moments(&prices, &strikes, 0.25, &params).unwrap();
        let p: Vec<f64> = order.iter().map(|&i| prices[i]).collect();
        let k: Vec<f64> = order.iter().map(|&i| strikes[i]).collect();
        let shuffled = estimate_density_and_moments(&p, &k, 0.25, &params).unwrap();
        prop_assert_eq!(sorted, shuffled);
    }

    /// Densities are non-negative everywhere and carry unit sample mass.
    #[test]
    fn prop_non_negative_unit_mass(
        vol in 0.1f64..0.5,
        expiry in 0.1f64..1.0,
        rate in -0.01f64..0.05,
        probes in prop::collection::vec(30.0f64..220.0, 20),
    ) {
        let prices = lognormal_calls(vol, expiry);
        let grid = strikes();
        let curve = StrikeCurveBuilder::new(3).build(&prices, &grid).unwrap();
        let smooth = SmoothCurve::fit(&curve, SmoothingParams::default()).unwrap();
        let density = extract_density(&smooth, curve.strikes(), rate, expiry).unwrap();

        prop_assert!(density.values().iter().all(|v| *v >= 0.0));
        prop_assert!((density.sample_mass() - 1.0).abs() < 1e-6);
        for x in probes {
            prop_assert!(density.evaluate(x) >= 0.0);
        }
    }

    /// Moments stay inside the strike range and the spread is positive.
    #[test]
    fn prop_moments_well_formed(
        vol in 0.1f64..0.5,
        expiry in 0.1f64..1.0,
    ) {
        let prices = lognormal_calls(vol, expiry);
        let m = estimate_density_and_moments(&prices, &strikes(), expiry, &DensityParams::default())
            .unwrap();
        prop_assert!(m.mean > 50.0 && m.mean < 200.0);
        prop_assert!(m.std_dev > 0.0);
        prop_assert!(m.kurtosis > 1.0);
    }
}
