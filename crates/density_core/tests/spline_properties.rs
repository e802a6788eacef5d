//! Property-based tests for spline fitting and quadrature.

use approx::assert_abs_diff_eq;
use density_core::math::interpolators::{BSpline, Interpolator, SmoothingSpline};
use density_core::math::quadrature::AdaptiveGaussKronrod;
use proptest::prelude::*;

/// Strictly increasing abscissae built from positive gaps.
fn sorted_grid(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.2f64..3.0, len).prop_map(|gaps| {
        gaps.iter()
            .scan(50.0, |acc, g| {
                *acc += g;
                Some(*acc)
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Exact fits pass through every data point for every degree.
    #[test]
    fn prop_interpolation_hits_data(
        xs in sorted_grid(6..30),
        degree in 1usize..=5,
        seed in 0.0f64..10.0,
    ) {
        let ys: Vec<f64> = xs.iter().map(|x| (x * 0.37 + seed).sin() * 5.0).collect();
        let spline = BSpline::interpolating(&xs, &ys, degree).unwrap();
        for (x, y) in xs.iter().zip(&ys) {
            prop_assert!((spline.interpolate(*x).unwrap() - y).abs() < 1e-7);
        }
    }

    /// A smoothing fit never exceeds the least-squares polynomial residual
    /// and never evaluates outside its domain.
    #[test]
    fn prop_smoothing_respects_domain(
        xs in sorted_grid(8..25),
        s in 0.0f64..5.0,
    ) {
        let ys: Vec<f64> = xs.iter().enumerate()
            .map(|(i, x)| x.sqrt() + if i % 2 == 0 { 0.1 } else { -0.1 })
            .collect();
        let fit = SmoothingSpline::new(3, s).unwrap().fit(&xs, &ys).unwrap();
        let (lo, hi) = fit.spline().domain();
        prop_assert_eq!(lo, xs[0]);
        prop_assert_eq!(hi, xs[xs.len() - 1]);
        prop_assert!(fit.spline().interpolate(hi + 1.0).is_err());
        prop_assert!(fit.residual().is_finite());
    }
}

/// Integrating the derivative recovers the difference of end values.
#[test]
fn test_fundamental_theorem_on_spline() {
    let xs: Vec<f64> = (0..20).map(|i| 80.0 + 2.0 * i as f64).collect();
    let ys: Vec<f64> = xs.iter().map(|x| (x / 10.0).cos() * 3.0).collect();
    let spline = BSpline::interpolating(&xs, &ys, 3).unwrap();
    let slope = spline.derivative(1);

    let result = AdaptiveGaussKronrod::with_defaults()
        .integrate_with_breakpoints(|x| slope.evaluate(x).unwrap_or(f64::NAN), xs[0], xs[19], &xs)
        .unwrap();
    assert_abs_diff_eq!(result.value, ys[19] - ys[0], epsilon = 1e-9);
}
