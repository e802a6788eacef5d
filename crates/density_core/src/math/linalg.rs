//! Small dense linear solvers for spline fitting.
//!
//! Matrices are row-major `Vec<Vec<f64>>`. Systems here are at most a few
//! hundred unknowns (one per strike), so dense factorisations are adequate.

/// Pivot magnitudes below this are treated as singular.
const PIVOT_EPSILON: f64 = 1e-300;

/// Solve `A x = b` by LU decomposition with partial pivoting.
///
/// Returns `None` when the matrix is singular, not square, or the
/// dimensions do not match.
///
/// # Example
/// ```
/// use density_core::math::linalg::solve_lu;
///
/// let a = vec![vec![0.0, 2.0], vec![3.0, 1.0]];
/// let x = solve_lu(a, vec![4.0, 5.0]).unwrap();
/// assert!((x[0] - 1.0).abs() < 1e-12);
/// assert!((x[1] - 2.0).abs() < 1e-12);
/// ```
pub fn solve_lu(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n || a.iter().any(|row| row.len() != n) {
        return None;
    }

    let scale = a
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return None;
    }
    let tolerance = scale * f64::EPSILON * n as f64 * 1e-3;

    for col in 0..n {
        let pivot_row = (col..n).max_by(|&i, &j| {
            a[i][col]
                .abs()
                .partial_cmp(&a[j][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if a[pivot_row][col].abs() <= tolerance.max(PIVOT_EPSILON) {
            return None;
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        let pivot = a[col][col];
        for row in (col + 1)..n {
            let factor = a[row][col] / pivot;
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= a[i][j] * x[j];
        }
        x[i] = sum / a[i][i];
    }
    Some(x)
}

/// Solve `A x = b` for symmetric positive definite `A` using Cholesky
/// decomposition.
///
/// Returns `None` when `A` is not positive definite.
pub fn solve_cholesky(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    // A = L L^T
    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }
            if i == j {
                if sum <= 0.0 || sum.is_nan() {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // L y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // L^T x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}

/// Compute `Aᵀ A` for a row-major `m × n` matrix.
pub fn gram(a: &[Vec<f64>], n: usize) -> Vec<Vec<f64>> {
    let mut out = vec![vec![0.0; n]; n];
    for row in a {
        for i in 0..n {
            let ri = row[i];
            if ri == 0.0 {
                continue;
            }
            for j in 0..n {
                out[i][j] += ri * row[j];
            }
        }
    }
    out
}

/// Compute `Aᵀ y` for a row-major `m × n` matrix.
pub fn transpose_mul(a: &[Vec<f64>], y: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![0.0; n];
    for (row, &yi) in a.iter().zip(y) {
        for (o, &r) in out.iter_mut().zip(row.iter()) {
            *o += r * yi;
        }
    }
    out
}
