// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Scalar Bell Recursion
// ─────────────────────────────────────────────────────────────────────
//! Newton-identity expansion of `exp(Σ aₖ xᵏ)` truncated at order `n_max`:
//!
//!   d₀ = 1,  dₙ = (1/n) · Σ_{k=1..n} k · d_{n−k} · a_{k−1}
//!
//! evaluated column-wise for every evaluation point at once.

use ndarray::{Array1, Array2, ArrayView2, Axis, Zip};
use num_complex::Complex64;

/// Coefficients `d` of shape `(points, n_max + 1)` from `a` of shape
/// `(points, n_max)`. Column `k − 1` of `a` holds the length-k aggregate.
pub fn bell_iteration(a: ArrayView2<'_, Complex64>, n_max: usize) -> Array2<Complex64> {
    debug_assert!(a.ncols() >= n_max);
    let points = a.nrows();
    let mut d = Array2::<Complex64>::zeros((points, n_max + 1));
    d.column_mut(0).fill(Complex64::new(1.0, 0.0));

    for n in 1..=n_max {
        let inv_n = 1.0 / n as f64;
        let (lower, mut upper) = d.view_mut().split_at(Axis(1), n);
        let mut dn = upper.column_mut(0);
        for k in 1..=n {
            let weight = k as f64;
            Zip::from(&mut dn)
                .and(lower.column(n - k))
                .and(a.column(k - 1))
                .for_each(|out, &prev, &ak| *out += prev * weight * ak);
        }
        dn.mapv_inplace(|v| v * inv_n);
    }
    d
}

/// Σₙ dₙ per evaluation point, accumulated in ascending order.
pub fn series_sum(d: &Array2<Complex64>) -> Array1<Complex64> {
    let mut total = Array1::<Complex64>::zeros(d.nrows());
    for column in d.columns() {
        total += &column;
    }
    total
}
