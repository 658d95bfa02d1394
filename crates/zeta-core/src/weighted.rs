// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Weighted Bell Recursion
// ─────────────────────────────────────────────────────────────────────
//! Two-channel generalisation of the Bell recursion with an `s`-derivative
//! axis.
//!
//! Array layout `(points, order, derivative, channel, rows, cols)`. Channel
//! 0 is the unweighted reference, channel 1 carries the orbit integrals.
//! Derivatives combine by the Leibniz rule, channels by the product rule:
//!
//!   D[n,d,0] += (k/n)·C(d,m)·D[n−k,m,0]·A[k−1,d−m,0]
//!   D[n,d,1] += (k/n)·C(d,m)·(D[n−k,m,1]·A[k−1,d−m,0] + D[n−k,m,0]·A[k−1,d−m,1])
//!
//! The `1/n` factor is applied after the sum over k, in the same order as
//! the scalar recursion, so channel 0 at d = 0 matches it bit for bit.

use ndarray::{s, Array5, Array6, ArrayView6, Axis, Zip};
use num_complex::Complex64;

use zeta_types::{ZetaError, ZetaResult};

/// Number of channels (unweighted, weighted).
pub const CHANNELS: usize = 2;

/// Pascal triangle `C(d, m)` for `0 ≤ m ≤ d ≤ d_max`.
pub fn binomial_table(d_max: usize) -> Vec<Vec<f64>> {
    let mut table: Vec<Vec<f64>> = Vec::with_capacity(d_max + 1);
    for d in 0..=d_max {
        let mut row = vec![1.0; d + 1];
        for m in 1..d {
            row[m] = table[d - 1][m - 1] + table[d - 1][m];
        }
        table.push(row);
    }
    table
}

/// Coefficients of shape `(points, n_max + 1, d_max + 1, 2, rows, cols)`
/// from aggregates `af` of shape `(points, n_max, d_max + 1, 2, rows, cols)`.
pub fn weighted_bell_iteration(
    af: ArrayView6<'_, Complex64>,
    n_max: usize,
    d_max: usize,
) -> ZetaResult<Array6<Complex64>> {
    let (points, orders, derivs, channels, rows, cols) = af.dim();
    if orders < n_max || derivs != d_max + 1 || channels != CHANNELS {
        return Err(ZetaError::Domain(format!(
            "aggregate array of shape {:?} does not fit n_max={n_max}, d_max={d_max}",
            af.dim()
        )));
    }
    let binom = binomial_table(d_max);
    let mut dd = Array6::<Complex64>::zeros((points, n_max + 1, d_max + 1, CHANNELS, rows, cols));
    dd.slice_mut(s![.., 0, 0, 0, .., ..])
        .fill(Complex64::new(1.0, 0.0));

    for n in 1..=n_max {
        let inv_n = 1.0 / n as f64;
        let (lower, mut upper) = dd.view_mut().split_at(Axis(1), n);
        let mut dn = upper.index_axis_mut(Axis(1), 0);
        for k in 1..=n {
            let prev = lower.index_axis(Axis(1), n - k);
            let a = af.index_axis(Axis(1), k - 1);
            for d in 0..=d_max {
                for m in 0..=d {
                    let weight = k as f64 * binom[d][m];
                    let prev0 = prev.slice(s![.., m, 0, .., ..]);
                    let prev1 = prev.slice(s![.., m, 1, .., ..]);
                    let a0 = a.slice(s![.., d - m, 0, .., ..]);
                    let a1 = a.slice(s![.., d - m, 1, .., ..]);
                    Zip::from(dn.slice_mut(s![.., d, 0, .., ..]))
                        .and(&prev0)
                        .and(&a0)
                        .for_each(|out, &p0, &x0| *out += p0 * weight * x0);
                    Zip::from(dn.slice_mut(s![.., d, 1, .., ..]))
                        .and(&prev0)
                        .and(&prev1)
                        .and(&a0)
                        .and(&a1)
                        .for_each(|out, &p0, &p1, &x0, &x1| {
                            *out += p1 * weight * x0 + p0 * weight * x1;
                        });
                }
            }
        }
        dn.mapv_inplace(|v| v * inv_n);
    }
    Ok(dd)
}

/// Σₙ over the order axis: shape `(points, d_max + 1, 2, rows, cols)`.
pub fn determinant_sum(dd: &Array6<Complex64>) -> Array5<Complex64> {
    let (points, _, derivs, channels, rows, cols) = dd.dim();
    let mut total = Array5::<Complex64>::zeros((points, derivs, channels, rows, cols));
    for order in dd.axis_iter(Axis(1)) {
        total += &order;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bell::{bell_iteration, series_sum};
    use ndarray::Array2;

    fn sample_af(points: usize, n_max: usize, d_max: usize) -> Array6<Complex64> {
        Array6::from_shape_fn((points, n_max, d_max + 1, CHANNELS, 2, 3), |(i, k, d, c, r, q)| {
            let x = (i + 1) as f64 * 0.13 - (k + 1) as f64 * 0.21 + d as f64 * 0.05;
            Complex64::new(x + 0.01 * (r + q) as f64 * c as f64, 0.3 * x - 0.02 * c as f64)
        })
    }

    #[test]
    fn test_binomial_table() {
        let t = binomial_table(5);
        assert_eq!(t[0], vec![1.0]);
        assert_eq!(t[4], vec![1.0, 4.0, 6.0, 4.0, 1.0]);
        assert_eq!(t[5][2], 10.0);
    }

    #[test]
    fn test_shape_rejected() {
        let af = sample_af(1, 3, 1);
        assert!(matches!(
            weighted_bell_iteration(af.view(), 3, 2),
            Err(ZetaError::Domain(_))
        ));
        assert!(weighted_bell_iteration(af.view(), 4, 1).is_err());
    }

    #[test]
    fn test_channel_zero_matches_scalar_exactly() {
        let (points, n_max) = (3, 6);
        let af = sample_af(points, n_max, 2);
        let dd = weighted_bell_iteration(af.view(), n_max, 2).unwrap();
        for r in 0..2 {
            for q in 0..3 {
                let a: Array2<Complex64> = af.slice(s![.., .., 0, 0, r, q]).to_owned();
                let scalar = bell_iteration(a.view(), n_max);
                assert_eq!(dd.slice(s![.., .., 0, 0, r, q]), scalar);
                let total = determinant_sum(&dd);
                assert_eq!(total.slice(s![.., 0, 0, r, q]), series_sum(&scalar));
            }
        }
    }

    #[test]
    fn test_channel_one_does_not_perturb_channel_zero() {
        let af = sample_af(2, 5, 1);
        let mut other = af.clone();
        other
            .slice_mut(s![.., .., .., 1, .., ..])
            .mapv_inplace(|v| v * 7.5 + Complex64::new(0.0, 1.0));
        let a = weighted_bell_iteration(af.view(), 5, 1).unwrap();
        let b = weighted_bell_iteration(other.view(), 5, 1).unwrap();
        assert_eq!(a.slice(s![.., .., .., 0, .., ..]), b.slice(s![.., .., .., 0, .., ..]));
        assert_ne!(a.slice(s![.., .., .., 1, .., ..]), b.slice(s![.., .., .., 1, .., ..]));
    }

    #[test]
    fn test_lower_derivatives_independent_of_d_max() {
        let n_max = 5;
        let af1 = sample_af(2, n_max, 1);
        let af0 = af1.slice(s![.., .., 0..1, .., .., ..]).to_owned();
        let d0 = weighted_bell_iteration(af0.view(), n_max, 0).unwrap();
        let d1 = weighted_bell_iteration(af1.view(), n_max, 1).unwrap();
        assert_eq!(d0.slice(s![.., .., 0, .., .., ..]), d1.slice(s![.., .., 0, .., .., ..]));
    }

    #[test]
    fn test_first_derivative_is_leibniz() {
        // single order: D[1,1,0] = A[0,1,0]; D[2,1,0] = ½(D1,1·A0,0 + D1,0·A0,1) + D0,0·A1,1
        let af = sample_af(1, 2, 1);
        let dd = weighted_bell_iteration(af.view(), 2, 1).unwrap();
        let a = |k: usize, d: usize| af[[0, k, d, 0, 0, 0]];
        let d1 = |d: usize| dd[[0, 1, d, 0, 0, 0]];
        assert_eq!(d1(1), a(0, 1));
        let expected = (d1(1) * a(0, 0) + d1(0) * a(0, 1)) * 0.5 + a(1, 1);
        let got = dd[[0, 2, 1, 0, 0, 0]];
        assert!((got - expected).norm() < 1e-12);
    }
}
