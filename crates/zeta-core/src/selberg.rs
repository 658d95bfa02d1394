// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Selberg Zeta Function
// ─────────────────────────────────────────────────────────────────────
//! Cycle expansion of the Selberg zeta function of a one-dimensional
//! function system over its cyclically reduced words.

use std::sync::Arc;

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use zeta_systems::{build_function_system, FunctionSystem};
use zeta_types::{SystemConfig, Telemetry, ZetaError, ZetaResult};

use crate::bell::{bell_iteration, series_sum};
use crate::cache::OrbitCache;

/// Reject evaluation points that are not finite.
pub(crate) fn check_points(s: &Array1<Complex64>) -> ZetaResult<()> {
    match s.iter().find(|z| !(z.re.is_finite() && z.im.is_finite())) {
        Some(z) => Err(ZetaError::Domain(format!("evaluation point {z} is not finite"))),
        None => Ok(()),
    }
}

/// `λ_w^s = exp(s · ln λ_w)` for every point and word, shape
/// `(points, words)`, from the logarithms `ln λ_w`.
pub(crate) fn orbit_powers(s: &Array1<Complex64>, logs: &Array1<f64>) -> Array2<Complex64> {
    Array2::from_shape_fn((s.len(), logs.len()), |(i, w)| (s[i] * logs[w]).exp())
}

pub struct SelbergZeta {
    system: Arc<dyn FunctionSystem>,
    cache: OrbitCache<Array1<f64>>,
    telemetry: Telemetry,
}

impl SelbergZeta {
    pub fn new(system: Arc<dyn FunctionSystem>, telemetry: Telemetry) -> Self {
        log::info!(target: telemetry.target(), "creating SelbergZeta for {system}");
        let cache = OrbitCache::new(system.adjacency().clone(), telemetry.child("cache"));
        Self {
            system,
            cache,
            telemetry,
        }
    }

    pub fn from_config(cfg: &SystemConfig, telemetry: Telemetry) -> ZetaResult<Self> {
        let system = build_function_system(cfg, &telemetry)?;
        Ok(Self::new(system, telemetry))
    }

    pub fn system(&self) -> &Arc<dyn FunctionSystem> {
        &self.system
    }

    pub fn cache(&self) -> &OrbitCache<Array1<f64>> {
        &self.cache
    }

    fn load(&mut self, n_max: usize) -> ZetaResult<()> {
        let system = &self.system;
        let target = self.telemetry.target();
        self.cache.ensure(n_max, false, |words, _| {
            let stabilities = system.stabilities(words)?;
            if stabilities.iter().any(|&l| l >= 1.0) {
                log::warn!(
                    target: target,
                    "stabilities >= 1 at word length {}; expansion may diverge",
                    words.word_len()
                );
            }
            Ok((stabilities, None))
        })
    }

    /// Per-length aggregates `a_k(s) = −(1/k) Σ_w λ_w^s / (1 − λ_w)`,
    /// shape `(points, n_max)`.
    pub fn calc_a(&mut self, s: &Array1<Complex64>, n_max: usize) -> ZetaResult<Array2<Complex64>> {
        check_points(s)?;
        log::info!(
            target: self.telemetry.target(),
            "starting Bell polynomial construction on {}-vector",
            s.len()
        );
        self.load(n_max)?;
        let mut a = Array2::<Complex64>::zeros((s.len(), n_max));
        for (k, entry) in self.cache.entries().iter().take(n_max).enumerate() {
            let scale = -1.0 / (k + 1) as f64;
            let stabilities = &entry.stabilities;
            let powers = orbit_powers(s, &stabilities.mapv(f64::ln));
            let weights = stabilities.mapv(|l| Complex64::new(1.0 / (1.0 - l), 0.0));
            a.column_mut(k).assign(&powers.dot(&weights).mapv(|v| v * scale));
        }
        Ok(a)
    }

    /// Truncated series coefficients, shape `(points, n_max + 1)`.
    pub fn calc_d(&mut self, s: &Array1<Complex64>, n_max: usize) -> ZetaResult<Array2<Complex64>> {
        let a = self.calc_a(s, n_max)?;
        Ok(bell_iteration(a.view(), n_max))
    }

    /// Zeta values at every point; empty for `n_max < 1`.
    pub fn evaluate(&mut self, s: &Array1<Complex64>, n_max: usize) -> ZetaResult<Array1<Complex64>> {
        if n_max < 1 {
            return Ok(Array1::zeros(0));
        }
        log::info!(
            target: self.telemetry.target(),
            "evaluating SelbergZeta on {} points with n_max={n_max}",
            s.len()
        );
        let d = self.calc_d(s, n_max)?;
        Ok(series_sum(&d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use zeta_systems::hyperbolic_cylinder;

    fn cylinder(width: f64) -> SelbergZeta {
        let sys = hyperbolic_cylinder(width, false, Telemetry::default()).unwrap();
        SelbergZeta::new(Arc::new(sys), Telemetry::new("zeta::selberg"))
    }

    #[test]
    fn test_empty_for_zero_order() {
        let mut zeta = cylinder(5.0);
        let out = zeta.evaluate(&array![Complex64::new(1.0, 0.0)], 0).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_non_finite_point_rejected() {
        let mut zeta = cylinder(5.0);
        let s = array![Complex64::new(f64::NAN, 0.0)];
        assert!(matches!(zeta.evaluate(&s, 3), Err(ZetaError::Domain(_))));
    }

    #[test]
    fn test_first_aggregate_closed_form() {
        let width = 2.0;
        let mut zeta = cylinder(width);
        let s = array![Complex64::new(0.5, 0.25)];
        let a = zeta.calc_a(&s, 2).unwrap();
        let lambda = (-width).exp();
        let expected = (s[0] * lambda.ln()).exp() / (1.0 - lambda) * -2.0;
        assert_abs_diff_eq!(a[[0, 0]].re, expected.re, epsilon = 1e-14);
        assert_abs_diff_eq!(a[[0, 0]].im, expected.im, epsilon = 1e-14);
    }

    #[test]
    fn test_orbit_powers_grid() {
        let s = array![Complex64::new(1.0, 0.0), Complex64::new(0.5, 2.0)];
        let lambdas = array![0.25, 0.5, 0.125];
        let p = orbit_powers(&s, &lambdas.mapv(f64::ln));
        assert_eq!(p.dim(), (2, 3));
        for (w, &l) in lambdas.iter().enumerate() {
            assert_abs_diff_eq!(p[[0, w]].re, l, epsilon = 1e-15);
            let expected = Complex64::new(l, 0.0).powc(s[1]);
            assert!((p[[1, w]] - expected).norm() < 1e-14);
        }
    }

    #[test]
    fn test_cache_reused_across_evaluations() {
        let mut zeta = cylinder(3.0);
        let s = array![Complex64::new(0.1, 0.0)];
        zeta.evaluate(&s, 5).unwrap();
        zeta.evaluate(&s, 4).unwrap();
        assert_eq!(zeta.cache().rebuilds(), 1);
        zeta.evaluate(&s, 6).unwrap();
        assert_eq!(zeta.cache().rebuilds(), 2);
    }

    #[test]
    fn test_smaller_request_uses_prefix() {
        let s = array![Complex64::new(0.3, 1.0), Complex64::new(-0.2, 0.0)];
        let mut warm = cylinder(1.0);
        warm.evaluate(&s, 7).unwrap();
        let mut cold = cylinder(1.0);
        assert_eq!(warm.evaluate(&s, 4).unwrap(), cold.evaluate(&s, 4).unwrap());
    }
}
