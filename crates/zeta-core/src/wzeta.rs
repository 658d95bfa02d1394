// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Weighted Zeta and Dynamical Determinant
// ─────────────────────────────────────────────────────────────────────
//! Dynamical determinants of a hyperbolic map system with orbit-integral
//! weights, their `s`-derivatives, and the weighted zeta function.
//!
//! Per word w with multipliers (λ₋, λ₊) and orbit integral I(w):
//!
//!   A[k,d,0] = −(1/k) Σ_w (ln λ₋)^d · λ₋^s / ((1 − λ₋)(λ₊ − 1))
//!   A[k,d,1] = −(1/k) Σ_w (−I(w)) · (ln λ₋)^d · λ₋^s / ((1 − λ₋)(λ₊ − 1))

use std::sync::Arc;

use ndarray::{s, Array1, Array2, Array3, Array5, Array6, ArrayView3, Zip};
use num_complex::Complex64;

use zeta_systems::{IntegralProvider, MapSystem};
use zeta_types::{ExpansionConfig, Telemetry, ZetaError, ZetaResult};

use crate::cache::OrbitCache;
use crate::selberg::{check_points, orbit_powers};
use crate::weighted::{determinant_sum, weighted_bell_iteration, CHANNELS};

/// Channel `channel` of derivative order `d` from a determinant of shape
/// `(points, d_max + 1, 2, rows, cols)`.
pub fn channel_slice(
    det: &Array5<Complex64>,
    d: usize,
    channel: usize,
) -> ZetaResult<ArrayView3<'_, Complex64>> {
    let (_, derivs, channels, _, _) = det.dim();
    if d >= derivs {
        return Err(ZetaError::Domain(format!(
            "derivative order {d} not computed (d_max = {})",
            derivs.saturating_sub(1)
        )));
    }
    if channel >= channels {
        return Err(ZetaError::Domain(format!(
            "channel index {channel} out of range (expected < {channels})"
        )));
    }
    Ok(det.slice(s![.., d, channel, .., ..]))
}

pub struct WeightedZeta {
    map: Arc<dyn MapSystem>,
    integrals: Arc<dyn IntegralProvider>,
    config: ExpansionConfig,
    cache: OrbitCache<(Array1<f64>, Array1<f64>)>,
    telemetry: Telemetry,
}

impl WeightedZeta {
    /// `config.d_max` is the highest derivative order this instance will
    /// compute; `config.n_max` is the default truncation of `evaluate`.
    pub fn new(
        map: Arc<dyn MapSystem>,
        integrals: Arc<dyn IntegralProvider>,
        config: ExpansionConfig,
        telemetry: Telemetry,
    ) -> ZetaResult<Self> {
        config.validate()?;
        log::info!(
            target: telemetry.target(),
            "creating WeightedZeta for {map} (d_max = {})",
            config.d_max
        );
        let cache = OrbitCache::new(map.adjacency().clone(), telemetry.child("cache"));
        Ok(Self {
            map,
            integrals,
            config,
            cache,
            telemetry,
        })
    }

    pub fn config(&self) -> &ExpansionConfig {
        &self.config
    }

    pub fn map_system(&self) -> &Arc<dyn MapSystem> {
        &self.map
    }

    pub fn cache(&self) -> &OrbitCache<(Array1<f64>, Array1<f64>)> {
        &self.cache
    }

    fn check_derivative(&self, d_max: usize) -> ZetaResult<()> {
        if d_max > self.config.d_max {
            return Err(ZetaError::Domain(format!(
                "derivative order {d_max} requested from engine built for d_max = {}",
                self.config.d_max
            )));
        }
        Ok(())
    }

    fn load(&mut self, n_max: usize) -> ZetaResult<()> {
        let map = &self.map;
        let integrals = &self.integrals;
        self.cache.ensure(n_max, true, |words, need_integrals| {
            let stabilities = map.stabilities(words)?;
            let grid = if need_integrals {
                Some(integrals.orbit_integrals(words)?)
            } else {
                None
            };
            Ok((stabilities, grid))
        })
    }

    /// Aggregates of shape `(points, n_max, d_max + 1, 2, rows, cols)`.
    ///
    /// Per length and derivative order, both channels come out of one
    /// `(points × words) · (words × (1 + rows·cols))` product: column 0
    /// carries the plain weights, the rest the weights times `−I(w)`.
    pub fn calc_weighted_a(
        &mut self,
        s: &Array1<Complex64>,
        n_max: usize,
        d_max: usize,
    ) -> ZetaResult<Array6<Complex64>> {
        check_points(s)?;
        self.check_derivative(d_max)?;
        let (rows, cols) = self.integrals.integral_shape()?;
        self.load(n_max)?;

        let mut af = Array6::<Complex64>::zeros((s.len(), n_max, d_max + 1, CHANNELS, rows, cols));
        for (k, entry) in self.cache.entries().iter().take(n_max).enumerate() {
            let (minus, plus) = &entry.stabilities;
            let grid: &Array3<f64> = entry.integrals.as_ref().ok_or_else(|| {
                ZetaError::Domain(format!("no orbit integrals cached for length {}", k + 1))
            })?;
            if grid.dim() != (minus.len(), rows, cols) {
                return Err(ZetaError::Domain(format!(
                    "orbit integrals of shape {:?} for {} words of length {} on a {rows}x{cols} grid",
                    grid.dim(),
                    minus.len(),
                    k + 1
                )));
            }
            let scale = -1.0 / (k + 1) as f64;
            let logs = minus.mapv(f64::ln);
            let powers = orbit_powers(s, &logs);
            let mut weights = Zip::from(minus)
                .and(plus)
                .map_collect(|&lm, &lp| 1.0 / ((1.0 - lm) * (lp - 1.0)));
            let cells = rows * cols;
            for d in 0..=d_max {
                if d > 0 {
                    weights *= &logs;
                }
                let rhs = Array2::from_shape_fn((weights.len(), 1 + cells), |(w, j)| {
                    let factor = if j == 0 {
                        1.0
                    } else {
                        -grid[[w, (j - 1) / cols, (j - 1) % cols]]
                    };
                    Complex64::new(weights[w] * factor, 0.0)
                });
                let sums = powers.dot(&rhs);
                for (i, row) in sums.outer_iter().enumerate() {
                    af.slice_mut(s![i, k, d, 0, .., ..]).fill(row[0] * scale);
                    let mut weighted = af.slice_mut(s![i, k, d, 1, .., ..]);
                    for (out, &v) in weighted.iter_mut().zip(row.iter().skip(1)) {
                        *out = v * scale;
                    }
                }
            }
        }
        Ok(af)
    }

    /// Coefficients of shape `(points, n_max + 1, d_max + 1, 2, rows, cols)`.
    pub fn calc_weighted_d(
        &mut self,
        s: &Array1<Complex64>,
        n_max: usize,
        d_max: usize,
    ) -> ZetaResult<Array6<Complex64>> {
        log::info!(
            target: self.telemetry.target(),
            "computing weighted coefficients on {} points with n_max={n_max}, d_max={d_max}",
            s.len()
        );
        let af = self.calc_weighted_a(s, n_max, d_max)?;
        weighted_bell_iteration(af.view(), n_max, d_max)
    }

    /// Determinant of shape `(points, d_max + 1, 2, rows, cols)`.
    pub fn dynamical_determinant(
        &mut self,
        s: &Array1<Complex64>,
        n_max: usize,
        d_max: usize,
    ) -> ZetaResult<Array5<Complex64>> {
        let dd = self.calc_weighted_d(s, n_max, d_max)?;
        Ok(determinant_sum(&dd))
    }

    /// `Z[0,1] / Z[0,0]`, shape `(points, rows, cols)`.
    pub fn weighted_zeta(&mut self, s: &Array1<Complex64>, n_max: usize) -> ZetaResult<Array3<Complex64>> {
        let det = self.dynamical_determinant(s, n_max, 0)?;
        let numerator = channel_slice(&det, 0, 1)?;
        let denominator = channel_slice(&det, 0, 0)?;
        Ok(&numerator / &denominator)
    }

    /// Determinant at the configured truncation and derivative order.
    pub fn evaluate(&mut self, s: &Array1<Complex64>) -> ZetaResult<Array5<Complex64>> {
        let ExpansionConfig { n_max, d_max } = self.config;
        self.dynamical_determinant(s, n_max, d_max)
    }
}
