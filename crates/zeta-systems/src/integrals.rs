// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Orbit Integral Providers
// ─────────────────────────────────────────────────────────────────────
//! Orbit integrals of test functions along periodic orbits.
//!
//! - `ConstantIntegrals`: constant weights, which belong in the scalar
//!   engine; requesting a grid is an error.
//! - `UniformIntegrals`: the same constant value on every grid cell.
//! - `PoincareSectionIntegrals`: Gaussians on the Poincaré section of a
//!   hyperbolic map system, summed over every intersection of the orbit.

use std::f64::consts::PI;
use std::sync::Arc;

use ndarray::{s, Array1, Array2, Array3, Zip};

use zeta_types::{WordBatch, ZetaError, ZetaResult};

use crate::provider::{IntegralProvider, MapSystem};

/// Constant orbit integrals; refuses to produce grids.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantIntegrals;

impl IntegralProvider for ConstantIntegrals {
    fn orbit_integrals(&self, _words: &WordBatch) -> ZetaResult<Array3<f64>> {
        Err(ZetaError::Domain(
            "cannot retrieve orbit integrals from constant provider".to_string(),
        ))
    }

    fn integral_shape(&self) -> ZetaResult<(usize, usize)> {
        Err(ZetaError::Domain(
            "cannot retrieve orbit integral shape from constant provider".to_string(),
        ))
    }
}

/// Every word gets `value` on every cell of a `rows × cols` grid.
#[derive(Debug, Clone, Copy)]
pub struct UniformIntegrals {
    shape: (usize, usize),
    value: f64,
}

impl UniformIntegrals {
    pub fn new(rows: usize, cols: usize, value: f64) -> ZetaResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(ZetaError::Configuration(format!(
                "integral grid must be non-empty, got {rows}x{cols}"
            )));
        }
        Ok(Self {
            shape: (rows, cols),
            value,
        })
    }

    /// Constant one on a single cell.
    pub fn unit() -> Self {
        Self {
            shape: (1, 1),
            value: 1.0,
        }
    }
}

impl IntegralProvider for UniformIntegrals {
    fn orbit_integrals(&self, words: &WordBatch) -> ZetaResult<Array3<f64>> {
        let (rows, cols) = self.shape;
        Ok(Array3::from_elem((words.len(), rows, cols), self.value))
    }

    fn integral_shape(&self) -> ZetaResult<(usize, usize)> {
        Ok(self.shape)
    }
}

/// Gaussian test functions centred on a grid over the Poincaré section.
pub struct PoincareSectionIntegrals {
    map: Arc<dyn MapSystem>,
    domain_minus: Array2<f64>,
    domain_plus: Array2<f64>,
    sigma_minus: f64,
    sigma_plus: f64,
}

impl PoincareSectionIntegrals {
    /// Grid cell `(i, j)` sits at `(support_minus[j], support_plus[i])`.
    pub fn new(
        map: Arc<dyn MapSystem>,
        support_minus: &[f64],
        support_plus: &[f64],
        sigma_minus: f64,
        sigma_plus: f64,
    ) -> ZetaResult<Self> {
        if support_minus.is_empty() || support_plus.is_empty() {
            return Err(ZetaError::Configuration(
                "Poincare support grids must not be empty".to_string(),
            ));
        }
        for (name, sigma) in [("sigma_minus", sigma_minus), ("sigma_plus", sigma_plus)] {
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err(ZetaError::Configuration(format!(
                    "{name} must be finite and > 0, got {sigma}"
                )));
            }
        }
        let (domain_minus, domain_plus) = meshgrid(support_minus, support_plus);
        Ok(Self {
            map,
            domain_minus,
            domain_plus,
            sigma_minus,
            sigma_plus,
        })
    }

    pub fn domain(&self) -> (&Array2<f64>, &Array2<f64>) {
        (&self.domain_minus, &self.domain_plus)
    }
}

/// `xs` varies along columns, `ys` along rows.
fn meshgrid(xs: &[f64], ys: &[f64]) -> (Array2<f64>, Array2<f64>) {
    let shape = (ys.len(), xs.len());
    (
        Array2::from_shape_fn(shape, |(_, j)| xs[j]),
        Array2::from_shape_fn(shape, |(i, _)| ys[i]),
    )
}

impl IntegralProvider for PoincareSectionIntegrals {
    fn orbit_integrals(&self, words: &WordBatch) -> ZetaResult<Array3<f64>> {
        let (rows, cols) = self.domain_minus.dim();
        let mut integrals = Array3::<f64>::zeros((words.len(), rows, cols));
        if words.is_empty() {
            return Ok(integrals);
        }
        let denom_minus = self.sigma_minus * self.sigma_minus;
        let denom_plus = self.sigma_plus * self.sigma_plus;

        // one intersection with the section per cyclic shift of the word
        for shift in 0..words.word_len() {
            let rotated = words.rotate_left(shift);
            let (x_minus, x_plus): (Array1<f64>, Array1<f64>) =
                self.map.periodic_points(&rotated)?;
            for (w, (&xm, &xp)) in x_minus.iter().zip(x_plus.iter()).enumerate() {
                Zip::from(integrals.slice_mut(s![w, .., ..]))
                    .and(&self.domain_minus)
                    .and(&self.domain_plus)
                    .for_each(|out, &dm, &dp| {
                        *out += (-(dm - xm).powi(2) / denom_minus
                            - (dp - xp).powi(2) / denom_plus)
                            .exp();
                    });
            }
        }
        integrals /= PI * self.sigma_minus * self.sigma_plus;
        Ok(integrals)
    }

    fn integral_shape(&self) -> ZetaResult<(usize, usize)> {
        Ok(self.domain_minus.dim())
    }
}
