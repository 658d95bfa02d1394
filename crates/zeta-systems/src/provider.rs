// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Orbit Weight Provider Traits
// ─────────────────────────────────────────────────────────────────────
//! Interfaces through which the cycle-expansion engines obtain per-word
//! stabilities, periodic points, and orbit integrals.

use std::fmt;

use ndarray::{Array1, Array3};

use zeta_types::{AdjacencyMatrix, WordBatch, ZetaResult};

use crate::sl2r::Sl2r;

/// One-dimensional (iterated) function system.
pub trait FunctionSystem: fmt::Display + Send + Sync {
    fn adjacency(&self) -> &AdjacencyMatrix;

    /// One positive stability per word, in batch order.
    fn stabilities(&self, words: &WordBatch) -> ZetaResult<Array1<f64>>;
}

/// Two-dimensional hyperbolic map system.
pub trait MapSystem: fmt::Display + Send + Sync {
    fn adjacency(&self) -> &AdjacencyMatrix;

    /// Real intervals of definition, one per letter.
    fn fundamental_intervals(&self) -> &[(f64, f64)];

    /// `(contracting, expanding)` multipliers per word, expanding = 1/contracting.
    fn stabilities(&self, words: &WordBatch) -> ZetaResult<(Array1<f64>, Array1<f64>)>;

    /// `(attracting, repelling)` fixed points of each word's iterate.
    fn periodic_points(&self, words: &WordBatch) -> ZetaResult<(Array1<f64>, Array1<f64>)>;

    /// Per-letter Moebius generators, if the system is built from them.
    fn generators(&self) -> Option<&[Sl2r]> {
        None
    }
}

/// Orbit integrals of test functions along periodic orbits.
pub trait IntegralProvider: Send + Sync {
    /// Array of shape `(words.len(), rows, cols)`.
    fn orbit_integrals(&self, words: &WordBatch) -> ZetaResult<Array3<f64>>;

    /// `(rows, cols)` of a single orbit-integral grid.
    fn integral_shape(&self) -> ZetaResult<(usize, usize)>;
}
