// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Per-Evaluator Orbit Cache
// ─────────────────────────────────────────────────────────────────────
//! Words, stabilities and (optionally) orbit integrals per word length.
//!
//! Coverage is the largest truncation order loaded so far. A request the
//! cache already covers is a no-op; anything else rebuilds every length
//! from 1 upward.

use ndarray::Array3;

use zeta_symbolics::SymbolicDynamics;
use zeta_types::{AdjacencyMatrix, Telemetry, WordBatch, ZetaResult};

/// Cached data of one word length.
#[derive(Debug, Clone)]
pub struct LengthEntry<S> {
    pub words: WordBatch,
    pub stabilities: S,
    pub integrals: Option<Array3<f64>>,
}

/// Cache owned by exactly one evaluator.
#[derive(Debug)]
pub struct OrbitCache<S> {
    dynamics: SymbolicDynamics,
    entries: Vec<LengthEntry<S>>,
    coverage: usize,
    with_integrals: bool,
    rebuilds: usize,
    telemetry: Telemetry,
}

impl<S> OrbitCache<S> {
    pub fn new(adj: AdjacencyMatrix, telemetry: Telemetry) -> Self {
        Self {
            dynamics: SymbolicDynamics::new(adj, telemetry.child("symbolics")),
            entries: Vec::new(),
            coverage: 0,
            with_integrals: false,
            rebuilds: 0,
            telemetry,
        }
    }

    /// Whether `n_max` (and integrals, if needed) is already loaded.
    pub fn covers(&self, n_max: usize, need_integrals: bool) -> bool {
        self.coverage >= n_max && (self.with_integrals || !need_integrals)
    }

    /// Make lengths `1..=n_max` available.
    ///
    /// `load` receives each length's cyclically reduced words and whether
    /// integrals are wanted. On error the previous contents are kept.
    pub fn ensure<F>(&mut self, n_max: usize, need_integrals: bool, mut load: F) -> ZetaResult<()>
    where
        F: FnMut(&WordBatch, bool) -> ZetaResult<(S, Option<Array3<f64>>)>,
    {
        if self.covers(n_max, need_integrals) {
            log::debug!(
                target: self.telemetry.target(),
                "cache already covers n_max={n_max} (coverage {})",
                self.coverage
            );
            return Ok(());
        }
        log::debug!(
            target: self.telemetry.target(),
            "rebuilding cache for n_max={n_max}, integrals={need_integrals}"
        );
        let mut entries = Vec::with_capacity(n_max);
        for (words, _) in self.dynamics.word_generator(n_max, false, false, true) {
            let (stabilities, integrals) = load(&words, need_integrals)?;
            entries.push(LengthEntry {
                words,
                stabilities,
                integrals,
            });
        }
        self.entries = entries;
        self.coverage = n_max;
        self.with_integrals = need_integrals;
        self.rebuilds += 1;
        Ok(())
    }

    /// Entries for lengths `1..=coverage`; index `k − 1` holds length k.
    pub fn entries(&self) -> &[LengthEntry<S>] {
        &self.entries
    }

    pub fn coverage(&self) -> usize {
        self.coverage
    }

    /// How many times the cache was (re)built.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    pub fn adjacency(&self) -> &AdjacencyMatrix {
        self.dynamics.adjacency()
    }
}
