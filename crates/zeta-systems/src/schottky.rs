// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Schottky Surfaces
// ─────────────────────────────────────────────────────────────────────
//! Geodesic-flow dynamics on Schottky surfaces.
//!
//! A Schottky group of rank k is generated by k hyperbolic Moebius
//! transformations. Letters `0..k` are their inverses and letters `k..2k`
//! the generators themselves; a letter may be followed by anything except
//! its own inverse.
//!
//! The iterate along a word `w = w₁…wₙ` is `g_w = g_{wₙ}·…·g_{w₁}` (first
//! letter applied first).

use std::fmt;

use ndarray::Array1;

use zeta_types::{AdjacencyMatrix, Letter, Telemetry, WordBatch, ZetaError, ZetaResult};

use crate::provider::{FunctionSystem, MapSystem};
use crate::sl2r::Sl2r;

/// `A[i][j] = (j ≠ (i + rank) mod 2·rank)`.
pub fn schottky_adjacency(rank: usize) -> ZetaResult<AdjacencyMatrix> {
    let size = 2 * rank;
    AdjacencyMatrix::new(
        (0..size)
            .map(|i| (0..size).map(|j| j != (i + rank) % size).collect())
            .collect(),
    )
}

/// Inverses first, then the generators.
pub fn schottky_letters(generators: &[Sl2r]) -> Vec<Sl2r> {
    generators
        .iter()
        .map(Sl2r::inverse)
        .chain(generators.iter().copied())
        .collect()
}

/// One-dimensional function system of a Moebius-generated group.
#[derive(Debug, Clone)]
pub struct SchottkyFunctionSystem {
    name: String,
    letters: Vec<Sl2r>,
    adj: AdjacencyMatrix,
    telemetry: Telemetry,
}

impl SchottkyFunctionSystem {
    /// Schottky system from `generators` without their inverses.
    pub fn new(
        name: impl Into<String>,
        generators: &[Sl2r],
        telemetry: Telemetry,
    ) -> ZetaResult<Self> {
        if generators.is_empty() {
            return Err(ZetaError::Configuration(
                "Schottky system needs at least one generator".to_string(),
            ));
        }
        let adj = schottky_adjacency(generators.len())?;
        Self::with_adjacency(name, schottky_letters(generators), adj, telemetry)
    }

    /// Moebius system with one transformation per letter and an explicit
    /// transition rule.
    pub fn with_adjacency(
        name: impl Into<String>,
        letters: Vec<Sl2r>,
        adj: AdjacencyMatrix,
        telemetry: Telemetry,
    ) -> ZetaResult<Self> {
        if letters.len() != adj.size() {
            return Err(ZetaError::Configuration(format!(
                "adjacency matrix of size {} does not match {} letter maps",
                adj.size(),
                letters.len()
            )));
        }
        let name = name.into();
        log::info!(target: telemetry.target(), "creating {name} with {} letters", letters.len());
        Ok(Self {
            name,
            letters,
            adj,
            telemetry,
        })
    }

    pub fn letters(&self) -> &[Sl2r] {
        &self.letters
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    /// Composite map along `word`. Letters outside the alphabet are a
    /// `Domain` error.
    pub fn iterate(&self, word: &[Letter]) -> ZetaResult<Sl2r> {
        word.iter().try_fold(Sl2r::IDENTITY, |acc, &letter| {
            self.letters
                .get(letter as usize)
                .map(|g| *g * acc)
                .ok_or_else(|| {
                    ZetaError::Domain(format!(
                        "letter {letter} outside the alphabet of {} ({} letters)",
                        self.name,
                        self.letters.len()
                    ))
                })
        })
    }

    /// Displacement lengths of the iterates of every word.
    pub fn displacement_lengths(&self, words: &WordBatch) -> ZetaResult<Array1<f64>> {
        let lengths = words
            .iter()
            .map(|w| self.iterate(w)?.displacement_length())
            .collect::<ZetaResult<Vec<f64>>>()?;
        log::debug!(
            target: self.telemetry.target(),
            "computed {} displacement lengths for words of length {}",
            lengths.len(),
            words.word_len()
        );
        Ok(Array1::from(lengths))
    }
}

impl fmt::Display for SchottkyFunctionSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl FunctionSystem for SchottkyFunctionSystem {
    fn adjacency(&self) -> &AdjacencyMatrix {
        &self.adj
    }

    /// `exp(−ℓ(g_w))`.
    fn stabilities(&self, words: &WordBatch) -> ZetaResult<Array1<f64>> {
        Ok(self.displacement_lengths(words)?.mapv(|l| (-l).exp()))
    }
}

/// Schottky dynamics as a two-dimensional hyperbolic map system.
#[derive(Debug, Clone)]
pub struct SchottkyMapSystem {
    system: SchottkyFunctionSystem,
    intervals: Vec<(f64, f64)>,
}

impl SchottkyMapSystem {
    /// Fundamental intervals are the images `a/c ± 1/|c|` of every letter.
    /// A letter fixing infinity (c ≈ 0) has no bounded interval.
    pub fn new(system: SchottkyFunctionSystem) -> ZetaResult<Self> {
        let intervals = system
            .letters()
            .iter()
            .enumerate()
            .map(|(i, g)| {
                g.image_interval().ok_or_else(|| {
                    ZetaError::UnsupportedGeometry(format!(
                        "letter {i} of {system} fixes infinity; no bounded fundamental interval"
                    ))
                })
            })
            .collect::<ZetaResult<Vec<_>>>()?;
        Self::with_intervals(system, intervals)
    }

    /// Map system with explicit fundamental intervals, one per letter.
    /// The intervals must be pairwise disjoint.
    pub fn with_intervals(
        system: SchottkyFunctionSystem,
        intervals: Vec<(f64, f64)>,
    ) -> ZetaResult<Self> {
        if intervals.len() != system.letters().len() {
            return Err(ZetaError::Configuration(format!(
                "{} fundamental intervals for {} letters of {system}",
                intervals.len(),
                system.letters().len()
            )));
        }
        let mut order: Vec<usize> = (0..intervals.len()).collect();
        order.sort_by(|&i, &j| intervals[i].0.total_cmp(&intervals[j].0));
        for pair in order.windows(2) {
            let (left, right) = (intervals[pair[0]], intervals[pair[1]]);
            if right.0 < left.1 {
                return Err(ZetaError::UnsupportedGeometry(format!(
                    "fundamental intervals of letters {} {left:?} and {} {right:?} of {system} overlap",
                    pair[0], pair[1]
                )));
            }
        }
        log::debug!(
            target: system.telemetry().target(),
            "fundamental intervals of {system}: {intervals:?}"
        );
        Ok(Self { system, intervals })
    }

    pub fn function_system(&self) -> &SchottkyFunctionSystem {
        &self.system
    }
}

impl fmt::Display for SchottkyMapSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Map", self.system)
    }
}

impl MapSystem for SchottkyMapSystem {
    fn adjacency(&self) -> &AdjacencyMatrix {
        &self.system.adj
    }

    fn fundamental_intervals(&self) -> &[(f64, f64)] {
        &self.intervals
    }

    fn stabilities(&self, words: &WordBatch) -> ZetaResult<(Array1<f64>, Array1<f64>)> {
        let lengths = self.system.displacement_lengths(words)?;
        Ok((lengths.mapv(|l| (-l).exp()), lengths.mapv(f64::exp)))
    }

    /// The fixed point lying in the fundamental interval of the word's
    /// last letter is labelled attracting. If both or neither lie inside,
    /// the one where `g_w` contracts wins.
    fn periodic_points(&self, words: &WordBatch) -> ZetaResult<(Array1<f64>, Array1<f64>)> {
        let mut attracting = Vec::with_capacity(words.len());
        let mut repelling = Vec::with_capacity(words.len());
        for word in words.iter() {
            let g = self.system.iterate(word)?;
            let (x1, x2) = g.fixed_points()?;
            let last = word
                .last()
                .ok_or_else(|| ZetaError::Domain("periodic point of the empty word".to_string()))?;
            let (lo, hi) = self.intervals[*last as usize];
            let inside = |x: f64| lo <= x && x <= hi;
            let first_attracts = match (inside(x1), inside(x2)) {
                (true, false) => true,
                (false, true) => false,
                _ => g.derivative(x1) <= g.derivative(x2),
            };
            if first_attracts {
                attracting.push(x1);
                repelling.push(x2);
            } else {
                attracting.push(x2);
                repelling.push(x1);
            }
        }
        Ok((Array1::from(attracting), Array1::from(repelling)))
    }

    fn generators(&self) -> Option<&[Sl2r]> {
        Some(self.system.letters())
    }
}
