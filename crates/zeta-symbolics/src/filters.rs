// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Word Filter Set
// ─────────────────────────────────────────────────────────────────────
//! Predicates over words and their batch masks.
//!
//! Filters only ever narrow a batch handed to a caller. The unfiltered
//! superset is what seeds the next-length extension; filtering it would
//! silently lose legal continuations.

use std::collections::HashSet;

use zeta_types::{AdjacencyMatrix, Letter, WordBatch};

/// First letter equals last letter.
#[inline]
pub fn is_periodic(word: &[Letter]) -> bool {
    match (word.first(), word.last()) {
        (Some(first), Some(last)) => first == last,
        _ => false,
    }
}

/// The closing transition (last → first) is legal.
#[inline]
pub fn is_cyclically_reduced(word: &[Letter], adj: &AdjacencyMatrix) -> bool {
    match (word.first(), word.last()) {
        (Some(&first), Some(&last)) => adj.is_legal(last, first),
        _ => false,
    }
}

/// Not a k-fold repetition of a shorter block.
pub fn is_prime(word: &[Letter]) -> bool {
    let n = word.len();
    for k in 1..=n / 2 {
        if n % k != 0 {
            continue;
        }
        let block = &word[..k];
        if word.chunks_exact(k).all(|chunk| chunk == block) {
            return false;
        }
    }
    true
}

/// Lexicographically smallest rotation; equal for all members of a
/// rotation class.
fn canonical_rotation(word: &[Letter]) -> Vec<Letter> {
    let n = word.len();
    let mut best = word.to_vec();
    let mut candidate = word.to_vec();
    for _ in 1..n {
        candidate.rotate_left(1);
        if candidate < best {
            best.copy_from_slice(&candidate);
        }
    }
    best
}

pub fn periodic_mask(words: &WordBatch) -> Vec<bool> {
    words.iter().map(is_periodic).collect()
}

pub fn cyclically_reduced_mask(words: &WordBatch, adj: &AdjacencyMatrix) -> Vec<bool> {
    words.iter().map(|w| is_cyclically_reduced(w, adj)).collect()
}

pub fn prime_mask(words: &WordBatch) -> Vec<bool> {
    words.iter().map(is_prime).collect()
}

/// Keep the first word (in batch order) of every rotation class.
pub fn permutation_free_mask(words: &WordBatch) -> Vec<bool> {
    let mut seen: HashSet<Vec<Letter>> = HashSet::with_capacity(words.len());
    words
        .iter()
        .map(|w| seen.insert(canonical_rotation(w)))
        .collect()
}

/// Filter selection applied to a caller-facing batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WordFilters {
    pub prime: bool,
    pub perm_free: bool,
    pub cycl_red: bool,
    pub periodic: bool,
}

impl WordFilters {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn cyclically_reduced() -> Self {
        Self {
            cycl_red: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.prime || self.perm_free || self.cycl_red || self.periodic)
    }

    /// Apply the selected filters in the order prime, permutation-free,
    /// cyclically reduced, periodic.
    pub fn apply(&self, words: &WordBatch, adj: &AdjacencyMatrix) -> WordBatch {
        let mut out = words.clone();
        if self.prime {
            out = out.select(&prime_mask(&out));
        }
        if self.perm_free {
            out = out.select(&permutation_free_mask(&out));
        }
        if self.cycl_red {
            out = out.select(&cyclically_reduced_mask(&out, adj));
        }
        if self.periodic {
            out = out.select(&periodic_mask(&out));
        }
        out
    }
}
