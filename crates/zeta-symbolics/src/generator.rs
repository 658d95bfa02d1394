// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Lazy Per-Length Word Generator
// ─────────────────────────────────────────────────────────────────────
//! Lazy sequence of filtered word batches for lengths 1..=max.
//!
//! Each step extends the *unfiltered* superset from the previous length,
//! then filters a copy for the caller.

use zeta_types::{AdjacencyMatrix, WordBatch};

use crate::enumerate::{singletons, step};
use crate::filters::WordFilters;

/// Symmetry-group elements attached to a batch.
///
/// Only the trivial group is supported, so this is always empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymmetryElements(Vec<usize>);

impl SymmetryElements {
    pub fn trivial() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Iterator yielding `(filtered batch, symmetry elements)` per length.
pub struct WordGenerator<'a> {
    adj: &'a AdjacencyMatrix,
    filters: WordFilters,
    max_len: usize,
    next_len: usize,
    superset: Option<WordBatch>,
}

impl<'a> WordGenerator<'a> {
    pub fn new(adj: &'a AdjacencyMatrix, max_len: usize, filters: WordFilters) -> Self {
        Self {
            adj,
            filters,
            max_len,
            next_len: 1,
            superset: None,
        }
    }

    /// Length of the batch the next call to `next` yields.
    pub fn next_length(&self) -> usize {
        self.next_len
    }
}

impl Iterator for WordGenerator<'_> {
    type Item = (WordBatch, SymmetryElements);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_len > self.max_len {
            return None;
        }
        let superset = match self.superset.take() {
            None => singletons(self.adj),
            Some(prev) => step(self.adj, &prev, self.adj.word_count(self.next_len)),
        };
        let filtered = self.filters.apply(&superset, self.adj);
        self.superset = Some(superset);
        self.next_len += 1;
        Some((filtered, SymmetryElements::trivial()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.max_len + 1).saturating_sub(self.next_len);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for WordGenerator<'_> {}
