// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Symbolic Dynamics
// ─────────────────────────────────────────────────────────────────────
//! Plain (trivial-group) symbolic dynamics over one adjacency relation.

use zeta_types::{AdjacencyMatrix, Telemetry, WordBatch, ZetaResult};

use crate::enumerate::{extend_words, generate_words};
use crate::filters::WordFilters;
use crate::generator::WordGenerator;

/// Symbolic dynamics of a subshift of finite type.
#[derive(Debug, Clone)]
pub struct SymbolicDynamics {
    adj: AdjacencyMatrix,
    telemetry: Telemetry,
}

impl SymbolicDynamics {
    pub fn new(adj: AdjacencyMatrix, telemetry: Telemetry) -> Self {
        log::info!(
            target: telemetry.target(),
            "new symbolic dynamics over {} letters: {}",
            adj.size(),
            adj
        );
        Self { adj, telemetry }
    }

    pub fn adjacency(&self) -> &AdjacencyMatrix {
        &self.adj
    }

    pub fn alphabet_size(&self) -> usize {
        self.adj.size()
    }

    /// Words of length `word_len` with the requested filters applied.
    ///
    /// With `given`, the result is built by extending those words, which
    /// should then be the complete set of some shorter length.
    pub fn symbolic_words(
        &self,
        word_len: usize,
        given: Option<&WordBatch>,
        filters: WordFilters,
    ) -> ZetaResult<WordBatch> {
        let words = match given {
            None => generate_words(word_len, &self.adj)?,
            Some(given) => extend_words(word_len, &self.adj, given)?,
        };
        let words = filters.apply(&words, &self.adj);
        log::debug!(
            target: self.telemetry.target(),
            "generated {} words of length {word_len} ({filters:?})",
            words.len()
        );
        Ok(words)
    }

    /// Lazy sequence of filtered batches for lengths `1..=max_word_len`.
    pub fn word_generator(
        &self,
        max_word_len: usize,
        prime: bool,
        perm_free: bool,
        cycl_red: bool,
    ) -> WordGenerator<'_> {
        WordGenerator::new(
            &self.adj,
            max_word_len,
            WordFilters {
                prime,
                perm_free,
                cycl_red,
                periodic: false,
            },
        )
    }
}
