// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Word Enumerator
// ─────────────────────────────────────────────────────────────────────
//! Enumeration of all admissible words of a given length.
//!
//! Ordering contract: the first letter ranges over 0..m−1 ascending and
//! every admissible prefix is continued by its successors in ascending
//! order (pre-order traversal). Extending a complete batch of length k
//! therefore reproduces the batch generated directly at length n.

use zeta_types::{AdjacencyMatrix, Letter, WordBatch, ZetaError, ZetaResult};

/// All `m` words of length one, ascending.
pub fn singletons(adj: &AdjacencyMatrix) -> WordBatch {
    let mut batch = WordBatch::with_capacity(1, adj.size());
    for letter in 0..adj.size() {
        batch.push_extended(&[], letter as Letter);
    }
    batch
}

/// Generate every word of length `n` legal under `adj`.
pub fn generate_words(n: usize, adj: &AdjacencyMatrix) -> ZetaResult<WordBatch> {
    if n == 0 {
        return Err(ZetaError::Domain("word length must be >= 1".to_string()));
    }
    let mut words = singletons(adj);
    for length in 2..=n {
        words = step(adj, &words, adj.word_count(length));
    }
    Ok(words)
}

/// Extend `given` (words of length k) to length `n`.
///
/// Fails with `LengthMismatch` if k > n; k == n returns the words unchanged.
pub fn extend_words(n: usize, adj: &AdjacencyMatrix, given: &WordBatch) -> ZetaResult<WordBatch> {
    let given_len = given.word_len();
    if given_len > n {
        return Err(ZetaError::LengthMismatch {
            given: given_len,
            target: n,
        });
    }
    if given_len == 0 {
        return Err(ZetaError::Domain("given words must have length >= 1".to_string()));
    }
    if let Some(bad) = given.iter().find(|w| !adj.admits(w)) {
        return Err(ZetaError::Configuration(format!(
            "given word {bad:?} is not admissible under {adj}"
        )));
    }
    if given_len == n {
        return Ok(given.clone());
    }

    let mut words = given.clone();
    for length in (given_len + 1)..=n {
        words = step(adj, &words, adj.word_count(length));
    }
    Ok(words)
}

/// Extend every word by one letter, children in ascending letter order.
///
/// `expected` pre-sizes the buffer; it is exact when `words` is complete.
/// The buffer never exceeds one child per letter for every word.
pub(crate) fn step(adj: &AdjacencyMatrix, words: &WordBatch, expected: usize) -> WordBatch {
    let bound = words.len().saturating_mul(adj.size());
    let mut next = WordBatch::with_capacity(words.word_len() + 1, expected.min(bound));
    for word in words.iter() {
        // word_len >= 1, so a last letter exists
        let last = word[word.len() - 1];
        for letter in adj.successors(last) {
            next.push_extended(word, letter);
        }
    }
    next
}
