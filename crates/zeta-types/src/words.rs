// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Alphabet, Adjacency and Word Batches
// ─────────────────────────────────────────────────────────────────────
//! Shared symbolic data model.
//!
//! - `AdjacencyMatrix`: square boolean transition matrix over the alphabet
//!   {0, …, m−1}. Entry (i, j) means the transition i → j is legal.
//! - `WordBatch`: ordered collection of same-length words, stored row-major
//!   in one contiguous letter buffer.

use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{ZetaError, ZetaResult};

/// A single symbol of the alphabet.
pub type Letter = u8;

/// Largest supported alphabet (letters are stored as `u8`).
pub const MAX_ALPHABET_SIZE: usize = Letter::MAX as usize + 1;

// 2^53: above this the f64 entry sum of A^(n-1) is no longer exact.
const EXACT_COUNT_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Square boolean transition matrix of a subshift of finite type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacencyMatrix {
    size: usize,
    entries: Vec<bool>,
}

impl AdjacencyMatrix {
    /// Build from nested rows. Fails unless every row has as many entries
    /// as there are rows.
    pub fn new(rows: Vec<Vec<bool>>) -> ZetaResult<Self> {
        let size = rows.len();
        if size == 0 {
            return Err(ZetaError::Configuration(
                "adjacency matrix must not be empty".to_string(),
            ));
        }
        if size > MAX_ALPHABET_SIZE {
            return Err(ZetaError::Configuration(format!(
                "alphabet of size {size} exceeds maximum {MAX_ALPHABET_SIZE}"
            )));
        }
        let mut entries = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(ZetaError::Configuration(format!(
                    "adjacency matrix is not square: row {i} has {} entries, expected {size}",
                    row.len()
                )));
            }
            if !row.iter().any(|&legal| legal) {
                log::warn!("AdjacencyMatrix: letter {i} has no successors");
            }
            entries.extend(row);
        }
        Ok(Self { size, entries })
    }

    /// Build from 0/1 integer rows (convenient for literals).
    pub fn from_ints(rows: &[&[u8]]) -> ZetaResult<Self> {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|&v| v != 0).collect())
                .collect(),
        )
    }

    /// Self-loop-only matrix of size `m`.
    pub fn identity(m: usize) -> ZetaResult<Self> {
        Self::new(
            (0..m)
                .map(|i| (0..m).map(|j| i == j).collect())
                .collect(),
        )
    }

    /// Fully connected matrix of size `m`.
    pub fn full(m: usize) -> ZetaResult<Self> {
        Self::new(vec![vec![true; m]; m])
    }

    /// Alphabet size `m`.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the transition `from → to` is legal.
    #[inline]
    pub fn is_legal(&self, from: Letter, to: Letter) -> bool {
        let (i, j) = (from as usize, to as usize);
        i < self.size && j < self.size && self.entries[i * self.size + j]
    }

    /// Letters reachable from `from`, ascending.
    pub fn successors(&self, from: Letter) -> impl Iterator<Item = Letter> + '_ {
        let row = from as usize * self.size;
        self.entries[row..row + self.size]
            .iter()
            .enumerate()
            .filter(|(_, &legal)| legal)
            .map(|(j, _)| j as Letter)
    }

    /// Transition matrix as 0/1 weights.
    pub fn to_array(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.size, self.size), |(i, j)| {
            f64::from(u8::from(self.entries[i * self.size + j]))
        })
    }

    /// Number of legal words of length `n`, i.e. the total weight of all
    /// length-(n−1) walks: the entry sum of `A^(n−1)`.
    ///
    /// Counts are exact up to 2^53 and saturate at `usize::MAX` beyond.
    pub fn word_count(&self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let a = self.to_array();
        let mut power = Array2::<f64>::eye(self.size);
        for _ in 1..n {
            power = power.dot(&a);
        }
        let total = power.sum();
        if total >= EXACT_COUNT_LIMIT {
            log::warn!("word_count: {total:e} words of length {n}, saturating");
            return usize::MAX;
        }
        total as usize
    }

    /// Whether every consecutive pair in `word` is a legal transition.
    pub fn admits(&self, word: &[Letter]) -> bool {
        word.iter().all(|&l| (l as usize) < self.size)
            && word.windows(2).all(|pair| self.is_legal(pair[0], pair[1]))
    }
}

impl fmt::Display for AdjacencyMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for i in 0..self.size {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for j in 0..self.size {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", u8::from(self.entries[i * self.size + j]))?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

/// Ordered collection of words sharing one length.
///
/// The order of words is part of the contract: batches produced by the
/// enumerator follow the ascending-letter pre-order traversal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WordBatch {
    word_len: usize,
    letters: Vec<Letter>,
}

impl WordBatch {
    /// Empty batch of words of length `word_len`.
    pub fn new(word_len: usize) -> Self {
        Self {
            word_len,
            letters: Vec::new(),
        }
    }

    /// Empty batch with room for `words` words.
    pub fn with_capacity(word_len: usize, words: usize) -> Self {
        Self {
            word_len,
            letters: Vec::with_capacity(word_len.saturating_mul(words)),
        }
    }

    /// Build from explicit rows. All rows must have length `word_len`.
    pub fn from_rows(word_len: usize, rows: &[Vec<Letter>]) -> ZetaResult<Self> {
        let mut batch = Self::with_capacity(word_len, rows.len());
        for row in rows {
            batch.push(row)?;
        }
        Ok(batch)
    }

    /// Append one word.
    pub fn push(&mut self, word: &[Letter]) -> ZetaResult<()> {
        if word.len() != self.word_len {
            return Err(ZetaError::Configuration(format!(
                "word of length {} pushed into batch of length {}",
                word.len(),
                self.word_len
            )));
        }
        self.letters.extend_from_slice(word);
        Ok(())
    }

    /// Append `prefix` followed by `letter`. The caller guarantees
    /// `prefix.len() + 1 == word_len`; debug builds assert it.
    #[inline]
    pub fn push_extended(&mut self, prefix: &[Letter], letter: Letter) {
        debug_assert_eq!(
            prefix.len() + 1,
            self.word_len,
            "push_extended: prefix of length {} into batch of length {}",
            prefix.len(),
            self.word_len
        );
        self.letters.extend_from_slice(prefix);
        self.letters.push(letter);
    }

    #[inline]
    pub fn word_len(&self) -> usize {
        self.word_len
    }

    /// Number of words.
    #[inline]
    pub fn len(&self) -> usize {
        if self.word_len == 0 {
            0
        } else {
            self.letters.len() / self.word_len
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `i`-th word.
    #[inline]
    pub fn word(&self, i: usize) -> &[Letter] {
        &self.letters[i * self.word_len..(i + 1) * self.word_len]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[Letter]> + '_ {
        self.letters.chunks_exact(self.word_len.max(1))
    }

    /// Owned copy of all words as rows.
    pub fn to_rows(&self) -> Vec<Vec<Letter>> {
        self.iter().map(<[Letter]>::to_vec).collect()
    }

    /// Keep the words whose mask entry is `true`, preserving order.
    pub fn select(&self, mask: &[bool]) -> WordBatch {
        debug_assert_eq!(mask.len(), self.len());
        let kept = mask.iter().filter(|&&keep| keep).count();
        let mut out = WordBatch::with_capacity(self.word_len, kept);
        for (word, &keep) in self.iter().zip(mask) {
            if keep {
                out.letters.extend_from_slice(word);
            }
        }
        out
    }

    /// Cyclically shift every word `shift` positions to the left.
    pub fn rotate_left(&self, shift: usize) -> WordBatch {
        let mut out = self.clone();
        if self.word_len > 0 {
            let shift = shift % self.word_len;
            for word in out.letters.chunks_exact_mut(self.word_len) {
                word.rotate_left(shift);
            }
        }
        out
    }

    /// Raw contiguous letter buffer (row-major).
    #[inline]
    pub fn as_letters(&self) -> &[Letter] {
        &self.letters
    }
}
