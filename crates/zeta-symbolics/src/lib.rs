// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Symbolic Dynamics
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Combinatorics on words for subshifts of finite type.
//!
//! Architecture:
//!   - enumerate: pre-order generation and extension of admissible words
//!   - filters: prime / permutation-free / cyclically reduced / periodic
//!   - generator: lazy per-length batches (filters never seed extension)
//!   - dynamics: `SymbolicDynamics` facade over one adjacency matrix

pub mod dynamics;
pub mod enumerate;
pub mod filters;
pub mod generator;

pub use dynamics::SymbolicDynamics;
pub use enumerate::{extend_words, generate_words};
pub use filters::WordFilters;
pub use generator::{SymmetryElements, WordGenerator};
