// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Engines
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Truncated cycle expansions of dynamical zeta functions.
//!
//! Architecture:
//!   - bell: scalar Newton-identity recursion
//!   - weighted: two-channel recursion with a derivative axis
//!   - cache: per-evaluator words, stabilities and orbit integrals
//!   - selberg: Selberg zeta of a one-dimensional function system
//!   - wzeta: dynamical determinants and weighted zetas of map systems
//!   - ruelle: invariant Ruelle distributions on a support grid

pub mod bell;
pub mod cache;
pub mod ruelle;
pub mod selberg;
pub mod weighted;
pub mod wzeta;

pub use bell::{bell_iteration, series_sum};
pub use cache::{LengthEntry, OrbitCache};
pub use ruelle::RuelleDistribution;
pub use selberg::SelbergZeta;
pub use weighted::{determinant_sum, weighted_bell_iteration};
pub use wzeta::{channel_slice, WeightedZeta};
