// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! cycle-expansion kernel: symbolic words over a subshift of finite type,
//! provider configuration, and the explicit telemetry handle.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod words;

pub use config::{
    ExpansionConfig, IntegralConfig, IntegralKind, RuelleConfig, SystemConfig,
    MAX_DERIVATIVE_ORDER,
};
pub use error::{ZetaError, ZetaResult};
pub use telemetry::Telemetry;
pub use words::{AdjacencyMatrix, Letter, WordBatch};
