// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Telemetry Handle
// ─────────────────────────────────────────────────────────────────────
//! Explicit logging handle handed to each component at construction.
//!
//! Components log through `log::info!(target: telemetry.target(), ..)`;
//! no logger is resolved lazily on first use.

/// Named log target owned by one component instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Telemetry {
    target: String,
}

impl Telemetry {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// The log target string.
    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Handle for a sub-component, e.g. `zeta::selberg` → `zeta::selberg::cache`.
    pub fn child(&self, name: &str) -> Self {
        Self {
            target: format!("{}::{name}", self.target),
        }
    }
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new("zeta")
    }
}
