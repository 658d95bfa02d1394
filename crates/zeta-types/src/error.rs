// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all kernel failures.
///
/// Every variant is raised at the call site that detects the violation.
/// The expansion engines never catch or retry these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ZetaError {
    /// Malformed input data: non-square adjacency, generator/adjacency
    /// shape mismatch, invalid configuration values.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Request outside the supported domain of a provider or engine
    /// (integrals from a constant provider, derivative order too high).
    #[error("domain error: {0}")]
    Domain(String),

    /// Extending words whose length exceeds the requested target length.
    #[error("length mismatch: can't extend words of length {given} to shorter length {target}")]
    LengthMismatch { given: usize, target: usize },

    /// Refinement or domain construction not available for this geometry.
    #[error("unsupported geometry: {0}")]
    UnsupportedGeometry(String),
}

pub type ZetaResult<T> = Result<T, ZetaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_message() {
        let err = ZetaError::LengthMismatch { given: 5, target: 3 };
        assert_eq!(
            err.to_string(),
            "length mismatch: can't extend words of length 5 to shorter length 3"
        );
    }

    #[test]
    fn test_configuration_message() {
        let err = ZetaError::Configuration("adjacency matrix is 2x3".into());
        assert_eq!(err.to_string(), "configuration error: adjacency matrix is 2x3");
    }
}
