// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Configuration
// ─────────────────────────────────────────────────────────────────────
//! Plain serde configuration consumed by ordinary constructors.
//!
//! Geometry and integral choices are tagged unions: the `type` field of
//! the JSON object selects the variant, and the registry in
//! `zeta-systems` maps each variant to its constructor.

use serde::{Deserialize, Serialize};

use crate::error::{ZetaError, ZetaResult};

/// Highest derivative order an engine may be built for.
pub const MAX_DERIVATIVE_ORDER: usize = 8;

/// Truncation parameters of a cycle expansion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Maximal word length / series order.
    /// Default: 6.
    pub n_max: usize,

    /// Maximal derivative order in `s` for weighted determinants.
    /// Default: 0.
    pub d_max: usize,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self { n_max: 6, d_max: 0 }
    }
}

impl ExpansionConfig {
    pub fn validate(&self) -> ZetaResult<()> {
        if self.d_max > MAX_DERIVATIVE_ORDER {
            return Err(ZetaError::Configuration(format!(
                "d_max must be <= {MAX_DERIVATIVE_ORDER}, got {}",
                self.d_max
            )));
        }
        Ok(())
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> ZetaResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| ZetaError::Configuration(format!("JSON parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Geometry supplying stabilities and periodic points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SystemConfig {
    /// Rank-one Schottky surface with a closed geodesic of length `funnel_width`.
    HyperbolicCylinder {
        funnel_width: f64,
        #[serde(default)]
        rotate: bool,
    },
    /// Rank-two Schottky surface: torus with one funnel.
    FunnelTorus {
        length1: f64,
        length2: f64,
        angle: f64,
    },
    /// Cylinder coded by two reflections; each crossing of the closed
    /// geodesic becomes two letters.
    FlowAdaptedCylinder {
        funnel_width: f64,
        #[serde(default)]
        rotate: bool,
    },
    /// Funnel torus from outer geodesic length, funnel width and twist.
    GeometricFunnelTorus {
        length: f64,
        funnel_width: f64,
        #[serde(default)]
        twist: f64,
    },
    /// Schottky group given by its generators (inverses are added).
    Schottky { generators: Vec<[[f64; 2]; 2]> },
}

impl SystemConfig {
    pub fn validate(&self) -> ZetaResult<()> {
        match self {
            SystemConfig::HyperbolicCylinder { funnel_width, .. }
            | SystemConfig::FlowAdaptedCylinder { funnel_width, .. } => {
                positive("funnel_width", *funnel_width)
            }
            SystemConfig::GeometricFunnelTorus {
                length,
                funnel_width,
                twist,
            } => {
                positive("length", *length)?;
                positive("funnel_width", *funnel_width)?;
                if !twist.is_finite() {
                    return Err(ZetaError::Configuration(format!(
                        "twist must be finite, got {twist}"
                    )));
                }
                Ok(())
            }
            SystemConfig::FunnelTorus {
                length1,
                length2,
                angle,
            } => {
                positive("length1", *length1)?;
                positive("length2", *length2)?;
                if !(angle.is_finite() && *angle > 0.0 && *angle < std::f64::consts::PI) {
                    return Err(ZetaError::Configuration(format!(
                        "angle must be in (0, pi), got {angle}"
                    )));
                }
                Ok(())
            }
            SystemConfig::Schottky { generators } => {
                if generators.is_empty() {
                    return Err(ZetaError::Configuration(
                        "Schottky system needs at least one generator".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    pub fn from_json(json: &str) -> ZetaResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| ZetaError::Configuration(format!("JSON parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Orbit-integral provider selection with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntegralConfig {
    /// Constant weights; refuses to produce integral grids.
    Constant,
    /// Gaussian test functions on the Poincaré section.
    Poincare {
        support_minus: Vec<f64>,
        support_plus: Vec<f64>,
        sigma_minus: f64,
        sigma_plus: f64,
    },
}

impl IntegralConfig {
    pub fn validate(&self) -> ZetaResult<()> {
        match self {
            IntegralConfig::Constant => Ok(()),
            IntegralConfig::Poincare {
                support_minus,
                support_plus,
                sigma_minus,
                sigma_plus,
            } => {
                if support_minus.is_empty() || support_plus.is_empty() {
                    return Err(ZetaError::Configuration(
                        "Poincare support grids must not be empty".to_string(),
                    ));
                }
                positive("sigma_minus", *sigma_minus)?;
                positive("sigma_plus", *sigma_plus)
            }
        }
    }
}

/// Integral kind requested by a Ruelle distribution; the support grid is
/// derived from the geometry rather than given explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegralKind {
    Constant,
    Poincare,
}

/// Invariant Ruelle distribution on a hyperbolic map system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuelleConfig {
    pub system: SystemConfig,
    pub integral_kind: IntegralKind,
    /// Width of the Gaussian test functions.
    pub sigma: f64,
    /// Total number of support points along each axis.
    pub num_support_pts: usize,
    /// Word length used to refine the fundamental intervals (0 = none).
    #[serde(default)]
    pub refinement_level: usize,
    #[serde(default)]
    pub minus_indices: Option<Vec<usize>>,
    #[serde(default)]
    pub plus_indices: Option<Vec<usize>>,
}

impl RuelleConfig {
    pub fn validate(&self) -> ZetaResult<()> {
        self.system.validate()?;
        positive("sigma", self.sigma)?;
        if self.num_support_pts == 0 {
            return Err(ZetaError::Configuration(
                "num_support_pts must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> ZetaResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| ZetaError::Configuration(format!("JSON parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

fn positive(name: &str, value: f64) -> ZetaResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ZetaError::Configuration(format!(
            "{name} must be finite and > 0, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expansion_default_valid() {
        assert!(ExpansionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_expansion_d_max_rejected() {
        let cfg = ExpansionConfig {
            n_max: 4,
            d_max: MAX_DERIVATIVE_ORDER + 1,
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_expansion_json_partial() {
        let cfg = ExpansionConfig::from_json(r#"{"n_max": 9}"#).unwrap();
        assert_eq!(cfg.n_max, 9);
        assert_eq!(cfg.d_max, 0);
    }

    #[test]
    fn test_expansion_json_invalid() {
        let err = ExpansionConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ZetaError::Configuration(_)));
    }

    #[test]
    fn test_system_tagged_json() {
        let cfg =
            SystemConfig::from_json(r#"{"type": "hyperbolic_cylinder", "funnel_width": 5.0}"#)
                .unwrap();
        assert_eq!(
            cfg,
            SystemConfig::HyperbolicCylinder {
                funnel_width: 5.0,
                rotate: false
            }
        );
    }

    #[test]
    fn test_system_negative_width_rejected() {
        let cfg = SystemConfig::HyperbolicCylinder {
            funnel_width: -1.0,
            rotate: true,
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_unknown_system_rejected() {
        assert!(SystemConfig::from_json(r#"{"type": "klein_bottle"}"#).is_err());
    }

    #[test]
    fn test_torus_angle_range() {
        let cfg = SystemConfig::FunnelTorus {
            length1: 2.0,
            length2: 2.0,
            angle: 4.0,
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_flow_cylinder_json() {
        let cfg = SystemConfig::from_json(
            r#"{"type": "flow_adapted_cylinder", "funnel_width": 2.5, "rotate": true}"#,
        )
        .unwrap();
        assert_eq!(
            cfg,
            SystemConfig::FlowAdaptedCylinder {
                funnel_width: 2.5,
                rotate: true
            }
        );
    }

    #[test]
    fn test_geometric_torus_json() {
        let cfg = SystemConfig::from_json(
            r#"{"type": "geometric_funnel_torus", "length": 3.0, "funnel_width": 2.0}"#,
        )
        .unwrap();
        assert_eq!(
            cfg,
            SystemConfig::GeometricFunnelTorus {
                length: 3.0,
                funnel_width: 2.0,
                twist: 0.0
            }
        );
        let bad = SystemConfig::GeometricFunnelTorus {
            length: 3.0,
            funnel_width: 0.0,
            twist: 0.0,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_poincare_empty_support_rejected() {
        let cfg = IntegralConfig::Poincare {
            support_minus: vec![],
            support_plus: vec![0.0],
            sigma_minus: 0.1,
            sigma_plus: 0.1,
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_ruelle_json() {
        let json = r#"{
            "system": {"type": "hyperbolic_cylinder", "funnel_width": 3.0, "rotate": true},
            "integral_kind": "poincare",
            "sigma": 0.05,
            "num_support_pts": 20
        }"#;
        let cfg = RuelleConfig::from_json(json).unwrap();
        assert_eq!(cfg.refinement_level, 0);
        assert_eq!(cfg.integral_kind, IntegralKind::Poincare);
        assert!(cfg.minus_indices.is_none());
    }
}
