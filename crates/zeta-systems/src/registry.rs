// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Static Provider Registry
// ─────────────────────────────────────────────────────────────────────
//! Maps configuration variants to provider constructors. Every
//! supported geometry and integral kind is listed here at compile time.

use std::sync::Arc;

use zeta_types::{IntegralConfig, SystemConfig, Telemetry, ZetaResult};

use crate::cylinder::{
    flow_adapted_cylinder, flow_adapted_cylinder_map, funnel_torus, geometric_funnel_torus,
    hyperbolic_cylinder, hyperbolic_cylinder_map,
};
use crate::integrals::{ConstantIntegrals, PoincareSectionIntegrals};
use crate::provider::{FunctionSystem, IntegralProvider, MapSystem};
use crate::schottky::{SchottkyFunctionSystem, SchottkyMapSystem};
use crate::sl2r::Sl2r;

fn schottky_generators(generators: &[[[f64; 2]; 2]]) -> ZetaResult<Vec<Sl2r>> {
    generators.iter().map(|rows| Sl2r::from_rows(*rows)).collect()
}

/// Build the one-dimensional function system of a geometry.
pub fn build_function_system(
    cfg: &SystemConfig,
    telemetry: &Telemetry,
) -> ZetaResult<Arc<dyn FunctionSystem>> {
    cfg.validate()?;
    let telemetry = telemetry.child("system");
    let system = match cfg {
        SystemConfig::HyperbolicCylinder {
            funnel_width,
            rotate,
        } => hyperbolic_cylinder(*funnel_width, *rotate, telemetry)?,
        SystemConfig::FunnelTorus {
            length1,
            length2,
            angle,
        } => funnel_torus(*length1, *length2, *angle, telemetry)?,
        SystemConfig::FlowAdaptedCylinder {
            funnel_width,
            rotate,
        } => flow_adapted_cylinder(*funnel_width, *rotate, telemetry)?,
        SystemConfig::GeometricFunnelTorus {
            length,
            funnel_width,
            twist,
        } => geometric_funnel_torus(*length, *funnel_width, *twist, telemetry)?,
        SystemConfig::Schottky { generators } => SchottkyFunctionSystem::new(
            format!("SchottkySurface(rank {})", generators.len()),
            &schottky_generators(generators)?,
            telemetry,
        )?,
    };
    Ok(Arc::new(system))
}

/// Build the two-dimensional map system of a geometry.
///
/// Cylinders are always rotated. Geometries with a generator fixing
/// infinity, or whose fundamental intervals overlap, fail with
/// `UnsupportedGeometry`.
pub fn build_map_system(
    cfg: &SystemConfig,
    telemetry: &Telemetry,
) -> ZetaResult<Arc<dyn MapSystem>> {
    cfg.validate()?;
    let telemetry = telemetry.child("system");
    let map = match cfg {
        SystemConfig::HyperbolicCylinder { funnel_width, .. } => {
            hyperbolic_cylinder_map(*funnel_width, telemetry)?
        }
        SystemConfig::FunnelTorus {
            length1,
            length2,
            angle,
        } => SchottkyMapSystem::new(funnel_torus(*length1, *length2, *angle, telemetry)?)?,
        SystemConfig::FlowAdaptedCylinder { funnel_width, .. } => {
            flow_adapted_cylinder_map(*funnel_width, telemetry)?
        }
        SystemConfig::GeometricFunnelTorus {
            length,
            funnel_width,
            twist,
        } => SchottkyMapSystem::new(geometric_funnel_torus(
            *length,
            *funnel_width,
            *twist,
            telemetry,
        )?)?,
        SystemConfig::Schottky { generators } => SchottkyMapSystem::new(
            SchottkyFunctionSystem::new(
                format!("SchottkySurface(rank {})", generators.len()),
                &schottky_generators(generators)?,
                telemetry,
            )?,
        )?,
    };
    Ok(Arc::new(map))
}

/// Build an orbit-integral provider over `map`.
pub fn build_integrals(
    cfg: &IntegralConfig,
    map: Arc<dyn MapSystem>,
) -> ZetaResult<Arc<dyn IntegralProvider>> {
    cfg.validate()?;
    match cfg {
        IntegralConfig::Constant => Ok(Arc::new(ConstantIntegrals)),
        IntegralConfig::Poincare {
            support_minus,
            support_plus,
            sigma_minus,
            sigma_plus,
        } => Ok(Arc::new(PoincareSectionIntegrals::new(
            map,
            support_minus,
            support_plus,
            *sigma_minus,
            *sigma_plus,
        )?)),
    }
}
