// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Concrete Schottky Geometries
// ─────────────────────────────────────────────────────────────────────
//! Hyperbolic cylinder (rank one), its flow-adapted variant built from
//! reflections, and two parametrisations of the funnel torus (rank two).

use zeta_types::{AdjacencyMatrix, Telemetry, ZetaError, ZetaResult};

use crate::schottky::{SchottkyFunctionSystem, SchottkyMapSystem};
use crate::sl2r::Sl2r;

/// Cylinder whose closed geodesic has length `funnel_width`.
///
/// The unrotated generator is `diag(e^{W/2}, e^{−W/2})`; the rotated one
/// is the boost `[[cosh W/2, sinh W/2], [sinh W/2, cosh W/2]]`, which does
/// not fix infinity.
pub fn hyperbolic_cylinder(
    funnel_width: f64,
    rotate: bool,
    telemetry: Telemetry,
) -> ZetaResult<SchottkyFunctionSystem> {
    check_positive("funnel width", funnel_width)?;
    let half = funnel_width / 2.0;
    let generator = if rotate {
        Sl2r::new(half.cosh(), half.sinh(), half.sinh(), half.cosh())?
    } else {
        Sl2r::new(half.exp(), 0.0, 0.0, (-half).exp())?
    };
    SchottkyFunctionSystem::new(
        format!("HyperbolicCylinder({funnel_width:.4})"),
        &[generator],
        telemetry,
    )
}

/// Map-system cylinder; always rotated so fundamental intervals exist.
pub fn hyperbolic_cylinder_map(
    funnel_width: f64,
    telemetry: Telemetry,
) -> ZetaResult<SchottkyMapSystem> {
    SchottkyMapSystem::new(hyperbolic_cylinder(funnel_width, true, telemetry)?)
}

fn check_positive(name: &str, value: f64) -> ZetaResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ZetaError::Configuration(format!(
            "{name} must be finite and > 0, got {value}"
        )))
    }
}

/// Transitions of the flow-adapted cylinder: 0 ↔ 3 and 1 ↔ 2.
fn flow_adjacency() -> ZetaResult<AdjacencyMatrix> {
    AdjacencyMatrix::from_ints(&[&[0, 0, 0, 1], &[0, 0, 1, 0], &[0, 1, 0, 0], &[1, 0, 0, 0]])
}

/// Cylinder coded by the two reflections whose product translates along
/// the closed geodesic of length `funnel_width`.
///
/// Letters are `[r₁, r₂, r₁, r₂]` with `r₂·r₁` the boost of length W; only
/// alternating words are admissible, so every cyclically reduced word has
/// even length and each geodesic crossing is split into two halves.
pub fn flow_adapted_cylinder(
    funnel_width: f64,
    rotate: bool,
    telemetry: Telemetry,
) -> ZetaResult<SchottkyFunctionSystem> {
    check_positive("funnel width", funnel_width)?;
    let quarter = funnel_width / 4.0;
    let (r1, r2) = if rotate {
        let (ch, sh) = (quarter.cosh(), quarter.sinh());
        (
            Sl2r::reflection(ch, sh, -sh, -ch)?,
            Sl2r::reflection(ch, -sh, sh, -ch)?,
        )
    } else {
        (
            Sl2r::reflection(0.0, quarter.exp(), (-quarter).exp(), 0.0)?,
            Sl2r::reflection(0.0, (-quarter).exp(), quarter.exp(), 0.0)?,
        )
    };
    SchottkyFunctionSystem::with_adjacency(
        format!("HyperbolicCylinder({funnel_width:.4})"),
        vec![r1, r2, r1, r2],
        flow_adjacency()?,
        telemetry,
    )
}

/// Map system of the rotated flow-adapted cylinder.
///
/// Letters 0 and 1 keep the image intervals of the two reflections;
/// letters 2 and 3 use copies shifted right by δ so all four are disjoint.
/// The letter maps become `T·r₁, T·r₂, r₁·T⁻¹, r₂·T⁻¹` with `T: x ↦ x + δ`,
/// which leaves every admissible cyclic iterate conjugate to the plain one.
pub fn flow_adapted_cylinder_map(
    funnel_width: f64,
    telemetry: Telemetry,
) -> ZetaResult<SchottkyMapSystem> {
    let plain = flow_adapted_cylinder(funnel_width, true, telemetry.clone())?;
    let (r1, r2) = (plain.letters()[0], plain.letters()[1]);
    let unbounded = || {
        ZetaError::UnsupportedGeometry(format!("{plain}: reflection fixes infinity"))
    };
    let first = r1.image_interval().ok_or_else(unbounded)?;
    let second = r2.image_interval().ok_or_else(unbounded)?;
    let delta = second.1 - first.0 + 1.0;
    let shift = Sl2r::new(1.0, delta, 0.0, 1.0)?;
    let letters = vec![shift * r1, shift * r2, r1 * shift.inverse(), r2 * shift.inverse()];
    let intervals = vec![
        first,
        second,
        (first.0 + delta, first.1 + delta),
        (second.0 + delta, second.1 + delta),
    ];
    let system = SchottkyFunctionSystem::with_adjacency(
        plain.to_string(),
        letters,
        flow_adjacency()?,
        telemetry,
    )?;
    SchottkyMapSystem::with_intervals(system, intervals)
}

/// Torus with one funnel: closed geodesics of lengths `length1`, `length2`
/// meeting at `angle`.
pub fn funnel_torus(
    length1: f64,
    length2: f64,
    angle: f64,
    telemetry: Telemetry,
) -> ZetaResult<SchottkyFunctionSystem> {
    let (h1, h2) = (length1 / 2.0, length2 / 2.0);
    let gen1 = Sl2r::new(h1.exp(), 0.0, 0.0, (-h1).exp())?;
    let gen2 = Sl2r::new(
        h2.cosh() - angle.cos() * h2.sinh(),
        h2.sinh() * angle.sin().powi(2),
        h2.sinh(),
        h2.cosh() + angle.cos() * h2.sinh(),
    )?;
    SchottkyFunctionSystem::new(
        format!(
            "FunnelTorus({length1:.4}, {length2:.4}, pi/{:.4})",
            std::f64::consts::PI / angle
        ),
        &[gen1, gen2],
        telemetry,
    )
}

/// Funnel torus from its geometric data: the closed geodesic of length
/// `length` along the first generator, the funnel boundary of length
/// `funnel_width`, and the `twist` of the second generator along its axis.
pub fn geometric_funnel_torus(
    length: f64,
    funnel_width: f64,
    twist: f64,
    telemetry: Telemetry,
) -> ZetaResult<SchottkyFunctionSystem> {
    check_positive("outer length", length)?;
    check_positive("funnel width", funnel_width)?;
    if !twist.is_finite() {
        return Err(ZetaError::Configuration(format!(
            "twist must be finite, got {twist}"
        )));
    }
    let half = length / 2.0;
    let gen1 = Sl2r::new(half.exp(), 0.0, 0.0, (-half).exp())?;
    let b = ((1.0 + (funnel_width / 2.0).cosh()) / 2.0).sqrt() / half.sinh();
    let a = (1.0 + b * b).sqrt();
    let (up, down) = ((twist / 2.0).exp(), (-twist / 2.0).exp());
    let gen2 = Sl2r::new(up * a, up * b, down * b, down * a)?;
    SchottkyFunctionSystem::new(
        format!("GeometricFunnelTorus({length:.4}, {funnel_width:.4}, {twist:.4})"),
        &[gen1, gen2],
        telemetry,
    )
}
