// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Orbit Weight Providers
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Geometry collaborators of the cycle-expansion engines: Moebius
//! function and map systems on Schottky surfaces, and orbit integrals.

pub mod cylinder;
pub mod integrals;
pub mod provider;
pub mod registry;
pub mod schottky;
pub mod sl2r;

pub use cylinder::{
    flow_adapted_cylinder, flow_adapted_cylinder_map, funnel_torus, geometric_funnel_torus,
    hyperbolic_cylinder, hyperbolic_cylinder_map,
};
pub use integrals::{ConstantIntegrals, PoincareSectionIntegrals, UniformIntegrals};
pub use provider::{FunctionSystem, IntegralProvider, MapSystem};
pub use registry::{build_function_system, build_integrals, build_map_system};
pub use schottky::{SchottkyFunctionSystem, SchottkyMapSystem};
pub use sl2r::Sl2r;
