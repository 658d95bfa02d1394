// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — Invariant Ruelle Distributions
// ─────────────────────────────────────────────────────────────────────
//! Ruelle distribution `Z[0,1] / Z[1,0]` of a hyperbolic map system,
//! evaluated on a support grid placed over its fundamental intervals.

use std::sync::Arc;

use ndarray::{Array1, Array3};
use num_complex::Complex64;

use zeta_symbolics::SymbolicDynamics;
use zeta_systems::{
    build_map_system, ConstantIntegrals, IntegralProvider, MapSystem, PoincareSectionIntegrals,
    Sl2r,
};
use zeta_types::{
    ExpansionConfig, IntegralKind, Letter, RuelleConfig, Telemetry, ZetaError, ZetaResult,
};

use crate::wzeta::{channel_slice, WeightedZeta};

/// Fundamental intervals refined by the iterates along cyclically reduced
/// words of length `level`, sorted by left endpoint.
///
/// The image `g_w(I_i)` is taken for every interval `I_i` from which the
/// word's first letter may be entered. Level 0 returns the unrefined
/// intervals; refinement needs Moebius generators.
pub fn refine_intervals(map: &dyn MapSystem, level: usize) -> ZetaResult<Vec<(f64, f64)>> {
    let intervals = map.fundamental_intervals();
    if level == 0 {
        return Ok(intervals.to_vec());
    }
    let letters = map.generators().ok_or_else(|| {
        ZetaError::UnsupportedGeometry(format!("domain refinement not available for {map}"))
    })?;
    let adj = map.adjacency();
    let dynamics = SymbolicDynamics::new(adj.clone(), Telemetry::new("zeta::ruelle::refine"));
    let words = match dynamics.word_generator(level, false, false, true).last() {
        Some((words, _)) => words,
        None => return Ok(Vec::new()),
    };

    let mut refined = Vec::new();
    for word in words.iter() {
        let g = word.iter().try_fold(Sl2r::IDENTITY, |acc, &l| {
            letters.get(l as usize).map(|g| *g * acc).ok_or_else(|| {
                ZetaError::Domain(format!(
                    "{map} has {} generators but the alphabet has {} letters",
                    letters.len(),
                    adj.size()
                ))
            })
        })?;
        for (i, &(lo, hi)) in intervals.iter().enumerate() {
            if adj.is_legal(i as Letter, word[0]) {
                let (x, y) = (g.apply(lo), g.apply(hi));
                refined.push((x.min(y), x.max(y)));
            }
        }
    }
    refined.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(refined)
}

/// Keep the intervals at the given indices; out-of-range indices are
/// dropped. Selection only applies when both index lists are given.
pub fn select_intervals(
    intervals: &[(f64, f64)],
    minus_indices: Option<&[usize]>,
    plus_indices: Option<&[usize]>,
) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    match (minus_indices, plus_indices) {
        (Some(minus), Some(plus)) => {
            let pick = |idx: &[usize]| -> Vec<(f64, f64)> {
                idx.iter().filter_map(|&i| intervals.get(i).copied()).collect()
            };
            (pick(minus), pick(plus))
        }
        _ => (intervals.to_vec(), intervals.to_vec()),
    }
}

/// Support points spread over `intervals`, each interval getting a share
/// of `num_points` proportional to its length (rounded up).
pub fn support_from_intervals(intervals: &[(f64, f64)], num_points: usize) -> ZetaResult<Array1<f64>> {
    let total: f64 = intervals.iter().map(|(lo, hi)| (hi - lo).abs()).sum();
    if !(total.is_finite() && total > 0.0) {
        return Err(ZetaError::Configuration(
            "support intervals have zero total length".to_string(),
        ));
    }
    let mut points = Vec::with_capacity(num_points + intervals.len());
    for &(lo, hi) in intervals {
        let count = ((hi - lo).abs() / total * num_points as f64).ceil() as usize;
        points.extend(Array1::linspace(lo, hi, count).iter());
    }
    Ok(Array1::from(points))
}

pub struct RuelleDistribution {
    zeta: WeightedZeta,
    support_minus: Array1<f64>,
    support_plus: Array1<f64>,
    telemetry: Telemetry,
}

impl RuelleDistribution {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        map: Arc<dyn MapSystem>,
        integral_kind: IntegralKind,
        sigma: f64,
        num_support_pts: usize,
        refinement_level: usize,
        minus_indices: Option<&[usize]>,
        plus_indices: Option<&[usize]>,
        telemetry: Telemetry,
    ) -> ZetaResult<Self> {
        log::info!(
            target: telemetry.target(),
            "creating RuelleDistribution for {map} with {integral_kind:?} integrals"
        );
        let intervals = refine_intervals(map.as_ref(), refinement_level)?;
        let (minus, plus) = select_intervals(&intervals, minus_indices, plus_indices);
        let support_minus = support_from_intervals(&minus, num_support_pts)?;
        let support_plus = support_from_intervals(&plus, num_support_pts)?;
        log::debug!(
            target: telemetry.target(),
            "support grid {}x{} from {} intervals (refinement level {refinement_level})",
            support_plus.len(),
            support_minus.len(),
            intervals.len()
        );

        let integrals: Arc<dyn IntegralProvider> = match integral_kind {
            IntegralKind::Constant => Arc::new(ConstantIntegrals),
            IntegralKind::Poincare => Arc::new(PoincareSectionIntegrals::new(
                map.clone(),
                &support_minus.to_vec(),
                &support_plus.to_vec(),
                sigma,
                sigma,
            )?),
        };
        let config = ExpansionConfig {
            d_max: 1,
            ..ExpansionConfig::default()
        };
        let zeta = WeightedZeta::new(map, integrals, config, telemetry.child("wzeta"))?;
        Ok(Self {
            zeta,
            support_minus,
            support_plus,
            telemetry,
        })
    }

    pub fn from_config(cfg: &RuelleConfig, telemetry: Telemetry) -> ZetaResult<Self> {
        cfg.validate()?;
        let map = build_map_system(&cfg.system, &telemetry)?;
        Self::new(
            map,
            cfg.integral_kind,
            cfg.sigma,
            cfg.num_support_pts,
            cfg.refinement_level,
            cfg.minus_indices.as_deref(),
            cfg.plus_indices.as_deref(),
            telemetry,
        )
    }

    /// `(support_minus, support_plus)`; grid cell `(i, j)` sits at
    /// `(support_minus[j], support_plus[i])`.
    pub fn support(&self) -> (&Array1<f64>, &Array1<f64>) {
        (&self.support_minus, &self.support_plus)
    }

    pub fn weighted_zeta(&mut self) -> &mut WeightedZeta {
        &mut self.zeta
    }

    /// Distribution values, shape `(points, rows, cols)`.
    pub fn evaluate(&mut self, s: &Array1<Complex64>, n_max: usize) -> ZetaResult<Array3<Complex64>> {
        log::info!(
            target: self.telemetry.target(),
            "evaluating RuelleDistribution on {} points with n_max={n_max}",
            s.len()
        );
        let det = self.zeta.dynamical_determinant(s, n_max, 1)?;
        let numerator = channel_slice(&det, 0, 1)?;
        let denominator = channel_slice(&det, 1, 0)?;
        Ok(&numerator / &denominator)
    }
}
