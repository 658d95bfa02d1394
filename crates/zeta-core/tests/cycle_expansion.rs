// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — End-to-End Expansion Tests
// ─────────────────────────────────────────────────────────────────────

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use ndarray::{array, s, Array1, Array2};
use num_complex::Complex64;

use zeta_core::{bell_iteration, series_sum, SelbergZeta, WeightedZeta};
use zeta_symbolics::{extend_words, generate_words, SymbolicDynamics};
use zeta_systems::{
    flow_adapted_cylinder_map, hyperbolic_cylinder, hyperbolic_cylinder_map, FunctionSystem,
    PoincareSectionIntegrals, UniformIntegrals,
};
use zeta_types::{
    AdjacencyMatrix, ExpansionConfig, SystemConfig, Telemetry, WordBatch, ZetaResult,
};

/// One self-adjacent letter whose length-k word has stability exp(−k·W).
struct SingleLetter {
    width: f64,
    adj: AdjacencyMatrix,
}

impl SingleLetter {
    fn new(width: f64) -> Self {
        Self {
            width,
            adj: AdjacencyMatrix::full(1).unwrap(),
        }
    }
}

impl fmt::Display for SingleLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SingleLetter({})", self.width)
    }
}

impl FunctionSystem for SingleLetter {
    fn adjacency(&self) -> &AdjacencyMatrix {
        &self.adj
    }

    fn stabilities(&self, words: &WordBatch) -> ZetaResult<Array1<f64>> {
        let k = words.word_len() as f64;
        Ok(Array1::from_elem(words.len(), (-k * self.width).exp()))
    }
}

/// Two letters that must alternate; a word of length k has stability
/// exp(−k·W/2), so closed orbits have even length only.
struct Alternating {
    width: f64,
    adj: AdjacencyMatrix,
}

impl Alternating {
    fn new(width: f64) -> Self {
        Self {
            width,
            adj: AdjacencyMatrix::from_ints(&[&[0, 1], &[1, 0]]).unwrap(),
        }
    }
}

impl fmt::Display for Alternating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Alternating({})", self.width)
    }
}

impl FunctionSystem for Alternating {
    fn adjacency(&self) -> &AdjacencyMatrix {
        &self.adj
    }

    fn stabilities(&self, words: &WordBatch) -> ZetaResult<Array1<f64>> {
        let k = words.word_len() as f64;
        Ok(Array1::from_elem(words.len(), (-0.5 * k * self.width).exp()))
    }
}

fn resonances(width: f64) -> Array1<Complex64> {
    array![
        Complex64::new(0.0, 0.0),
        Complex64::new(0.0, -2.0 * PI / width),
        Complex64::new(0.0, 2.0 * PI / width),
    ]
}

#[test]
fn single_letter_determinant_vanishes_at_resonances() {
    for width in [2.0, 5.0] {
        for n_max in [6, 8] {
            let mut zeta = SelbergZeta::new(Arc::new(SingleLetter::new(width)), Telemetry::default());
            let values = zeta.evaluate(&resonances(width), n_max).unwrap();
            for v in values.iter() {
                assert!(v.norm() < 1e-8, "W={width}, n_max={n_max}: |Z| = {}", v.norm());
            }
        }
    }
}

#[test]
fn single_letter_nonzero_off_resonance() {
    let mut zeta = SelbergZeta::new(Arc::new(SingleLetter::new(5.0)), Telemetry::default());
    let values = zeta.evaluate(&array![Complex64::new(0.5, 0.0)], 6).unwrap();
    let product: f64 = (0..20).map(|k| 1.0 - (-5.0 * (0.5 + k as f64)).exp()).product();
    assert_abs_diff_eq!(values[0].re, product, epsilon = 1e-8);
    assert_abs_diff_eq!(values[0].im, 0.0, epsilon = 1e-12);
}

#[test]
fn cylinder_selberg_zeros() {
    let width = 5.0;
    for rotate in [false, true] {
        let sys = hyperbolic_cylinder(width, rotate, Telemetry::default()).unwrap();
        let mut zeta = SelbergZeta::new(Arc::new(sys), Telemetry::default());
        let values = zeta.evaluate(&resonances(width), 6).unwrap();
        for v in values.iter() {
            assert!(v.norm() < 1e-8, "|Z| = {}", v.norm());
        }
    }
}

#[test]
fn alternating_letters_leave_odd_orders_empty() {
    let s_pts = array![Complex64::new(0.5, 0.0), Complex64::new(0.1, 1.5)];
    let mut zeta = SelbergZeta::new(Arc::new(Alternating::new(3.0)), Telemetry::default());
    let a = zeta.calc_a(&s_pts, 6).unwrap();
    for k in [0, 2, 4] {
        assert!(a.column(k).iter().all(|v| v.norm() == 0.0), "order {}", k + 1);
    }
    assert!(a.column(1).iter().all(|v| v.norm() > 0.0));
    let values = zeta.evaluate(&s_pts, 6).unwrap();
    assert!(values.iter().all(|v| v.re.is_finite() && v.im.is_finite()));
}

#[test]
fn alternating_letters_match_single_letter_at_half_order() {
    let s_pts = array![Complex64::new(0.5, 0.0), Complex64::new(0.0, 1.0)];
    let mut alternating = SelbergZeta::new(Arc::new(Alternating::new(2.0)), Telemetry::default());
    let mut single = SelbergZeta::new(Arc::new(SingleLetter::new(2.0)), Telemetry::default());
    let a = alternating.evaluate(&s_pts, 8).unwrap();
    let b = single.evaluate(&s_pts, 4).unwrap();
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).norm() < 1e-12, "{x} vs {y}");
    }
}

#[test]
fn flow_cylinder_selberg_matches_cylinder() {
    let s_pts = array![Complex64::new(0.3, 0.0), Complex64::new(0.2, 0.8)];
    let flow = SystemConfig::from_json(r#"{"type": "flow_adapted_cylinder", "funnel_width": 2.0}"#)
        .unwrap();
    let plain = SystemConfig::from_json(r#"{"type": "hyperbolic_cylinder", "funnel_width": 2.0}"#)
        .unwrap();
    let a = SelbergZeta::from_config(&flow, Telemetry::default())
        .unwrap()
        .evaluate(&s_pts, 8)
        .unwrap();
    let b = SelbergZeta::from_config(&plain, Telemetry::default())
        .unwrap()
        .evaluate(&s_pts, 4)
        .unwrap();
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).norm() < 1e-10, "{x} vs {y}");
    }
}

#[test]
fn flow_cylinder_weighted_odd_orders_empty() {
    let s_pts = array![Complex64::new(0.4, 0.0), Complex64::new(0.2, 1.0)];
    let flow = Arc::new(flow_adapted_cylinder_map(2.0, Telemetry::default()).unwrap());
    let mut zeta = WeightedZeta::new(
        flow,
        Arc::new(UniformIntegrals::unit()),
        ExpansionConfig { n_max: 6, d_max: 1 },
        Telemetry::default(),
    )
    .unwrap();
    let af = zeta.calc_weighted_a(&s_pts, 6, 1).unwrap();
    for k in [0, 2, 4] {
        assert!(af.slice(s![.., k, .., .., .., ..]).iter().all(|v| v.norm() == 0.0));
    }
    assert!(af.slice(s![.., 1, 0, .., .., ..]).iter().all(|v| v.norm() > 0.0));

    let det = zeta.dynamical_determinant(&s_pts, 6, 1).unwrap();
    assert!(det.iter().all(|v| v.re.is_finite() && v.im.is_finite()));
    let mut plain = cylinder_weighted(1, 1.0);
    let reference = plain.dynamical_determinant(&s_pts, 3, 1).unwrap();
    for (x, y) in det.iter().zip(reference.iter()) {
        assert!((x - y).norm() < 1e-10, "{x} vs {y}");
    }
}

#[test]
fn selberg_from_config_tends_to_one() {
    let cfg = SystemConfig::from_json(
        r#"{"type": "funnel_torus", "length1": 3.0, "length2": 3.0, "angle": 1.5707963267948966}"#,
    )
    .unwrap();
    let mut zeta = SelbergZeta::from_config(&cfg, Telemetry::new("zeta::selberg")).unwrap();
    let values = zeta.evaluate(&array![Complex64::new(10.0, 0.0)], 4).unwrap();
    assert_abs_diff_eq!(values[0].re, 1.0, epsilon = 1e-10);
    assert_abs_diff_eq!(values[0].im, 0.0, epsilon = 1e-10);
}

fn cylinder_weighted(d_max: usize, value: f64) -> WeightedZeta {
    let map = Arc::new(hyperbolic_cylinder_map(2.0, Telemetry::default()).unwrap());
    WeightedZeta::new(
        map,
        Arc::new(UniformIntegrals::new(1, 1, value).unwrap()),
        ExpansionConfig { n_max: 5, d_max },
        Telemetry::default(),
    )
    .unwrap()
}

#[test]
fn unit_integrals_reproduce_scalar_channel_zero() {
    let s_pts = array![Complex64::new(0.3, 0.0), Complex64::new(0.1, 2.0)];
    let n_max = 6;
    let mut zeta = cylinder_weighted(0, 1.0);
    let af = zeta.calc_weighted_a(&s_pts, n_max, 0).unwrap();
    let a: Array2<Complex64> = af.slice(s![.., .., 0, 0, 0, 0]).to_owned();
    let scalar = series_sum(&bell_iteration(a.view(), n_max));
    let det = zeta.dynamical_determinant(&s_pts, n_max, 0).unwrap();
    assert_eq!(det.slice(s![.., 0, 0, 0, 0]), scalar);
}

#[test]
fn channel_zero_independent_of_integrals() {
    let s_pts = array![Complex64::new(0.4, 0.5)];
    let map = Arc::new(hyperbolic_cylinder_map(2.0, Telemetry::default()).unwrap());
    let poincare = PoincareSectionIntegrals::new(map.clone(), &[1.0], &[-1.0], 0.3, 0.3).unwrap();
    let mut weighted =
        WeightedZeta::new(map, Arc::new(poincare), ExpansionConfig::default(), Telemetry::default())
            .unwrap();
    let mut unit = cylinder_weighted(0, 1.0);
    let a = weighted.dynamical_determinant(&s_pts, 5, 0).unwrap();
    let b = unit.dynamical_determinant(&s_pts, 5, 0).unwrap();
    assert_eq!(a.slice(s![.., .., 0, .., ..]), b.slice(s![.., .., 0, .., ..]));
}

#[test]
fn raising_d_max_keeps_lower_slices() {
    let s_pts = array![Complex64::new(0.25, 0.0), Complex64::new(0.6, -1.0)];
    let mut low = cylinder_weighted(0, 1.0);
    let mut high = cylinder_weighted(2, 1.0);
    let d0 = low.dynamical_determinant(&s_pts, 5, 0).unwrap();
    let d1 = high.dynamical_determinant(&s_pts, 5, 1).unwrap();
    let d2 = high.dynamical_determinant(&s_pts, 5, 2).unwrap();
    assert_eq!(d0.slice(s![.., 0, .., .., ..]), d1.slice(s![.., 0, .., .., ..]));
    assert_eq!(d1.slice(s![.., 0..2, .., .., ..]), d2.slice(s![.., 0..2, .., .., ..]));
}

#[test]
fn weighted_zeta_linear_in_integrals() {
    let s_pts = array![Complex64::new(0.35, 0.2)];
    let one = cylinder_weighted(0, 1.0).weighted_zeta(&s_pts, 5).unwrap();
    let two = cylinder_weighted(0, 2.0).weighted_zeta(&s_pts, 5).unwrap();
    assert!((two[[0, 0, 0]] - one[[0, 0, 0]] * 2.0).norm() < 1e-12);
}

#[test]
fn weighted_cache_rebuilds_only_when_needed() {
    let s_pts = array![Complex64::new(0.3, 0.0)];
    let mut zeta = cylinder_weighted(1, 1.0);
    zeta.dynamical_determinant(&s_pts, 4, 1).unwrap();
    zeta.dynamical_determinant(&s_pts, 3, 0).unwrap();
    assert_eq!(zeta.cache().rebuilds(), 1);
    zeta.dynamical_determinant(&s_pts, 6, 1).unwrap();
    assert_eq!(zeta.cache().rebuilds(), 2);
    assert_eq!(zeta.cache().coverage(), 6);
}

#[test]
fn identity_generator_independent_of_filters() {
    let sd = SymbolicDynamics::new(AdjacencyMatrix::identity(4).unwrap(), Telemetry::default());
    let expected: Vec<Vec<u8>> = (0..4u8).map(|i| vec![i; 4]).collect();
    for perm_free in [false, true] {
        for cycl_red in [false, true] {
            let (words, symmetries) = sd.word_generator(4, false, perm_free, cycl_red).last().unwrap();
            assert_eq!(words.to_rows(), expected);
            assert!(symmetries.is_empty());
        }
    }
}

#[test]
fn full_shift_extension_matches_generation() {
    let adj = AdjacencyMatrix::full(3).unwrap();
    for n in 1..=6 {
        let direct = generate_words(n, &adj).unwrap();
        assert_eq!(direct.len(), 3usize.pow(n as u32));
        if n > 1 {
            let shorter = generate_words(n - 1, &adj).unwrap();
            assert_eq!(extend_words(n, &adj, &shorter).unwrap(), direct);
        }
        assert_eq!(extend_words(n, &adj, &direct).unwrap(), direct);
    }
}
