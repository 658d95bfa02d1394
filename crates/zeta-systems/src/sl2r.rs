// ─────────────────────────────────────────────────────────────────────
// Cycle-Expansion Kernel — SL(2,R) Moebius Transformations
// ─────────────────────────────────────────────────────────────────────
//! Real 2×2 matrices of determinant ±1 acting on the boundary ℝ of the
//! upper half plane via x ↦ (ax + b)/(cx + d). Determinant −1 elements
//! are the orientation-reversing isometries (reflections and glide
//! reflections) used by flow-adapted systems.

use std::fmt;
use std::ops::Mul;

use zeta_types::{ZetaError, ZetaResult};

/// Relative tolerance for the unit-determinant check.
const DET_TOLERANCE: f64 = 1e-9;

/// Below this fraction of the largest other entry, `c` counts as zero and
/// the element fixes ∞.
const INFINITY_TOLERANCE: f64 = 1e-12;

/// Element of SL±(2,ℝ).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sl2r {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl Sl2r {
    pub const IDENTITY: Sl2r = Sl2r {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
    };

    /// Orientation-preserving element (determinant 1).
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> ZetaResult<Self> {
        Self::with_determinant(a, b, c, d, 1.0)
    }

    /// Orientation-reversing element (determinant −1).
    pub fn reflection(a: f64, b: f64, c: f64, d: f64) -> ZetaResult<Self> {
        Self::with_determinant(a, b, c, d, -1.0)
    }

    fn with_determinant(a: f64, b: f64, c: f64, d: f64, expected: f64) -> ZetaResult<Self> {
        if ![a, b, c, d].iter().all(|v| v.is_finite()) {
            return Err(ZetaError::Configuration(format!(
                "matrix entries must be finite: [[{a}, {b}], [{c}, {d}]]"
            )));
        }
        let det = a * d - b * c;
        let scale = (a * d).abs().max((b * c).abs()).max(1.0);
        if (det - expected).abs() > DET_TOLERANCE * scale {
            return Err(ZetaError::Configuration(format!(
                "matrix [[{a}, {b}], [{c}, {d}]] has determinant {det}, expected {expected}"
            )));
        }
        Ok(Self { a, b, c, d })
    }

    pub fn from_rows(rows: [[f64; 2]; 2]) -> ZetaResult<Self> {
        Self::new(rows[0][0], rows[0][1], rows[1][0], rows[1][1])
    }

    pub fn rows(&self) -> [[f64; 2]; 2] {
        [[self.a, self.b], [self.c, self.d]]
    }

    #[inline]
    pub fn a(&self) -> f64 {
        self.a
    }

    #[inline]
    pub fn b(&self) -> f64 {
        self.b
    }

    #[inline]
    pub fn c(&self) -> f64 {
        self.c
    }

    #[inline]
    pub fn d(&self) -> f64 {
        self.d
    }

    /// Whether the determinant is −1.
    #[inline]
    pub fn is_orientation_reversing(&self) -> bool {
        self.a * self.d - self.b * self.c < 0.0
    }

    /// ±1, rounded from the entries.
    #[inline]
    fn det_sign(&self) -> f64 {
        if self.is_orientation_reversing() {
            -1.0
        } else {
            1.0
        }
    }

    /// Exact inverse: the adjugate divided by det = ±1.
    pub fn inverse(&self) -> Self {
        let sign = self.det_sign();
        Self {
            a: sign * self.d,
            b: -sign * self.b,
            c: -sign * self.c,
            d: sign * self.a,
        }
    }

    #[inline]
    pub fn trace(&self) -> f64 {
        self.a + self.d
    }

    /// Whether the element translates along an axis: |tr| > 2 for
    /// determinant 1, tr ≠ 0 (a glide reflection) for determinant −1.
    pub fn is_hyperbolic(&self) -> bool {
        if self.is_orientation_reversing() {
            self.trace() != 0.0
        } else {
            self.trace().abs() > 2.0
        }
    }

    /// Translation length along the axis: ℓ = 2·arcosh(|tr|/2), or
    /// ℓ = 2·arsinh(|tr|/2) for a glide reflection.
    pub fn displacement_length(&self) -> ZetaResult<f64> {
        let trace = self.trace().abs();
        if !self.is_hyperbolic() {
            return Err(ZetaError::Domain(format!(
                "no displacement length for non-hyperbolic {self} (|tr| = {trace})"
            )));
        }
        if self.is_orientation_reversing() {
            Ok(2.0 * (trace / 2.0).asinh())
        } else {
            Ok(2.0 * (trace / 2.0).acosh())
        }
    }

    /// Whether `c` vanishes relative to the other entries.
    pub fn fixes_infinity(&self) -> bool {
        let scale = self.a.abs().max(self.b.abs()).max(self.d.abs()).max(1.0);
        self.c.abs() <= INFINITY_TOLERANCE * scale
    }

    /// The two real fixed points `((a−d) ∓ √(tr²−4·det)) / 2c`, smaller
    /// first for c > 0.
    pub fn fixed_points(&self) -> ZetaResult<(f64, f64)> {
        let trace = self.trace();
        let discriminant = trace * trace - 4.0 * self.det_sign();
        if discriminant <= 0.0 {
            return Err(ZetaError::Domain(format!(
                "{self} is not hyperbolic; no pair of real fixed points"
            )));
        }
        if self.fixes_infinity() {
            return Err(ZetaError::UnsupportedGeometry(format!(
                "{self} fixes infinity"
            )));
        }
        let root = discriminant.sqrt();
        let diff = self.a - self.d;
        Ok(((diff - root) / (2.0 * self.c), (diff + root) / (2.0 * self.c)))
    }

    /// Action on the real line. The pole maps to ±∞.
    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        (self.a * x + self.b) / (self.c * x + self.d)
    }

    /// |g'(x)| = |det|/(cx + d)² = 1/(cx + d)².
    pub fn derivative(&self, x: f64) -> f64 {
        let denom = self.c * x + self.d;
        1.0 / (denom * denom)
    }

    /// Interval cut out of ℝ by the isometric circle of the inverse,
    /// centre a/c and radius 1/|c|; `None` when the element fixes ∞.
    pub fn image_interval(&self) -> Option<(f64, f64)> {
        if self.fixes_infinity() {
            return None;
        }
        let centre = self.a / self.c;
        let radius = 1.0 / self.c.abs();
        Some((centre - radius, centre + radius))
    }
}

impl Mul for Sl2r {
    type Output = Sl2r;

    fn mul(self, rhs: Sl2r) -> Sl2r {
        Sl2r {
            a: self.a * rhs.a + self.b * rhs.c,
            b: self.a * rhs.b + self.b * rhs.d,
            c: self.c * rhs.a + self.d * rhs.c,
            d: self.c * rhs.b + self.d * rhs.d,
        }
    }
}

impl Default for Sl2r {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Sl2r {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SL2R([[{:.3}, {:.3}], [{:.3}, {:.3}]])",
            self.a, self.b, self.c, self.d
        )
    }
}
