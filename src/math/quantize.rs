//! Quantized coordinate keys used to recognise coincident vertices and shared
//! edges across independently computed triangles.

use super::Point3;

/// Default quantization step on the unit sphere.
///
/// Neighbouring ring points at the deepest supported subdivision are roughly
/// `1e-3` apart while duplicate computations of one point agree to within a
/// few ULPs, so any step between about `1e-12` and `1e-5` separates the two.
pub const DEFAULT_QUANTIZATION: f64 = 1e-9;

/// Key for hashing points by quantized coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointKey {
    x: i64,
    y: i64,
    z: i64,
}

impl PointKey {
    /// Quantizes `p` onto a grid with spacing `step`.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn new(p: &Point3, step: f64) -> Self {
        let inv = 1.0 / step;
        Self {
            x: (p.x * inv).round() as i64,
            y: (p.y * inv).round() as i64,
            z: (p.z * inv).round() as i64,
        }
    }
}

/// Key for hashing undirected edges.
///
/// Endpoints are stored in lexicographic order so that both cells sharing an
/// edge, which walk it in opposite directions, produce the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    lo: PointKey,
    hi: PointKey,
}

impl EdgeKey {
    #[must_use]
    pub fn new(a: &Point3, b: &Point3, step: f64) -> Self {
        Self::from_keys(PointKey::new(a, step), PointKey::new(b, step))
    }

    #[must_use]
    pub fn from_keys(a: PointKey, b: PointKey) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// Returns `true` if both endpoints quantize to the same key.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.lo == self.hi
    }
}
