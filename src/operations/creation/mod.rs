mod build_cells;
mod build_grid;
mod resolve_adjacency;

pub use build_cells::BuildCells;
pub use build_grid::BuildGrid;
pub use resolve_adjacency::ResolveAdjacency;

use crate::math::quantize::DEFAULT_QUANTIZATION;

/// Deepest subdivision accepted by [`BuildGrid`] (2 621 442 cells).
pub const MAX_SUBDIVISION_DEPTH: u32 = 9;

/// Parameters controlling grid construction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridParams {
    /// Sphere radius for the world-space geometry.
    pub radius: f64,
    /// Number of icosahedron subdivision rounds. Signed so that values read
    /// from untrusted configuration can be rejected instead of wrapping.
    pub subdivision_depth: i64,
    /// Quantization step used to identify coincident points on the unit
    /// sphere.
    pub quantization: f64,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            subdivision_depth: 3,
            quantization: DEFAULT_QUANTIZATION,
        }
    }
}

impl GridParams {
    /// Parameters for the given radius and depth with the default
    /// quantization.
    #[must_use]
    pub fn new(radius: f64, subdivision_depth: i64) -> Self {
        Self {
            radius,
            subdivision_depth,
            ..Self::default()
        }
    }

    /// Returns a copy using a different quantization step.
    #[must_use]
    pub fn with_quantization(mut self, quantization: f64) -> Self {
        self.quantization = quantization;
        self
    }

    /// Number of cells produced for `depth` rounds: `10 * 4^depth + 2`.
    ///
    /// Returns `None` if the count does not fit in a `usize`.
    #[must_use]
    pub fn cell_count(depth: u32) -> Option<usize> {
        4usize.checked_pow(depth)?.checked_mul(10)?.checked_add(2)
    }
}
