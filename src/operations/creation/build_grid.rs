use tracing::debug;

use crate::error::{ArgumentError, Result};
use crate::operations::query::IsValid;
use crate::tessellation::Subdivide;
use crate::topology::Grid;

use super::{BuildCells, GridParams, ResolveAdjacency, MAX_SUBDIVISION_DEPTH};

/// Builds a complete, validated sphere grid.
///
/// Runs subdivision, dual-cell construction and adjacency resolution in
/// order, then checks the grid invariants. Any defect fails the whole build;
/// a partially linked grid is never returned.
pub struct BuildGrid {
    params: GridParams,
}

impl BuildGrid {
    /// Creates a new `BuildGrid` operation.
    #[must_use]
    pub fn new(params: GridParams) -> Self {
        Self { params }
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns an [`ArgumentError`] for a non-positive radius, a negative or
    /// too deep subdivision, or an invalid quantization step, and a
    /// [`ConsistencyError`](crate::error::ConsistencyError) if the geometry
    /// pipeline produced an inconsistent grid.
    pub fn execute(&self) -> Result<Grid> {
        let depth = self.validate()?;
        let quantization = self.params.quantization;

        let triangles = Subdivide::new(depth).execute();
        let mut grid = Grid::new(self.params.radius, depth);
        BuildCells::new(&triangles, quantization).execute(&mut grid)?;
        ResolveAdjacency::new(quantization).execute(&mut grid)?;
        IsValid::new().check(&grid)?;

        debug!(
            depth,
            radius = self.params.radius,
            cells = grid.len(),
            "built sphere grid"
        );
        Ok(grid)
    }

    fn validate(&self) -> Result<u32> {
        let GridParams {
            radius,
            subdivision_depth,
            quantization,
        } = self.params;

        if !radius.is_finite() || radius <= 0.0 {
            return Err(ArgumentError::InvalidRadius(radius).into());
        }
        if !quantization.is_finite() || quantization <= 0.0 {
            return Err(ArgumentError::InvalidQuantization(quantization).into());
        }
        if subdivision_depth < 0 {
            return Err(ArgumentError::NegativeDepth(subdivision_depth).into());
        }
        match u32::try_from(subdivision_depth) {
            Ok(depth) if depth <= MAX_SUBDIVISION_DEPTH => Ok(depth),
            _ => Err(ArgumentError::DepthOutOfRange {
                value: subdivision_depth,
                max: MAX_SUBDIVISION_DEPTH,
            }
            .into()),
        }
    }
}
