use crate::error::{ConsistencyError, Result};
use crate::math::spherical::project_to_unit_sphere;
use crate::math::Point3;
use crate::topology::{CellId, Grid};

/// Finds the cell whose center is closest to a point.
///
/// The query point may be given at any distance from the sphere's center; it
/// is projected onto the unit sphere first. The cell with the largest
/// `dot(center, query)` is the one with the smallest great-circle (and chord)
/// distance. A point at the origin has no direction and resolves to the first
/// cell, as does a point with a non-finite coordinate.
pub struct NearestCell {
    point: Point3,
}

impl NearestCell {
    /// Creates a new `NearestCell` query.
    #[must_use]
    pub fn new(point: Point3) -> Self {
        Self { point }
    }

    /// Executes the query with a linear scan over all cell centers.
    ///
    /// # Errors
    ///
    /// Returns [`ConsistencyError::EmptyGrid`] if the grid has no cells.
    pub fn execute(&self, grid: &Grid) -> Result<CellId> {
        let query = project_to_unit_sphere(&self.point);

        let mut best: Option<(f64, CellId)> = None;
        for cell in grid.cells() {
            let score = query.map_or(0.0, |q| cell.center_unit().coords.dot(&q.coords));
            if best.is_none_or(|(top, _)| score > top) {
                best = Some((score, cell.id()));
            }
        }

        best.map(|(_, id)| id)
            .ok_or_else(|| ConsistencyError::EmptyGrid.into())
    }
}
