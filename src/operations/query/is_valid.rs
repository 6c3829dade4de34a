use tracing::warn;

use crate::error::{ConsistencyError, Result};
use crate::operations::creation::GridParams;
use crate::topology::Grid;

/// Tolerance for unit-sphere membership of centers and ring points.
const ON_SPHERE_TOL: f64 = 1e-9;

/// Validates the topological and geometric invariants of a grid.
///
/// - cell count is `10 * 4^depth + 2`
/// - exactly twelve pentagons, every other cell a hexagon
/// - each cell has one neighbor per boundary edge
/// - adjacency is symmetric
/// - centers and ring points lie on the unit sphere
pub struct IsValid {
    tolerance: f64,
}

impl Default for IsValid {
    fn default() -> Self {
        Self {
            tolerance: ON_SPHERE_TOL,
        }
    }
}

impl IsValid {
    /// Creates a new `IsValid` query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes the validation, returning `true` if the grid is valid.
    #[must_use]
    pub fn execute(&self, grid: &Grid) -> bool {
        self.check(grid).is_ok()
    }

    /// Executes the validation, reporting the first violated invariant.
    ///
    /// # Errors
    ///
    /// Returns the [`ConsistencyError`] describing the first violation found.
    pub fn check(&self, grid: &Grid) -> Result<()> {
        let result = self.check_inner(grid);
        if let Err(err) = &result {
            warn!(%err, "grid failed validation");
        }
        result
    }

    fn check_inner(&self, grid: &Grid) -> Result<()> {
        if grid.is_empty() {
            return Err(ConsistencyError::EmptyGrid.into());
        }

        let expected = GridParams::cell_count(grid.subdivision_depth());
        if expected != Some(grid.len()) {
            return Err(ConsistencyError::CellCount {
                expected: expected.unwrap_or(usize::MAX),
                actual: grid.len(),
            }
            .into());
        }

        let mut pentagons = 0;
        for cell in grid.cells() {
            let id = cell.id();
            match cell.sides() {
                5 => pentagons += 1,
                6 => {}
                sides => return Err(ConsistencyError::CellSides { cell: id, sides }.into()),
            }

            if cell.neighbors().len() != cell.sides() {
                return Err(ConsistencyError::NeighborMismatch {
                    cell: id,
                    boundary: cell.sides(),
                    neighbors: cell.neighbors().len(),
                }
                .into());
            }

            for &n in cell.neighbors() {
                let linked_back = grid
                    .cell(n)
                    .is_some_and(|other| other.neighbors().contains(&id));
                if !linked_back {
                    return Err(ConsistencyError::AsymmetricAdjacency(id, n).into());
                }
            }

            let off_sphere = std::iter::once(cell.center_unit())
                .chain(cell.boundary_unit())
                .any(|p| (p.coords.norm() - 1.0).abs() > self.tolerance);
            if off_sphere {
                return Err(ConsistencyError::OffSphere(id).into());
            }
        }

        if pentagons != 12 {
            return Err(ConsistencyError::PentagonCount(pentagons).into());
        }
        Ok(())
    }
}
