pub mod attachments;
pub mod cell;

pub use attachments::CellAttachments;
pub use cell::{CellId, GridCell, DEFAULT_MOVEMENT_COST};

use slotmap::SlotMap;

use crate::error::{ArgumentError, Result};
use crate::math::spherical::angular_distance;
use crate::math::Point3;
use crate::operations::query::{FindPath, GridPath, NearestCell};

/// Central arena that owns every cell of one sphere grid.
///
/// Cells reference each other via typed IDs (generational indices). The arena
/// is filled by the construction operations and is topologically frozen
/// afterwards: callers can read geometry and adjacency and change movement
/// costs, but cannot add, remove or relink cells.
#[derive(Debug)]
pub struct Grid {
    cells: SlotMap<CellId, GridCell>,
    radius: f64,
    subdivision_depth: u32,
    /// Widest great-circle angle between two adjacent cell centers.
    max_step_angle: f64,
}

impl Grid {
    /// Creates an empty grid. Filled by the construction operations.
    pub(crate) fn new(radius: f64, subdivision_depth: u32) -> Self {
        Self {
            cells: SlotMap::with_key(),
            radius,
            subdivision_depth,
            max_step_angle: 0.0,
        }
    }

    // --- Construction ---

    /// Inserts a cell centered on `center_unit` and returns its ID.
    pub(crate) fn add_cell(&mut self, center_unit: Point3, boundary_unit: Vec<Point3>) -> CellId {
        let radius = self.radius;
        self.cells
            .insert_with_key(|id| GridCell::new(id, center_unit, boundary_unit, radius))
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> Option<&mut GridCell> {
        self.cells.get_mut(id)
    }

    /// Recomputes the widest neighbor step from the current adjacency.
    pub(crate) fn measure_step_angle(&mut self) {
        let mut widest = 0.0_f64;
        for cell in self.cells.values() {
            for &n in &cell.neighbors {
                if let Some(other) = self.cells.get(n) {
                    let step = angular_distance(cell.center_unit(), other.center_unit());
                    widest = widest.max(step);
                }
            }
        }
        self.max_step_angle = widest;
    }

    // --- Properties ---

    /// Sphere radius used for the world-space geometry.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn subdivision_depth(&self) -> u32 {
        self.subdivision_depth
    }

    /// Widest great-circle angle, in radians, between adjacent cell centers.
    #[must_use]
    pub fn max_step_angle(&self) -> f64 {
        self.max_step_angle
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    // --- Lookup ---

    /// Returns the cell with the given ID, or `None` if it is not part of
    /// this grid.
    #[must_use]
    pub fn cell(&self, id: CellId) -> Option<&GridCell> {
        self.cells.get(id)
    }

    /// Returns the cell with the given ID, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::UnknownCell`] if the ID is not part of this grid.
    pub fn try_cell(&self, id: CellId) -> Result<&GridCell> {
        self.cells
            .get(id)
            .ok_or_else(|| ArgumentError::UnknownCell(id).into())
    }

    /// Iterates over all cells in construction order.
    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.values()
    }

    /// Iterates over all cell IDs in construction order.
    pub fn ids(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells.keys()
    }

    /// Iterates over the twelve pentagonal cells.
    pub fn pentagons(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.values().filter(|c| c.is_pentagon())
    }

    /// Returns the neighbors of a cell.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is not part of this grid.
    pub fn neighbors(&self, id: CellId) -> Result<&[CellId]> {
        Ok(self.try_cell(id)?.neighbors())
    }

    /// Sets the cost of entering a cell.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is unknown or the cost is negative or NaN.
    pub fn set_movement_cost(&self, id: CellId, cost: f64) -> Result<()> {
        self.try_cell(id)?.set_movement_cost(cost)
    }

    // --- Queries ---

    /// Returns the cell whose center is closest to the direction of `point`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the grid has no cells.
    pub fn nearest_cell(&self, point: &Point3) -> Result<&GridCell> {
        let id = NearestCell::new(*point).execute(self)?;
        self.try_cell(id)
    }

    /// Finds the cheapest path between two cells. `Ok(None)` means no route
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns an error if either ID is not part of this grid.
    pub fn find_path(&self, start: CellId, goal: CellId) -> Result<Option<GridPath>> {
        FindPath::new(start, goal).execute(self)
    }
}
