use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{ArgumentError, Result};
use crate::math::Point3;

slotmap::new_key_type! {
    /// Unique identifier for a cell in a [`Grid`](super::Grid).
    pub struct CellId;
}

/// Default cost of entering a cell.
pub const DEFAULT_MOVEMENT_COST: f64 = 1.0;

/// One hexagonal (or, twelve times per grid, pentagonal) cell of the grid.
///
/// Geometry and adjacency are fixed once the grid is built. The movement cost
/// is the only mutable field and can be changed through a shared reference.
#[derive(Debug)]
pub struct GridCell {
    id: CellId,
    center_unit: Point3,
    center_world: Point3,
    boundary_unit: Vec<Point3>,
    boundary_world: Vec<Point3>,
    pub(crate) neighbors: Vec<CellId>,
    /// `f64` bit pattern.
    movement_cost: AtomicU64,
}

impl GridCell {
    /// Creates a cell with no neighbors and the default movement cost.
    ///
    /// `boundary_unit` must already be in angular order around the center.
    pub(crate) fn new(
        id: CellId,
        center_unit: Point3,
        boundary_unit: Vec<Point3>,
        radius: f64,
    ) -> Self {
        let center_world = Point3::from(center_unit.coords * radius);
        let boundary_world = boundary_unit
            .iter()
            .map(|p| Point3::from(p.coords * radius))
            .collect();
        Self {
            id,
            center_unit,
            center_world,
            boundary_unit,
            boundary_world,
            neighbors: Vec::new(),
            movement_cost: AtomicU64::new(DEFAULT_MOVEMENT_COST.to_bits()),
        }
    }

    #[must_use]
    pub fn id(&self) -> CellId {
        self.id
    }

    /// Cell center on the unit sphere.
    #[must_use]
    pub fn center_unit(&self) -> &Point3 {
        &self.center_unit
    }

    /// Cell center scaled to the grid radius.
    #[must_use]
    pub fn center_world(&self) -> &Point3 {
        &self.center_world
    }

    /// Boundary ring on the unit sphere, counter-clockwise seen from outside.
    #[must_use]
    pub fn boundary_unit(&self) -> &[Point3] {
        &self.boundary_unit
    }

    /// Boundary ring scaled to the grid radius.
    #[must_use]
    pub fn boundary_world(&self) -> &[Point3] {
        &self.boundary_world
    }

    /// Adjacent cells. `neighbors()[i]` lies across the boundary edge from
    /// `boundary_unit()[i]` to `boundary_unit()[(i + 1) % n]`.
    #[must_use]
    pub fn neighbors(&self) -> &[CellId] {
        &self.neighbors
    }

    /// Number of boundary points (5 or 6).
    #[must_use]
    pub fn sides(&self) -> usize {
        self.boundary_unit.len()
    }

    #[must_use]
    pub fn is_pentagon(&self) -> bool {
        self.sides() == 5
    }

    /// Cost of entering this cell. `f64::INFINITY` marks it impassable.
    #[must_use]
    pub fn movement_cost(&self) -> f64 {
        f64::from_bits(self.movement_cost.load(Ordering::Relaxed))
    }

    /// Sets the cost of entering this cell.
    ///
    /// Path queries running concurrently see either the old or the new value.
    ///
    /// # Errors
    ///
    /// Returns an error if `cost` is negative or NaN.
    pub fn set_movement_cost(&self, cost: f64) -> Result<()> {
        if cost.is_nan() || cost < 0.0 {
            return Err(ArgumentError::InvalidMovementCost(cost).into());
        }
        self.movement_cost.store(cost.to_bits(), Ordering::Relaxed);
        Ok(())
    }
}
