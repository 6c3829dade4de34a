use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{ConsistencyError, Result};
use crate::math::quantize::{EdgeKey, PointKey};
use crate::topology::{CellId, Grid, GridCell};

/// Links cells that share a boundary edge.
///
/// Every boundary edge is keyed by its quantized endpoints. On a closed
/// sphere each key must be seen by exactly two cells; anything else is a
/// defect in the geometry pipeline and fails the operation instead of
/// guessing which cells to link.
pub struct ResolveAdjacency {
    quantization: f64,
}

impl ResolveAdjacency {
    /// Creates a new `ResolveAdjacency` operation.
    #[must_use]
    pub fn new(quantization: f64) -> Self {
        Self { quantization }
    }

    /// Executes the operation, filling in the neighbors of every cell.
    ///
    /// Neighbors are stored in boundary order: neighbor `i` lies across the
    /// edge starting at boundary point `i`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConsistencyError`] if an edge collapses under quantization,
    /// is shared by other than two cells, or if two cells share more than one
    /// edge.
    pub fn execute(&self, grid: &mut Grid) -> Result<()> {
        let mut edge_cells: HashMap<EdgeKey, Vec<CellId>> = HashMap::new();
        for cell in grid.cells() {
            for key in self.boundary_edges(cell) {
                if key.is_degenerate() {
                    warn!(cell = ?cell.id(), "boundary edge collapsed under quantization");
                    return Err(ConsistencyError::CollapsedEdge(cell.id()).into());
                }
                edge_cells.entry(key).or_default().push(cell.id());
            }
        }

        let mut links: Vec<(CellId, Vec<CellId>)> = Vec::with_capacity(grid.len());
        for cell in grid.cells() {
            let id = cell.id();
            let mut neighbors = Vec::with_capacity(cell.sides());

            for key in self.boundary_edges(cell) {
                let sharing = edge_cells.get(&key).map_or(&[][..], Vec::as_slice);
                let [a, b] = sharing else {
                    warn!(cell = ?id, sharing = sharing.len(), "non-manifold boundary edge");
                    return Err(ConsistencyError::EdgeShareCount {
                        cells: sharing.len(),
                    }
                    .into());
                };
                let other = if *a == id { *b } else { *a };
                if other == id || neighbors.contains(&other) {
                    warn!(cell = ?id, other = ?other, "cells share more than one edge");
                    return Err(ConsistencyError::DuplicateAdjacency(id, other).into());
                }
                neighbors.push(other);
            }

            links.push((id, neighbors));
        }

        for (id, neighbors) in links {
            if let Some(cell) = grid.cell_mut(id) {
                cell.neighbors = neighbors;
            }
        }
        grid.measure_step_angle();

        debug!(
            edges = edge_cells.len(),
            max_step_angle = grid.max_step_angle(),
            "resolved cell adjacency"
        );
        Ok(())
    }

    /// Edge keys of a cell's boundary ring, in ring order.
    fn boundary_edges(&self, cell: &GridCell) -> impl Iterator<Item = EdgeKey> {
        let keys: Vec<PointKey> = cell
            .boundary_unit()
            .iter()
            .map(|p| PointKey::new(p, self.quantization))
            .collect();
        let n = keys.len();
        (0..n).map(move |i| EdgeKey::from_keys(keys[i], keys[(i + 1) % n]))
    }
}
