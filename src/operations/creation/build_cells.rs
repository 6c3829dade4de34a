use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{ConsistencyError, Result};
use crate::math::quantize::PointKey;
use crate::math::spherical::{spherical_centroid, TangentBasis};
use crate::math::Point3;
use crate::tessellation::Triangle;
use crate::topology::Grid;

/// Builds the dual cells of a geodesic triangle mesh.
///
/// Every unique mesh vertex becomes the center of one cell. The cell's
/// boundary is the ring of (re-normalized) centroids of the triangles that
/// touch the vertex, sorted by angle around the center. Cells are inserted in
/// the order their vertices are first seen in the triangle list, so the same
/// mesh always yields the same IDs.
pub struct BuildCells<'a> {
    triangles: &'a [Triangle],
    quantization: f64,
}

impl<'a> BuildCells<'a> {
    /// Creates a new `BuildCells` operation.
    #[must_use]
    pub fn new(triangles: &'a [Triangle], quantization: f64) -> Self {
        Self {
            triangles,
            quantization,
        }
    }

    /// Executes the operation, inserting one cell per unique vertex into
    /// `grid`. Neighbors are left empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConsistencyError::DegenerateCell`] if a vertex is touched by
    /// fewer than three triangles.
    pub fn execute(&self, grid: &mut Grid) -> Result<()> {
        let (vertices, incident) = self.collect_vertices();

        // Each centroid is computed once and shared by its three cells, so a
        // ring point is bit-identical in every ring that contains it.
        let centroids: Vec<Point3> = self.triangles.iter().map(spherical_centroid).collect();

        for (center, triangles) in vertices.iter().zip(&incident) {
            if triangles.len() < 3 {
                warn!(
                    incident = triangles.len(),
                    ?center,
                    "vertex cannot form a cell polygon"
                );
                return Err(ConsistencyError::DegenerateCell {
                    incident: triangles.len(),
                }
                .into());
            }

            let ring = angular_ring(center, triangles.iter().map(|&t| centroids[t]));
            grid.add_cell(*center, ring);
        }

        debug!(
            triangles = self.triangles.len(),
            cells = grid.len(),
            "built dual cells"
        );
        Ok(())
    }

    /// Deduplicates triangle corners by quantized position.
    ///
    /// Returns the unique vertices in first-seen order together with the
    /// indices of the triangles incident to each.
    fn collect_vertices(&self) -> (Vec<Point3>, Vec<Vec<usize>>) {
        let mut index: HashMap<PointKey, usize> = HashMap::new();
        let mut vertices: Vec<Point3> = Vec::new();
        let mut incident: Vec<Vec<usize>> = Vec::new();

        for (t, tri) in self.triangles.iter().enumerate() {
            for p in tri {
                let key = PointKey::new(p, self.quantization);
                let v = *index.entry(key).or_insert_with(|| {
                    vertices.push(*p);
                    incident.push(Vec::new());
                    vertices.len() - 1
                });
                // Two corners of one triangle can only merge under a far too
                // coarse quantization; count the triangle once.
                if incident[v].last() != Some(&t) {
                    incident[v].push(t);
                }
            }
        }

        (vertices, incident)
    }
}

/// Sorts ring points counter-clockwise around `center` as seen from outside
/// the sphere.
fn angular_ring(center: &Point3, points: impl Iterator<Item = Point3>) -> Vec<Point3> {
    let basis = TangentBasis::at(&center.coords);
    let mut keyed: Vec<(f64, Point3)> = points.map(|p| (basis.angle_of(&p), p)).collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, p)| p).collect()
}
