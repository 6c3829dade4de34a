//! Geodesic hexagonal grid on a sphere, with shared-edge adjacency and A*
//! routing.
//!
//! The grid is the dual of a recursively subdivided icosahedron: every mesh
//! vertex becomes a cell, giving `10 * 4^depth + 2` cells of which exactly
//! twelve are pentagons and the rest hexagons.
//!
//! ```
//! let grid = hexsphere::build_grid(6371.0, 2)?;
//! assert_eq!(grid.len(), 162);
//!
//! let mut ids = grid.ids();
//! let (a, b) = (ids.next().unwrap(), ids.nth(80).unwrap());
//! let path = grid.find_path(a, b)?.expect("closed sphere is connected");
//! assert_eq!(path.cells().first(), Some(&a));
//! # Ok::<(), hexsphere::GridError>(())
//! ```

pub mod error;
pub mod math;
pub mod operations;
pub mod tessellation;
pub mod topology;

pub use error::{GridError, Result};
pub use operations::creation::{BuildGrid, GridParams, MAX_SUBDIVISION_DEPTH};
pub use operations::query::{FindPath, GridPath};
pub use topology::{CellAttachments, CellId, Grid, GridCell};

/// Builds a grid of the given radius and subdivision depth.
///
/// # Errors
///
/// Returns an error if the radius is not positive, the depth is negative or
/// above [`MAX_SUBDIVISION_DEPTH`], or the construction pipeline detects an
/// inconsistency.
pub fn build_grid(radius: f64, subdivision_depth: i64) -> Result<Grid> {
    BuildGrid::new(GridParams::new(radius, subdivision_depth)).execute()
}
