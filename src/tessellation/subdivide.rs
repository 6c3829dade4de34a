use tracing::debug;

use crate::math::spherical::arc_midpoint;

use super::{icosahedron, Triangle};

/// Builds a geodesic triangle mesh by recursively splitting the faces of an
/// icosahedron.
///
/// Each round replaces every triangle `(v0, v1, v2)` with four: the three
/// corner triangles and the central one spanned by the edge midpoints. The
/// midpoints are pushed back onto the unit sphere, so the mesh bends to the
/// sphere instead of staying on the icosahedron's flat faces.
pub struct Subdivide {
    depth: u32,
}

impl Subdivide {
    /// Creates a new `Subdivide` operation with the given number of rounds.
    #[must_use]
    pub fn new(depth: u32) -> Self {
        Self { depth }
    }

    /// Number of triangles produced for `depth` rounds: `20 * 4^depth`.
    ///
    /// Returns `None` if the count does not fit in a `usize`.
    #[must_use]
    pub fn triangle_count(depth: u32) -> Option<usize> {
        4usize.checked_pow(depth)?.checked_mul(20)
    }

    /// Executes the subdivision, returning the triangle soup.
    ///
    /// Winding of the base faces is preserved in every child triangle.
    #[must_use]
    pub fn execute(&self) -> Vec<Triangle> {
        let mut triangles = icosahedron();

        for round in 1..=self.depth {
            let mut next = Vec::with_capacity(triangles.len() * 4);
            for [v0, v1, v2] in &triangles {
                let m01 = arc_midpoint(v0, v1);
                let m12 = arc_midpoint(v1, v2);
                let m20 = arc_midpoint(v2, v0);

                next.push([*v0, m01, m20]);
                next.push([*v1, m12, m01]);
                next.push([*v2, m20, m12]);
                next.push([m01, m12, m20]);
            }
            triangles = next;
            debug!(round, triangles = triangles.len(), "subdivided geodesic mesh");
        }

        triangles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn triangle_count_grows_by_four() {
        for depth in 0..=4 {
            let tris = Subdivide::new(depth).execute();
            assert_eq!(Some(tris.len()), Subdivide::triangle_count(depth));
        }
        assert_eq!(Subdivide::triangle_count(0), Some(20));
        assert_eq!(Subdivide::triangle_count(3), Some(1280));
    }

    #[test]
    fn triangle_count_overflow_is_none() {
        assert!(Subdivide::triangle_count(9).is_some());
        assert_eq!(Subdivide::triangle_count(32), None);
        assert_eq!(Subdivide::triangle_count(u32::MAX), None);
    }

    #[test]
    fn all_points_lie_on_unit_sphere() {
        for tri in Subdivide::new(3).execute() {
            for p in tri {
                assert_relative_eq!(p.coords.norm(), 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn children_keep_outward_winding() {
        for [a, b, c] in Subdivide::new(2).execute() {
            let normal = (b - a).cross(&(c - a));
            assert!(normal.dot(&a.coords) > 0.0);
        }
    }

    #[test]
    fn midpoints_are_not_flat() {
        // Without re-projection the first-round midpoints would sit inside the
        // sphere at the icosahedron's edge midpoint distance.
        let flat = Subdivide::new(1)
            .execute()
            .iter()
            .flatten()
            .any(|p| p.coords.norm() < 1.0 - 1e-6);
        assert!(!flat);
    }
}
