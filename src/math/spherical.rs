//! Unit-sphere helpers shared by the subdivider, the cell builder and the
//! pathfinder.

use super::{Point3, Vector3, TOLERANCE};

/// Projects a point radially onto the unit sphere.
///
/// Returns `None` for points at (or numerically at) the origin, which have no
/// direction, and for non-finite points.
#[must_use]
pub fn project_to_unit_sphere(p: &Point3) -> Option<Point3> {
    if !p.coords.iter().all(|c| c.is_finite()) {
        return None;
    }
    // Scale by the largest component first so the norm cannot overflow.
    let scale = p.coords.amax();
    if scale < TOLERANCE {
        return None;
    }
    let scaled = p.coords / scale;
    Some(Point3::from(scaled / scaled.norm()))
}

/// Midpoint of the great-circle arc between two unit vectors.
///
/// Callers only pass distinct, non-antipodal points (edge endpoints of a
/// triangle on the sphere), so the chord midpoint never reaches the origin.
#[must_use]
pub fn arc_midpoint(a: &Point3, b: &Point3) -> Point3 {
    let mid = (a.coords + b.coords) * 0.5;
    Point3::from(mid.normalize())
}

/// Centroid of a spherical triangle, re-projected onto the unit sphere.
#[must_use]
pub fn spherical_centroid(tri: &[Point3; 3]) -> Point3 {
    let sum = tri[0].coords + tri[1].coords + tri[2].coords;
    Point3::from((sum / 3.0).normalize())
}

/// Great-circle angle in radians between two unit vectors.
///
/// The dot product is clamped so that rounding never pushes it outside the
/// domain of `acos`.
#[must_use]
pub fn angular_distance(a: &Point3, b: &Point3) -> f64 {
    a.coords.dot(&b.coords).clamp(-1.0, 1.0).acos()
}

/// Orthonormal basis of the tangent plane at a point on the unit sphere.
///
/// `u` and `v` together with the normal form a right-handed frame, so the
/// angle `atan2(p·v, p·u)` increases counter-clockwise when viewed from
/// outside the sphere.
#[derive(Debug, Clone, Copy)]
pub struct TangentBasis {
    u: Vector3,
    v: Vector3,
}

impl TangentBasis {
    /// Builds the basis at `normal`, which must be a unit vector.
    #[must_use]
    pub fn at(normal: &Vector3) -> Self {
        // The coordinate axis least aligned with the normal is never parallel to it.
        let abs = normal.abs();
        let helper = if abs.x <= abs.y && abs.x <= abs.z {
            Vector3::x()
        } else if abs.y <= abs.z {
            Vector3::y()
        } else {
            Vector3::z()
        };
        let u = helper.cross(normal).normalize();
        let v = normal.cross(&u);
        Self { u, v }
    }

    /// Polar angle of `p` projected into the tangent plane, in `(-pi, pi]`.
    #[must_use]
    pub fn angle_of(&self, p: &Point3) -> f64 {
        p.coords.dot(&self.v).atan2(p.coords.dot(&self.u))
    }
}
