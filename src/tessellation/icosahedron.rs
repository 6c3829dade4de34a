use crate::math::Point3;

use super::Triangle;

/// Golden ratio, the non-unit coordinate of the icosahedron's vertices.
const PHI: f64 = 1.618_033_988_749_895;

/// Unnormalized vertices of the regular icosahedron: cyclic permutations of
/// `(0, ±1, ±PHI)`.
const VERTICES: [[f64; 3]; 12] = [
    [-1.0, PHI, 0.0],
    [1.0, PHI, 0.0],
    [-1.0, -PHI, 0.0],
    [1.0, -PHI, 0.0],
    [0.0, -1.0, PHI],
    [0.0, 1.0, PHI],
    [0.0, -1.0, -PHI],
    [0.0, 1.0, -PHI],
    [PHI, 0.0, -1.0],
    [PHI, 0.0, 1.0],
    [-PHI, 0.0, -1.0],
    [-PHI, 0.0, 1.0],
];

/// The 20 faces as indices into the vertex table, outward winding.
pub const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// Returns the 20 faces of the regular icosahedron inscribed in the unit
/// sphere.
#[must_use]
pub fn icosahedron() -> Vec<Triangle> {
    let vertices: Vec<Point3> = VERTICES
        .iter()
        .map(|&[x, y, z]| Point3::from(Point3::new(x, y, z).coords.normalize()))
        .collect();

    ICOSAHEDRON_FACES
        .iter()
        .map(|&[a, b, c]| [vertices[a], vertices[b], vertices[c]])
        .collect()
}
