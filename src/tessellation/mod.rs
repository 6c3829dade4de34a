mod icosahedron;
mod subdivide;

pub use icosahedron::{icosahedron, ICOSAHEDRON_FACES};
pub use subdivide::Subdivide;

use crate::math::Point3;

/// A triangle with all three corners on the unit sphere, wound
/// counter-clockwise when viewed from outside.
pub type Triangle = [Point3; 3];
