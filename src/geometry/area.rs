//! Spherical face areas on the unit sphere.

use crate::geometry::coordinates::{cross, dot};
use crate::topology::connectivity::Connectivity;

/// Solid angle of the spherical triangle `(a, b, c)` (Van Oosterom and
/// Strackee, 1983). Inputs must be unit vectors.
pub fn spherical_triangle_area(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> f64 {
    let numerator = dot(a, cross(b, c)).abs();
    let denominator = 1.0 + dot(a, b) + dot(b, c) + dot(c, a);
    2.0 * numerator.atan2(denominator)
}

/// Area of the spherical polygon through `vertices`, by triangle fan from the
/// first vertex. Valid for convex faces, which is what unstructured climate
/// meshes provide.
pub fn spherical_polygon_area(vertices: &[[f64; 3]]) -> f64 {
    let Some((&first, rest)) = vertices.split_first() else {
        return 0.0;
    };
    rest.windows(2)
        .map(|w| spherical_triangle_area(first, w[0], w[1]))
        .sum()
}

/// Area of every face of a mesh.
pub fn face_areas(face_node: &Connectivity, node_xyz: &[[f64; 3]]) -> Vec<f64> {
    (0..face_node.n_rows())
        .map(|f| {
            let vertices: Vec<[f64; 3]> =
                face_node.real_row(f).iter().map(|&n| node_xyz[n]).collect();
            spherical_polygon_area(&vertices)
        })
        .collect()
}
