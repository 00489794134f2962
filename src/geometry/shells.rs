//! Closed polygon shells built from face→node connectivity.
//!
//! Every shell has exactly `n_max_face_nodes + 1` vertices: the face's real
//! nodes, the first node again to close the ring, and the first node repeated
//! through any remaining padding slots. Uniform shell length lets downstream
//! consumers treat the shells as one dense `n_face x (n_max + 1) x 2` array.

use crate::geometry::coordinates::normalize_longitude;
use crate::topology::connectivity::Connectivity;
use std::borrow::Cow;

/// Dense storage of closed `(lon, lat)` vertex rings, one per face.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonShells {
    shell_len: usize,
    vertices: Vec<[f64; 2]>,
}

impl PolygonShells {
    /// Build one closed shell per face.
    ///
    /// If any node longitude exceeds 180 degrees, the whole longitude array is
    /// first remapped into `[-180, 180)`.
    pub fn build(
        node_lon: &[f64],
        node_lat: &[f64],
        face_node: &Connectivity,
        nodes_per_face: &[usize],
        n_face: usize,
    ) -> Self {
        let lon: Cow<'_, [f64]> = if node_lon.iter().any(|&x| x > 180.0) {
            Cow::Owned(node_lon.iter().map(|&x| normalize_longitude(x)).collect())
        } else {
            Cow::Borrowed(node_lon)
        };

        let shell_len = face_node.n_cols() + 1;
        let mut vertices = Vec::with_capacity(n_face * shell_len);
        for (f, &k) in nodes_per_face.iter().enumerate().take(n_face) {
            let nodes = &face_node.row(f)[..k];
            let start = vertices.len();
            vertices.extend(nodes.iter().map(|&n| [lon[n], node_lat[n]]));
            let first = vertices.get(start).copied().unwrap_or([f64::NAN; 2]);
            vertices.resize(start + shell_len, first);
        }
        Self { shell_len, vertices }
    }

    /// Number of shells.
    #[inline]
    pub fn len(&self) -> usize {
        if self.shell_len == 0 { 0 } else { self.vertices.len() / self.shell_len }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertex count of every shell (`n_max_face_nodes + 1`).
    #[inline]
    pub fn shell_len(&self) -> usize {
        self.shell_len
    }

    /// The closed, padded ring of face `i`.
    #[inline]
    pub fn shell(&self, i: usize) -> &[[f64; 2]] {
        &self.vertices[i * self.shell_len..(i + 1) * self.shell_len]
    }

    /// The closed ring of face `i` without padding repeats.
    pub fn closed_ring(&self, i: usize, nodes: usize) -> &[[f64; 2]] {
        &self.shell(i)[..=nodes]
    }

    pub fn iter(&self) -> impl Iterator<Item = &[[f64; 2]]> {
        self.vertices.chunks_exact(self.shell_len.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_in_quad_mesh_is_padded_with_first_vertex() {
        let lon = [0.0, 1.0, 1.0, 0.0, 2.0];
        let lat = [0.0, 0.0, 1.0, 1.0, 0.5];
        let faces = Connectivity::from_rows(&[vec![0, 1, 2, 3], vec![1, 4, 2]]);
        let shells = PolygonShells::build(&lon, &lat, &faces, &[4, 3], 2);
        assert_eq!(shells.len(), 2);
        assert_eq!(shells.shell_len(), 5);
        assert_eq!(shells.shell(1), &[[1.0, 0.0], [2.0, 0.5], [1.0, 1.0], [1.0, 0.0], [1.0, 0.0]]);
        assert_eq!(shells.closed_ring(1, 3).len(), 4);
    }

    #[test]
    fn longitudes_above_180_are_normalized_globally() {
        let lon = [350.0, 10.0, 0.0];
        let lat = [0.0, 0.0, 5.0];
        let faces = Connectivity::from_rows(&[vec![0, 1, 2]]);
        let shells = PolygonShells::build(&lon, &lat, &faces, &[3], 1);
        assert_eq!(shells.shell(0)[0], [-10.0, 0.0]);
        assert_eq!(shells.shell(0)[1], [10.0, 0.0]);
    }
}
