//! Absolute differences across edges, and the face-to-face gradient
//! magnitude built on them.

use crate::data::field::DataField;
use crate::geometry::coordinates::great_circle_angle;
use crate::mesh_error::MeshError;
use crate::topology::connectivity::{Connectivity, FILL_VALUE};
use crate::topology::element::ElementKind;
use crate::topology::mesh::Mesh;
use num_traits::Float;
use serde::{Deserialize, Serialize};

/// Options for [`gradient`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientOptions {
    /// Divide by the L2 norm of the whole result.
    pub normalize: bool,
    /// Only magnitudes are computed; `false` is accepted but logged.
    pub use_magnitude: bool,
}

impl Default for GradientOptions {
    fn default() -> Self {
        Self {
            normalize: false,
            use_magnitude: true,
        }
    }
}

/// `|d[a] - d[b]|` for the two entries of every row of a two-column table.
/// Rows with a fill slot give 0.
fn edge_pair_difference<T: Float>(row: &[T], pairs: &Connectivity, out: &mut Vec<T>) {
    for e in 0..pairs.n_rows() {
        match pairs.row(e) {
            [a, b] if *a != FILL_VALUE && *b != FILL_VALUE => out.push((row[*a] - row[*b]).abs()),
            _ => out.push(T::zero()),
        }
    }
}

/// Difference of `data` across every edge of `mesh`.
///
/// Face-centered data differs across the two faces of an edge (boundary
/// edges give 0); node-centered data across the two nodes of an edge.
pub fn difference<T: Float>(
    mesh: &Mesh,
    data: &DataField<T>,
    destination: ElementKind,
) -> Result<DataField<T>, MeshError> {
    let source = data
        .centering(mesh)
        .ok_or_else(|| MeshError::UnanchoredData {
            shape: data.shape().to_vec(),
            n_node: mesh.n_node(),
            n_edge: mesh.n_edge(),
            n_face: mesh.n_face(),
        })?;
    let (pairs, suffix) = match (source, destination) {
        (ElementKind::Face, ElementKind::Edge) => {
            (mesh.edge_face_connectivity(), "edge_face_difference")
        }
        (ElementKind::Node, ElementKind::Edge) => {
            (mesh.edge_node_connectivity(), "edge_node_difference")
        }
        (from, to) => {
            return Err(MeshError::UnsupportedCombination {
                operation: "difference",
                from,
                to,
            });
        }
    };

    let mut values = Vec::with_capacity(data.n_rows() * mesh.n_edge());
    for row in data.rows() {
        edge_pair_difference(row, pairs, &mut values);
    }
    let name = data.name().map(|n| format!("{n}_{suffix}"));
    Ok(data
        .with_trailing(ElementKind::Edge.dim_name(), mesh.n_edge(), values)?
        .renamed(name))
}

/// Gradient magnitude of face-centered data on every edge: the absolute
/// difference across the edge divided by the great-circle distance between
/// the two face centers. Boundary edges and coincident centers give 0.
pub fn gradient<T: Float>(
    mesh: &Mesh,
    data: &DataField<T>,
    options: GradientOptions,
) -> Result<DataField<T>, MeshError> {
    if !data.is_centered_on(mesh, ElementKind::Face) {
        return Err(match data.centering(mesh) {
            Some(kind) => MeshError::UnsupportedCentering {
                operation: "gradient",
                centering: kind,
            },
            None => MeshError::SizeMatchesNoKind {
                size: data.trailing_len(),
                expected_kind: ElementKind::Face,
                expected: mesh.n_face(),
            },
        });
    }
    if !options.use_magnitude {
        log::warn!("signed gradients are not supported; returning gradient magnitudes");
    }

    let edge_face = mesh.edge_face_connectivity();
    let face_xyz = mesh.xyz(ElementKind::Face);
    let distance: Vec<Option<T>> = (0..mesh.n_edge())
        .map(|e| match edge_face.row(e) {
            [a, b] if *a != FILL_VALUE && *b != FILL_VALUE => {
                let d = great_circle_angle(face_xyz[*a], face_xyz[*b]);
                (d > 0.0).then(|| T::from(d)).flatten()
            }
            _ => None,
        })
        .collect();

    let mut values = Vec::with_capacity(data.n_rows() * mesh.n_edge());
    for row in data.rows() {
        for (e, d) in distance.iter().enumerate() {
            values.push(match (edge_face.row(e), d) {
                ([a, b], Some(d)) => (row[*a] - row[*b]).abs() / *d,
                _ => T::zero(),
            });
        }
    }

    if options.normalize {
        let norm = values.iter().fold(T::zero(), |acc, &v| acc + v * v).sqrt();
        if norm > T::zero() {
            values.iter_mut().for_each(|v| *v = *v / norm);
        }
    }

    let name = Some(match data.name() {
        Some(n) => format!("{n}_grad"),
        None => "grad".to_string(),
    });
    Ok(data
        .with_trailing(ElementKind::Edge.dim_name(), mesh.n_edge(), values)?
        .renamed(name))
}
