//! Area-weighted integration of face-centered data over the unit sphere.

use crate::data::field::DataField;
use crate::mesh_error::MeshError;
use crate::topology::element::ElementKind;
use crate::topology::mesh::Mesh;
use num_traits::Float;

/// `sum_f area_f * d[..., f]`, dropping the trailing axis.
pub fn integrate<T: Float>(mesh: &Mesh, data: &DataField<T>) -> Result<DataField<T>, MeshError> {
    if !data.is_centered_on(mesh, ElementKind::Face) {
        return Err(match data.centering(mesh) {
            Some(kind) => MeshError::UnsupportedCentering {
                operation: "integration",
                centering: kind,
            },
            None => MeshError::SizeMatchesNoKind {
                size: data.trailing_len(),
                expected_kind: ElementKind::Face,
                expected: mesh.n_face(),
            },
        });
    }

    let areas: Vec<T> = mesh
        .face_areas()
        .iter()
        .map(|&a| T::from(a).unwrap_or_else(T::nan))
        .collect();
    let values = data
        .rows()
        .map(|row| {
            row.iter()
                .zip(&areas)
                .fold(T::zero(), |acc, (&v, &a)| acc + v * a)
        })
        .collect();
    data.without_trailing(values)
}
