//! Nearest-neighbor remapping of data between two meshes.
//!
//! The source element kind is taken from the data's trailing axis, a ball
//! tree is built (or reused) over those source elements, and every
//! destination element of kind `remap_to` copies the value of its nearest
//! source element. Leading dimensions are carried through unchanged.
//!
//! Equidistant source elements resolve to the smaller source index.

use crate::data::field::DataField;
use crate::mesh_error::MeshError;
use crate::topology::element::{CoordSystem, ElementKind};
use crate::topology::mesh::Mesh;
use serde::{Deserialize, Serialize};

/// Target element kind and coordinate system for a remap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemapOptions {
    pub remap_to: ElementKind,
    pub coord_type: CoordSystem,
}

impl Default for RemapOptions {
    fn default() -> Self {
        Self {
            remap_to: ElementKind::Face,
            coord_type: CoordSystem::Spherical,
        }
    }
}

impl RemapOptions {
    /// Parse the string spellings, e.g. `("face centers", "spherical")`.
    pub fn parse(remap_to: &str, coord_type: &str) -> Result<Self, MeshError> {
        let target = remap_to
            .parse::<ElementKind>()
            .map_err(|_| MeshError::InvalidArgument {
                argument: "remap_to",
                value: remap_to.to_string(),
                expected: "'nodes', 'edge centers', or 'face centers'",
            })?;
        Ok(Self {
            remap_to: target,
            coord_type: coord_type.parse()?,
        })
    }
}

/// Remap `data`, defined on `source`, onto the `options.remap_to` elements
/// of `destination`.
///
/// Shape is validated before any spatial index is touched. The result has
/// shape `(..., destination.count(remap_to))`.
pub fn nearest_neighbor<T: Clone>(
    source: &Mesh,
    destination: &Mesh,
    data: &DataField<T>,
    options: RemapOptions,
) -> Result<DataField<T>, MeshError> {
    let source_kind = data
        .centering(source)
        .ok_or_else(|| MeshError::UnanchoredData {
            shape: data.shape().to_vec(),
            n_node: source.n_node(),
            n_edge: source.n_edge(),
            n_face: source.n_face(),
        })?;

    let target = options.remap_to;
    log::debug!(
        "nearest-neighbor remap: {source_kind} -> {target} ({} coordinates, {} -> {} elements)",
        options.coord_type,
        source.count(source_kind),
        destination.count(target)
    );

    let nearest = source.nearest_elements(
        source_kind,
        options.coord_type,
        destination.lonlat(target),
        destination.xyz(target),
    )?;
    data.gather(target.dim_name(), &nearest)
}
